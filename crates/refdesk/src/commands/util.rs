//! Shared helpers for command handlers.

use std::io::IsTerminal;
use std::path::Path;

use chrono::NaiveDate;
use serde::de::DeserializeOwned;

use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: message.trim_end_matches('?').to_owned(),
        });
    }
    dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(prompt_err)
}

/// Map a dialoguer / interactive I/O failure into CliError.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Read a JSON form for `--from-file`.
pub fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|e| CliError::Validation {
        field: "from-file".into(),
        reason: format!("{}: {e}", path.display()),
    })
}

pub fn parse_date(field: &str, value: &str) -> Result<NaiveDate, CliError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| CliError::Validation {
        field: field.into(),
        reason: format!("expected YYYY-MM-DD, got '{value}'"),
    })
}

/// Lenient date read for values coming back from the backend.
pub fn backend_date(value: Option<&str>) -> Option<NaiveDate> {
    value.and_then(|v| NaiveDate::parse_from_str(v.get(..10).unwrap_or(v), "%Y-%m-%d").ok())
}

/// Phone numbers are stored with the 998 country code; a bare nine-digit
/// local number gets it prepended.
pub fn normalize_phone(raw: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.len() == 9 {
        format!("998{digits}")
    } else {
        digits
    }
}

/// Password from a flag, prompting when the flag was given without a value.
pub fn password_value(flag: Option<String>) -> Result<Option<String>, CliError> {
    match flag {
        Some(p) if p.is_empty() => {
            let password = rpassword::prompt_password("Password: ").map_err(prompt_err)?;
            Ok(Some(password))
        }
        other => Ok(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_numbers_get_the_country_code() {
        assert_eq!(normalize_phone("90 123 45 67"), "998901234567");
        assert_eq!(normalize_phone("+998901234567"), "998901234567");
    }

    #[test]
    fn backend_dates_tolerate_timestamps() {
        let expected = NaiveDate::from_ymd_opt(1990, 5, 17);
        assert_eq!(backend_date(Some("1990-05-17")), expected);
        assert_eq!(backend_date(Some("1990-05-17T00:00:00.000000Z")), expected);
        assert_eq!(backend_date(Some("17.05.1990")), None);
        assert_eq!(backend_date(None), None);
    }

    #[test]
    fn bad_dates_are_usage_errors() {
        let err = parse_date("birthday", "yesterday").err();
        assert!(matches!(err, Some(CliError::Validation { .. })));
    }
}
