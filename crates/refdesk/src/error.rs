//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and a process exit code.

use miette::Diagnostic;
use thiserror::Error;

use refdesk_config::ConfigError;
use refdesk_core::CoreError;

pub mod exit_code {
    #[allow(dead_code)]
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to {url}")]
    #[diagnostic(
        code(refdesk::connection_failed),
        help(
            "Check that the backend is running and reachable.\n\
             Reason: {reason}"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(refdesk::timeout),
        help("Increase the timeout with --timeout or check backend responsiveness.")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────
    #[error("Not logged in or session expired")]
    #[diagnostic(
        code(refdesk::auth_required),
        help("Run: refdesk login --profile {profile}")
    )]
    AuthRequired { profile: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(refdesk::not_found),
        help("Run: refdesk {list_command} to see what exists")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── Backend rejections ───────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(refdesk::rejected))]
    Rejected { message: String },

    /// Field errors have already been printed under their field names.
    #[error("{message}")]
    #[diagnostic(
        code(refdesk::invalid_fields),
        help("Fix the fields listed above and try again.")
    )]
    FieldErrors { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(refdesk::validation))]
    Validation { field: String, reason: String },

    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(refdesk::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(refdesk::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: refdesk config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No backend configured")]
    #[diagnostic(
        code(refdesk::no_config),
        help(
            "Create a profile with: refdesk config init\n\
             Or pass --base-url. Expected config at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(refdesk::config))]
    Config(#[from] ConfigError),

    #[error("{0}")]
    #[diagnostic(code(refdesk::internal))]
    Internal(String),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(refdesk::json), help("Check the JSON file contents and try again."))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::AuthRequired { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::FieldErrors { .. }
            | Self::Validation { .. }
            | Self::NonInteractiveRequiresYes { .. }
            | Self::Json(_)
            | Self::Config(ConfigError::Validation { .. }) => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Attach the profile name to an auth failure for the login hint.
    pub fn for_profile(self, profile: &str) -> Self {
        match self {
            Self::AuthRequired { .. } => Self::AuthRequired {
                profile: profile.to_owned(),
            },
            other => other,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Unauthorized { .. } => CliError::AuthRequired {
                profile: "default".into(),
            },

            CoreError::ConnectionFailed { url, reason } => {
                CliError::ConnectionFailed { url, reason }
            }

            CoreError::Timeout => CliError::Timeout,

            CoreError::NotFound { entity, id } => CliError::NotFound {
                list_command: format!("{entity}s list"),
                resource_type: entity,
                identifier: id,
            },

            err @ CoreError::Validation { .. } => CliError::FieldErrors {
                message: err.to_string(),
            },

            CoreError::Rejected { message, .. } | CoreError::Internal(message) => {
                CliError::Rejected { message }
            }

            CoreError::InvalidInput { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },

            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use refdesk_api::types::FieldViolation;

    use super::*;

    #[test]
    fn exit_codes_follow_the_error_kind() {
        let auth: CliError = CoreError::Unauthorized { message: None }.into();
        assert_eq!(auth.exit_code(), exit_code::AUTH);

        let fields: CliError = CoreError::Validation {
            message: None,
            errors: vec![FieldViolation::new("name", "required")],
        }
        .into();
        assert_eq!(fields.exit_code(), exit_code::USAGE);

        let down: CliError = CoreError::ConnectionFailed {
            url: "http://localhost:9".into(),
            reason: "refused".into(),
        }
        .into();
        assert_eq!(down.exit_code(), exit_code::CONNECTION);

        assert_eq!(CliError::from(CoreError::Timeout).exit_code(), exit_code::TIMEOUT);
        assert_eq!(
            CliError::from(CoreError::Rejected {
                message: "Server Error".into(),
                status: Some(500),
            })
            .exit_code(),
            exit_code::GENERAL
        );
    }

    #[test]
    fn auth_hint_names_the_profile() {
        let err = CliError::from(CoreError::Unauthorized { message: None }).for_profile("staging");
        let CliError::AuthRequired { profile } = err else {
            panic!("expected AuthRequired");
        };
        assert_eq!(profile, "staging");
    }
}
