//! Login / logout handlers.

use std::io::BufRead;

use dialoguer::Input;
use refdesk_core::{CoreError, map_errors};
use secrecy::SecretString;

use crate::cli::{GlobalOpts, LoginArgs};
use crate::config::Backend;
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn login(backend: &Backend, args: LoginArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let phone = match args.phone.or_else(|| backend.profile.phone.clone()) {
        Some(phone) => phone,
        None => Input::<String>::new()
            .with_prompt("Phone")
            .interact_text()
            .map_err(util::prompt_err)?,
    };
    let phone = util::normalize_phone(&phone);

    let password = if args.password_stdin {
        let mut line = String::new();
        std::io::stdin().lock().read_line(&mut line)?;
        line.trim_end_matches(['\r', '\n']).to_owned()
    } else {
        rpassword::prompt_password("Password: ").map_err(util::prompt_err)?
    };
    if password.is_empty() {
        return Err(CliError::Validation {
            field: "password".into(),
            reason: "password cannot be empty".into(),
        });
    }

    let user = backend
        .api
        .login(&phone, &SecretString::from(password))
        .await
        .map_err(|e| login_error(backend, e.into()))?;

    if !global.quiet {
        output::success(
            &format!("Logged in as {} (profile '{}')", user.name, backend.profile_name),
            output::should_color(global.color),
        );
    }
    Ok(())
}

/// Credential rejections are reported as such rather than as an expired
/// session.
fn login_error(backend: &Backend, err: CoreError) -> CliError {
    if let Some(violations) = err.field_violations() {
        for (field, messages) in map_errors(violations) {
            eprintln!("{field}:");
            for message in messages {
                eprintln!("  {message}");
            }
        }
    }
    match err {
        CoreError::Unauthorized { message } => CliError::Rejected {
            message: message.unwrap_or_else(|| "Invalid phone or password".into()),
        },
        other => backend.error(other),
    }
}

/// The local token is forgotten even when the server call fails.
pub async fn logout(backend: &Backend, global: &GlobalOpts) -> Result<(), CliError> {
    let result = backend.api.logout().await;
    let color = output::should_color(global.color);
    match result {
        Ok(()) => {
            if !global.quiet {
                output::success("Logged out", color);
            }
            Ok(())
        }
        Err(e) if e.is_unauthorized() => {
            if !global.quiet {
                output::success("Session had already expired; token removed", color);
            }
            Ok(())
        }
        Err(e) => {
            output::failure("Server logout failed; local token removed anyway", color);
            Err(backend.error(e))
        }
    }
}
