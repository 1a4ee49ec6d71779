//! Config subcommand handlers.

use std::path::Path;

use dialoguer::{Input, Select};
use refdesk_config::{self as rc, Config, Profile};
use secrecy::SecretString;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

use super::util::{self, prompt_err};

fn available_profiles(cfg: &Config) -> String {
    let mut names: Vec<_> = cfg.profiles.keys().cloned().collect();
    if names.is_empty() {
        return "(none)".into();
    }
    names.sort();
    names.join(", ")
}

fn invalid(field: &str, reason: &str) -> CliError {
    CliError::Validation {
        field: field.into(),
        reason: reason.into(),
    }
}

/// Load the config at `path`, apply `edit` and write it back.
///
/// A file that fails to load is reported and left untouched; writing
/// defaults over it would drop every profile it holds.
fn edit_config_at<T>(
    path: &Path,
    edit: impl FnOnce(&mut Config) -> Result<T, CliError>,
) -> Result<T, CliError> {
    let mut cfg = rc::load_config_from(path)?;
    let out = edit(&mut cfg)?;
    rc::save_config_to(&cfg, path)?;
    Ok(out)
}

/// Apply `config set <key> <value>` to a profile.
fn set_key(profile: &mut Profile, key: &str, value: String) -> Result<(), CliError> {
    match key {
        "base_url" | "base-url" => {
            url::Url::parse(&value).map_err(|e| invalid("base_url", &e.to_string()))?;
            profile.base_url = value;
        }
        "phone" => profile.phone = Some(util::normalize_phone(&value)),
        "token_env" | "token-env" => profile.token_env = Some(value),
        "insecure" => {
            profile.insecure = Some(
                value
                    .parse()
                    .map_err(|_| invalid("insecure", "must be 'true' or 'false'"))?,
            );
        }
        "timeout" => {
            profile.timeout = Some(
                value
                    .parse()
                    .map_err(|_| invalid("timeout", "must be a number (seconds)"))?,
            );
        }
        "page_size" | "page-size" => {
            profile.page_size = Some(
                value
                    .parse()
                    .map_err(|_| invalid("page_size", "must be a positive number"))?,
            );
        }
        "search_debounce_ms" | "search-debounce-ms" => {
            profile.search_debounce_ms = Some(
                value
                    .parse()
                    .map_err(|_| invalid("search_debounce_ms", "must be a number (milliseconds)"))?,
            );
        }
        "ca_cert" | "ca-cert" => profile.ca_cert = Some(value.into()),
        other => {
            return Err(CliError::Validation {
                field: other.into(),
                reason: format!(
                    "unknown config key '{other}'. Valid keys: base_url, phone, token_env, \
                     insecure, timeout, page_size, search_debounce_ms, ca_cert"
                ),
            });
        }
    }
    Ok(())
}

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let config_path = rc::config_path();
            eprintln!("refdesk configuration wizard");
            eprintln!("   Config path: {}\n", config_path.display());

            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default("default".into())
                .interact_text()
                .map_err(prompt_err)?;

            let base_url: String = Input::new()
                .with_prompt("Backend URL")
                .default("http://localhost:8000".into())
                .validate_with(|input: &String| {
                    url::Url::parse(input).map(|_| ()).map_err(|e| e.to_string())
                })
                .interact_text()
                .map_err(prompt_err)?;

            let phone: String = Input::new()
                .with_prompt("Login phone (optional)")
                .allow_empty(true)
                .interact_text()
                .map_err(prompt_err)?;

            let page_sizes = ["10", "25", "50"];
            let page_size = Select::new()
                .with_prompt("Rows per page")
                .items(&page_sizes)
                .default(0)
                .interact()
                .map_err(prompt_err)?;

            let profile = Profile {
                base_url,
                phone: (!phone.is_empty()).then(|| util::normalize_phone(&phone)),
                page_size: page_sizes
                    .get(page_size)
                    .and_then(|s| s.parse().ok()),
                ..Profile::default()
            };

            edit_config_at(&config_path, |cfg| {
                if cfg.profiles.is_empty() {
                    cfg.default_profile = Some(profile_name.clone());
                }
                cfg.profiles.insert(profile_name.clone(), profile);
                Ok(())
            })?;

            eprintln!("\n✓ Configuration written to {}", config_path.display());
            eprintln!("  Profile: {profile_name}");
            eprintln!("\n  Next: refdesk login --profile {profile_name}");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = rc::load_config()?;
            let out = output::render_single(global.output, &cfg, |c| {
                c.default_profile.clone().unwrap_or_default()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Set <key> <value> ───────────────────────────────────────
        ConfigCommand::Set { key, value } => {
            let profile_name = edit_config_at(&rc::config_path(), |cfg| {
                let name = config::active_profile_name(global, cfg);
                set_key(cfg.profiles.entry(name.clone()).or_default(), &key, value)?;
                Ok(name)
            })?;
            eprintln!("✓ Set {key} on profile '{profile_name}'");
            Ok(())
        }

        // ── Profiles ────────────────────────────────────────────────
        ConfigCommand::Profiles => {
            let cfg = rc::load_config()?;
            let default = cfg.default_profile.as_deref().unwrap_or("default");
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: refdesk config init");
            } else {
                let mut names: Vec<_> = cfg.profiles.keys().collect();
                names.sort();
                for name in names {
                    let marker = if name == default { " *" } else { "" };
                    println!("{name}{marker}");
                }
            }
            Ok(())
        }

        // ── Use <name> ─────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            edit_config_at(&rc::config_path(), |cfg| {
                if !cfg.profiles.contains_key(&name) {
                    return Err(CliError::ProfileNotFound {
                        available: available_profiles(cfg),
                        name: name.clone(),
                    });
                }
                cfg.default_profile = Some(name.clone());
                Ok(())
            })?;
            eprintln!("✓ Default profile set to '{name}'");
            Ok(())
        }

        // ── SetToken ────────────────────────────────────────────────
        ConfigCommand::SetToken => {
            let cfg = rc::load_config()?;
            let profile_name = config::active_profile_name(global, &cfg);
            if !cfg.profiles.contains_key(&profile_name) {
                return Err(CliError::ProfileNotFound {
                    available: available_profiles(&cfg),
                    name: profile_name,
                });
            }

            let token = rpassword::prompt_password("Token: ").map_err(prompt_err)?;
            if token.is_empty() {
                return Err(invalid("token", "value cannot be empty"));
            }
            rc::store_token(&profile_name, &SecretString::from(token))?;
            eprintln!("✓ Token stored in system keyring for profile '{profile_name}'");
            Ok(())
        }
    }
}
