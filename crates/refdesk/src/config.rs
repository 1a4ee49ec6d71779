//! Flag-aware profile resolution on top of `refdesk-config`.
//!
//! Global flags win over the profile; the profile wins over `[defaults]`.

use std::sync::Arc;

use refdesk_api::{ApiClient, CredentialStore, MemoryCredentials};
use refdesk_config::{self as rc, Config, KeyringCredentials, Profile};
use refdesk_core::{AdminConfig, CoreError, ListSettings};
use secrecy::SecretString;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Everything a backend-bound command needs.
pub struct Backend {
    pub api: Arc<ApiClient>,
    pub profile_name: String,
    pub profile: Profile,
    pub admin: AdminConfig,
}

impl Backend {
    pub fn list_settings(&self) -> ListSettings {
        self.admin.list.clone()
    }

    /// Convert a failure, naming this profile in any login hint.
    pub fn error(&self, err: impl Into<CoreError>) -> CliError {
        CliError::from(err.into()).for_profile(&self.profile_name)
    }
}

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.profile_name(global.profile.as_deref()).to_owned()
}

/// The active profile with flag overrides applied.
pub fn resolve_profile(global: &GlobalOpts, config: &Config) -> Result<Profile, CliError> {
    let name = active_profile_name(global, config);

    let mut profile = match (config.profiles.get(&name), &global.base_url) {
        (Some(profile), _) => profile.clone(),
        (None, Some(_)) => Profile::default(),
        (None, None) if global.profile.is_some() => {
            let mut available: Vec<_> = config.profiles.keys().cloned().collect();
            available.sort();
            return Err(CliError::ProfileNotFound {
                name,
                available: if available.is_empty() {
                    "(none)".into()
                } else {
                    available.join(", ")
                },
            });
        }
        (None, None) => {
            return Err(CliError::NoConfig {
                path: rc::config_path().display().to_string(),
            });
        }
    };

    if let Some(ref url) = global.base_url {
        profile.base_url.clone_from(url);
    }
    if global.insecure {
        profile.insecure = Some(true);
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }
    Ok(profile)
}

/// Load config, resolve the profile and build an authenticated client.
///
/// A `--token` flag is used for this process only; otherwise the token
/// comes from the profile's chain and later logins/401s write through to
/// the keyring.
pub fn connect(global: &GlobalOpts) -> Result<Backend, CliError> {
    let config = rc::load_config()?;
    let profile_name = active_profile_name(global, &config);
    let profile = resolve_profile(global, &config)?;
    let admin = rc::profile_to_admin_config(&profile, &config.defaults)?;

    let credentials: Arc<dyn CredentialStore> = match global.token {
        Some(ref token) => Arc::new(MemoryCredentials::with_token(SecretString::from(
            token.clone(),
        ))),
        None => Arc::new(KeyringCredentials::new(
            profile_name.clone(),
            rc::resolve_token(&profile, &profile_name),
        )),
    };

    let api = ApiClient::new(admin.base_url.as_str(), credentials, &admin.transport())
        .map_err(CoreError::from)?;

    tracing::debug!(profile = %profile_name, base_url = %admin.base_url, "backend resolved");

    Ok(Backend {
        api: Arc::new(api),
        profile_name,
        profile,
        admin,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::cli::Cli;

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["refdesk"];
        argv.extend_from_slice(args);
        argv.push("logout");
        Cli::try_parse_from(argv).unwrap().global
    }

    fn config_with(name: &str, url: &str) -> Config {
        let mut config = Config::default();
        config.profiles.insert(
            name.into(),
            Profile {
                base_url: url.into(),
                timeout: Some(10),
                ..Profile::default()
            },
        );
        config
    }

    #[test]
    fn flags_override_profile_values() {
        let config = config_with("default", "https://admin.example.com");
        let opts = global(&["--base-url", "http://localhost:8000", "--timeout", "3", "-k"]);
        let profile = resolve_profile(&opts, &config).unwrap();
        assert_eq!(profile.base_url, "http://localhost:8000");
        assert_eq!(profile.timeout, Some(3));
        assert_eq!(profile.insecure, Some(true));
    }

    #[test]
    fn base_url_alone_is_enough_without_a_profile() {
        let opts = global(&["--base-url", "http://localhost:8000"]);
        let profile = resolve_profile(&opts, &Config::default()).unwrap();
        assert_eq!(profile.base_url, "http://localhost:8000");
    }

    #[test]
    fn unknown_named_profile_lists_the_available_ones() {
        let config = config_with("staging", "https://staging.example.com");
        let opts = global(&["--profile", "prod"]);
        let err = resolve_profile(&opts, &config).err().unwrap();
        let CliError::ProfileNotFound { name, available } = err else {
            panic!("expected ProfileNotFound");
        };
        assert_eq!(name, "prod");
        assert_eq!(available, "staging");
    }

    #[test]
    fn nothing_configured_points_at_config_init() {
        let err = resolve_profile(&global(&[]), &Config::default()).err().unwrap();
        assert!(matches!(err, CliError::NoConfig { .. }));
    }
}
