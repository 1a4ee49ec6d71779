//! Shared configuration for refdesk front ends.
//!
//! TOML profiles, bearer-token storage and resolution (env + keyring +
//! plaintext), and translation to `refdesk_core::AdminConfig`. The CLI adds
//! flag-aware wrappers on top.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use refdesk_api::CredentialStore;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use refdesk_core::{AdminConfig, ListSettings, TlsVerification};

/// Keyring service name.
pub const KEYRING_SERVICE: &str = "refdesk";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found")]
    UnknownProfile { name: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when none is named.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named backend profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// The profile to use: `requested`, else `default_profile`, else "default".
    pub fn profile_name<'a>(&'a self, requested: Option<&'a str>) -> &'a str {
        requested
            .or(self.default_profile.as_deref())
            .unwrap_or("default")
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default)]
    pub insecure: bool,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default = "default_page_size")]
    pub page_size: u32,

    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            insecure: false,
            timeout: default_timeout(),
            page_size: default_page_size(),
            search_debounce_ms: default_search_debounce_ms(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_page_size() -> u32 {
    10
}
fn default_search_debounce_ms() -> u64 {
    500
}

/// A named backend profile.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Backend base URL (e.g., "https://admin.example.com").
    pub base_url: String,

    /// Phone number used to log in.
    pub phone: Option<String>,

    /// Bearer token (plaintext; prefer the keyring or an env var).
    pub token: Option<String>,

    /// Environment variable holding the bearer token.
    pub token_env: Option<String>,

    /// Path to a custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override timeout (seconds).
    pub timeout: Option<u64>,

    /// Override rows per page.
    pub page_size: Option<u32>,

    /// Override search quiet period (milliseconds).
    pub search_debounce_ms: Option<u64>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "refdesk", "refdesk").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("refdesk");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from `path` + `REFDESK_` environment variables.
///
/// Nested keys use a double underscore, e.g. `REFDESK_DEFAULTS__PAGE_SIZE`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("REFDESK_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Token resolution ────────────────────────────────────────────────

fn keyring_entry(profile_name: &str) -> Result<keyring::Entry, keyring::Error> {
    keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/token"))
}

/// Resolve the bearer token for a profile.
///
/// Chain: `token_env` variable, then the system keyring, then the
/// plaintext `token`. `None` means the user has to log in.
pub fn resolve_token(profile: &Profile, profile_name: &str) -> Option<SecretString> {
    resolve_token_with(
        profile,
        |name| std::env::var(name).ok(),
        || {
            keyring_entry(profile_name)
                .and_then(|entry| entry.get_password())
                .ok()
        },
    )
}

fn resolve_token_with(
    profile: &Profile,
    env: impl Fn(&str) -> Option<String>,
    keyring: impl FnOnce() -> Option<String>,
) -> Option<SecretString> {
    // 1. Profile's token_env → env var lookup
    if let Some(token) = profile.token_env.as_deref().and_then(&env) {
        return Some(SecretString::from(token));
    }

    // 2. System keyring
    if let Some(token) = keyring() {
        return Some(SecretString::from(token));
    }

    // 3. Plaintext in config
    profile.token.clone().map(SecretString::from)
}

/// Write a token to the keyring for `profile_name`.
pub fn store_token(profile_name: &str, token: &SecretString) -> Result<(), ConfigError> {
    keyring_entry(profile_name)?.set_password(token.expose_secret())?;
    Ok(())
}

// ── Keyring-backed credential store ─────────────────────────────────

/// [`CredentialStore`] that keeps the session token in memory and mirrors
/// `set`/`clear` into the system keyring, so a login survives the process
/// and a 401 forgets it.
pub struct KeyringCredentials {
    profile: String,
    token: RwLock<Option<SecretString>>,
}

impl std::fmt::Debug for KeyringCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyringCredentials")
            .field("profile", &self.profile)
            .finish_non_exhaustive()
    }
}

impl KeyringCredentials {
    /// Start with an already resolved token (see [`resolve_token`]).
    pub fn new(profile: impl Into<String>, initial: Option<SecretString>) -> Self {
        Self {
            profile: profile.into(),
            token: RwLock::new(initial),
        }
    }
}

impl CredentialStore for KeyringCredentials {
    fn get(&self) -> Option<SecretString> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set(&self, token: SecretString) {
        if let Err(e) = store_token(&self.profile, &token) {
            warn!(profile = %self.profile, error = %e, "could not persist token to keyring");
        }
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token);
    }

    fn clear(&self) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
        match keyring_entry(&self.profile).and_then(|entry| entry.delete_credential()) {
            Ok(()) | Err(keyring::Error::NoEntry) => {
                debug!(profile = %self.profile, "keyring token cleared");
            }
            Err(e) => warn!(profile = %self.profile, error = %e, "could not clear keyring token"),
        }
    }
}

// ── Translation to core config ──────────────────────────────────────

/// Build an `AdminConfig` from a profile and the global defaults.
pub fn profile_to_admin_config(
    profile: &Profile,
    defaults: &Defaults,
) -> Result<AdminConfig, ConfigError> {
    let base_url: url::Url = profile
        .base_url
        .parse()
        .map_err(|_| ConfigError::Validation {
            field: "base_url".into(),
            reason: format!("invalid URL: {}", profile.base_url),
        })?;

    let tls = if profile.insecure.unwrap_or(defaults.insecure) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    let page_size = profile.page_size.unwrap_or(defaults.page_size);
    let mut list = ListSettings {
        page_size,
        search_debounce: Duration::from_millis(
            profile
                .search_debounce_ms
                .unwrap_or(defaults.search_debounce_ms),
        ),
        ..ListSettings::default()
    };
    if !list.page_size_options.contains(&page_size) {
        list.page_size_options.push(page_size);
        list.page_size_options.sort_unstable();
    }
    list.validate().map_err(|e| ConfigError::Validation {
        field: "page_size".into(),
        reason: e.to_string(),
    })?;

    Ok(AdminConfig {
        base_url,
        tls,
        timeout: Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout)),
        list,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn profile() -> Profile {
        Profile {
            base_url: "https://admin.example.com".into(),
            ..Profile::default()
        }
    }

    #[test]
    fn loads_profiles_from_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
default_profile = "staging"

[defaults]
page_size = 25

[profiles.staging]
base_url = "https://staging.example.com"
phone = "998901234567"
insecure = true
"#,
        )
        .unwrap();

        let cfg = load_config_from(&path).unwrap();
        assert_eq!(cfg.profile_name(None), "staging");
        assert_eq!(cfg.defaults.page_size, 25);
        assert_eq!(cfg.defaults.timeout, 30);
        let staging = &cfg.profiles["staging"];
        assert_eq!(staging.phone.as_deref(), Some("998901234567"));
        assert_eq!(staging.insecure, Some(true));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.profile_name(Some("prod")), "prod");
        assert_eq!(cfg.defaults.search_debounce_ms, 500);
        assert!(cfg.profiles.is_empty());
    }

    #[test]
    fn save_then_load_keeps_profiles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut cfg = Config::default();
        cfg.profiles.insert("default".into(), profile());

        save_config_to(&cfg, &path).unwrap();
        let loaded = load_config_from(&path).unwrap();
        assert_eq!(
            loaded.profiles["default"].base_url,
            "https://admin.example.com"
        );
    }

    #[test]
    fn token_chain_prefers_env_then_keyring_then_plaintext() {
        let mut p = profile();
        p.token = Some("plain".into());
        p.token_env = Some("REFDESK_TEST_TOKEN".into());

        let from_env = resolve_token_with(&p, |_| Some("env".into()), || Some("ring".into()));
        assert_eq!(from_env.unwrap().expose_secret(), "env");

        let from_ring = resolve_token_with(&p, |_| None, || Some("ring".into()));
        assert_eq!(from_ring.unwrap().expose_secret(), "ring");

        let from_plain = resolve_token_with(&p, |_| None, || None);
        assert_eq!(from_plain.unwrap().expose_secret(), "plain");

        p.token = None;
        assert!(resolve_token_with(&p, |_| None, || None).is_none());
    }

    #[test]
    fn admin_config_applies_profile_overrides() {
        let mut p = profile();
        p.insecure = Some(true);
        p.timeout = Some(5);
        p.page_size = Some(50);

        let cfg = profile_to_admin_config(&p, &Defaults::default()).unwrap();
        assert_eq!(cfg.tls, TlsVerification::DangerAcceptInvalid);
        assert_eq!(cfg.timeout, Duration::from_secs(5));
        assert_eq!(cfg.list.page_size, 50);
        assert_eq!(cfg.list.search_debounce, Duration::from_millis(500));
    }

    #[test]
    fn custom_page_size_joins_the_options() {
        let mut p = profile();
        p.page_size = Some(20);
        let cfg = profile_to_admin_config(&p, &Defaults::default()).unwrap();
        assert_eq!(cfg.list.page_size_options, vec![10, 20, 25, 50]);
    }

    #[test]
    fn bad_url_and_zero_page_size_are_rejected() {
        let mut p = profile();
        p.base_url = "not a url".into();
        assert!(matches!(
            profile_to_admin_config(&p, &Defaults::default()),
            Err(ConfigError::Validation { ref field, .. }) if field == "base_url"
        ));

        let mut p = profile();
        p.page_size = Some(0);
        assert!(matches!(
            profile_to_admin_config(&p, &Defaults::default()),
            Err(ConfigError::Validation { ref field, .. }) if field == "page_size"
        ));
    }
}
