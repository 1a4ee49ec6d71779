// ── Runtime configuration ──
//
// What the CLI hands to core after resolving profiles, env vars and flags.
// Core never reads config files.

use std::path::PathBuf;
use std::time::Duration;

use refdesk_api::{TlsMode, TransportConfig};
use url::Url;

use crate::error::CoreError;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (staging backends with self-signed certs).
    DangerAcceptInvalid,
}

/// Knobs shared by every list view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListSettings {
    /// Rows per page when a view mounts.
    pub page_size: u32,
    /// Sizes a view may switch to. `page_size` must be one of them.
    pub page_size_options: Vec<u32>,
    /// Quiet period before a search term is committed.
    pub search_debounce: Duration,
}

impl Default for ListSettings {
    fn default() -> Self {
        Self {
            page_size: 10,
            page_size_options: vec![10, 25, 50],
            search_debounce: Duration::from_millis(500),
        }
    }
}

impl ListSettings {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.page_size == 0 || self.page_size_options.contains(&0) {
            return Err(CoreError::Config {
                message: "page sizes must be positive".into(),
            });
        }
        if !self.page_size_options.contains(&self.page_size) {
            return Err(CoreError::Config {
                message: format!(
                    "page size {} is not one of {:?}",
                    self.page_size, self.page_size_options
                ),
            });
        }
        Ok(())
    }
}

/// Connection and view configuration for one backend.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// Backend base URL (e.g. `https://admin.example.com`).
    pub base_url: Url,
    pub tls: TlsVerification,
    /// Request timeout.
    pub timeout: Duration,
    pub list: ListSettings,
}

impl AdminConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            list: ListSettings::default(),
        }
    }

    /// Transport settings for building the API client.
    pub fn transport(&self) -> TransportConfig {
        let tls = match &self.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        };
        TransportConfig {
            tls,
            timeout: self.timeout,
        }
    }
}
