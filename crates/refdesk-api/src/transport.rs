// HTTP transport settings shared by every ApiClient.
//
// The admin backend speaks JSON only, so the Accept header is fixed here
// and never per request. Bearer tokens are the client's job, not ours.

use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};

use crate::error::Error;

const USER_AGENT: &str = concat!("refdesk/", env!("CARGO_PKG_VERSION"));

/// How the server certificate is checked.
#[derive(Debug, Clone, Default)]
pub enum TlsMode {
    /// Platform trust roots.
    #[default]
    System,
    /// Trust an extra PEM root, for backends behind a private CA.
    CustomCa(PathBuf),
    /// Skip verification entirely.
    DangerAcceptInvalid,
}

#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub tls: TlsMode,
    /// Whole-request deadline. Expiry surfaces as a timeout, never a retry.
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            tls: TlsMode::default(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl TransportConfig {
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        let mut json_only = HeaderMap::new();
        json_only.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let builder = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(self.timeout)
            .default_headers(json_only);

        let builder = match &self.tls {
            TlsMode::System => builder,
            TlsMode::CustomCa(pem) => builder.add_root_certificate(load_root(pem)?),
            TlsMode::DangerAcceptInvalid => builder.danger_accept_invalid_certs(true),
        };

        builder
            .build()
            .map_err(|e| Error::Tls(format!("HTTP client setup failed: {e}")))
    }
}

fn load_root(pem: &Path) -> Result<reqwest::Certificate, Error> {
    let bytes = std::fs::read(pem)
        .map_err(|e| Error::Tls(format!("cannot read {}: {e}", pem.display())))?;
    reqwest::Certificate::from_pem(&bytes)
        .map_err(|e| Error::Tls(format!("{} is not a PEM certificate: {e}", pem.display())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_ca_file_is_a_tls_error() {
        let config = TransportConfig {
            tls: TlsMode::CustomCa(PathBuf::from("/nonexistent/refdesk-ca.pem")),
            ..TransportConfig::default()
        };
        assert!(matches!(config.build_client(), Err(Error::Tls(_))));
    }
}
