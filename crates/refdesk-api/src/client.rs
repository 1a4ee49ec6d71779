// Async HTTP client for the refdesk REST API.
//
// Wraps `reqwest::Client` with base-URL joining, per-request bearer token
// injection from a `CredentialStore`, and normalization of every rejection
// into `Error`. Endpoint groups (resources, filters, auth) are inherent
// methods in sibling modules so this one stays about transport mechanics.

use std::fmt;
use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, HeaderValue};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::auth::CredentialStore;
use crate::error::Error;
use crate::transport::TransportConfig;
use crate::types::ErrorBody;

/// Raw HTTP client for the admin backend.
///
/// Every request carries `Authorization: Bearer <token>` when the
/// credential store holds a token. A 401 response clears the store before
/// the error reaches the caller.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    credentials: Arc<dyn CredentialStore>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client from a base URL, credential store, and transport config.
    pub fn new(
        base_url: &str,
        credentials: Arc<dyn CredentialStore>,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::with_client(http, base_url, credentials)
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn with_client(
        http: reqwest::Client,
        base_url: &str,
        credentials: Arc<dyn CredentialStore>,
    ) -> Result<Self, Error> {
        Ok(Self {
            http,
            base_url: Self::normalize_base_url(base_url)?,
            credentials,
        })
    }

    /// Ensure the base URL ends with `/` so relative joins keep its path.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(url)
    }

    /// The backend base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The credential store this client reads tokens from.
    pub fn credentials(&self) -> &Arc<dyn CredentialStore> {
        &self.credentials
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join a relative path (e.g. `"api/categories"`) onto the base URL.
    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let Some(token) = self.credentials.get() else {
            return builder;
        };
        match HeaderValue::from_str(&format!("Bearer {}", token.expose_secret())) {
            Ok(mut value) => {
                value.set_sensitive(true);
                builder.header(AUTHORIZATION, value)
            }
            Err(e) => {
                warn!(error = %e, "stored token is not a valid header value, sending anonymously");
                builder
            }
        }
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(String, String)],
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url} params={params:?}");

        let builder = self.authorize(self.http.get(url).query(params));
        let resp = builder.send().await?;
        self.handle_response(resp).await
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + Sync + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let builder = self.authorize(self.http.post(url).json(body));
        let resp = builder.send().await?;
        self.handle_response(resp).await
    }

    pub(crate) async fn put<T: DeserializeOwned, B: Serialize + Sync + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("PUT {url}");

        let builder = self.authorize(self.http.put(url).json(body));
        let resp = builder.send().await?;
        self.handle_response(resp).await
    }

    pub(crate) async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("DELETE {url}");

        let builder = self.authorize(self.http.delete(url));
        let resp = builder.send().await?;
        self.handle_response(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            // An empty 2xx body reads as JSON `null`.
            let text = if body.trim().is_empty() { "null" } else { &body };
            serde_json::from_str(text).map_err(|e| {
                let preview = preview(&body);
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            })
        } else {
            Err(self.parse_error(status, resp).await)
        }
    }

    /// Normalize a non-2xx response.
    ///
    /// 401 wins over everything else in the body: the stored token is
    /// cleared and any `errors` array is dropped.
    async fn parse_error(&self, status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        let raw = resp.text().await.unwrap_or_default();
        let body: ErrorBody = serde_json::from_str(&raw).unwrap_or_default();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            warn!("backend rejected credentials, clearing stored token");
            self.credentials.clear();
            return Error::Unauthorized {
                message: body.message,
            };
        }

        match body.errors {
            Some(errors) if !errors.is_empty() => Error::Validation {
                message: body.message,
                errors,
                status: status.as_u16(),
            },
            _ => Error::Api {
                status: status.as_u16(),
                message: body.message.unwrap_or_else(|| {
                    if raw.is_empty() {
                        status.to_string()
                    } else {
                        preview(&raw)
                    }
                }),
            },
        }
    }
}

/// First 200 characters of a response body, for error messages.
fn preview(body: &str) -> String {
    body.chars().take(200).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::auth::MemoryCredentials;

    fn client(base: &str) -> ApiClient {
        ApiClient::with_client(
            reqwest::Client::new(),
            base,
            Arc::new(MemoryCredentials::new()),
        )
        .unwrap()
    }

    #[test]
    fn base_url_gains_trailing_slash() {
        let c = client("https://admin.example.com/backend");
        assert_eq!(c.base_url().as_str(), "https://admin.example.com/backend/");
    }

    #[test]
    fn url_joins_relative_and_absolute_paths() {
        let c = client("https://admin.example.com/backend/");
        assert_eq!(
            c.url("api/categories").unwrap().as_str(),
            "https://admin.example.com/backend/api/categories"
        );
        assert_eq!(
            c.url("/api/branches").unwrap().as_str(),
            "https://admin.example.com/backend/api/branches"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let result = ApiClient::with_client(
            reqwest::Client::new(),
            "not a url",
            Arc::new(MemoryCredentials::new()),
        );
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }
}
