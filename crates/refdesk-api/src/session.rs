use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, warn};

use crate::client::ApiClient;
use crate::error::Error;
use crate::types::{DataResponse, LoginPayload, LoginRequest, User};

impl ApiClient {
    /// Exchange phone + password for a bearer token.
    ///
    /// On success the token is written to the credential store, so every
    /// later request on this client is authenticated.
    pub async fn login(&self, phone: &str, password: &SecretString) -> Result<User, Error> {
        let body = LoginRequest {
            phone,
            password: password.expose_secret(),
        };
        let resp: DataResponse<LoginPayload> = self.post("api/auth/login", &body).await?;
        self.credentials().set(SecretString::from(resp.data.token));
        debug!(user_id = resp.data.user.id, "logged in");
        Ok(resp.data.user)
    }

    /// End the session.
    ///
    /// The local token is cleared whatever the backend answers; a failed
    /// remote logout is only logged.
    pub async fn logout(&self) -> Result<(), Error> {
        let result: Result<serde_json::Value, Error> =
            self.post("api/auth/logout", &serde_json::json!({})).await;
        self.credentials().clear();
        if let Err(ref e) = result {
            warn!(error = %e, "remote logout failed, local session cleared anyway");
        }
        result.map(|_| ())
    }
}
