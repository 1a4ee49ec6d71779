use std::fmt;
use std::sync::{PoisonError, RwLock};

use secrecy::SecretString;

/// Source of the bearer token attached to every authenticated request.
///
/// Passed into [`ApiClient`](crate::ApiClient) at construction. The client
/// reads it per request, so a token stored after login is picked up by the
/// next call, and it calls [`clear()`](Self::clear) on any HTTP 401.
pub trait CredentialStore: Send + Sync {
    /// The current token, if any.
    fn get(&self) -> Option<SecretString>;

    /// Replace the stored token.
    fn set(&self, token: SecretString);

    /// Forget the stored token.
    fn clear(&self);
}

/// Process-local token storage. Nothing survives the process.
#[derive(Default)]
pub struct MemoryCredentials {
    token: RwLock<Option<SecretString>>,
}

impl MemoryCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a token already present.
    pub fn with_token(token: SecretString) -> Self {
        Self {
            token: RwLock::new(Some(token)),
        }
    }
}

impl fmt::Debug for MemoryCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let present = self
            .token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some();
        f.debug_struct("MemoryCredentials")
            .field("token_present", &present)
            .finish()
    }
}

impl CredentialStore for MemoryCredentials {
    fn get(&self) -> Option<SecretString> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set(&self, token: SecretString) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token);
    }

    fn clear(&self) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}
