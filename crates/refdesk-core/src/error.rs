// ── Core error types ──
//
// Domain errors from refdesk-core. Views decide how to present a failure
// (login redirect, field errors, banner) from the variant alone; they never
// inspect HTTP details. `From<refdesk_api::Error>` does the translation.

use refdesk_api::types::FieldViolation;
use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Session ──────────────────────────────────────────────────────
    /// The backend rejected the stored credential. It has been cleared.
    #[error("Session expired, log in again")]
    Unauthorized { message: Option<String> },

    // ── Backend rejections ───────────────────────────────────────────
    #[error("{}", .message.as_deref().unwrap_or("Validation failed"))]
    Validation {
        message: Option<String>,
        errors: Vec<FieldViolation>,
    },

    #[error("{message}")]
    Rejected { message: String, status: Option<u16> },

    #[error("{entity} {id} not found")]
    NotFound { entity: String, id: String },

    // ── Transport ────────────────────────────────────────────────────
    #[error("Cannot connect to {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    Timeout,

    // ── Local ────────────────────────────────────────────────────────
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Field-level violations, if this is a validation rejection that
    /// carries any.
    pub fn field_violations(&self) -> Option<&[FieldViolation]> {
        match self {
            Self::Validation { errors, .. } if !errors.is_empty() => Some(errors),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. }
                | Self::Rejected {
                    status: Some(404),
                    ..
                }
        )
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<refdesk_api::Error> for CoreError {
    fn from(err: refdesk_api::Error) -> Self {
        match err {
            refdesk_api::Error::Unauthorized { message } => CoreError::Unauthorized { message },
            refdesk_api::Error::Validation {
                message, errors, ..
            } => CoreError::Validation { message, errors },
            refdesk_api::Error::Api { status, message } => CoreError::Rejected {
                message,
                status: Some(status),
            },
            refdesk_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Rejected {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            refdesk_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("invalid URL: {e}"),
            },
            refdesk_api::Error::Tls(message) => CoreError::Config { message },
            refdesk_api::Error::Deserialization { message, .. } => {
                CoreError::Internal(format!("unexpected response: {message}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_survives_conversion() {
        let err: CoreError = refdesk_api::Error::Unauthorized {
            message: Some("Unauthenticated.".into()),
        }
        .into();
        assert!(err.is_unauthorized());
        assert!(err.field_violations().is_none());
    }

    #[test]
    fn validation_keeps_violations() {
        let err: CoreError = refdesk_api::Error::Validation {
            message: None,
            errors: vec![FieldViolation::new("name", "required")],
            status: 422,
        }
        .into();
        assert_eq!(err.field_violations().map(<[_]>::len), Some(1));
        assert_eq!(err.to_string(), "Validation failed");
    }

    #[test]
    fn generic_rejection_displays_server_message() {
        let err: CoreError = refdesk_api::Error::Api {
            status: 500,
            message: "Category is in use".into(),
        }
        .into();
        assert_eq!(err.to_string(), "Category is in use");
        assert!(!err.is_not_found());
    }
}
