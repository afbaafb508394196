// ── Core error types ──
//
// Errors surfaced to property requests. Consumers never see HTTP status
// handling or JSON decoding directly; the `From<salus_api::Error>` impl
// folds transport failures into the auth / network / parse taxonomy.

use thiserror::Error;

use crate::properties::Property;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Session errors ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    // ── Network errors ───────────────────────────────────────────────
    #[error("Cannot reach the Salus service: {reason}")]
    Network { reason: String },

    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Unexpected {field} value from the service: {raw:?}")]
    Parse { field: &'static str, raw: String },

    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Property errors ──────────────────────────────────────────────
    #[error("Property {0} is read-only")]
    ReadOnly(Property),

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// `true` for failures the host should present as "not responding".
    pub fn is_unreachable(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::Timeout { .. })
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<salus_api::Error> for CoreError {
    fn from(err: salus_api::Error) -> Self {
        match err {
            salus_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            salus_api::Error::Transport(ref e) => {
                // Timeouts of a caller-built client carry no configured duration.
                if e.is_timeout() || e.is_connect() || e.is_request() {
                    CoreError::Network {
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            salus_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            salus_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            salus_api::Error::Tls(msg) => CoreError::Network {
                reason: format!("TLS error: {msg}"),
            },
            salus_api::Error::Api { status, message } => CoreError::Api {
                message,
                status: Some(status),
            },
            salus_api::Error::Deserialization { message, body: _ } => CoreError::Api {
                message: format!("unreadable response: {message}"),
                status: None,
            },
        }
    }
}
