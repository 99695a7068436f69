use crate::config::error::ConfigError;
use thiserror::Error;

/// Application-wide error type for everything past configuration parsing.
///
/// Delivery failures carry enough detail to be reported back to the
/// notification daemon verbatim; the daemon owns any retry policy.
#[derive(Error, Debug)]
pub enum AppError {
    /// Plugin configuration was rejected
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The contact has no address for this channel
    #[error("Contact {contact:?} has no {channel} address")]
    MissingAddress { channel: String, contact: String },

    /// The event type is not configured to produce a notification
    #[error("Event type '{event_type}' is not configured to send notifications")]
    UnsupportedEvent { event_type: String },

    /// The relay answered with a status code outside the accepted list
    #[error("Unaccepted HTTP response status code {code} not in {accepted:?}")]
    UnexpectedStatus { code: u16, accepted: Vec<u16> },

    /// The request never produced a response
    #[error("POST {url} failed: {message}")]
    Transport { url: String, message: String },

    /// A notification arrived before a configuration was accepted
    #[error("Plugin is not configured")]
    NotConfigured,

    /// Malformed message on the plugin protocol
    #[error("Protocol error: {message}")]
    Protocol { message: String },

    /// Internal error for unexpected failures
    #[error("Internal error")]
    Internal {
        #[source]
        source: anyhow::Error,
    },
}

impl AppError {
    /// Whether the error should be reported as a skipped notification rather than a failure
    pub fn is_skip(&self) -> bool {
        matches!(self, AppError::UnsupportedEvent { .. })
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        AppError::Internal { source: error }
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        AppError::Internal {
            source: error.into(),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        AppError::Protocol {
            message: error.to_string(),
        }
    }
}

/// Type alias for Result with AppError to simplify function signatures
pub type AppResult<T> = Result<T, AppError>;
