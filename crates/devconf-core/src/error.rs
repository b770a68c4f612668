//! Error types for device configuration.

use thiserror::Error;

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors raised by the configuration session and its edit operations.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Input rejected before any network call; the draft is unchanged.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A collaborator call failed as a whole.
    #[error("{operation} failed: {source}")]
    Operation {
        operation: &'static str,
        #[source]
        source: SourceError,
    },

    /// Attribute name not present in the draft.
    #[error("Attribute not found: {0}")]
    AttributeNotFound(String),
}

impl ConfigError {
    pub(crate) fn operation(operation: &'static str, source: SourceError) -> Self {
        Self::Operation { operation, source }
    }
}

/// Errors reported by external collaborators (device data, saved configs,
/// function catalog, name suggestions).
#[derive(Error, Debug)]
pub enum SourceError {
    /// Transport-level failure.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Non-success HTTP status.
    #[error("HTTP error: {status}")]
    Http { status: u16 },

    /// Response body could not be decoded.
    #[error("Decode error: {0}")]
    Decode(String),

    /// The requested resource does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Response was well-formed but violated the collaborator contract.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Source error: {0}")]
    Other(String),
}

impl From<serde_json::Error> for SourceError {
    fn from(e: serde_json::Error) -> Self {
        SourceError::Decode(e.to_string())
    }
}

#[cfg(feature = "http")]
impl From<reqwest::Error> for SourceError {
    fn from(e: reqwest::Error) -> Self {
        if let Some(status) = e.status() {
            SourceError::Http {
                status: status.as_u16(),
            }
        } else if e.is_decode() {
            SourceError::Decode(e.to_string())
        } else if e.is_builder() {
            SourceError::Other(e.to_string())
        } else {
            SourceError::Connection(e.to_string())
        }
    }
}
