//! Error types for dt435-core

/// Result type alias for dt435 protocol operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core protocol errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Command parameter violates the protocol encoding rules
    #[error("Invalid parameter `{field}`: {reason}")]
    InvalidParameter {
        field: &'static str,
        reason: String,
    },

    /// Reply is not a delimited frame or is too short for its trailer
    #[error("Malformed frame: {0}")]
    MalformedFrame(String),

    /// Response body is too short for the fields it must carry
    #[error("Malformed {kind} response: {reason}")]
    MalformedResponse {
        kind: &'static str,
        reason: String,
    },

    /// Inbound checksum verification failed
    #[error("Checksum mismatch: expected {expected}, received {received}")]
    ChecksumMismatch {
        expected: String,
        received: String,
    },

    /// Invalid session state
    #[error("Invalid session state: {0}")]
    InvalidSessionState(String),
}

impl Error {
    pub(crate) fn invalid_parameter(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            field,
            reason: reason.into(),
        }
    }
}
