//! High-level error types

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Core protocol error: {0}")]
    Core(#[from] dt435_core::Error),

    #[error("Transport error: {0}")]
    Transport(#[from] dt435_transport::Error),

    #[error("Failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: dt435_transport::Error,
    },

    #[error("Device not connected")]
    NotConnected,

    #[error("No reply from device within {millis}ms")]
    Timeout { millis: u64 },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// Check if the session was torn down and a new `connect` is needed
    pub fn requires_reconnect(&self) -> bool {
        matches!(
            self,
            Self::Connect { .. } | Self::NotConnected | Self::Timeout { .. } | Self::Transport(_)
        )
    }

    /// Check if the same call might succeed later without changes
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            Self::Core(dt435_core::Error::InvalidParameter { .. }) | Self::Config(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_requires_reconnect() {
        let err = Error::Timeout { millis: 5000 };
        assert!(err.requires_reconnect());
        assert!(err.is_recoverable());
        assert_eq!(err.to_string(), "No reply from device within 5000ms");
    }

    #[test]
    fn test_invalid_parameter_is_final() {
        let err = Error::from(dt435_core::Error::InvalidParameter {
            field: "nozzle",
            reason: "expected 2 hex chars".into(),
        });
        assert!(!err.requires_reconnect());
        assert!(!err.is_recoverable());
    }
}
