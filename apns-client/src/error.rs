//! APNs client error types.

use std::time::Duration;
use thiserror::Error;

/// Result type for APNs operations.
pub type Result<T> = std::result::Result<T, ApnsError>;

/// Broad category of an [`ApnsError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed caller input.
    InvalidArgument,
    /// Operational failure.
    Runtime,
}

/// APNs client errors.
#[derive(Debug, Error)]
pub enum ApnsError {
    /// Invalid field value, token, environment, certificate path or result code.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The client has no open session.
    #[error("Connection is not open; call open() before sending")]
    NotOpen,

    /// The client already holds an open session.
    #[error("Connection has already been opened and must be closed")]
    AlreadyOpen,

    /// The transport session could not be created.
    #[error("Session error: {0}")]
    Session(String),

    /// Non-recoverable transport failure.
    #[error("Transport failed with error: {0}")]
    Transport(String),

    /// The exchange did not finish in time.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Custom payload data used a key reserved for system fields.
    #[error("Custom data must not contain the reserved key '{0}'")]
    ReservedKey(String),

    /// Payload serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl ApnsError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            _ => ErrorKind::Runtime,
        }
    }

    /// Check if this error was caused by malformed input.
    pub fn is_invalid_argument(&self) -> bool {
        self.kind() == ErrorKind::InvalidArgument
    }

    /// Check if this error is an operational failure.
    pub fn is_runtime(&self) -> bool {
        self.kind() == ErrorKind::Runtime
    }
}

impl From<reqwest::Error> for ApnsError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

impl From<std::convert::Infallible> for ApnsError {
    fn from(never: std::convert::Infallible) -> Self {
        match never {}
    }
}

impl From<serde_json::Error> for ApnsError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
