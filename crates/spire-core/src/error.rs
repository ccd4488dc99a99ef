//! Error types for the spire bridge

use thiserror::Error;

/// Result type for bridge and environment operations
pub type Result<T> = std::result::Result<T, SpireError>;

/// Bridge error types
#[derive(Debug, Error)]
pub enum SpireError {
    /// Game process refused or could not be reached
    #[error("Connection error: {0}")]
    Connection(String),

    /// Peer closed the stream before a full frame arrived
    #[error("Stream closed by peer")]
    StreamClosed,

    /// Malformed or oversized length prefix
    #[error("Framing error: {0}")]
    Framing(String),

    /// Payload could not be decoded as the expected message
    #[error("Schema error: {0}")]
    Schema(String),

    /// No response within the configured deadline
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Operation requires an open connection
    #[error("Not connected to game")]
    NotConnected,

    /// `step` called before a successful `reset`
    #[error("Episode not started, call reset")]
    EpisodeNotStarted,

    /// Reset received no snapshot at all
    #[error("Reset failed: {0}")]
    ResetFailed(String),

    /// Other transport failure
    #[error("IO error: {0}")]
    Io(String),
}

impl SpireError {
    /// Whether the error ends the session and leaves the connection closed
    pub fn is_fatal(&self) -> bool {
        !matches!(self, SpireError::EpisodeNotStarted)
    }
}

impl From<std::io::Error> for SpireError {
    fn from(err: std::io::Error) -> Self {
        use std::io::ErrorKind;
        match err.kind() {
            ErrorKind::UnexpectedEof
            | ErrorKind::BrokenPipe
            | ErrorKind::ConnectionReset
            | ErrorKind::ConnectionAborted => SpireError::StreamClosed,
            _ => SpireError::Io(err.to_string()),
        }
    }
}
