//! Error types for pathtrace-vis.

use pathtrace_engine::EngineError;
use thiserror::Error;

/// Result type for playback and server operations.
pub type Result<T> = std::result::Result<T, VisError>;

/// Errors surfaced by the playback driver and the server.
#[derive(Debug, Error)]
pub enum VisError {
    /// The playback actor is gone; its mailbox no longer accepts commands.
    #[error("playback driver has shut down")]
    DriverClosed,

    /// Invalid request input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Trace generation failed
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
