//! Error types for the command surface.

use pathtrace_engine::EngineError;
use pathtrace_graph::GraphError;
use thiserror::Error;

/// Result type for session commands.
pub type Result<T> = std::result::Result<T, CliError>;

/// A command that could not be carried out. The session is unchanged.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CliError {
    /// The line did not parse
    #[error("{0}")]
    Usage(String),

    /// Graph edit rejected
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// Trace generation failed
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// A command needs a trace and none has been generated
    #[error("no trace yet; use `run` first")]
    NoTrace,
}
