//! Error types for pathtrace-engine.

use pathtrace_graph::GraphError;
use thiserror::Error;

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Precondition failures detected before a trace is generated.
///
/// Algorithmic caveats (negative weights, negative cycles) are not errors; they
/// are recorded as steps in the trace itself.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// `run()` was called before a graph was set.
    #[error("no graph has been set")]
    NoGraph,

    /// `run()` was called before a start vertex was chosen.
    #[error("no start vertex has been set")]
    NoStartVertex,

    /// The chosen start vertex is not part of the graph.
    #[error("start vertex {0:?} is not in the graph")]
    StartVertexNotFound(String),

    /// The graph handed to the run could not be built.
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// An algorithm name could not be parsed.
    #[error("unknown algorithm {0:?} (expected bfs, dijkstra, dijkstra-pq or bellman-ford)")]
    UnknownAlgorithm(String),
}
