//! Error types for graph mutation.

use thiserror::Error;

/// Result type for graph operations.
pub type Result<T> = std::result::Result<T, GraphError>;

/// Errors reported by graph mutations.
///
/// Every error leaves the graph exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
    /// A vertex with this id is already present.
    #[error("vertex {0:?} already exists")]
    DuplicateVertex(String),

    /// No vertex carries this id.
    #[error("vertex {0:?} does not exist")]
    VertexNotFound(String),

    /// The ordered pair already has an edge.
    #[error("edge {from:?} -> {to:?} already exists")]
    DuplicateEdge { from: String, to: String },

    /// No edge joins the ordered pair.
    #[error("edge {from:?} -> {to:?} does not exist")]
    EdgeNotFound { from: String, to: String },

    /// Weights must be finite; NaN and infinities are rejected.
    #[error("invalid edge weight {0}")]
    InvalidWeight(f64),
}
