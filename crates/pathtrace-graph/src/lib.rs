//! Pathtrace Graph Model
//!
//! Labeled, weighted, directed graphs for shortest-path tracing.
//!
//! # Ordering
//!
//! Every traversal the algorithms perform follows the graph's own order:
//! vertices by id, edges by `(source id, destination id)`. Order is part of the
//! observable output (it shows up in step descriptions), so it never depends on
//! insertion order or hashing.
//!
//! # Handles
//!
//! Vertices and edges are stored in arenas and addressed by [`VertexHandle`] and
//! [`EdgeHandle`]. Ids and weights can change; handles cannot. Removed slots are
//! never reused.

mod catalog;
mod document;
mod edge;
mod error;
mod graph;
mod vertex;

pub use catalog::{big, cp4_10_dw, cp4_16_dw_dag, cp4_43_du, example, EXAMPLES};
pub use document::{EdgeDocument, GraphDocument, VertexDocument};
pub use edge::{Direction, Edge, EdgeHandle, EdgeRef, DEFAULT_WEIGHT};
pub use error::{GraphError, Result};
pub use graph::Graph;
pub use vertex::{Position, Vertex, VertexHandle, VertexRef};
