//! Pathtrace Algorithm Engine
//!
//! Runs BFS, Dijkstra or Bellman-Ford over a [`Graph`](pathtrace_graph::Graph)
//! and records every observable instant as an immutable [`Step`]: a pseudocode
//! line, a description and a full [`TraceState`] snapshot.
//!
//! ```
//! use pathtrace_engine::{Algorithm, DijkstraFrontier};
//!
//! let graph = pathtrace_graph::cp4_10_dw();
//! let trace = Algorithm::Dijkstra(DijkstraFrontier::Fifo).run(&graph, "0").unwrap();
//! assert_eq!(trace.distance("2"), Some(6.0));
//! ```
//!
//! Generation is synchronous and deterministic: the same graph and start
//! vertex always yield the same steps.

mod algorithm;
mod bellman_ford;
mod bfs;
mod dijkstra;
mod error;
mod recorder;
mod run;
mod trace;

pub use algorithm::Algorithm;
pub use dijkstra::DijkstraFrontier;
pub use error::{EngineError, Result};
pub use recorder::format_number;
pub use run::AlgorithmRun;
pub use trace::{
    EdgeClass, Step, Trace, TraceState, Universe, UniverseEdge, UniverseVertex, VertexClass,
};
