//! The closed set of traceable algorithms.

use std::fmt;
use std::str::FromStr;

use pathtrace_graph::Graph;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::dijkstra::DijkstraFrontier;
use crate::error::{EngineError, Result};
use crate::trace::{Trace, Universe};
use crate::{bellman_ford, bfs, dijkstra};

/// A single-source shortest-path algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    /// Breadth-first search; correct only for unit weights.
    #[default]
    Bfs,
    /// Dijkstra; correct only for non-negative weights.
    Dijkstra(DijkstraFrontier),
    /// Bellman-Ford; detects negative cycles.
    BellmanFord,
}

impl Algorithm {
    /// Every variant, in presentation order.
    pub const ALL: [Algorithm; 4] = [
        Algorithm::Bfs,
        Algorithm::Dijkstra(DijkstraFrontier::Fifo),
        Algorithm::Dijkstra(DijkstraFrontier::MinPriority),
        Algorithm::BellmanFord,
    ];

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Bfs => "BFS",
            Self::Dijkstra(DijkstraFrontier::Fifo) => "Dijkstra",
            Self::Dijkstra(DijkstraFrontier::MinPriority) => "Dijkstra (priority queue)",
            Self::BellmanFord => "Bellman-Ford",
        }
    }

    /// Short name accepted by [`FromStr`].
    pub fn slug(self) -> &'static str {
        match self {
            Self::Bfs => "bfs",
            Self::Dijkstra(DijkstraFrontier::Fifo) => "dijkstra",
            Self::Dijkstra(DijkstraFrontier::MinPriority) => "dijkstra-pq",
            Self::BellmanFord => "bellman-ford",
        }
    }

    /// Pseudocode listing indexed by [`Step::line`](crate::Step::line).
    pub fn pseudocode(self) -> &'static [&'static str] {
        match self {
            Self::Bfs => bfs::PSEUDOCODE,
            Self::Dijkstra(_) => dijkstra::PSEUDOCODE,
            Self::BellmanFord => bellman_ford::PSEUDOCODE,
        }
    }

    /// Generate the trace of this algorithm from `start`.
    ///
    /// The graph is captured up front; the returned trace does not borrow it.
    pub fn run(self, graph: &Graph, start: &str) -> Result<Trace> {
        let universe = Universe::capture(graph);
        let Some(source) = universe.vertex_index(start) else {
            warn!(algorithm = self.slug(), start, "start vertex not in graph");
            return Err(EngineError::StartVertexNotFound(start.to_string()));
        };

        let steps = match self {
            Self::Bfs => bfs::trace(&universe, source),
            Self::Dijkstra(frontier) => dijkstra::trace(&universe, source, frontier),
            Self::BellmanFord => bellman_ford::trace(&universe, source),
        };
        debug!(
            algorithm = self.slug(),
            start,
            vertices = universe.vertex_count(),
            edges = universe.edge_count(),
            steps = steps.len(),
            "trace generated"
        );
        Ok(Trace::new(self, start.to_string(), universe, steps))
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "bfs" => Ok(Self::Bfs),
            "dijkstra" | "dijkstra-fifo" => Ok(Self::Dijkstra(DijkstraFrontier::Fifo)),
            "dijkstra-pq" | "dijkstra-min-priority" => {
                Ok(Self::Dijkstra(DijkstraFrontier::MinPriority))
            }
            "bellman-ford" | "bellmanford" | "bf" => Ok(Self::BellmanFord),
            _ => Err(EngineError::UnknownAlgorithm(s.to_string())),
        }
    }
}
