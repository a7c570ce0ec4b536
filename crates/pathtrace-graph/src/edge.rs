//! Directed weighted edges.

use crate::vertex::{VertexHandle, VertexRef};

/// Default weight given to edges inserted without one.
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// Stable handle to an edge slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeHandle(pub(crate) u32);

impl EdgeHandle {
    /// Raw slot index inside the edge arena.
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// A directed edge as stored in the arena.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edge {
    pub(crate) source: VertexHandle,
    pub(crate) destination: VertexHandle,
    pub(crate) weight: f64,
}

impl Edge {
    /// Tail of the edge.
    pub fn source(&self) -> VertexHandle {
        self.source
    }

    /// Head of the edge.
    pub fn destination(&self) -> VertexHandle {
        self.destination
    }

    /// Current weight.
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Whether the edge starts and ends at the same vertex.
    pub fn is_self_loop(&self) -> bool {
        self.source == self.destination
    }
}

/// Borrowed view of a live edge with both endpoints resolved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeRef<'g> {
    /// Arena handle
    pub handle: EdgeHandle,
    /// Tail vertex
    pub source: VertexRef<'g>,
    /// Head vertex
    pub destination: VertexRef<'g>,
    /// Current weight
    pub weight: f64,
}

impl EdgeRef<'_> {
    /// Whether `vertex` is one of the endpoints.
    pub fn touches(&self, vertex: VertexHandle) -> bool {
        self.source.handle == vertex || self.destination.handle == vertex
    }
}

/// Which side of a vertex an incidence query looks at.
///
/// `Incoming` matches the inbound-only "incident edges" query of earlier
/// versions; `Both` is the union.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Direction {
    /// Edges whose destination is the vertex
    Incoming,
    /// Edges whose source is the vertex
    Outgoing,
    /// Either endpoint is the vertex
    #[default]
    Both,
}

impl Direction {
    /// Whether an edge `source -> destination` qualifies for this direction
    /// relative to `vertex`.
    pub fn admits(self, source: VertexHandle, destination: VertexHandle, vertex: VertexHandle) -> bool {
        match self {
            Direction::Incoming => destination == vertex,
            Direction::Outgoing => source == vertex,
            Direction::Both => source == vertex || destination == vertex,
        }
    }
}
