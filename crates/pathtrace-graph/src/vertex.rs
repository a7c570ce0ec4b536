//! Vertices and their arena handles.

/// Stable handle to a vertex slot.
///
/// Handles survive renames and are never reused once the vertex is removed,
/// so they are safe keys for visited/distance/parent maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VertexHandle(pub(crate) u32);

impl VertexHandle {
    /// Raw slot index inside the vertex arena.
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Presentation-only position. Algorithms never look at it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    /// Horizontal coordinate
    pub x: f64,
    /// Vertical coordinate
    pub y: f64,
}

impl Position {
    /// The origin.
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    /// Create a position.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A vertex as stored in the arena.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vertex {
    pub(crate) id: String,
    pub(crate) position: Position,
}

impl Vertex {
    pub(crate) fn new(id: String, position: Position) -> Self {
        Self { id, position }
    }

    /// The vertex's unique string id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Where a renderer should draw the vertex.
    pub fn position(&self) -> Position {
        self.position
    }
}

/// Borrowed view of a live vertex together with its handle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexRef<'g> {
    /// Arena handle
    pub handle: VertexHandle,
    /// Unique string id
    pub id: &'g str,
    /// Presentation position
    pub position: Position,
}
