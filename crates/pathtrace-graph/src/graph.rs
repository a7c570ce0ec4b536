//! The graph container.
//!
//! Vertices and edges live in append-only arenas addressed by handles. Two
//! indexes sit on top: `by_id` keeps vertex ids in sorted order (and is the
//! uniqueness check), `by_endpoints` is the edge registry keyed by the ordered
//! endpoint pair. Iteration order is always derived from current ids, so a
//! rename moves a vertex (and its edges) to its new place in the order.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use tracing::{debug, warn};

use crate::edge::{Direction, Edge, EdgeHandle, EdgeRef, DEFAULT_WEIGHT};
use crate::error::{GraphError, Result};
use crate::vertex::{Position, Vertex, VertexHandle, VertexRef};

/// A labeled, weighted, directed graph with deterministic ordering.
///
/// Vertices iterate by id, edges by `(source id, destination id)`. At most one
/// edge exists per ordered pair; self-loops and negative weights are allowed.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    vertices: Vec<Option<Vertex>>,
    edges: Vec<Option<Edge>>,
    by_id: BTreeMap<String, VertexHandle>,
    by_endpoints: HashMap<(VertexHandle, VertexHandle), EdgeHandle>,
}

impl Graph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live vertices.
    pub fn vertex_count(&self) -> usize {
        self.by_id.len()
    }

    /// Number of live edges.
    pub fn edge_count(&self) -> usize {
        self.by_endpoints.len()
    }

    /// Whether the graph has no vertices.
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Add a vertex at the origin. Duplicate ids are rejected.
    pub fn add_vertex(&mut self, id: impl Into<String>) -> Result<VertexHandle> {
        self.insert_vertex(id.into(), Position::ORIGIN)
    }

    /// Add a vertex at a given position, failing if the id is taken.
    pub fn add_vertex_at(&mut self, id: impl Into<String>, x: f64, y: f64) -> Result<VertexHandle> {
        self.insert_vertex(id.into(), Position::new(x, y))
    }

    fn insert_vertex(&mut self, id: String, position: Position) -> Result<VertexHandle> {
        if self.by_id.contains_key(&id) {
            warn!(vertex = %id, "vertex already exists");
            return Err(GraphError::DuplicateVertex(id));
        }
        let handle = VertexHandle(self.vertices.len() as u32);
        self.vertices.push(Some(Vertex::new(id.clone(), position)));
        debug!(vertex = %id, slot = handle.index(), "vertex added");
        self.by_id.insert(id, handle);
        Ok(handle)
    }

    /// Remove a vertex and every edge that touches it, in either direction.
    pub fn remove_vertex(&mut self, id: &str) -> Result<Vertex> {
        let handle = self.require_vertex(id)?;

        let incident: Vec<EdgeHandle> = self
            .by_endpoints
            .iter()
            .filter(|((from, to), _)| *from == handle || *to == handle)
            .map(|(_, edge)| *edge)
            .collect();
        for edge in &incident {
            self.unlink_edge(*edge);
        }

        self.by_id.remove(id);
        let vertex = self.vertices[handle.index()]
            .take()
            .ok_or_else(|| GraphError::VertexNotFound(id.to_string()))?;
        debug!(vertex = %id, edges = incident.len(), "vertex removed");
        Ok(vertex)
    }

    /// Change a vertex's id. The new id must not be in use.
    pub fn rename_vertex(&mut self, id: &str, new_id: impl Into<String>) -> Result<()> {
        let new_id = new_id.into();
        let handle = self.require_vertex(id)?;
        if id == new_id {
            return Ok(());
        }
        if self.by_id.contains_key(&new_id) {
            warn!(vertex = %new_id, "rename target already exists");
            return Err(GraphError::DuplicateVertex(new_id));
        }

        self.by_id.remove(id);
        self.by_id.insert(new_id.clone(), handle);
        if let Some(vertex) = self.vertices[handle.index()].as_mut() {
            vertex.id = new_id;
        }
        Ok(())
    }

    /// Move a vertex.
    pub fn set_position(&mut self, id: &str, x: f64, y: f64) -> Result<()> {
        let handle = self.require_vertex(id)?;
        if let Some(vertex) = self.vertices[handle.index()].as_mut() {
            vertex.position = Position::new(x, y);
        }
        Ok(())
    }

    /// Add an edge with the default weight of 1.
    pub fn add_edge(&mut self, from: &str, to: &str) -> Result<EdgeHandle> {
        self.add_weighted_edge(from, to, DEFAULT_WEIGHT)
    }

    /// Add an edge with an explicit weight.
    ///
    /// Both endpoints must exist and the ordered pair must not already have an
    /// edge.
    pub fn add_weighted_edge(&mut self, from: &str, to: &str, weight: f64) -> Result<EdgeHandle> {
        check_weight(weight)?;
        let source = self.require_vertex(from)?;
        let destination = self.require_vertex(to)?;

        if self.by_endpoints.contains_key(&(source, destination)) {
            warn!(from, to, "edge already exists");
            return Err(GraphError::DuplicateEdge {
                from: from.to_string(),
                to: to.to_string(),
            });
        }

        let handle = EdgeHandle(self.edges.len() as u32);
        self.edges.push(Some(Edge {
            source,
            destination,
            weight,
        }));
        self.by_endpoints.insert((source, destination), handle);
        debug!(from, to, weight, "edge added");
        Ok(handle)
    }

    /// Remove the edge `from -> to`.
    pub fn remove_edge(&mut self, from: &str, to: &str) -> Result<Edge> {
        let handle = self.require_edge(from, to)?;
        self.unlink_edge(handle).ok_or_else(|| GraphError::EdgeNotFound {
            from: from.to_string(),
            to: to.to_string(),
        })
    }

    /// Change the weight of `from -> to`.
    pub fn set_edge_weight(&mut self, from: &str, to: &str, weight: f64) -> Result<()> {
        check_weight(weight)?;
        let handle = self.require_edge(from, to)?;
        if let Some(edge) = self.edges[handle.index()].as_mut() {
            edge.weight = weight;
        }
        Ok(())
    }

    /// Look up a vertex by id.
    pub fn vertex(&self, id: &str) -> Option<VertexRef<'_>> {
        self.by_id.get(id).and_then(|handle| self.resolve(*handle))
    }

    /// Handle of the vertex with this id.
    pub fn vertex_handle(&self, id: &str) -> Option<VertexHandle> {
        self.by_id.get(id).copied()
    }

    /// Resolve a handle to a live vertex. Removed vertices resolve to `None`.
    pub fn resolve(&self, handle: VertexHandle) -> Option<VertexRef<'_>> {
        self.vertices
            .get(handle.index())
            .and_then(Option::as_ref)
            .map(|vertex| VertexRef {
                handle,
                id: &vertex.id,
                position: vertex.position,
            })
    }

    /// Whether a vertex with this id exists.
    pub fn contains_vertex(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// Look up the edge `from -> to`.
    pub fn edge(&self, from: &str, to: &str) -> Option<EdgeRef<'_>> {
        let source = self.vertex_handle(from)?;
        let destination = self.vertex_handle(to)?;
        self.edge_between(source, destination)
    }

    /// Look up the edge between two handles.
    pub fn edge_between(&self, source: VertexHandle, destination: VertexHandle) -> Option<EdgeRef<'_>> {
        self.by_endpoints
            .get(&(source, destination))
            .and_then(|handle| self.resolve_edge(*handle))
    }

    /// Resolve an edge handle. Removed edges resolve to `None`.
    pub fn resolve_edge(&self, handle: EdgeHandle) -> Option<EdgeRef<'_>> {
        let edge = self.edges.get(handle.index()).and_then(Option::as_ref)?;
        Some(EdgeRef {
            handle,
            source: self.resolve(edge.source)?,
            destination: self.resolve(edge.destination)?,
            weight: edge.weight,
        })
    }

    /// Whether the edge `from -> to` exists.
    pub fn contains_edge(&self, from: &str, to: &str) -> bool {
        self.edge(from, to).is_some()
    }

    /// All vertices, ordered by id.
    pub fn vertices(&self) -> impl Iterator<Item = VertexRef<'_>> + '_ {
        self.by_id.values().filter_map(move |handle| self.resolve(*handle))
    }

    /// All edges, ordered by `(source id, destination id)`.
    pub fn edges(&self) -> Vec<EdgeRef<'_>> {
        let mut edges: Vec<EdgeRef<'_>> = self
            .by_endpoints
            .values()
            .filter_map(|handle| self.resolve_edge(*handle))
            .collect();
        edges.sort_by(|a, b| (a.source.id, a.destination.id).cmp(&(b.source.id, b.destination.id)));
        edges
    }

    /// Edges incident to a vertex on the requested side, in edge order.
    ///
    /// An unknown id yields no edges.
    pub fn incident_edges(&self, id: &str, direction: Direction) -> Vec<EdgeRef<'_>> {
        let Some(vertex) = self.vertex_handle(id) else {
            return Vec::new();
        };
        self.edges()
            .into_iter()
            .filter(|edge| direction.admits(edge.source.handle, edge.destination.handle, vertex))
            .collect()
    }

    /// Edges whose destination is `id`.
    pub fn inbound_edges(&self, id: &str) -> Vec<EdgeRef<'_>> {
        self.incident_edges(id, Direction::Incoming)
    }

    /// Edges whose source is `id`.
    pub fn outbound_edges(&self, id: &str) -> Vec<EdgeRef<'_>> {
        self.incident_edges(id, Direction::Outgoing)
    }

    /// Destinations reachable from `id` by one outgoing edge, in edge order.
    pub fn neighbors(&self, id: &str) -> Vec<VertexRef<'_>> {
        self.outbound_edges(id)
            .into_iter()
            .map(|edge| edge.destination)
            .collect()
    }

    /// The endpoint of `edge` that is not `id`, or `None` if `id` is not an
    /// endpoint. For a self-loop the vertex is its own opposite.
    pub fn opposite<'g>(&self, id: &str, edge: &EdgeRef<'g>) -> Option<VertexRef<'g>> {
        if edge.source.id == id {
            Some(edge.destination)
        } else if edge.destination.id == id {
            Some(edge.source)
        } else {
            None
        }
    }

    fn require_vertex(&self, id: &str) -> Result<VertexHandle> {
        self.vertex_handle(id).ok_or_else(|| {
            warn!(vertex = %id, "vertex does not exist");
            GraphError::VertexNotFound(id.to_string())
        })
    }

    fn require_edge(&self, from: &str, to: &str) -> Result<EdgeHandle> {
        let source = self.require_vertex(from)?;
        let destination = self.require_vertex(to)?;
        self.by_endpoints
            .get(&(source, destination))
            .copied()
            .ok_or_else(|| {
                warn!(from, to, "edge does not exist");
                GraphError::EdgeNotFound {
                    from: from.to_string(),
                    to: to.to_string(),
                }
            })
    }

    fn unlink_edge(&mut self, handle: EdgeHandle) -> Option<Edge> {
        let edge = self.edges.get_mut(handle.index())?.take()?;
        self.by_endpoints.remove(&(edge.source, edge.destination));
        Some(edge)
    }
}

fn check_weight(weight: f64) -> Result<()> {
    if !weight.is_finite() {
        warn!(weight, "rejecting non-finite edge weight");
        return Err(GraphError::InvalidWeight(weight));
    }
    Ok(())
}

impl fmt::Display for Graph {
    /// Adjacency listing: each vertex followed by its outgoing edges.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for vertex in self.vertices() {
            writeln!(f, "{}", vertex.id)?;
            for edge in self.outbound_edges(vertex.id) {
                writeln!(f, "  -> {} ({})", edge.destination.id, edge.weight)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn triangle() -> Graph {
        let mut g = Graph::new();
        for id in ["A", "B", "C"] {
            g.add_vertex(id).unwrap();
        }
        g.add_edge("A", "B").unwrap();
        g.add_edge("B", "C").unwrap();
        g.add_weighted_edge("A", "C", 5.0).unwrap();
        g
    }

    fn edge_names(g: &Graph) -> Vec<(String, String)> {
        g.edges()
            .iter()
            .map(|e| (e.source.id.to_string(), e.destination.id.to_string()))
            .collect()
    }

    #[test]
    fn duplicate_vertex_rejected() {
        let mut g = Graph::new();
        g.add_vertex("A").unwrap();
        assert_eq!(g.add_vertex("A"), Err(GraphError::DuplicateVertex("A".into())));
        assert_eq!(
            g.add_vertex_at("A", 3.0, 4.0),
            Err(GraphError::DuplicateVertex("A".into()))
        );
        assert_eq!(g.vertex_count(), 1);
        assert_eq!(g.vertex("A").unwrap().position, Position::ORIGIN);
    }

    #[test]
    fn edge_needs_both_endpoints() {
        let mut g = Graph::new();
        g.add_vertex("A").unwrap();
        assert_eq!(g.add_edge("A", "Z"), Err(GraphError::VertexNotFound("Z".into())));
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn duplicate_edge_suppressed() {
        let mut g = triangle();
        assert!(matches!(g.add_edge("A", "B"), Err(GraphError::DuplicateEdge { .. })));
        assert_eq!(g.edge_count(), 3);
        // The reverse direction is a different edge.
        g.add_edge("B", "A").unwrap();
        assert_eq!(g.edge_count(), 4);
    }

    #[test]
    fn vertices_ordered_by_id() {
        let mut g = Graph::new();
        for id in ["3", "1", "4", "0", "2"] {
            g.add_vertex(id).unwrap();
        }
        let ids: Vec<_> = g.vertices().map(|v| v.id).collect();
        assert_eq!(ids, vec!["0", "1", "2", "3", "4"]);
    }

    #[test]
    fn edges_ordered_by_endpoint_ids() {
        let mut g = Graph::new();
        for id in ["A", "B", "C"] {
            g.add_vertex(id).unwrap();
        }
        g.add_edge("C", "A").unwrap();
        g.add_edge("A", "C").unwrap();
        g.add_edge("B", "A").unwrap();
        g.add_edge("A", "B").unwrap();
        assert_eq!(
            edge_names(&g),
            vec![
                ("A".into(), "B".into()),
                ("A".into(), "C".into()),
                ("B".into(), "A".into()),
                ("C".into(), "A".into()),
            ]
        );
    }

    #[test]
    fn removing_vertex_cascades_both_directions() {
        let mut g = triangle();
        g.add_edge("C", "B").unwrap();
        let removed = g.remove_vertex("B").unwrap();
        assert_eq!(removed.id(), "B");
        assert_eq!(edge_names(&g), vec![("A".into(), "C".into())]);
        assert!(g.vertex_handle("B").is_none());
    }

    #[test]
    fn removed_handles_are_not_reused() {
        let mut g = Graph::new();
        let a = g.add_vertex("A").unwrap();
        g.remove_vertex("A").unwrap();
        let again = g.add_vertex("A").unwrap();
        assert_ne!(a, again);
        assert!(g.resolve(a).is_none());
    }

    #[test]
    fn missing_removals_report() {
        let mut g = triangle();
        assert_eq!(g.remove_vertex("Q"), Err(GraphError::VertexNotFound("Q".into())));
        assert!(matches!(g.remove_edge("C", "A"), Err(GraphError::EdgeNotFound { .. })));
        assert_eq!(g.edge_count(), 3);
    }

    #[test]
    fn weight_updates_in_place() {
        let mut g = triangle();
        g.set_edge_weight("A", "B", -2.5).unwrap();
        assert_eq!(g.edge("A", "B").unwrap().weight, -2.5);
        assert!(matches!(
            g.set_edge_weight("A", "B", f64::NAN),
            Err(GraphError::InvalidWeight(_))
        ));
        assert_eq!(g.edge("A", "B").unwrap().weight, -2.5);
    }

    #[test]
    fn infinite_weights_are_rejected() {
        let mut g = triangle();
        for weight in [f64::INFINITY, f64::NEG_INFINITY] {
            assert_eq!(
                g.add_weighted_edge("C", "A", weight),
                Err(GraphError::InvalidWeight(weight))
            );
            assert_eq!(
                g.set_edge_weight("A", "B", weight),
                Err(GraphError::InvalidWeight(weight))
            );
        }
        assert!(!g.contains_edge("C", "A"));
        assert_eq!(g.edge("A", "B").unwrap().weight, 1.0);
    }

    #[test]
    fn neighbors_follow_edge_order() {
        let mut g = triangle();
        g.add_vertex("0").unwrap();
        g.add_edge("A", "0").unwrap();
        let ids: Vec<_> = g.neighbors("A").iter().map(|v| v.id).collect();
        assert_eq!(ids, vec!["0", "B", "C"]);
        assert!(g.neighbors("missing").is_empty());
    }

    #[test]
    fn incident_edges_by_direction() {
        let g = triangle();
        let names = |edges: Vec<EdgeRef<'_>>| -> Vec<String> {
            edges
                .iter()
                .map(|e| format!("{}{}", e.source.id, e.destination.id))
                .collect()
        };
        assert_eq!(names(g.inbound_edges("C")), vec!["AC", "BC"]);
        assert_eq!(names(g.outbound_edges("B")), vec!["BC"]);
        assert_eq!(names(g.incident_edges("B", Direction::Both)), vec!["AB", "BC"]);
    }

    #[test]
    fn rename_reorders_and_keeps_edges() {
        let mut g = triangle();
        g.rename_vertex("A", "Z").unwrap();
        let ids: Vec<_> = g.vertices().map(|v| v.id).collect();
        assert_eq!(ids, vec!["B", "C", "Z"]);
        assert_eq!(
            edge_names(&g),
            vec![
                ("B".into(), "C".into()),
                ("Z".into(), "B".into()),
                ("Z".into(), "C".into()),
            ]
        );
        assert_eq!(
            g.rename_vertex("B", "C"),
            Err(GraphError::DuplicateVertex("C".into()))
        );
    }

    #[test]
    fn opposite_endpoint() {
        let g = triangle();
        let edge = g.edge("A", "B").unwrap();
        assert_eq!(g.opposite("A", &edge).unwrap().id, "B");
        assert_eq!(g.opposite("B", &edge).unwrap().id, "A");
        assert!(g.opposite("C", &edge).is_none());
    }

    #[test]
    fn display_lists_adjacency() {
        let g = triangle();
        let text = g.to_string();
        assert_eq!(text, "A\n  -> B (1)\n  -> C (5)\nB\n  -> C (1)\nC\n");
    }

    #[derive(Debug, Clone)]
    enum Op {
        AddVertex(u8),
        RemoveVertex(u8),
        AddEdge(u8, u8),
        RemoveEdge(u8, u8),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0u8..6).prop_map(Op::AddVertex),
            (0u8..6).prop_map(Op::RemoveVertex),
            (0u8..6, 0u8..6).prop_map(|(a, b)| Op::AddEdge(a, b)),
            (0u8..6, 0u8..6).prop_map(|(a, b)| Op::RemoveEdge(a, b)),
        ]
    }

    proptest! {
        #[test]
        fn mutations_preserve_invariants(ops in proptest::collection::vec(op(), 0..60)) {
            let mut g = Graph::new();
            for op in ops {
                let _ = match op {
                    Op::AddVertex(v) => g.add_vertex(v.to_string()).map(|_| ()),
                    Op::RemoveVertex(v) => g.remove_vertex(&v.to_string()).map(|_| ()),
                    Op::AddEdge(a, b) => g.add_edge(&a.to_string(), &b.to_string()).map(|_| ()),
                    Op::RemoveEdge(a, b) => g.remove_edge(&a.to_string(), &b.to_string()).map(|_| ()),
                };

                let edges = g.edges();
                prop_assert_eq!(edges.len(), g.edge_count());
                for edge in &edges {
                    prop_assert!(g.contains_vertex(edge.source.id));
                    prop_assert!(g.contains_vertex(edge.destination.id));
                }
                for pair in edges.windows(2) {
                    let a = (pair[0].source.id, pair[0].destination.id);
                    let b = (pair[1].source.id, pair[1].destination.id);
                    prop_assert!(a < b, "edges out of order: {:?} then {:?}", a, b);
                }
            }
        }
    }
}
