//! Trace data: the frozen universe, per-step snapshots and the finished trace.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use pathtrace_graph::{EdgeHandle, Graph, VertexHandle};
use serde::{Deserialize, Serialize};

use crate::algorithm::Algorithm;

/// Classification of a vertex at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VertexClass {
    /// Untouched
    #[default]
    Default,
    /// The vertex currently being processed
    Highlighted,
    /// Already dequeued / processed
    Traversed,
    /// Waiting in the frontier
    Unqueued,
}

/// Classification of an edge at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeClass {
    /// Untouched
    #[default]
    Default,
    /// The edge currently being examined
    Highlighted,
    /// Part of the current shortest-path tree
    Traversed,
    /// Examined and found not to help
    Useless,
}

/// A vertex of the frozen universe.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UniverseVertex {
    pub handle: VertexHandle,
    pub id: String,
}

/// An edge of the frozen universe. Endpoints are universe vertex indices.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UniverseEdge {
    pub handle: EdgeHandle,
    pub from: usize,
    pub to: usize,
    pub weight: f64,
}

/// The vertex and edge set a trace was generated over.
///
/// Captured once when the trace is built, in graph order, so that later edits
/// to the graph cannot change what an existing trace refers to. Every
/// [`TraceState`] of the trace is indexed by positions in this universe.
#[derive(Debug, Clone, Serialize)]
pub struct Universe {
    vertices: Vec<UniverseVertex>,
    edges: Vec<UniverseEdge>,
    #[serde(skip)]
    outgoing: Vec<Vec<usize>>,
    #[serde(skip)]
    by_handle: HashMap<VertexHandle, usize>,
}

impl Universe {
    /// Freeze the current contents of `graph`.
    pub fn capture(graph: &Graph) -> Self {
        let vertices: Vec<UniverseVertex> = graph
            .vertices()
            .map(|v| UniverseVertex {
                handle: v.handle,
                id: v.id.to_string(),
            })
            .collect();
        let by_handle: HashMap<VertexHandle, usize> = vertices
            .iter()
            .enumerate()
            .map(|(index, v)| (v.handle, index))
            .collect();

        let mut outgoing = vec![Vec::new(); vertices.len()];
        let mut edges = Vec::with_capacity(graph.edge_count());
        for edge in graph.edges() {
            let (Some(&from), Some(&to)) = (
                by_handle.get(&edge.source.handle),
                by_handle.get(&edge.destination.handle),
            ) else {
                continue;
            };
            outgoing[from].push(edges.len());
            edges.push(UniverseEdge {
                handle: edge.handle,
                from,
                to,
                weight: edge.weight,
            });
        }

        Self {
            vertices,
            edges,
            outgoing,
            by_handle,
        }
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Vertices in id order.
    pub fn vertices(&self) -> &[UniverseVertex] {
        &self.vertices
    }

    /// Edges in `(source id, destination id)` order.
    pub fn edges(&self) -> &[UniverseEdge] {
        &self.edges
    }

    /// Id of the vertex at `index`.
    pub fn id(&self, index: usize) -> &str {
        self.vertices.get(index).map_or("?", |v| &v.id)
    }

    /// Edge at `index`.
    pub fn edge(&self, index: usize) -> Option<&UniverseEdge> {
        self.edges.get(index)
    }

    /// Indices of the edges leaving `vertex`, in edge order.
    pub fn outgoing(&self, vertex: usize) -> &[usize] {
        match self.outgoing.get(vertex) {
            Some(edges) => edges,
            None => &[],
        }
    }

    /// Universe index of the vertex with this id.
    pub fn vertex_index(&self, id: &str) -> Option<usize> {
        self.vertices
            .binary_search_by(|v| v.id.as_str().cmp(id))
            .ok()
    }

    /// Universe index of the vertex with this handle.
    pub fn vertex_index_of(&self, handle: VertexHandle) -> Option<usize> {
        self.by_handle.get(&handle).copied()
    }

    /// Universe index of the edge `from -> to`.
    pub fn edge_index(&self, from: &str, to: &str) -> Option<usize> {
        self.edges
            .binary_search_by(|e| (self.id(e.from), self.id(e.to)).cmp(&(from, to)))
            .ok()
    }
}

/// Classification of the whole universe at one instant.
///
/// Total over the universe: an index past the end reads as `Default`, and a
/// missing distance reads as `+inf`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceState {
    vertices: Vec<VertexClass>,
    edges: Vec<EdgeClass>,
    distances: Vec<Option<f64>>,
}

impl TraceState {
    pub(crate) fn from_parts(
        vertices: Vec<VertexClass>,
        edges: Vec<EdgeClass>,
        distances: Vec<Option<f64>>,
    ) -> Self {
        Self {
            vertices,
            edges,
            distances,
        }
    }

    /// Everything `Default`, every distance infinite.
    pub fn blank(universe: &Universe) -> Self {
        Self {
            vertices: vec![VertexClass::Default; universe.vertex_count()],
            edges: vec![EdgeClass::Default; universe.edge_count()],
            distances: vec![None; universe.vertex_count()],
        }
    }

    /// Class of the vertex at `index`.
    pub fn vertex(&self, index: usize) -> VertexClass {
        self.vertices.get(index).copied().unwrap_or_default()
    }

    /// Class of the edge at `index`.
    pub fn edge(&self, index: usize) -> EdgeClass {
        self.edges.get(index).copied().unwrap_or_default()
    }

    /// Best known distance of the vertex at `index`.
    pub fn distance(&self, index: usize) -> f64 {
        self.distances
            .get(index)
            .copied()
            .flatten()
            .unwrap_or(f64::INFINITY)
    }

    /// All vertex classes, universe order.
    pub fn vertex_classes(&self) -> &[VertexClass] {
        &self.vertices
    }

    /// All edge classes, universe order.
    pub fn edge_classes(&self) -> &[EdgeClass] {
        &self.edges
    }
}

/// One recorded instant of an algorithm's progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    /// Pseudocode line this step belongs to (index into
    /// [`Algorithm::pseudocode`]).
    pub line: usize,
    /// Human-readable explanation.
    pub description: String,
    /// Classification snapshot.
    pub state: TraceState,
}

/// The immutable output of one algorithm run.
///
/// Cloning is cheap; the step list is shared.
#[derive(Debug, Clone)]
pub struct Trace {
    algorithm: Algorithm,
    start: String,
    universe: Arc<Universe>,
    steps: Arc<[Step]>,
}

impl Trace {
    pub(crate) fn new(algorithm: Algorithm, start: String, universe: Universe, steps: Vec<Step>) -> Self {
        Self {
            algorithm,
            start,
            universe: Arc::new(universe),
            steps: steps.into(),
        }
    }

    /// Algorithm that produced the trace.
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Start vertex id.
    pub fn start(&self) -> &str {
        &self.start
    }

    /// The universe all states are indexed by.
    pub fn universe(&self) -> &Arc<Universe> {
        &self.universe
    }

    /// Steps in order.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Shared handle to the steps, for handing to a scheduler.
    pub fn shared_steps(&self) -> Arc<[Step]> {
        Arc::clone(&self.steps)
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the trace has no steps.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Step at `index`.
    pub fn step(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    /// State of the last step.
    pub fn final_state(&self) -> Option<&TraceState> {
        self.steps.last().map(|step| &step.state)
    }

    /// Final distance of the vertex with this id. `None` for unknown ids.
    pub fn distance(&self, id: &str) -> Option<f64> {
        let index = self.universe.vertex_index(id)?;
        Some(self.final_state().map_or(f64::INFINITY, |s| s.distance(index)))
    }

    /// Final distances of every vertex, keyed by id.
    pub fn final_distances(&self) -> BTreeMap<String, f64> {
        let state = self.final_state();
        self.universe
            .vertices()
            .iter()
            .enumerate()
            .map(|(index, v)| {
                let d = state.map_or(f64::INFINITY, |s| s.distance(index));
                (v.id.clone(), d)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph() -> Graph {
        let mut g = Graph::new();
        for id in ["c", "a", "b"] {
            g.add_vertex(id).unwrap();
        }
        g.add_weighted_edge("b", "a", 2.0).unwrap();
        g.add_edge("a", "c").unwrap();
        g.add_edge("a", "b").unwrap();
        g
    }

    #[test]
    fn universe_follows_graph_order() {
        let u = Universe::capture(&graph());
        let ids: Vec<_> = u.vertices().iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        let pairs: Vec<_> = u.edges().iter().map(|e| (u.id(e.from), u.id(e.to))).collect();
        assert_eq!(pairs, vec![("a", "b"), ("a", "c"), ("b", "a")]);
        assert_eq!(u.outgoing(0), &[0, 1]);
        assert_eq!(u.outgoing(2), &[] as &[usize]);
    }

    #[test]
    fn universe_lookups() {
        let g = graph();
        let u = Universe::capture(&g);
        assert_eq!(u.vertex_index("b"), Some(1));
        assert_eq!(u.vertex_index("zz"), None);
        assert_eq!(u.edge_index("b", "a"), Some(2));
        assert_eq!(u.edge_index("c", "a"), None);
        let handle = g.vertex_handle("c").unwrap();
        assert_eq!(u.vertex_index_of(handle), Some(2));
    }

    #[test]
    fn universe_is_detached_from_later_edits() {
        let mut g = graph();
        let u = Universe::capture(&g);
        g.remove_vertex("a").unwrap();
        assert_eq!(u.vertex_count(), 3);
        assert_eq!(u.edge_count(), 3);
    }

    #[test]
    fn blank_state_is_total() {
        let u = Universe::capture(&graph());
        let state = TraceState::blank(&u);
        assert!(state.vertex_classes().iter().all(|c| *c == VertexClass::Default));
        assert!(state.edge_classes().iter().all(|c| *c == EdgeClass::Default));
        assert_eq!(state.distance(0), f64::INFINITY);
        assert_eq!(state.vertex(99), VertexClass::Default);
        assert_eq!(state.edge(99), EdgeClass::Default);
    }

    #[test]
    fn infinite_distance_survives_json() {
        let u = Universe::capture(&graph());
        let mut state = TraceState::blank(&u);
        state.distances[0] = Some(0.0);
        let json = serde_json::to_string(&state).unwrap();
        let back: TraceState = serde_json::from_str(&json).unwrap();
        assert_eq!(back.distance(0), 0.0);
        assert_eq!(back.distance(1), f64::INFINITY);
    }

    #[test]
    fn classes_serialize_snake_case() {
        assert_eq!(serde_json::to_string(&VertexClass::Unqueued).unwrap(), "\"unqueued\"");
        assert_eq!(serde_json::to_string(&EdgeClass::Useless).unwrap(), "\"useless\"");
    }
}
