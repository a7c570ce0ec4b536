//! Mutable classification sets and step capture.
//!
//! Algorithms mutate the mark sets freely and call [`Recorder::record`] at each
//! observable instant. Overlapping marks are resolved at snapshot time:
//! vertices `Unqueued < Traversed < Highlighted`, edges
//! `Traversed < Highlighted < Useless`.

use crate::trace::{EdgeClass, Step, TraceState, Universe, VertexClass};

/// Membership set over dense universe indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Marks(Vec<bool>);

impl Marks {
    pub(crate) fn new(len: usize) -> Self {
        Self(vec![false; len])
    }

    pub(crate) fn insert(&mut self, index: usize) {
        if let Some(slot) = self.0.get_mut(index) {
            *slot = true;
        }
    }

    pub(crate) fn remove(&mut self, index: usize) {
        if let Some(slot) = self.0.get_mut(index) {
            *slot = false;
        }
    }

    pub(crate) fn contains(&self, index: usize) -> bool {
        self.0.get(index).copied().unwrap_or(false)
    }

    pub(crate) fn clear(&mut self) {
        self.0.fill(false);
    }

    pub(crate) fn fill(&mut self) {
        self.0.fill(true);
    }
}

pub(crate) struct Recorder<'u> {
    universe: &'u Universe,
    steps: Vec<Step>,
    pub(crate) highlighted_vertices: Marks,
    pub(crate) traversed_vertices: Marks,
    pub(crate) queued_vertices: Marks,
    pub(crate) highlighted_edges: Marks,
    pub(crate) traversed_edges: Marks,
    pub(crate) useless_edges: Marks,
    pub(crate) distances: Vec<f64>,
}

impl<'u> Recorder<'u> {
    pub(crate) fn new(universe: &'u Universe) -> Self {
        let n = universe.vertex_count();
        let m = universe.edge_count();
        Self {
            universe,
            steps: Vec::new(),
            highlighted_vertices: Marks::new(n),
            traversed_vertices: Marks::new(n),
            queued_vertices: Marks::new(n),
            highlighted_edges: Marks::new(m),
            traversed_edges: Marks::new(m),
            useless_edges: Marks::new(m),
            distances: vec![f64::INFINITY; n],
        }
    }

    /// Current marks resolved into a state.
    pub(crate) fn snapshot(&self) -> TraceState {
        self.snapshot_with_edges(&self.traversed_edges, &self.useless_edges)
    }

    /// Current vertex marks and distances, with the given edge sets in place of
    /// the live traversed/useless sets.
    pub(crate) fn snapshot_with_edges(&self, traversed: &Marks, useless: &Marks) -> TraceState {
        let vertices = (0..self.universe.vertex_count())
            .map(|v| {
                if self.highlighted_vertices.contains(v) {
                    VertexClass::Highlighted
                } else if self.traversed_vertices.contains(v) {
                    VertexClass::Traversed
                } else if self.queued_vertices.contains(v) {
                    VertexClass::Unqueued
                } else {
                    VertexClass::Default
                }
            })
            .collect();
        let edges = (0..self.universe.edge_count())
            .map(|e| {
                if useless.contains(e) {
                    EdgeClass::Useless
                } else if self.highlighted_edges.contains(e) {
                    EdgeClass::Highlighted
                } else if traversed.contains(e) {
                    EdgeClass::Traversed
                } else {
                    EdgeClass::Default
                }
            })
            .collect();
        let distances = self
            .distances
            .iter()
            .map(|&d| (d != f64::INFINITY).then_some(d))
            .collect();
        TraceState::from_parts(vertices, edges, distances)
    }

    pub(crate) fn record(&mut self, line: usize, description: impl Into<String>) {
        let state = self.snapshot();
        self.record_state(line, description, state);
    }

    pub(crate) fn record_state(&mut self, line: usize, description: impl Into<String>, state: TraceState) {
        self.steps.push(Step {
            line,
            description: description.into(),
            state,
        });
    }

    /// A step showing nothing but the text, used for up-front warnings.
    pub(crate) fn record_blank(&mut self, line: usize, description: impl Into<String>) {
        let state = TraceState::blank(self.universe);
        self.record_state(line, description, state);
    }

    pub(crate) fn finish(self) -> Vec<Step> {
        self.steps
    }

    /// `"{ a b c }"` for the given vertex indices.
    pub(crate) fn id_list(&self, vertices: impl IntoIterator<Item = usize>) -> String {
        let mut out = String::from("{");
        for v in vertices {
            out.push(' ');
            out.push_str(self.universe.id(v));
        }
        out.push_str(" }");
        out
    }

    pub(crate) fn id(&self, vertex: usize) -> &'u str {
        self.universe.id(vertex)
    }
}

/// Distance or weight as shown in descriptions: infinities print as `Inf` and
/// `-Inf`.
pub fn format_number(value: f64) -> String {
    if value == f64::INFINITY {
        "Inf".to_string()
    } else if value == f64::NEG_INFINITY {
        "-Inf".to_string()
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathtrace_graph::Graph;

    fn universe() -> Universe {
        let mut g = Graph::new();
        g.add_vertex("A").unwrap();
        g.add_vertex("B").unwrap();
        g.add_edge("A", "B").unwrap();
        Universe::capture(&g)
    }

    #[test]
    fn vertex_precedence() {
        let u = universe();
        let mut rec = Recorder::new(&u);
        rec.queued_vertices.insert(0);
        assert_eq!(rec.snapshot().vertex(0), VertexClass::Unqueued);
        rec.traversed_vertices.insert(0);
        assert_eq!(rec.snapshot().vertex(0), VertexClass::Traversed);
        rec.highlighted_vertices.insert(0);
        assert_eq!(rec.snapshot().vertex(0), VertexClass::Highlighted);
        assert_eq!(rec.snapshot().vertex(1), VertexClass::Default);
    }

    #[test]
    fn edge_precedence() {
        let u = universe();
        let mut rec = Recorder::new(&u);
        rec.traversed_edges.insert(0);
        assert_eq!(rec.snapshot().edge(0), EdgeClass::Traversed);
        rec.highlighted_edges.insert(0);
        assert_eq!(rec.snapshot().edge(0), EdgeClass::Highlighted);
        rec.useless_edges.insert(0);
        assert_eq!(rec.snapshot().edge(0), EdgeClass::Useless);
    }

    #[test]
    fn steps_are_snapshots() {
        let u = universe();
        let mut rec = Recorder::new(&u);
        rec.distances[0] = 0.0;
        rec.record(1, "first");
        rec.distances[1] = 1.0;
        rec.highlighted_vertices.insert(1);
        rec.record(2, "second");
        let steps = rec.finish();
        assert_eq!(steps[0].state.distance(1), f64::INFINITY);
        assert_eq!(steps[0].state.vertex(1), VertexClass::Default);
        assert_eq!(steps[1].state.distance(1), 1.0);
    }

    #[test]
    fn id_list_format() {
        let u = universe();
        let rec = Recorder::new(&u);
        assert_eq!(rec.id_list([1, 0]), "{ B A }");
        assert_eq!(rec.id_list([]), "{ }");
    }

    #[test]
    fn infinities_print_as_inf() {
        assert_eq!(format_number(f64::INFINITY), "Inf");
        assert_eq!(format_number(2.0), "2");
        assert_eq!(format_number(-1.5), "-1.5");
        assert_eq!(format_number(f64::NEG_INFINITY), "-Inf");
    }

    #[test]
    fn only_positive_infinity_is_unreached() {
        let u = universe();
        let mut rec = Recorder::new(&u);
        rec.distances[0] = f64::NEG_INFINITY;
        let state = rec.snapshot();
        assert_eq!(state.distance(0), f64::NEG_INFINITY);
        assert_eq!(state.distance(1), f64::INFINITY);
    }
}
