//! Dijkstra with a configurable frontier.
//!
//! The default frontier is a plain FIFO queue in discovery order, which is what
//! the traced tool always did. Vertices whose distance improves are requeued, so
//! on non-negative graphs the FIFO variant still converges to true shortest
//! distances; it just takes more steps than the textbook version.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};

use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::recorder::{format_number, Recorder};
use crate::trace::{Step, Universe};

pub(crate) const PSEUDOCODE: &[&str] = &[
    "if the graph has negative weight, show a warning",
    "initSSSP, d[s] = 0, Q.push(s)",
    "while !Q.empty()",
    "  u = Q.pop()",
    "  for each neighbor v of u, relax(u, v, w(u, v)) and push v if d[v] improved",
    "End of Dijkstra",
];

/// How Dijkstra picks the next vertex to process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DijkstraFrontier {
    /// Discovery-order queue.
    #[default]
    Fifo,
    /// Min-priority queue on tentative distance, ties by vertex order.
    MinPriority,
}

impl DijkstraFrontier {
    fn label(self) -> &'static str {
        match self {
            Self::Fifo => "queue",
            Self::MinPriority => "priority queue",
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    key: f64,
    vertex: usize,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

impl Ord for Entry {
    // Reversed: BinaryHeap is a max-heap.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .key
            .total_cmp(&self.key)
            .then_with(|| other.vertex.cmp(&self.vertex))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

enum Frontier {
    Fifo {
        queue: VecDeque<usize>,
        queued: Vec<bool>,
    },
    MinPriority(BinaryHeap<Entry>),
}

impl Frontier {
    fn new(kind: DijkstraFrontier, vertices: usize) -> Self {
        match kind {
            DijkstraFrontier::Fifo => Self::Fifo {
                queue: VecDeque::new(),
                queued: vec![false; vertices],
            },
            DijkstraFrontier::MinPriority => Self::MinPriority(BinaryHeap::new()),
        }
    }

    fn push(&mut self, vertex: usize, key: f64) {
        match self {
            Self::Fifo { queue, queued } => {
                if !queued[vertex] {
                    queued[vertex] = true;
                    queue.push_back(vertex);
                }
            }
            Self::MinPriority(heap) => heap.push(Entry { key, vertex }),
        }
    }

    /// Next vertex, plus the key it was pushed with when that can go stale.
    fn pop(&mut self) -> Option<(usize, Option<f64>)> {
        match self {
            Self::Fifo { queue, queued } => {
                let vertex = queue.pop_front()?;
                queued[vertex] = false;
                Some((vertex, None))
            }
            Self::MinPriority(heap) => heap.pop().map(|e| (e.vertex, Some(e.key))),
        }
    }

    fn is_empty(&self) -> bool {
        match self {
            Self::Fifo { queue, .. } => queue.is_empty(),
            Self::MinPriority(heap) => heap.is_empty(),
        }
    }

    fn describe(&self, rec: &Recorder<'_>) -> String {
        match self {
            Self::Fifo { queue, .. } => rec.id_list(queue.iter().copied()),
            Self::MinPriority(heap) => {
                let mut entries: Vec<Entry> = heap.iter().copied().collect();
                entries.sort_by(|a, b| b.cmp(a));
                let mut out = String::from("{");
                for e in entries {
                    out.push_str(&format!(" ({}, {})", format_number(e.key), rec.id(e.vertex)));
                }
                out.push_str(" }");
                out
            }
        }
    }
}

pub(crate) fn trace(universe: &Universe, start: usize, kind: DijkstraFrontier) -> Vec<Step> {
    let n = universe.vertex_count();
    let m = universe.edge_count();
    let label = kind.label();
    let mut rec = Recorder::new(universe);

    if universe.edges().iter().any(|e| e.weight < 0.0) {
        rec.record_blank(
            0,
            "WARNING: the graph has negative weight edges.\n\
             Dijkstra may yield an incorrect SSSP answer.",
        );
    }

    let mut frontier = Frontier::new(kind, n);
    let mut visited = vec![false; n];
    let mut parent_edge: Vec<Option<usize>> = vec![None; n];
    visited[start] = true;
    rec.distances[start] = 0.0;
    frontier.push(start, 0.0);
    rec.queued_vertices.insert(start);
    let s = rec.id(start);
    rec.record(
        1,
        format!(
            "{s} is the source vertex.\nSet p[v] = -1, d[v] = Inf for every v, but d[{s}] = 0.\nThe {label} is {}",
            frontier.describe(&rec)
        ),
    );

    let limit = (n + 1) * (m + 1);
    let mut dequeues = 0usize;

    while !frontier.is_empty() {
        if dequeues == limit {
            warn!(limit, "dijkstra dequeue limit reached");
            rec.record(
                5,
                format!(
                    "Stopped after {limit} dequeues without settling.\n\
                     The graph likely has a negative weight cycle; the shortest paths are WRONG."
                ),
            );
            return rec.finish();
        }

        rec.record(2, format!("The {label} is {}", frontier.describe(&rec)));
        let Some((u, key)) = frontier.pop() else { break };
        dequeues += 1;
        let uid = rec.id(u);
        let du = rec.distances[u];

        if let Some(key) = key.filter(|k| *k > du) {
            rec.record(
                3,
                format!(
                    "({}, {uid}) is stale, d[{uid}] is already {}.\nSkip it.",
                    format_number(key),
                    format_number(du)
                ),
            );
            continue;
        }

        rec.queued_vertices.remove(u);
        rec.traversed_vertices.insert(u);
        rec.highlighted_vertices.insert(u);
        rec.record(3, format!("Current vertex is {uid}, d[{uid}] = {}", format_number(du)));
        trace!(vertex = uid, distance = du, "dijkstra dequeue");

        for &e in universe.outgoing(u) {
            let Some(edge) = universe.edge(e) else { continue };
            let v = edge.to;
            let vid = rec.id(v);
            let w = format_number(edge.weight);
            let candidate = du + edge.weight;

            rec.highlighted_edges.insert(e);
            let seen = (0..n).filter(|&i| visited[i]);
            rec.record(
                4,
                format!(
                    "Explore the neighbors of {uid}.\nCurrent neighbor: {vid}\nVisited vertices: {}",
                    rec.id_list(seen)
                ),
            );
            rec.highlighted_edges.remove(e);
            rec.traversed_edges.insert(e);

            if !visited[v] {
                visited[v] = true;
                parent_edge[v] = Some(e);
                rec.distances[v] = candidate;
                frontier.push(v, candidate);
                rec.queued_vertices.insert(v);
                rec.record(
                    4,
                    format!(
                        "{vid} is not visited.\nPush {vid} to the {label}.\nSet p[{vid}] = {uid}, d[{vid}] = {}",
                        format_number(candidate)
                    ),
                );
            } else if rec.distances[v] <= candidate {
                rec.useless_edges.insert(e);
                rec.record(
                    4,
                    format!(
                        "d[{vid}] = {} <= d[{uid}] + w({uid}, {vid}) = {} + {w} = {}\nNo change.",
                        format_number(rec.distances[v]),
                        format_number(du),
                        format_number(candidate)
                    ),
                );
            } else {
                let previous = rec.distances[v];
                if let Some(old) = parent_edge[v] {
                    rec.useless_edges.insert(old);
                }
                rec.useless_edges.remove(e);
                parent_edge[v] = Some(e);
                rec.distances[v] = candidate;
                frontier.push(v, candidate);
                rec.queued_vertices.insert(v);
                rec.record(
                    4,
                    format!(
                        "d[{vid}] = {} > d[{uid}] + w({uid}, {vid}) = {} + {w} = {}\n\
                         Push {vid} to the {label} again.\nSet p[{vid}] = {uid}, d[{vid}] = {}",
                        format_number(previous),
                        format_number(du),
                        format_number(candidate),
                        format_number(candidate)
                    ),
                );
            }
        }
        rec.highlighted_vertices.remove(u);
    }

    rec.record(5, "End of Dijkstra");
    rec.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::EdgeClass;
    use pathtrace_graph::Graph;

    fn diamond() -> Universe {
        // A->C is direct but expensive; the cheap route A->B->C is found later.
        let mut g = Graph::new();
        for id in ["A", "B", "C"] {
            g.add_vertex(id).unwrap();
        }
        g.add_weighted_edge("A", "C", 5.0).unwrap();
        g.add_weighted_edge("A", "B", 1.0).unwrap();
        g.add_weighted_edge("B", "C", 1.0).unwrap();
        Universe::capture(&g)
    }

    #[test]
    fn fifo_improves_and_marks_old_parent_useless() {
        let u = diamond();
        let steps = trace(&u, 0, DijkstraFrontier::Fifo);
        let last = &steps.last().unwrap().state;
        assert_eq!(last.distance(2), 2.0);
        let ac = u.edge_index("A", "C").unwrap();
        let bc = u.edge_index("B", "C").unwrap();
        assert_eq!(last.edge(ac), EdgeClass::Useless);
        assert_eq!(last.edge(bc), EdgeClass::Traversed);
        assert!(steps.iter().any(|s| s.description.contains("> d[B]")));
    }

    #[test]
    fn min_priority_matches_fifo_distances() {
        let u = diamond();
        let fifo = trace(&u, 0, DijkstraFrontier::Fifo);
        let heap = trace(&u, 0, DijkstraFrontier::MinPriority);
        for v in 0..u.vertex_count() {
            assert_eq!(
                fifo.last().unwrap().state.distance(v),
                heap.last().unwrap().state.distance(v)
            );
        }
    }

    #[test]
    fn min_priority_skips_stale_entries() {
        let u = diamond();
        let steps = trace(&u, 0, DijkstraFrontier::MinPriority);
        // C is pushed with 5 (stale) and 2. The 2 entry is popped first, so the
        // 5 entry is skipped when it surfaces.
        assert!(steps.iter().any(|s| s.description.starts_with("(5, C) is stale")));
    }

    #[test]
    fn heap_entries_pop_smallest_first() {
        let mut heap = BinaryHeap::new();
        heap.push(Entry { key: 3.0, vertex: 0 });
        heap.push(Entry { key: 1.0, vertex: 2 });
        heap.push(Entry { key: 1.0, vertex: 1 });
        let order: Vec<_> = std::iter::from_fn(|| heap.pop()).map(|e| e.vertex).collect();
        assert_eq!(order, vec![1, 2, 0]);
    }

    #[test]
    fn negative_weight_warns() {
        let mut g = Graph::new();
        g.add_vertex("A").unwrap();
        g.add_vertex("B").unwrap();
        g.add_weighted_edge("A", "B", -1.0).unwrap();
        let u = Universe::capture(&g);
        let steps = trace(&u, 0, DijkstraFrontier::Fifo);
        assert_eq!(steps[0].line, 0);
        assert_eq!(steps.last().unwrap().state.distance(1), -1.0);
    }

    #[test]
    fn negative_cycle_hits_the_limit() {
        let mut g = Graph::new();
        for id in ["A", "B", "C"] {
            g.add_vertex(id).unwrap();
        }
        g.add_weighted_edge("A", "B", 1.0).unwrap();
        g.add_weighted_edge("B", "C", -3.0).unwrap();
        g.add_weighted_edge("C", "B", 1.0).unwrap();
        let u = Universe::capture(&g);
        for kind in [DijkstraFrontier::Fifo, DijkstraFrontier::MinPriority] {
            let steps = trace(&u, 0, kind);
            let last = steps.last().unwrap();
            assert_eq!(last.line, 5);
            assert!(last.description.starts_with("Stopped after 16 dequeues"));
        }
    }

    #[test]
    fn frontier_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&DijkstraFrontier::MinPriority).unwrap(),
            "\"min_priority\""
        );
    }
}
