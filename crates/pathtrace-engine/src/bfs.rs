//! Breadth-first search over unit weights.

use std::collections::VecDeque;

use tracing::trace;

use crate::recorder::{format_number, Recorder};
use crate::trace::{Step, Universe};

pub(crate) const PSEUDOCODE: &[&str] = &[
    "if the graph is weighted, show a warning",
    "initSSSP, Q.push(s)",
    "while !Q.empty() // Q is a normal queue",
    "  u = Q.front(), Q.pop()",
    "  for each neighbor v of u",
    "    if v is unvisited, p[v] = u, d[v] = d[u] + 1, Q.push(v)",
    "End of BFS",
];

pub(crate) fn trace(universe: &Universe, start: usize) -> Vec<Step> {
    let mut rec = Recorder::new(universe);

    if universe.edges().iter().any(|e| e.weight != 1.0) {
        rec.record_blank(
            0,
            "WARNING: the graph is not unweighted (or has non-unit weights).\n\
             BFS may yield an incorrect SSSP answer.",
        );
    }

    let mut visited = vec![false; universe.vertex_count()];
    let mut queue = VecDeque::from([start]);
    visited[start] = true;
    rec.distances[start] = 0.0;
    rec.queued_vertices.insert(start);
    let s = rec.id(start);
    rec.record(
        1,
        format!("{s} is the source vertex.\nSet p[{s}] = -1, d[{s}] = 0 and push {s} to the queue."),
    );

    while !queue.is_empty() {
        rec.record(2, format!("The queue is {}", rec.id_list(queue.iter().copied())));
        let Some(u) = queue.pop_front() else { break };
        let uid = rec.id(u);
        rec.queued_vertices.remove(u);
        rec.traversed_vertices.insert(u);
        rec.highlighted_vertices.insert(u);
        rec.record(3, format!("Current vertex is {uid}"));
        trace!(vertex = uid, "bfs dequeue");

        for &e in universe.outgoing(u) {
            let Some(edge) = universe.edge(e) else { continue };
            let v = edge.to;
            let vid = rec.id(v);
            rec.highlighted_edges.insert(e);
            let seen = (0..visited.len()).filter(|&i| visited[i]);
            rec.record(
                4,
                format!(
                    "Explore the neighbors of {uid}.\nCurrent neighbor: {vid}\nVisited vertices: {}",
                    rec.id_list(seen)
                ),
            );
            rec.highlighted_edges.remove(e);
            rec.traversed_edges.insert(e);

            if visited[v] {
                rec.useless_edges.insert(e);
                rec.record(4, format!("{vid} is already visited.\nNo change."));
            } else {
                visited[v] = true;
                rec.distances[v] = rec.distances[u] + 1.0;
                queue.push_back(v);
                rec.queued_vertices.insert(v);
                rec.record(
                    5,
                    format!(
                        "Push {vid} to the queue.\nSet p[{vid}] = {uid}, d[{vid}] = {}",
                        format_number(rec.distances[v])
                    ),
                );
            }
        }
        rec.highlighted_vertices.remove(u);
    }

    rec.record(6, "End of BFS");
    rec.finish()
}
