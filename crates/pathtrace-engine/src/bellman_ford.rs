//! Bellman-Ford with the full `|V| - 1` passes.
//!
//! At each pass boundary the trace shows the shortest-path tree built so far
//! (every edge that ever relaxed and was not later displaced). Inside a pass
//! the edge marks restart from scratch, so only the edges relaxed in that pass
//! show as traversed.

use tracing::debug;

use crate::recorder::{format_number, Marks, Recorder};
use crate::trace::{Step, TraceState, Universe};

pub(crate) const PSEUDOCODE: &[&str] = &[
    "initSSSP, d[s] = 0",
    "for i = 1 to |V|-1",
    "  for each edge(u, v) in E",
    "    relax(u, v, w(u, v))",
    "for each edge(u, v) in E, if relax(u, v, w(u, v)) still works, report a negative cycle",
    "End of Bellman-Ford",
];

const TREE_NOTE: &str = "The highlighted edges form the current SSSP spanning tree.";

pub(crate) fn trace(universe: &Universe, start: usize) -> Vec<Step> {
    let n = universe.vertex_count();
    let m = universe.edge_count();
    let mut rec = Recorder::new(universe);

    let s = rec.id(start);
    rec.distances[start] = 0.0;
    rec.queued_vertices.insert(start);
    rec.record(
        0,
        format!("{s} is the source vertex.\nSet p[v] = -1, d[v] = Inf for every v, but d[{s}] = 0."),
    );

    let mut parent_edge: Vec<Option<usize>> = vec![None; n];
    // Tree view carried across pass boundaries.
    let mut tree_edges = Marks::new(m);
    let mut rejected_edges = Marks::new(m);
    let mut boundary: Option<TraceState> = None;
    let mut processed = 0usize;
    let mut relaxed_last_pass = 0usize;

    for pass in 1..n {
        match &boundary {
            None => {
                rec.traversed_vertices.fill();
                rec.useless_edges.fill();
                rec.record(1, format!("This is the first pass.\n{TREE_NOTE}"));
            }
            Some(state) => {
                let text = if relaxed_last_pass > 0 {
                    format!("{relaxed_last_pass} edge(s) relaxed in the last pass, we continue.\n{TREE_NOTE}")
                } else {
                    format!("There was no change in the last pass, we can stop Bellman-Ford now.\n{TREE_NOTE}")
                };
                let state = state.clone();
                rec.record_state(1, text, state);
            }
        }

        rec.traversed_vertices.clear();
        rec.highlighted_vertices.clear();
        rec.highlighted_edges.clear();
        rec.traversed_edges.clear();
        rec.useless_edges.clear();
        rec.record(1, format!("Prepare all edges for pass #{pass}."));

        relaxed_last_pass = 0;
        for (e, edge) in universe.edges().iter().enumerate() {
            let (u, v) = (edge.from, edge.to);
            let (uid, vid) = (rec.id(u), rec.id(v));
            processed += 1;
            let header = format!(
                "Pass #{pass}: relax({uid}, {vid}, {}), #edges processed = {processed}",
                format_number(edge.weight)
            );

            rec.highlighted_vertices.insert(u);
            rec.highlighted_vertices.insert(v);
            rec.highlighted_edges.insert(e);
            rec.record(2, header.clone());
            rec.highlighted_vertices.clear();
            rec.highlighted_edges.clear();
            rec.queued_vertices.insert(u);
            rec.queued_vertices.insert(v);

            let du = rec.distances[u];
            if du.is_finite() && du + edge.weight < rec.distances[v] {
                rec.distances[v] = du + edge.weight;
                if let Some(old) = parent_edge[v] {
                    rec.useless_edges.insert(old);
                    rec.traversed_edges.remove(old);
                    tree_edges.remove(old);
                    rejected_edges.insert(old);
                }
                rec.useless_edges.remove(e);
                rec.traversed_edges.insert(e);
                tree_edges.insert(e);
                rejected_edges.remove(e);
                parent_edge[v] = Some(e);
                relaxed_last_pass += 1;
                rec.record(
                    3,
                    format!("{header}\nd[{vid}] = {}, p[{vid}] = {uid}", format_number(rec.distances[v])),
                );
            } else {
                if !rec.traversed_edges.contains(e) {
                    rec.useless_edges.insert(e);
                    if boundary.is_none() {
                        rejected_edges.insert(e);
                    }
                }
                rec.record(3, format!("{header}\nNo change."));
            }
        }

        rec.traversed_vertices.fill();
        boundary = Some(match boundary {
            None => rec.snapshot(),
            Some(_) => rec.snapshot_with_edges(&tree_edges, &rejected_edges),
        });
        debug!(pass, relaxed = relaxed_last_pass, "bellman-ford pass complete");
    }

    let final_state = boundary.unwrap_or_else(|| rec.snapshot());
    let passes = n.saturating_sub(1);
    rec.record_state(
        4,
        format!(
            "#edges processed = {processed} = (|V|-1)*|E| = {passes}*{m}.\n\
             This is the SSSP spanning tree from source vertex {s}."
        ),
        final_state.clone(),
    );

    let relaxable = universe.edges().iter().any(|edge| {
        let du = rec.distances[edge.from];
        du.is_finite() && du + edge.weight < rec.distances[edge.to]
    });
    if relaxable {
        rec.record_state(
            4,
            "The graph contains a negative weight cycle.\nThe shortest paths are WRONG.",
            final_state.clone(),
        );
    }

    rec.record_state(5, "End of Bellman-Ford", final_state);
    rec.finish()
}
