//! Built-in example graphs.
//!
//! Small textbook graphs kept in memory so a session can start without any
//! editing. Names are stable and used by the CLI and the server.

use crate::graph::Graph;

/// Names accepted by [`example`], in presentation order.
pub const EXAMPLES: &[&str] = &["cp4_10_dw", "cp4_43_du", "cp4_16_dw_dag", "big"];

/// Look up an example graph by name.
pub fn example(name: &str) -> Option<Graph> {
    match name {
        "cp4_10_dw" => Some(cp4_10_dw()),
        "cp4_43_du" => Some(cp4_43_du()),
        "cp4_16_dw_dag" => Some(cp4_16_dw_dag()),
        "big" => Some(big()),
        _ => None,
    }
}

/// Five-vertex weighted digraph with a cycle through 0.
pub fn cp4_10_dw() -> Graph {
    assemble(
        &[
            ("0", 300.0, 200.0),
            ("1", 500.0, 100.0),
            ("2", 700.0, 200.0),
            ("3", 500.0, 400.0),
            ("4", 300.0, 600.0),
        ],
        &[
            ("0", "1", 4.0),
            ("0", "4", 6.0),
            ("0", "3", 6.0),
            ("1", "2", 2.0),
            ("2", "0", 4.0),
            ("2", "3", 8.0),
            ("3", "4", 9.0),
        ],
    )
}

/// Eight-vertex unweighted digraph; 6 and 7 are unreachable from 0.
pub fn cp4_43_du() -> Graph {
    assemble(
        &[
            ("0", 100.0, 100.0),
            ("1", 200.0, 100.0),
            ("2", 200.0, 200.0),
            ("3", 300.0, 100.0),
            ("4", 400.0, 100.0),
            ("5", 500.0, 100.0),
            ("6", 300.0, 200.0),
            ("7", 400.0, 200.0),
        ],
        &[
            ("0", "1", 1.0),
            ("0", "2", 1.0),
            ("1", "3", 1.0),
            ("1", "2", 1.0),
            ("2", "3", 1.0),
            ("2", "5", 1.0),
            ("3", "4", 1.0),
            ("7", "6", 1.0),
        ],
    )
}

/// Weighted DAG rooted at 0.
pub fn cp4_16_dw_dag() -> Graph {
    assemble(
        &[
            ("1", 300.0, 200.0),
            ("3", 700.0, 200.0),
            ("4", 600.0, 600.0),
            ("2", 600.0, 400.0),
            ("0", 500.0, 300.0),
        ],
        &[
            ("0", "1", 2.0),
            ("0", "2", 6.0),
            ("0", "3", 7.0),
            ("1", "4", 6.0),
            ("1", "3", 3.0),
            ("2", "4", 1.0),
            ("3", "4", 5.0),
        ],
    )
}

/// Nine vertices, sixteen weighted edges.
pub fn big() -> Graph {
    assemble(
        &[
            ("0", 100.0, 200.0),
            ("1", 100.0, 400.0),
            ("4", 300.0, 600.0),
            ("5", 500.0, 600.0),
            ("7", 700.0, 500.0),
            ("8", 800.0, 300.0),
            ("6", 700.0, 200.0),
            ("2", 300.0, 300.0),
            ("3", 500.0, 400.0),
        ],
        &[
            ("0", "1", 8.0),
            ("0", "2", 12.0),
            ("1", "2", 13.0),
            ("1", "3", 25.0),
            ("2", "6", 21.0),
            ("2", "3", 14.0),
            ("3", "6", 12.0),
            ("3", "8", 16.0),
            ("3", "7", 12.0),
            ("3", "5", 8.0),
            ("3", "4", 20.0),
            ("4", "5", 19.0),
            ("4", "1", 9.0),
            ("5", "7", 11.0),
            ("6", "8", 11.0),
            ("7", "8", 9.0),
        ],
    )
}

fn assemble(vertices: &[(&str, f64, f64)], edges: &[(&str, &str, f64)]) -> Graph {
    let mut graph = Graph::new();
    for &(id, x, y) in vertices {
        let added = graph.add_vertex_at(id, x, y);
        debug_assert!(added.is_ok(), "catalog vertex {id} rejected");
    }
    for &(from, to, weight) in edges {
        let added = graph.add_weighted_edge(from, to, weight);
        debug_assert!(added.is_ok(), "catalog edge {from}->{to} rejected");
    }
    graph
}
