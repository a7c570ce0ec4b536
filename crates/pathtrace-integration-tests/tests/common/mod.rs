//! Fixtures shared by the end-to-end tests.

use pathtrace_engine::{Algorithm, Trace};
use pathtrace_graph::{Graph, GraphDocument};

/// The three-vertex graph where BFS and Dijkstra disagree:
/// `A -> B (1)`, `A -> C (5)`, `B -> C (1)`. Edges are listed in graph order
/// so the document equals its own export.
pub const SHORTCUT_JSON: &str = r#"{
    "vertices": [{ "id": "A" }, { "id": "B" }, { "id": "C" }],
    "edges": [
        { "from": "A", "to": "B" },
        { "from": "A", "to": "C", "weight": 5 },
        { "from": "B", "to": "C" }
    ]
}"#;

pub fn shortcut() -> Graph {
    let document: GraphDocument = serde_json::from_str(SHORTCUT_JSON).expect("fixture parses");
    Graph::try_from(document).expect("fixture is valid")
}

/// `n` vertices `0..n` in a chain of unit edges.
pub fn chain(n: usize) -> Graph {
    let mut graph = Graph::new();
    for i in 0..n {
        graph.add_vertex(i.to_string()).expect("fresh id");
    }
    for i in 1..n {
        graph
            .add_edge(&(i - 1).to_string(), &i.to_string())
            .expect("fresh edge");
    }
    graph
}

/// Trace every algorithm over `graph` from `start`.
pub fn trace_all(graph: &Graph, start: &str) -> Vec<Trace> {
    Algorithm::ALL
        .iter()
        .map(|algorithm| algorithm.run(graph, start).expect("start exists"))
        .collect()
}
