//! Plain-data description of a graph.
//!
//! Handles are arena-internal, so the wire form names everything by id. With
//! the `serde` feature this is what gets exchanged as JSON.

use crate::edge::DEFAULT_WEIGHT;
use crate::error::GraphError;
use crate::graph::Graph;

/// A vertex entry.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VertexDocument {
    pub id: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub x: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub y: f64,
}

/// An edge entry. Weight defaults to 1 when omitted.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeDocument {
    pub from: String,
    pub to: String,
    #[cfg_attr(feature = "serde", serde(default = "default_weight"))]
    pub weight: f64,
}

#[cfg(feature = "serde")]
fn default_weight() -> f64 {
    DEFAULT_WEIGHT
}

impl EdgeDocument {
    /// An edge with the default weight.
    pub fn unweighted(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            weight: DEFAULT_WEIGHT,
        }
    }
}

/// Whole-graph description: vertices then edges, both in graph order.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GraphDocument {
    pub vertices: Vec<VertexDocument>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub edges: Vec<EdgeDocument>,
}

impl From<&Graph> for GraphDocument {
    fn from(graph: &Graph) -> Self {
        Self {
            vertices: graph
                .vertices()
                .map(|v| VertexDocument {
                    id: v.id.to_string(),
                    x: v.position.x,
                    y: v.position.y,
                })
                .collect(),
            edges: graph
                .edges()
                .iter()
                .map(|e| EdgeDocument {
                    from: e.source.id.to_string(),
                    to: e.destination.id.to_string(),
                    weight: e.weight,
                })
                .collect(),
        }
    }
}

impl TryFrom<GraphDocument> for Graph {
    type Error = GraphError;

    /// Builds the graph, failing on the first duplicate or dangling entry.
    fn try_from(doc: GraphDocument) -> Result<Self, Self::Error> {
        let mut graph = Graph::new();
        for v in doc.vertices {
            graph.add_vertex_at(v.id, v.x, v.y)?;
        }
        for e in doc.edges {
            graph.add_weighted_edge(&e.from, &e.to, e.weight)?;
        }
        Ok(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> GraphDocument {
        GraphDocument {
            vertices: ["B", "A"]
                .iter()
                .map(|id| VertexDocument {
                    id: id.to_string(),
                    x: 0.0,
                    y: 0.0,
                })
                .collect(),
            edges: vec![EdgeDocument::unweighted("B", "A")],
        }
    }

    #[test]
    fn graph_order_is_canonical() {
        let graph = Graph::try_from(doc()).unwrap();
        let back = GraphDocument::from(&graph);
        assert_eq!(back.vertices[0].id, "A");
        assert_eq!(back.edges, vec![EdgeDocument::unweighted("B", "A")]);
    }

    #[test]
    fn dangling_edge_rejected() {
        let mut bad = doc();
        bad.edges.push(EdgeDocument::unweighted("A", "Z"));
        assert_eq!(
            Graph::try_from(bad).unwrap_err(),
            GraphError::VertexNotFound("Z".into())
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn weight_defaults_when_omitted() {
        let json = r#"{"vertices":[{"id":"A"},{"id":"B"}],"edges":[{"from":"A","to":"B"}]}"#;
        let doc: GraphDocument = serde_json::from_str(json).unwrap();
        assert_eq!(doc.edges[0].weight, 1.0);
        let graph = Graph::try_from(doc).unwrap();
        assert!(graph.contains_edge("A", "B"));
    }
}
