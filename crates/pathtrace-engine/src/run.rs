//! Stateful run facade: set a graph and a start vertex, then run.

use pathtrace_graph::{Graph, GraphDocument};
use tracing::info;

use crate::algorithm::Algorithm;
use crate::error::{EngineError, Result};
use crate::trace::{Step, Trace};

/// One algorithm bound to a graph snapshot and a start vertex.
///
/// Every [`run`](Self::run) discards the previous trace and regenerates
/// it from scratch, so running twice over the same inputs yields identical
/// steps.
#[derive(Debug, Clone, Default)]
pub struct AlgorithmRun {
    algorithm: Algorithm,
    graph: Option<Graph>,
    start: Option<String>,
    trace: Option<Trace>,
}

impl AlgorithmRun {
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            ..Self::default()
        }
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Switch algorithm. The current trace is dropped.
    pub fn set_algorithm(&mut self, algorithm: Algorithm) {
        self.algorithm = algorithm;
        self.trace = None;
    }

    /// Replace the graph. The current trace is dropped.
    pub fn set_graph(&mut self, graph: Graph) {
        self.graph = Some(graph);
        self.trace = None;
    }

    /// Replace the graph from its plain description.
    pub fn load_document(&mut self, document: GraphDocument) -> Result<()> {
        let graph = Graph::try_from(document)?;
        self.set_graph(graph);
        Ok(())
    }

    pub fn graph(&self) -> Option<&Graph> {
        self.graph.as_ref()
    }

    /// Choose the start vertex. Checked against the graph at run time.
    pub fn set_start_vertex(&mut self, id: impl Into<String>) {
        self.start = Some(id.into());
        self.trace = None;
    }

    pub fn start_vertex(&self) -> Option<&str> {
        self.start.as_deref()
    }

    /// Generate the trace, replacing any previous one.
    pub fn run(&mut self) -> Result<&Trace> {
        self.trace = None;
        let graph = self.graph.as_ref().ok_or(EngineError::NoGraph)?;
        let start = self.start.as_deref().ok_or(EngineError::NoStartVertex)?;
        let trace = self.algorithm.run(graph, start)?;
        info!(
            algorithm = self.algorithm.slug(),
            start,
            steps = trace.len(),
            "run complete"
        );
        Ok(&*self.trace.insert(trace))
    }

    /// Last generated trace.
    pub fn trace(&self) -> Option<&Trace> {
        self.trace.as_ref()
    }

    /// Steps of the last run; empty before the first successful run.
    pub fn steps(&self) -> &[Step] {
        match &self.trace {
            Some(trace) => trace.steps(),
            None => &[],
        }
    }
}
