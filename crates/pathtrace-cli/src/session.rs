//! Interactive session state and command execution.

use std::fmt::Write as _;

use pathtrace_engine::{format_number, Algorithm, AlgorithmRun, EdgeClass, Trace, VertexClass};
use pathtrace_graph::{example, Graph, EXAMPLES};
use pathtrace_vis::StepView;
use tracing::{debug, info};

use crate::command::{Command, HELP};
use crate::error::{CliError, Result};

/// What the caller should do after a command.
#[derive(Debug, Clone)]
pub enum Reply {
    /// Print this text
    Message(String),
    /// Replay the trace, optionally at a specific speed multiplier
    Play { trace: Trace, speed: Option<f64> },
    /// End the session
    Quit,
}

impl Reply {
    fn message(text: impl Into<String>) -> Self {
        Self::Message(text.into())
    }
}

/// An editable graph plus the run built from it.
///
/// Edits apply to the session graph only. A generated trace keeps describing
/// the graph it was run on until the next `run`.
#[derive(Debug, Default)]
pub struct Session {
    graph: Graph,
    run: AlgorithmRun,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Session preloaded with a built-in example, starting at its first vertex.
    pub fn with_example(name: &str) -> Result<Self> {
        let mut session = Self::new();
        session.load_example(name)?;
        Ok(session)
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn algorithm(&self) -> Algorithm {
        self.run.algorithm()
    }

    pub fn trace(&self) -> Option<&Trace> {
        self.run.trace()
    }

    /// Parse and execute one line. Blank lines produce an empty message.
    pub fn execute_line(&mut self, line: &str) -> Result<Reply> {
        match Command::parse(line)? {
            Some(command) => self.execute(command),
            None => Ok(Reply::message("")),
        }
    }

    pub fn execute(&mut self, command: Command) -> Result<Reply> {
        debug!(?command, "executing");
        let reply = match command {
            Command::Help => Reply::message(HELP),
            Command::Quit => Reply::Quit,
            Command::Examples => Reply::message(EXAMPLES.join("\n")),
            Command::Algorithms => Reply::message(
                Algorithm::ALL
                    .iter()
                    .map(|a| format!("{:<14}{}", a.slug(), a.name()))
                    .collect::<Vec<_>>()
                    .join("\n"),
            ),

            Command::New => {
                self.graph = Graph::new();
                Reply::message("Empty graph.")
            }
            Command::Example(name) => {
                self.load_example(&name)?;
                Reply::message(format!(
                    "Loaded {name}: {} vertices, {} edges.",
                    self.graph.vertex_count(),
                    self.graph.edge_count()
                ))
            }
            Command::Show => {
                if self.graph.is_empty() {
                    Reply::message("(empty graph)")
                } else {
                    Reply::message(self.graph.to_string().trim_end())
                }
            }

            Command::AddVertex { id, at } => {
                match at {
                    Some((x, y)) => self.graph.add_vertex_at(id.as_str(), x, y)?,
                    None => self.graph.add_vertex(id.as_str())?,
                };
                Reply::message(format!("Added vertex {id}."))
            }
            Command::RemoveVertex(id) => {
                self.graph.remove_vertex(&id)?;
                Reply::message(format!("Removed vertex {id}."))
            }
            Command::RenameVertex { from, to } => {
                self.graph.rename_vertex(&from, to.as_str())?;
                if self.run.start_vertex() == Some(from.as_str()) {
                    self.run.set_start_vertex(to.as_str());
                }
                Reply::message(format!("Renamed {from} to {to}."))
            }
            Command::AddEdge { from, to, weight } => {
                match weight {
                    Some(weight) => self.graph.add_weighted_edge(&from, &to, weight)?,
                    None => self.graph.add_edge(&from, &to)?,
                };
                Reply::message(format!("Added edge {from} -> {to}."))
            }
            Command::RemoveEdge { from, to } => {
                self.graph.remove_edge(&from, &to)?;
                Reply::message(format!("Removed edge {from} -> {to}."))
            }
            Command::SetWeight { from, to, weight } => {
                self.graph.set_edge_weight(&from, &to, weight)?;
                Reply::message(format!("Weight of {from} -> {to} is now {weight}."))
            }

            Command::SelectAlgorithm(algorithm) => {
                self.run.set_algorithm(algorithm);
                Reply::message(format!("Algorithm: {}.", algorithm.name()))
            }
            Command::Start(id) => {
                self.run.set_start_vertex(id.as_str());
                Reply::message(format!("Start vertex: {id}."))
            }
            Command::Run => {
                self.run.set_graph(self.graph.clone());
                let trace = self.run.run()?;
                info!(steps = trace.len(), "trace ready");
                Reply::message(summary(trace))
            }
            Command::Steps => {
                let trace = self.require_trace()?;
                let mut out = String::new();
                for (index, step) in trace.steps().iter().enumerate() {
                    let first = step.description.lines().next().unwrap_or_default();
                    let _ = writeln!(out, "{index:>4}  [{}] {first}", step.line);
                }
                Reply::message(out.trim_end())
            }
            Command::Step(index) => {
                let trace = self.require_trace()?;
                let step = trace.step(index).ok_or_else(|| {
                    CliError::Usage(format!("step {index} out of range 0..{}", trace.len()))
                })?;
                Reply::message(render_step(trace, &StepView::new(index, step)))
            }
            Command::Distances => {
                let trace = self.require_trace()?;
                Reply::message(distances(trace))
            }
            Command::Pseudocode => Reply::message(
                self.algorithm()
                    .pseudocode()
                    .iter()
                    .enumerate()
                    .map(|(i, line)| format!("{i}  {line}"))
                    .collect::<Vec<_>>()
                    .join("\n"),
            ),
            Command::Play { speed } => Reply::Play {
                trace: self.require_trace()?.clone(),
                speed,
            },
        };
        Ok(reply)
    }

    fn load_example(&mut self, name: &str) -> Result<()> {
        let graph = example(name)
            .ok_or_else(|| CliError::Usage(format!("unknown example {name}; one of {}", EXAMPLES.join(", "))))?;
        if let Some(first) = graph.vertices().next() {
            self.run.set_start_vertex(first.id);
        }
        self.graph = graph;
        Ok(())
    }

    fn require_trace(&self) -> Result<&Trace> {
        self.run.trace().ok_or(CliError::NoTrace)
    }
}

fn summary(trace: &Trace) -> String {
    format!(
        "{} from {}: {} steps.\n{}",
        trace.algorithm().name(),
        trace.start(),
        trace.len(),
        distances(trace)
    )
}

fn distances(trace: &Trace) -> String {
    let Some(state) = trace.final_state() else {
        return String::new();
    };
    let universe = trace.universe();
    (0..universe.vertex_count())
        .map(|v| format!("{}: {}", universe.id(v), format_number(state.distance(v))))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Multi-line rendering of one step: position, pseudocode line, description
/// and every non-default mark.
pub fn render_step(trace: &Trace, view: &StepView) -> String {
    let universe = trace.universe();
    let pseudocode = trace.algorithm().pseudocode();
    let mut out = String::new();
    let _ = writeln!(
        out,
        "[{}/{}] {}",
        view.index,
        trace.len().saturating_sub(1),
        pseudocode.get(view.line).copied().unwrap_or_default()
    );
    for line in view.description.lines() {
        let _ = writeln!(out, "    {line}");
    }

    let mut vertices = Vec::new();
    for v in 0..universe.vertex_count() {
        let mark = match view.state.vertex(v) {
            VertexClass::Default => "",
            VertexClass::Highlighted => "*",
            VertexClass::Traversed => "+",
            VertexClass::Unqueued => "~",
        };
        vertices.push(format!("{}{mark}={}", universe.id(v), format_number(view.state.distance(v))));
    }
    let _ = writeln!(out, "  vertices: {}", vertices.join(" "));

    let marked: Vec<String> = universe
        .edges()
        .iter()
        .enumerate()
        .filter_map(|(e, edge)| {
            let mark = match view.state.edge(e) {
                EdgeClass::Default => return None,
                EdgeClass::Highlighted => "*",
                EdgeClass::Traversed => "+",
                EdgeClass::Useless => "x",
            };
            Some(format!("{}->{}{mark}", universe.id(edge.from), universe.id(edge.to)))
        })
        .collect();
    if !marked.is_empty() {
        let _ = writeln!(out, "  edges: {}", marked.join(" "));
    }
    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(reply: Reply) -> String {
        match reply {
            Reply::Message(text) => text,
            other => panic!("expected a message, got {other:?}"),
        }
    }

    fn run_script(session: &mut Session, script: &str) -> Vec<String> {
        script
            .lines()
            .map(|line| message(session.execute_line(line).unwrap()))
            .collect()
    }

    #[test]
    fn build_and_trace_by_hand() {
        let mut session = Session::new();
        run_script(
            &mut session,
            "vertex add A\nvertex add B\nvertex add C\n\
             edge add A B\nedge add B C\nedge add A C 5\n\
             algo dijkstra\nstart A",
        );
        let out = message(session.execute_line("run").unwrap());
        assert!(out.starts_with("Dijkstra from A:"));
        assert!(out.contains("C: 2"));
        assert_eq!(session.trace().unwrap().distance("C"), Some(2.0));
    }

    #[test]
    fn bfs_counts_hops_and_warns() {
        let mut session = Session::new();
        run_script(
            &mut session,
            "vertex add A\nvertex add B\nvertex add C\n\
             edge add A B\nedge add B C\nedge add A C 5\nstart A\nrun",
        );
        let trace = session.trace().unwrap();
        assert_eq!(trace.distance("C"), Some(1.0));
        let first = message(session.execute_line("step 0").unwrap());
        assert!(first.contains("[0/"));
        assert!(first.to_lowercase().contains("weight"));
    }

    #[test]
    fn example_sets_start_vertex() {
        let mut session = Session::with_example("cp4_10_dw").unwrap();
        session.execute_line("algo dijkstra-pq").unwrap();
        let out = message(session.execute_line("run").unwrap());
        assert!(out.contains("from 0"));
        assert_eq!(session.trace().unwrap().distance("2"), Some(6.0));
    }

    #[test]
    fn rename_follows_start_vertex() {
        let mut session = Session::with_example("cp4_10_dw").unwrap();
        session.execute_line("vertex rename 0 S").unwrap();
        session.execute_line("run").unwrap();
        assert_eq!(session.trace().unwrap().start(), "S");
    }

    #[test]
    fn edits_do_not_touch_existing_trace() {
        let mut session = Session::with_example("cp4_10_dw").unwrap();
        session.execute_line("run").unwrap();
        let before = session.trace().unwrap().len();
        session.execute_line("vertex remove 4").unwrap();
        assert_eq!(session.trace().unwrap().len(), before);
        assert_eq!(session.trace().unwrap().universe().vertex_count(), 5);
        assert_eq!(session.graph().vertex_count(), 4);
    }

    #[test]
    fn errors_leave_session_usable() {
        let mut session = Session::new();
        assert!(matches!(session.execute_line("steps"), Err(CliError::NoTrace)));
        assert!(matches!(
            session.execute_line("run"),
            Err(CliError::Engine(_))
        ));
        session.execute_line("vertex add A").unwrap();
        assert!(matches!(
            session.execute_line("vertex add A"),
            Err(CliError::Graph(_))
        ));
        assert!(matches!(
            session.execute_line("edge add A Z"),
            Err(CliError::Graph(_))
        ));
        session.execute_line("start Z").unwrap();
        assert!(session.execute_line("run").is_err());
        session.execute_line("start A").unwrap();
        let out = message(session.execute_line("run").unwrap());
        assert!(out.contains("A: 0"));
    }

    #[test]
    fn infinite_weights_never_reach_the_graph() {
        let mut session = Session::new();
        run_script(&mut session, "vertex add A\nvertex add B");
        assert!(matches!(
            session.execute_line("edge add A B -inf"),
            Err(CliError::Usage(_))
        ));
        assert_eq!(session.graph().edge_count(), 0);
        run_script(&mut session, "edge add A B -3\nstart A\nalgo bellman-ford\nrun");
        let out = message(session.execute_line("distances").unwrap());
        assert_eq!(out, "A: 0\nB: -3");
    }

    #[test]
    fn unreachable_vertices_show_inf() {
        let mut session = Session::new();
        run_script(&mut session, "vertex add A\nvertex add B\nstart A\nalgo bellman-ford\nrun");
        let out = message(session.execute_line("distances").unwrap());
        assert_eq!(out, "A: 0\nB: Inf");
    }

    #[test]
    fn play_hands_back_trace() {
        let mut session = Session::with_example("cp4_10_dw").unwrap();
        assert!(matches!(session.execute_line("play"), Err(CliError::NoTrace)));
        session.execute_line("run").unwrap();
        match session.execute_line("play 1.5").unwrap() {
            Reply::Play { trace, speed } => {
                assert_eq!(speed, Some(1.5));
                assert!(!trace.is_empty());
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(session.execute_line("quit").unwrap(), Reply::Quit));
    }

    #[test]
    fn step_listing_covers_trace() {
        let mut session = Session::with_example("cp4_16_dw_dag").unwrap();
        session.execute_line("run").unwrap();
        let len = session.trace().unwrap().len();
        let listing = message(session.execute_line("steps").unwrap());
        assert_eq!(listing.lines().count(), len);
        assert!(matches!(
            session.execute_line(&format!("step {len}")),
            Err(CliError::Usage(_))
        ));
    }
}
