//! Line-oriented command grammar.

use pathtrace_engine::Algorithm;

use crate::error::{CliError, Result};

/// One parsed command line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Help,
    /// List built-in example graphs
    Examples,
    /// List algorithm names
    Algorithms,
    /// Start from an empty graph
    New,
    /// Replace the graph with a built-in example
    Example(String),
    /// Print the graph as an adjacency listing
    Show,
    AddVertex { id: String, at: Option<(f64, f64)> },
    RemoveVertex(String),
    RenameVertex { from: String, to: String },
    AddEdge { from: String, to: String, weight: Option<f64> },
    RemoveEdge { from: String, to: String },
    SetWeight { from: String, to: String, weight: f64 },
    SelectAlgorithm(Algorithm),
    Start(String),
    /// Generate the trace
    Run,
    /// One line per step
    Steps,
    /// Full view of one step
    Step(usize),
    /// Final distances of the last trace
    Distances,
    Pseudocode,
    /// Timed playback to the terminal
    Play { speed: Option<f64> },
    Quit,
}

impl Command {
    /// Parse a line. Blank lines and `#` comments yield `None`.
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }
        let words: Vec<&str> = line.split_whitespace().collect();
        let command = match words.as_slice() {
            ["help" | "?"] => Self::Help,
            ["examples"] => Self::Examples,
            ["algorithms"] => Self::Algorithms,
            ["new"] => Self::New,
            ["example", name] | ["graph", "example", name] => Self::Example(name.to_string()),
            ["show"] | ["graph"] => Self::Show,

            ["vertex", "add", id] => Self::AddVertex {
                id: id.to_string(),
                at: None,
            },
            ["vertex", "add", id, x, y] => Self::AddVertex {
                id: id.to_string(),
                at: Some((number(x)?, number(y)?)),
            },
            ["vertex", "remove", id] => Self::RemoveVertex(id.to_string()),
            ["vertex", "rename", from, to] => Self::RenameVertex {
                from: from.to_string(),
                to: to.to_string(),
            },

            ["edge", "add", from, to] => Self::AddEdge {
                from: from.to_string(),
                to: to.to_string(),
                weight: None,
            },
            ["edge", "add", from, to, weight] => Self::AddEdge {
                from: from.to_string(),
                to: to.to_string(),
                weight: Some(number(weight)?),
            },
            ["edge", "remove", from, to] => Self::RemoveEdge {
                from: from.to_string(),
                to: to.to_string(),
            },
            ["weight", from, to, weight] | ["edge", "weight", from, to, weight] => Self::SetWeight {
                from: from.to_string(),
                to: to.to_string(),
                weight: number(weight)?,
            },

            ["algo" | "algorithm", name] => Self::SelectAlgorithm(name.parse()?),
            ["start", id] => Self::Start(id.to_string()),
            ["run"] => Self::Run,
            ["steps"] => Self::Steps,
            ["step", index] => Self::Step(
                index
                    .parse()
                    .map_err(|_| CliError::Usage(format!("not a step index: {index}")))?,
            ),
            ["distances"] => Self::Distances,
            ["pseudocode"] => Self::Pseudocode,
            ["play"] => Self::Play { speed: None },
            ["play", speed] => Self::Play {
                speed: Some(number(speed)?),
            },
            ["quit" | "exit"] => Self::Quit,

            [first, ..] => {
                return Err(CliError::Usage(format!(
                    "unknown command `{line}`; `{first}` needs different arguments or does not exist (try `help`)"
                )))
            }
            [] => return Ok(None),
        };
        Ok(Some(command))
    }
}

fn number(word: &str) -> Result<f64> {
    match word.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(CliError::Usage(format!("not a finite number: {word}"))),
    }
}

/// Text printed by `help`.
pub const HELP: &str = "\
Graph:
  new                           empty graph
  example <name>                load a built-in graph (see `examples`)
  show                          adjacency listing
  vertex add <id> [x y]         add a vertex
  vertex remove <id>            remove a vertex and its edges
  vertex rename <old> <new>     change a vertex id
  edge add <from> <to> [w]      add an edge (weight 1 by default)
  edge remove <from> <to>       remove an edge
  weight <from> <to> <w>        change an edge weight

Trace:
  algo <name>                   bfs | dijkstra | dijkstra-pq | bellman-ford
  start <id>                    start vertex
  run                           generate the trace
  steps                         list every step
  step <n>                      show one step in full
  distances                     final distances
  pseudocode                    pseudocode of the selected algorithm
  play [speed]                  replay the trace (0.5 | 0.75 | 1 | 1.25 | 1.5)

  help | quit";

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn blank_and_comment_lines() {
        assert_eq!(Command::parse("   ").unwrap(), None);
        assert_eq!(Command::parse("# a comment").unwrap(), None);
    }

    #[test]
    fn edge_forms() {
        assert_eq!(
            Command::parse("edge add A B").unwrap(),
            Some(Command::AddEdge {
                from: "A".into(),
                to: "B".into(),
                weight: None
            })
        );
        assert_eq!(
            Command::parse("edge add A B -2.5").unwrap(),
            Some(Command::AddEdge {
                from: "A".into(),
                to: "B".into(),
                weight: Some(-2.5)
            })
        );
        for word in ["inf", "-inf", "NaN"] {
            assert!(matches!(
                Command::parse(&format!("weight A B {word}")),
                Err(CliError::Usage(_))
            ));
        }
    }

    #[test]
    fn algorithm_names() {
        assert_eq!(
            Command::parse("algo bellman_ford").unwrap(),
            Some(Command::SelectAlgorithm(Algorithm::BellmanFord))
        );
        assert!(matches!(
            Command::parse("algo prim"),
            Err(CliError::Engine(_))
        ));
    }

    #[test]
    fn bad_arguments_are_usage_errors() {
        assert!(matches!(Command::parse("edge add A B heavy"), Err(CliError::Usage(_))));
        assert!(matches!(Command::parse("step -1"), Err(CliError::Usage(_))));
        assert!(matches!(Command::parse("frobnicate"), Err(CliError::Usage(_))));
        assert!(matches!(Command::parse("vertex add"), Err(CliError::Usage(_))));
    }

    proptest! {
        #[test]
        fn arbitrary_lines_never_panic(line in "[ -~]{0,40}") {
            let _ = Command::parse(&line);
        }

        #[test]
        fn weights_round_trip(w in -1e6f64..1e6) {
            let parsed = Command::parse(&format!("weight a b {w}")).unwrap();
            prop_assert_eq!(parsed, Some(Command::SetWeight { from: "a".into(), to: "b".into(), weight: w }));
        }
    }
}
