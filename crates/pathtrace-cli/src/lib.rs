//! Pathtrace command line
//!
//! A small line-oriented language for editing a graph, generating a trace and
//! stepping through it:
//!
//! ```text
//! example cp4_10_dw
//! algo dijkstra
//! start 0
//! run
//! step 3
//! play 1.5
//! ```
//!
//! [`Session`] executes one command at a time and never reads the terminal
//! itself; the `pathtrace` binary owns input, output and timed playback.

pub mod command;
pub mod error;
pub mod play;
pub mod session;

pub use command::{Command, HELP};
pub use error::{CliError, Result};
pub use play::play_trace;
pub use session::{render_step, Reply, Session};
