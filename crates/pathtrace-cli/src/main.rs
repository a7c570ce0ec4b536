//! pathtrace CLI
//!
//! Build graphs, trace shortest-path algorithms and replay the steps.
//!
//! Usage:
//!   pathtrace                      interactive session
//!   pathtrace <script>             run the commands in a file
//!   pathtrace -e <example>         interactive session with an example loaded
//!   pathtrace help

use std::io::Write;

use pathtrace_cli::{play_trace, Reply, Session, HELP};
use pathtrace_vis::PlaybackConfig;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn print_usage() {
    eprintln!("pathtrace - Trace BFS, Dijkstra and Bellman-Ford step by step");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  pathtrace                  Interactive session");
    eprintln!("  pathtrace <script>         Run the commands in a file, then exit");
    eprintln!("  pathtrace -e <example>     Interactive session with an example loaded");
    eprintln!("  pathtrace help             Show this help");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("{HELP}");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  PATHTRACE_BASE_INTERVAL_MS  Delay between steps at 1x (default: 1000)");
    eprintln!("  PATHTRACE_SPEED            Default playback multiplier (default: 1)");
    eprintln!("  RUST_LOG                   Log filter (default: warn)");
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = std::env::args().collect();
    let playback = PlaybackConfig::from_env();

    match args.get(1).map(String::as_str) {
        None => {
            repl(Session::new(), playback).await;
        }
        Some("help" | "--help" | "-h") => {
            print_usage();
        }
        Some("-e" | "--example") => {
            let Some(name) = args.get(2) else {
                print_usage();
                std::process::exit(1);
            };
            match Session::with_example(name) {
                Ok(session) => repl(session, playback).await,
                Err(e) => {
                    eprintln!("Error: {e}");
                    std::process::exit(1);
                }
            }
        }
        Some(path) => {
            let script = match std::fs::read_to_string(path) {
                Ok(script) => script,
                Err(e) => {
                    eprintln!("Error: cannot read {path}: {e}");
                    std::process::exit(1);
                }
            };
            if !run_script(&script, playback).await {
                std::process::exit(1);
            }
        }
    }
}

/// Run every line; stop at the first failing command.
async fn run_script(script: &str, playback: PlaybackConfig) -> bool {
    let mut session = Session::new();
    for (number, line) in script.lines().enumerate() {
        match session.execute_line(line) {
            Ok(reply) => {
                if !handle(reply, &playback).await {
                    break;
                }
            }
            Err(e) => {
                eprintln!("line {}: {e}", number + 1);
                return false;
            }
        }
    }
    true
}

async fn repl(mut session: Session, playback: PlaybackConfig) {
    println!("pathtrace - type `help` for commands");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        let _ = std::io::stdout().flush();
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                eprintln!("Error: {e}");
                break;
            }
        };
        match session.execute_line(&line) {
            Ok(reply) => {
                if !handle(reply, &playback).await {
                    break;
                }
            }
            Err(e) => eprintln!("Error: {e}"),
        }
    }
}

/// Act on a reply. Returns false when the session should end.
async fn handle(reply: Reply, playback: &PlaybackConfig) -> bool {
    match reply {
        Reply::Message(text) => {
            if !text.is_empty() {
                println!("{text}");
            }
            true
        }
        Reply::Play { trace, speed } => {
            let playing = play_trace(&trace, playback.clone(), speed, |step| println!("{step}\n"));
            tokio::select! {
                result = playing => {
                    if let Err(e) = result {
                        eprintln!("Error: {e}");
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    println!("(playback interrupted)");
                }
            }
            true
        }
        Reply::Quit => false,
    }
}
