//! Pathtrace Visualization Server
//!
//! Trace an example graph and serve playback over HTTP and WebSocket.
//!
//! Usage: `pathtrace-vis [example] [algorithm] [start] [port]`. Positional
//! arguments override the `PATHTRACE_*` environment variables.

use pathtrace_engine::Algorithm;
use pathtrace_vis::{VisConfig, VisServer};
use std::env;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "pathtrace_vis=info,pathtrace_engine=info,pathtrace_graph=warn".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Parse command line args
    let args: Vec<String> = env::args().collect();
    let mut config = VisConfig::from_env();

    if let Some(example) = args.get(1) {
        config.example = example.clone();
    }
    if let Some(algorithm) = args.get(2) {
        config.algorithm = algorithm.parse::<Algorithm>()?;
    }
    if let Some(start) = args.get(3) {
        config.start = Some(start.clone());
    }
    if let Some(port) = args.get(4) {
        config.addr.set_port(port.parse()?);
    }

    println!("Pathtrace Visualizer");
    println!("====================");
    println!();
    println!("Example:   {}", config.example);
    println!("Algorithm: {}", config.algorithm);

    let server = VisServer::bootstrap(&config).await?;
    let status = server.playback().status().await?;

    println!("Steps:     {}", status.total_steps);
    println!();
    println!("Serving playback on http://{}", config.addr);
    println!("Connect a client to /ws to follow the trace.");
    println!();

    server.serve(config.addr).await?;

    Ok(())
}
