//! Axum web server with WebSocket streaming for trace playback.

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use pathtrace_engine::{Algorithm, AlgorithmRun};
use pathtrace_graph::GraphDocument;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tracing::{debug, info, warn};

use crate::config::VisConfig;
use crate::driver::PlaybackHandle;
use crate::error::{Result, VisError};
use crate::events::StepView;
use crate::playback::PlaybackStatus;

/// Shared application state.
pub struct AppState {
    run: RwLock<AlgorithmRun>,
    playback: PlaybackHandle,
}

/// Visualization server.
pub struct VisServer {
    state: Arc<AppState>,
}

impl VisServer {
    /// Create a server around an existing run and playback actor.
    pub fn new(run: AlgorithmRun, playback: PlaybackHandle) -> Self {
        Self {
            state: Arc::new(AppState {
                run: RwLock::new(run),
                playback,
            }),
        }
    }

    /// Load the configured example, trace it and start playback.
    pub async fn bootstrap(config: &VisConfig) -> Result<Self> {
        let graph = pathtrace_graph::example(&config.example)
            .ok_or_else(|| VisError::InvalidInput(format!("unknown example {:?}", config.example)))?;
        let start = match &config.start {
            Some(start) => start.clone(),
            None => graph
                .vertices()
                .next()
                .map(|v| v.id.to_string())
                .ok_or_else(|| VisError::InvalidInput("example graph is empty".into()))?,
        };

        let mut run = AlgorithmRun::new(config.algorithm);
        run.set_graph(graph);
        run.set_start_vertex(start);
        let steps = run.run()?.shared_steps();

        let playback = PlaybackHandle::spawn(config.playback.clone());
        playback.start(steps).await?;
        Ok(Self::new(run, playback))
    }

    /// Handle to the playback actor.
    pub fn playback(&self) -> &PlaybackHandle {
        &self.state.playback
    }

    /// Build the router for the server.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/api/status", get(status_handler))
            .route("/api/graph", get(graph_handler))
            .route("/api/step", get(step_handler))
            .route("/api/pseudocode", get(pseudocode_handler))
            .route("/api/run", post(run_handler))
            .route("/api/playback", get(playback_status_handler))
            .route("/api/playback/play", post(play_handler))
            .route("/api/playback/pause", post(pause_handler))
            .route("/api/playback/reset", post(reset_handler))
            .route("/api/playback/seek", post(seek_handler))
            .route("/api/playback/speed", post(speed_handler))
            .route("/api/playback/step", post(step_playback_handler))
            // WebSocket for real-time updates
            .route("/ws", get(ws_handler))
            .layer(CorsLayer::permissive())
            .with_state(self.state.clone())
    }

    /// Run the server on the given address.
    pub async fn serve(self, addr: SocketAddr) -> Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!(%addr, "pathtrace server listening");
        axum::serve(listener, self.router()).await?;
        Ok(())
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for VisError {
    fn into_response(self) -> Response {
        let status = match &self {
            VisError::InvalidInput(_) | VisError::Engine(_) => StatusCode::BAD_REQUEST,
            VisError::DriverClosed => StatusCode::SERVICE_UNAVAILABLE,
            VisError::Serialization(_) | VisError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(ErrorResponse { error: self.to_string() })).into_response()
    }
}

/// Server status response.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct StatusResponse {
    status: String,
    algorithm: String,
    start: Option<String>,
    vertex_count: usize,
    edge_count: usize,
    total_steps: usize,
}

async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let run = state.run.read().await;
    Json(StatusResponse {
        status: "ok".to_string(),
        algorithm: run.algorithm().name().to_string(),
        start: run.start_vertex().map(str::to_string),
        vertex_count: run.graph().map_or(0, |g| g.vertex_count()),
        edge_count: run.graph().map_or(0, |g| g.edge_count()),
        total_steps: run.steps().len(),
    })
}

async fn graph_handler(State(state): State<Arc<AppState>>) -> Json<GraphDocument> {
    let run = state.run.read().await;
    Json(run.graph().map(GraphDocument::from).unwrap_or_default())
}

async fn step_handler(State(state): State<Arc<AppState>>) -> Result<Json<Option<StepView>>> {
    Ok(Json(state.playback.current_step().await?))
}

#[derive(Debug, Serialize, Deserialize)]
struct PseudocodeResponse {
    algorithm: String,
    lines: Vec<String>,
}

async fn pseudocode_handler(State(state): State<Arc<AppState>>) -> Json<PseudocodeResponse> {
    let algorithm = state.run.read().await.algorithm();
    Json(PseudocodeResponse {
        algorithm: algorithm.name().to_string(),
        lines: algorithm.pseudocode().iter().map(|l| l.to_string()).collect(),
    })
}

/// Body of `POST /api/run`. Omitted fields keep their current value.
#[derive(Debug, Default, Deserialize)]
struct RunRequest {
    example: Option<String>,
    graph: Option<GraphDocument>,
    algorithm: Option<Algorithm>,
    start: Option<String>,
}

async fn run_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RunRequest>,
) -> Result<Json<PlaybackStatus>> {
    let steps = {
        let mut run = state.run.write().await;
        // The shared run only changes once the new trace exists.
        let mut next = run.clone();
        match (req.example, req.graph) {
            (Some(_), Some(_)) => {
                return Err(VisError::InvalidInput("give either example or graph, not both".into()))
            }
            (Some(name), None) => {
                let graph = pathtrace_graph::example(&name)
                    .ok_or_else(|| VisError::InvalidInput(format!("unknown example {name:?}")))?;
                next.set_graph(graph);
            }
            (None, Some(doc)) => next.load_document(doc)?,
            (None, None) => {}
        }
        if let Some(algorithm) = req.algorithm {
            next.set_algorithm(algorithm);
        }
        if let Some(start) = req.start {
            next.set_start_vertex(start);
        }
        let steps = next.run()?.shared_steps();
        *run = next;
        steps
    };
    debug!(steps = steps.len(), "run requested over http");
    Ok(Json(state.playback.start(steps).await?))
}

async fn playback_status_handler(State(state): State<Arc<AppState>>) -> Result<Json<PlaybackStatus>> {
    Ok(Json(state.playback.status().await?))
}

async fn play_handler(State(state): State<Arc<AppState>>) -> Result<Json<PlaybackStatus>> {
    Ok(Json(state.playback.play().await?))
}

async fn pause_handler(State(state): State<Arc<AppState>>) -> Result<Json<PlaybackStatus>> {
    Ok(Json(state.playback.pause().await?))
}

async fn reset_handler(State(state): State<Arc<AppState>>) -> Result<Json<PlaybackStatus>> {
    Ok(Json(state.playback.reset().await?))
}

#[derive(Deserialize)]
struct SeekRequest {
    index: usize,
}

async fn seek_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SeekRequest>,
) -> Result<Json<PlaybackStatus>> {
    Ok(Json(state.playback.seek(req.index).await?))
}

#[derive(Deserialize)]
struct SpeedRequest {
    multiplier: f64,
}

async fn speed_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SpeedRequest>,
) -> Result<Json<PlaybackStatus>> {
    Ok(Json(state.playback.set_speed(req.multiplier).await?))
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
enum StepDirection {
    Forward,
    Backward,
}

#[derive(Deserialize)]
struct StepRequest {
    direction: StepDirection,
}

async fn step_playback_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<StepRequest>,
) -> Result<Json<PlaybackStatus>> {
    let status = match req.direction {
        StepDirection::Forward => state.playback.step_forward().await?,
        StepDirection::Backward => state.playback.step_backward().await?,
    };
    Ok(Json(status))
}

async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws(socket, state))
}

async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
    info!("WebSocket client connected");
    let mut events = state.playback.subscribe();

    // Initial status and step
    for cmd in [WsCommand::GetStatus, WsCommand::GetStep] {
        let response = handle_ws_command(&state, cmd).await;
        if send_json(&mut socket, &response).await.is_err() {
            return;
        }
    }

    loop {
        tokio::select! {
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let response = match serde_json::from_str::<WsCommand>(&text) {
                            Ok(cmd) => handle_ws_command(&state, cmd).await,
                            Err(e) => WsResponse::Error { error: e.to_string() },
                        };
                        if send_json(&mut socket, &response).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        info!("WebSocket client disconnected");
                        break;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Err(e)) => {
                        warn!("WebSocket error: {}", e);
                        break;
                    }
                    _ => {}
                }
            }
            event = events.recv() => {
                match event {
                    Ok(event) => {
                        if send_json(&mut socket, &event).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "WebSocket client lagging, events dropped");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }
}

async fn send_json<T: Serialize>(socket: &mut WebSocket, value: &T) -> std::result::Result<(), axum::Error> {
    match serde_json::to_string(value) {
        Ok(json) => socket.send(Message::Text(json.into())).await,
        Err(e) => {
            warn!("Failed to serialize WebSocket message: {}", e);
            Ok(())
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WsCommand {
    GetStatus,
    GetStep,
    Play,
    Pause,
    Reset,
    StepForward,
    StepBackward,
    Seek { index: usize },
    Speed { multiplier: f64 },
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WsResponse {
    Status(PlaybackStatus),
    Step { step: Option<StepView> },
    Error { error: String },
}

async fn handle_ws_command(state: &Arc<AppState>, cmd: WsCommand) -> WsResponse {
    let playback = &state.playback;
    let result = match cmd {
        WsCommand::GetStep => {
            return match playback.current_step().await {
                Ok(step) => WsResponse::Step { step },
                Err(e) => WsResponse::Error { error: e.to_string() },
            };
        }
        WsCommand::GetStatus => playback.status().await,
        WsCommand::Play => playback.play().await,
        WsCommand::Pause => playback.pause().await,
        WsCommand::Reset => playback.reset().await,
        WsCommand::StepForward => playback.step_forward().await,
        WsCommand::StepBackward => playback.step_backward().await,
        WsCommand::Seek { index } => playback.seek(index).await,
        WsCommand::Speed { multiplier } => playback.set_speed(multiplier).await,
    };
    match result {
        Ok(status) => WsResponse::Status(status),
        Err(e) => WsResponse::Error { error: e.to_string() },
    }
}
