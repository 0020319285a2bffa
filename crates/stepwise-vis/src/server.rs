//! Axum control surface with WebSocket frame streaming.
//!
//! No page is served; a renderer drives the run over the REST routes or the
//! `/ws` socket and redraws from the frames pushed after every step.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use stepwise_graph::{EvaluatorKind, Graph, GraphAlgorithm, NodeId};
use stepwise_sort::SortAlgorithm;
use tokio::sync::broadcast::error::RecvError;
use tower_http::cors::CorsLayer;
use tracing::{debug, info, warn};

use crate::config::{RunConfig, VisConfig};
use crate::error::Error;
use crate::export::{metrics_csv, SessionExport};
use crate::playback::{Frame, PlaybackState, PlaybackStatus};
use crate::scheduler::Session;

/// Shared application state.
pub struct AppState {
    session: Session,
    config: VisConfig,
}

/// Visualization server.
pub struct VisServer {
    state: Arc<AppState>,
}

type ApiResult<T> = Result<Json<T>, (StatusCode, String)>;

fn reject(err: Error) -> (StatusCode, String) {
    let status = match &err {
        Error::Graph(_) | Error::Sort(_) | Error::InvalidSpeed(_) | Error::InputTooLarge { .. } => {
            StatusCode::BAD_REQUEST
        }
        Error::NotConfigured => StatusCode::CONFLICT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    warn!(%status, error = %err, "request rejected");
    (status, err.to_string())
}

impl VisServer {
    /// Create a server around an existing session.
    pub fn new(session: Session, config: VisConfig) -> Self {
        Self {
            state: Arc::new(AppState { session, config }),
        }
    }

    /// Handle to the session the server drives.
    pub fn session(&self) -> &Session {
        &self.state.session
    }

    /// Build the router for the server.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/api/status", get(status_handler))
            .route("/api/frame", get(frame_handler))
            .route("/api/playback", get(playback_status_handler))
            .route("/api/playback/start", post(start_handler))
            .route("/api/playback/pause", post(pause_handler))
            .route("/api/playback/step", post(step_handler))
            .route("/api/playback/reset", post(reset_handler))
            .route("/api/session/graph", post(graph_session_handler))
            .route("/api/session/sort", post(sort_session_handler))
            .route("/api/export/json", get(export_json_handler))
            .route("/api/export/csv", get(export_csv_handler))
            // WebSocket for per-step frames
            .route("/ws", get(ws_handler))
            .layer(CorsLayer::permissive())
            .with_state(self.state.clone())
    }

    /// Run the server on the configured port.
    pub async fn serve(self) -> Result<(), std::io::Error> {
        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], self.state.config.port));
        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!("Stepwise server running on http://localhost:{}", self.state.config.port);
        axum::serve(listener, self.router()).await
    }
}

/// Server status response.
#[derive(Serialize)]
struct StatusResponse {
    status: &'static str,
    state: PlaybackState,
    configured: bool,
    algorithm: Option<String>,
}

async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let playback = state.session.status().await;
    Json(StatusResponse {
        status: "ok",
        state: playback.state,
        configured: playback.configured,
        algorithm: playback.algorithm,
    })
}

async fn frame_handler(State(state): State<Arc<AppState>>) -> Json<Frame> {
    Json(state.session.frame().await)
}

async fn playback_status_handler(State(state): State<Arc<AppState>>) -> Json<PlaybackStatus> {
    Json(state.session.status().await)
}

async fn start_handler(State(state): State<Arc<AppState>>) -> ApiResult<PlaybackStatus> {
    state.session.start().await.map(Json).map_err(reject)
}

async fn pause_handler(State(state): State<Arc<AppState>>) -> Json<PlaybackStatus> {
    Json(state.session.pause().await)
}

async fn step_handler(State(state): State<Arc<AppState>>) -> ApiResult<Frame> {
    match state.session.step().await.map_err(reject)? {
        Some(frame) => Ok(Json(frame)),
        // ignored while running or complete; report where things stand
        None => Ok(Json(state.session.frame().await)),
    }
}

async fn reset_handler(State(state): State<Arc<AppState>>) -> ApiResult<Frame> {
    state.session.reset().await.map(Json).map_err(reject)
}

#[derive(Deserialize)]
struct GraphSessionRequest {
    graph: Graph,
    start_node: NodeId,
    target_node: NodeId,
    algorithm: String,
    /// Defaults to a random evaluator seeded from the server config.
    evaluator: Option<EvaluatorKind>,
    speed_ms: Option<u64>,
}

async fn graph_session_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GraphSessionRequest>,
) -> ApiResult<Frame> {
    let algorithm: GraphAlgorithm = req.algorithm.parse().map_err(|e| reject(Error::Graph(e)))?;
    let config = RunConfig::graph(
        req.graph,
        req.start_node,
        req.target_node,
        algorithm,
        req.speed_ms.unwrap_or(state.config.graph_speed_ms),
    )
    .with_evaluator(req.evaluator.unwrap_or(EvaluatorKind::SeededRandom {
        seed: state.config.seed,
    }));
    state.session.configure(config).await.map(Json).map_err(reject)
}

#[derive(Deserialize)]
struct SortSessionRequest {
    array: Vec<i64>,
    algorithm: String,
    speed_ms: Option<u64>,
}

async fn sort_session_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SortSessionRequest>,
) -> ApiResult<Frame> {
    let algorithm: SortAlgorithm = req.algorithm.parse().map_err(|e| reject(Error::Sort(e)))?;
    let config = RunConfig::sort(req.array, algorithm, req.speed_ms.unwrap_or(state.config.sort_speed_ms));
    state.session.configure(config).await.map(Json).map_err(reject)
}

async fn export_json_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let export = SessionExport::new(state.session.metrics().await);
    export
        .to_json()
        .map(|body| ([(header::CONTENT_TYPE, "application/json")], body))
        .map_err(reject)
}

async fn export_csv_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let metrics = state.session.metrics().await;
    metrics_csv(&metrics)
        .map(|body| ([(header::CONTENT_TYPE, "text/csv")], body))
        .map_err(reject)
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws(socket, state))
}

async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
    info!("WebSocket client connected");
    let mut frames = state.session.subscribe();

    let initial = WsResponse::Frame(state.session.frame().await);
    if send_response(&mut socket, &initial).await.is_err() {
        return;
    }

    loop {
        tokio::select! {
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let response = match serde_json::from_str::<WsCommand>(&text) {
                            Ok(cmd) => handle_ws_command(&state, cmd).await,
                            Err(e) => WsResponse::Error { message: e.to_string() },
                        };
                        if send_response(&mut socket, &response).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        info!("WebSocket client disconnected");
                        break;
                    }
                    Some(Err(e)) => {
                        warn!("WebSocket error: {}", e);
                        break;
                    }
                    _ => {}
                }
            }
            frame = frames.recv() => {
                match frame {
                    Ok(frame) => {
                        if send_response(&mut socket, &WsResponse::Frame(frame)).await.is_err() {
                            break;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        debug!(skipped, "WebSocket client lagging");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        }
    }
}

async fn send_response(socket: &mut WebSocket, response: &WsResponse) -> Result<(), axum::Error> {
    match serde_json::to_string(response) {
        Ok(json) => socket.send(Message::Text(json.into())).await,
        Err(e) => {
            warn!("Failed to serialize response: {}", e);
            Ok(())
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WsCommand {
    GetFrame,
    GetStatus,
    Start,
    Pause,
    Step,
    Reset,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WsResponse {
    Frame(Frame),
    Status(PlaybackStatus),
    Error { message: String },
}

async fn handle_ws_command(state: &Arc<AppState>, cmd: WsCommand) -> WsResponse {
    let session = &state.session;
    // stepped and reset frames reach the client through the broadcast
    let outcome = match cmd {
        WsCommand::Start => session.start().await.map(|_| ()),
        WsCommand::Step => session.step().await.map(|_| ()),
        WsCommand::Reset => session.reset().await.map(|_| ()),
        WsCommand::Pause => {
            session.pause().await;
            Ok(())
        }
        WsCommand::GetFrame | WsCommand::GetStatus => Ok(()),
    };
    match outcome {
        Err(e) => WsResponse::Error { message: e.to_string() },
        Ok(()) if cmd == WsCommand::GetFrame => WsResponse::Frame(session.frame().await),
        Ok(()) => WsResponse::Status(session.status().await),
    }
}
