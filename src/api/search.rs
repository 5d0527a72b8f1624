use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    http::StatusCode,
    response::Response,
    Json,
};
use futures::{Sink, SinkExt, Stream, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::mpsc;
use tower_cookies::Cookies;

use refacademy_portal::auth::Viewer;
use refacademy_portal::models::TabId;
use refacademy_portal::navigation::{can_access, popular_searches, ActiveView};
use refacademy_portal::search::{SearchHost, SearchResult, SearchSurface, SurfaceSnapshot};

use super::{api_error, current_viewer, session_token, ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub struct SelectRequest {
    pub query: String,
    pub destination: String,
}

/// Host for one-shot HTTP searches: navigation goes to the session's view
struct ViewHost {
    view: Arc<ActiveView>,
}

impl SearchHost for ViewHost {
    fn navigate(&self, destination: &TabId) {
        self.view.set(destination);
    }

    fn close(&self) {}
}

/// POST /api/search
pub async fn search(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    Json(req): Json<SearchRequest>,
) -> Json<ApiResponse<Vec<SearchResult>>> {
    let token = session_token(&cookies);
    let viewer = current_viewer(&state, &cookies);
    let space = state.space(&viewer);
    let host = Arc::new(ViewHost {
        view: state.active_view(token.as_deref(), viewer.role),
    });
    let results = space
        .aggregator
        .search(&req.query, viewer.role, space.translations.as_ref(), host)
        .await;
    Json(ApiResponse::success(results))
}

/// GET /api/search/history - the caller's recent searches
pub async fn history(State(state): State<Arc<AppState>>, cookies: Cookies) -> Json<ApiResponse<Vec<String>>> {
    let viewer = current_viewer(&state, &cookies);
    Json(ApiResponse::success(state.space(&viewer).history.load()))
}

/// GET /api/search/popular
pub async fn popular(State(state): State<Arc<AppState>>, cookies: Cookies) -> Json<ApiResponse<Vec<String>>> {
    let viewer = current_viewer(&state, &cookies);
    Json(ApiResponse::success(popular_searches(
        viewer.role,
        state.space(&viewer).translations.as_ref(),
    )))
}

/// POST /api/search/select - the HTTP form of invoking a result:
/// navigate, then remember the query
pub async fn select_result(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    Json(req): Json<SelectRequest>,
) -> ApiResult<Value> {
    let token = session_token(&cookies);
    let viewer = current_viewer(&state, &cookies);
    let destination = TabId::new(req.destination);
    if !can_access(viewer.role, &destination) {
        return Err(api_error(StatusCode::FORBIDDEN, "access denied"));
    }

    state.active_view(token.as_deref(), viewer.role).set(&destination);
    let history = state.space(&viewer).history.record(req.query.trim()).map_err(|e| {
        tracing::error!("Failed to save recent search: {}", e);
        api_error(StatusCode::INTERNAL_SERVER_ERROR, "failed to save recent search")
    })?;
    Ok(Json(ApiResponse::success(json!({
        "active": destination,
        "history": history,
    }))))
}

/// Messages from the browser
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ClientMessage {
    Open,
    Input { text: String },
    Key { key: String },
    Backdrop,
    Select { index: usize },
    Close,
}

/// Messages to the browser
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ServerMessage {
    Snapshot { snapshot: SurfaceSnapshot },
    Navigate { destination: TabId },
    Error { message: String },
}

/// Surface host for a socket: navigation updates the session's view and tells the browser
struct SocketHost {
    view: Arc<ActiveView>,
    events: mpsc::UnboundedSender<ServerMessage>,
}

impl SearchHost for SocketHost {
    fn navigate(&self, destination: &TabId) {
        self.view.set(destination);
        let _ = self.events.send(ServerMessage::Navigate {
            destination: destination.clone(),
        });
    }

    // the surface publishes its own Closed snapshot
    fn close(&self) {}
}

/// GET /api/search/ws - debounced search surface
pub async fn search_ws(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
) -> Response {
    let token = session_token(&cookies);
    let viewer = current_viewer(&state, &cookies);
    let view = state.active_view(token.as_deref(), viewer.role);
    ws.on_upgrade(move |socket: WebSocket| {
        let (sink, stream) = socket.split();
        run_surface(sink, stream, state, viewer, view)
    })
}

/// Drive one search surface from client messages on `stream`, writing
/// snapshots and events to `sink` until the client goes away
async fn run_surface<S, R, E>(
    mut sink: S,
    mut stream: R,
    state: Arc<AppState>,
    viewer: Viewer,
    view: Arc<ActiveView>,
) where
    S: Sink<Message> + Unpin + Send + 'static,
    R: Stream<Item = Result<Message, E>> + Unpin,
{
    let role = viewer.role;
    let space = state.space(&viewer);
    let (events, mut outgoing) = mpsc::unbounded_channel::<ServerMessage>();

    let host = Arc::new(SocketHost {
        view,
        events: events.clone(),
    });
    let surface = SearchSurface::new(
        space.aggregator.clone(),
        space.translations.clone(),
        host,
        state.config.debounce(),
    );

    let mut snapshots = surface.subscribe();
    let writer = tokio::spawn(async move {
        loop {
            // events first: a navigation precedes the snapshot of the closing surface
            let message = tokio::select! {
                biased;
                Some(message) = outgoing.recv() => message,
                changed = snapshots.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let snapshot = snapshots.borrow_and_update().clone();
                    ServerMessage::Snapshot { snapshot }
                }
                else => break,
            };
            let text = match serde_json::to_string(&message) {
                Ok(text) => text,
                Err(e) => {
                    tracing::error!("Failed to encode search event: {}", e);
                    continue;
                }
            };
            if sink.send(Message::Text(text)).await.is_err() {
                break;
            }
        }
    });

    tracing::debug!("Search socket opened ({})", role);
    while let Some(Ok(message)) = stream.next().await {
        let text = match message {
            Message::Text(text) => text,
            Message::Close(_) => break,
            _ => continue,
        };
        match serde_json::from_str::<ClientMessage>(&text) {
            Ok(ClientMessage::Open) => surface.open(role),
            Ok(ClientMessage::Input { text }) => surface.input(&text),
            Ok(ClientMessage::Key { key }) => surface.key(&key),
            Ok(ClientMessage::Backdrop) => surface.backdrop_click(),
            Ok(ClientMessage::Close) => surface.close(),
            Ok(ClientMessage::Select { index }) => {
                if !surface.select(index) {
                    let _ = events.send(ServerMessage::Error {
                        message: format!("no result at index {}", index),
                    });
                }
            }
            Err(e) => {
                let _ = events.send(ServerMessage::Error {
                    message: format!("invalid message: {}", e),
                });
            }
        }
    }

    drop(surface);
    writer.abort();
    tracing::debug!("Search socket closed ({})", role);
}
