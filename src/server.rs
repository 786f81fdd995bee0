//! WebSocket transport.
//!
//! Each upgraded socket becomes one anonymous player. Inbound text goes to the
//! [`Arena`]; outbound text arrives on the player's [`ConnectionRegistry`]
//! channel and is written to the socket by a dedicated task.

use crate::arena::Arena;
use crate::config::ArenaConfig;
use crate::notifier::ConnectionRegistry;
use crate::resolver::RockPaperScissors;
use axum::Router;
use axum::extract::State;
use axum::extract::ws::rejection::WebSocketUpgradeRejection;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// The arena as served over WebSockets.
pub type RpsArena = Arena<RockPaperScissors, ConnectionRegistry>;

/// Shared handles for every connection.
#[derive(Clone)]
pub struct AppState {
    arena: Arc<RpsArena>,
    registry: Arc<ConnectionRegistry>,
}

impl AppState {
    /// Bundles the arena with the registry it notifies through.
    pub fn new(arena: Arc<RpsArena>, registry: Arc<ConnectionRegistry>) -> Self {
        Self { arena, registry }
    }

    /// Returns the arena.
    pub fn arena(&self) -> &RpsArena {
        &self.arena
    }
}

/// Builds the HTTP router: a WebSocket endpoint at `/`, 404 elsewhere.
#[instrument(skip(state))]
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(upgrade))
        .fallback(not_found)
        .with_state(state)
}

/// Binds the configured address and serves until Ctrl+C.
#[instrument(skip_all, fields(host = %config.host(), port = config.port()))]
pub async fn serve(config: &ArenaConfig, state: AppState) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind((config.host().as_str(), *config.port())).await?;
    info!("Listening on ws://{}:{}/", config.host(), config.port());

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

async fn upgrade(
    State(state): State<AppState>,
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Response {
    match ws {
        Ok(ws) => ws.on_upgrade(move |socket| handle_socket(socket, state)),
        Err(rejection) => {
            debug!(error = %rejection, "Plain HTTP request on WebSocket endpoint");
            not_found().await.into_response()
        }
    }
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "Not found")
}

#[instrument(skip_all, fields(player_id = tracing::field::Empty))]
async fn handle_socket(socket: WebSocket, state: AppState) {
    let player_id = Uuid::new_v4().to_string();
    tracing::Span::current().record("player_id", player_id.as_str());
    info!("Connection opened");

    let mut outbound = state.registry.register(&player_id);
    let (mut sink, mut stream) = socket.split();

    let writer = tokio::spawn(async move {
        while let Some(text) = outbound.recv().await {
            if let Err(e) = sink.send(Message::Text(text.into())).await {
                debug!(error = %e, "Socket write failed");
                break;
            }
        }
        if let Err(e) = sink.close().await {
            debug!(error = %e, "Socket close failed");
        }
    });

    state.arena.handle_connect(&player_id);

    while let Some(frame) = stream.next().await {
        match frame {
            Ok(Message::Text(text)) => state.arena.handle_message(&player_id, text.as_str()),
            Ok(Message::Binary(bytes)) => {
                let text = String::from_utf8_lossy(&bytes);
                state.arena.handle_message(&player_id, &text);
            }
            Ok(Message::Close(_)) => break,
            Ok(Message::Ping(_) | Message::Pong(_)) => {}
            Err(e) => {
                warn!(error = %e, "Socket read failed");
                break;
            }
        }
    }

    state.arena.handle_disconnect(&player_id);
    state.registry.unregister(&player_id);
    if let Err(e) = writer.await {
        debug!(error = %e, "Writer task ended abnormally");
    }
    info!("Connection closed");
}
