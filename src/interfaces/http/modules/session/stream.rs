//! Streaming session snapshots over WebSocket
//!
//! Each connection owns one `SessionContext`. Every snapshot change
//! (sign-out elsewhere, joining a company, token refresh) is pushed to the
//! client as a `SessionView` JSON text frame.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::select;
use tracing::{debug, error, info, warn};

use super::dto::SessionView;
use crate::application::session::SessionContext;
use crate::domain::session::SessionSnapshot;
use crate::interfaces::http::state::AppState;

#[derive(Debug, Deserialize)]
pub struct StreamQuery {
    /// Access token; browsers cannot set headers on WebSocket upgrades
    pub token: Option<String>,
}

/// `GET /api/v1/session/ws?token=...`
pub async fn session_stream(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Query(query): Query<StreamQuery>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_session_socket(socket, state, query.token))
}

fn frame(snapshot: &SessionSnapshot) -> Option<Message> {
    match serde_json::to_string(&SessionView::from(snapshot)) {
        Ok(json) => Some(Message::Text(json.into())),
        Err(e) => {
            error!("Failed to serialize session snapshot: {}", e);
            None
        }
    }
}

async fn handle_session_socket(socket: WebSocket, state: AppState, token: Option<String>) {
    let (mut sender, mut receiver) = socket.split();

    let context = SessionContext::new(state.auth.clone(), state.resolver.clone(), token);
    let subscription = context.init().await;
    let mut snapshots = context.subscribe();

    let initial = frame(&snapshots.borrow_and_update());
    if let Some(msg) = initial {
        if let Err(e) = sender.send(msg).await {
            warn!("Failed to send initial snapshot: {}", e);
            return;
        }
    }
    info!(route = %context.route(), "Session stream connected");

    loop {
        select! {
            msg = receiver.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) if text.as_str().trim() == "sign_out" => {
                        if let Err(e) = context.sign_out().await {
                            warn!(error = %e, "Sign-out from stream failed");
                        }
                    }
                    Some(Ok(Message::Text(text))) if text.as_str().trim() == "refresh" => {
                        if let Err(e) = context.refresh().await {
                            warn!(error = %e, "Token refresh from stream failed");
                        }
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if sender.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(e)) => {
                        warn!("WebSocket error: {}", e);
                        break;
                    }
                    Some(Ok(other)) => debug!("Ignoring frame: {:?}", other),
                }
            }

            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                let next = frame(&snapshots.borrow_and_update());
                let Some(msg) = next else {
                    continue;
                };
                if let Err(e) = sender.send(msg).await {
                    debug!("Session stream closed by peer: {}", e);
                    break;
                }
            }
        }
    }

    subscription.unsubscribe();
    info!("Session stream disconnected");
}
