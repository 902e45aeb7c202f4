//! Authenticated Real-Time Channel
//!
//! `GET /channel` upgrades to a WebSocket, but only after the same
//! credential check REST uses: the access token is pulled out of the
//! raw `Cookie` header (upgrade requests do not pass through the REST
//! middleware stack) and verified before the handshake completes. A
//! missing cookie refuses the connection with `AUTH_NO_TOKEN`; any
//! verification failure refuses it with `AUTH_INVALID_TOKEN`. No
//! identity is ever bound on a refused handshake.
//!
//! On success the resolved user id is bound to the connection for its
//! entire lifetime. The binding is never re-checked: a channel that
//! outlives its token's expiry stays connected until the client closes
//! it, and re-authentication happens at the next handshake.
//!
//! Incoming frames that do not parse as a client event are dropped
//! silently (logged at debug). The one exception is a mutation frame
//! arriving for a connection that has lost its registry entry - that
//! connection alone is sent an `error` event, and nothing is mutated.

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::http::{header, HeaderMap};
use axum::response::Response;
use futures_util::{SinkExt, StreamExt};
use uuid::Uuid;

use crate::backend::auth::sessions::{verify_cookie_header, AuthError, ACCESS_COOKIE};
use crate::backend::boards::{add_reply, pin_board};
use crate::backend::error::ApiError;
use crate::backend::server::state::AppState;
use crate::shared::{ClientEvent, ServerEvent};

/// Authenticate an upgrade request from its headers.
///
/// This is the handshake gate: it must pass before the upgrade is
/// allowed to complete.
pub(crate) fn authenticate_handshake(headers: &HeaderMap) -> Result<i64, AuthError> {
    let cookie_header = headers
        .get(header::COOKIE)
        .and_then(|h| h.to_str().ok());
    verify_cookie_header(cookie_header, ACCESS_COOKIE)
}

/// `GET /channel` - authenticated WebSocket upgrade
///
/// # Errors
///
/// * `401 Unauthorized` with `AUTH_NO_TOKEN` / `AUTH_INVALID_TOKEN` -
///   handshake refused, no identity bound
pub async fn handle_channel(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    ws: WebSocketUpgrade,
) -> Result<Response, ApiError> {
    let user_id = authenticate_handshake(&headers).map_err(|e| {
        tracing::warn!("Channel handshake refused: {}", e.code());
        e
    })?;

    Ok(ws.on_upgrade(move |socket| run_channel(socket, app_state, user_id)))
}

/// Drive one authenticated connection until either side closes it.
async fn run_channel(socket: WebSocket, app_state: AppState, user_id: i64) {
    let (mut sender, mut receiver) = socket.split();

    let (conn_id, mut outbound) = app_state.registry.register(user_id).await;
    tracing::info!("User {user_id} connected on channel {conn_id}");

    // Forward registry events (broadcasts + targeted errors) to the socket.
    let mut send_task = tokio::spawn(async move {
        while let Some(event) = outbound.recv().await {
            let text = match serde_json::to_string(&event) {
                Ok(text) => text,
                Err(e) => {
                    tracing::error!("Failed to serialize server event: {e}");
                    continue;
                }
            };
            if sender.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    // Read client events off the socket and dispatch mutations.
    let recv_state = app_state.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(message)) = receiver.next().await {
            match message {
                Message::Text(text) => match serde_json::from_str::<ClientEvent>(&text) {
                    Ok(event) => dispatch_client_event(&recv_state, conn_id, user_id, event).await,
                    Err(e) => {
                        // Malformed payloads are dropped, not answered.
                        tracing::debug!("Dropping malformed channel frame: {e}");
                    }
                },
                Message::Close(_) => break,
                _ => {}
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    app_state.registry.deregister(conn_id).await;
    tracing::info!("User {user_id} disconnected from channel {conn_id}");
}

/// Run one client event through the mutation core.
///
/// Mutation failures are not surfaced over the channel - a rejected
/// pin or reply is logged and dropped, and nothing is broadcast. The
/// registry check guards the invariant that only a connection with a
/// bound identity may mutate; a violation answers the offending
/// connection alone with an `error` event.
async fn dispatch_client_event(
    app_state: &AppState,
    conn_id: Uuid,
    user_id: i64,
    event: ClientEvent,
) {
    if app_state.registry.bound_user(conn_id).await != Some(user_id) {
        tracing::error!("Channel {conn_id} issued a mutation without a bound identity");
        app_state
            .registry
            .send_to(
                conn_id,
                ServerEvent::Error {
                    message: "Authentication error, please login again.".to_string(),
                },
            )
            .await;
        return;
    }

    match event {
        ClientEvent::PinBoard { text, location } => {
            if let Err(e) =
                pin_board(&app_state.db_pool, &app_state.registry, user_id, &text, &location).await
            {
                tracing::warn!("Channel pin rejected: {e}");
            }
        }
        ClientEvent::AddReply { id, reply } => {
            if let Err(e) =
                add_reply(&app_state.db_pool, &app_state.registry, user_id, id, &reply).await
            {
                tracing::warn!("Channel reply rejected: {e}");
            }
        }
    }
}
