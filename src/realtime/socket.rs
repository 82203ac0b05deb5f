/**
 * WebSocket Handshake and Connection Loop
 *
 * The handshake is authenticated with the same bearer verification as the
 * HTTP gate: the token comes from the Authorization header or a `token`
 * query parameter, and an unauthenticated handshake is rejected before the
 * upgrade.
 *
 * A connected client joins and leaves match rooms with `joinMatch` /
 * `leaveMatch` events. Joining requires the caller to own one of the two
 * dogs in the match; a non-participant gets an `error` event and no
 * membership.
 */

use axum::{
    extract::{
        ws::{Message as WsMessage, WebSocket},
        Query, State, WebSocketUpgrade,
    },
    http::{header::AUTHORIZATION, HeaderMap},
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use std::collections::HashMap;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::auth::sessions::verify_token;
use crate::error::ApiError;
use crate::matches::db::is_participant;
use crate::realtime::rooms::{ClientEvent, ServerEvent};
use crate::server::state::AppState;

/// Handshake query parameters
#[derive(Debug, Deserialize)]
pub struct WsParams {
    /// Bearer token, for clients that cannot set headers on the upgrade
    pub token: Option<String>,
}

/// WebSocket endpoint (GET /ws)
///
/// Verifies the bearer token, then upgrades and hands the socket to the
/// connection loop.
pub async fn ws_handler(
    State(state): State<AppState>,
    Query(params): Query<WsParams>,
    headers: HeaderMap,
    ws: WebSocketUpgrade,
) -> Result<Response, ApiError> {
    let token = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::to_string)
        .or(params.token)
        .ok_or_else(|| ApiError::authentication("No token provided"))?;

    let claims = verify_token(&token).map_err(ApiError::from)?;
    let user_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| ApiError::authentication("Invalid token"))?;

    tracing::info!("WebSocket connection for user: {}", user_id);

    Ok(ws.on_upgrade(move |socket| handle_connection(socket, state, user_id)))
}

/// Per-connection loop
///
/// Room membership is a forwarder task per joined match: each task copies
/// events from the room's broadcast channel into this connection's outbox.
/// Leaving a room (or disconnecting) aborts the forwarder.
async fn handle_connection(socket: WebSocket, state: AppState, user_id: Uuid) {
    let (mut sink, mut stream) = socket.split();
    let (outbox_tx, mut outbox_rx) = mpsc::channel::<ServerEvent>(64);
    let mut memberships: HashMap<Uuid, JoinHandle<()>> = HashMap::new();

    loop {
        tokio::select! {
            incoming = stream.next() => {
                match incoming {
                    Some(Ok(WsMessage::Text(text))) => {
                        handle_client_event(
                            text.as_str(),
                            &state,
                            user_id,
                            &outbox_tx,
                            &mut memberships,
                        )
                        .await;
                    }
                    Some(Ok(WsMessage::Close(_))) | None => {
                        break;
                    }
                    Some(Ok(_)) => {
                        // Ping/pong and binary frames need no handling here
                    }
                    Some(Err(e)) => {
                        tracing::warn!("WebSocket error for user {}: {:?}", user_id, e);
                        break;
                    }
                }
            }
            outgoing = outbox_rx.recv() => {
                match outgoing {
                    Some(event) => {
                        let Ok(json) = serde_json::to_string(&event) else {
                            tracing::error!("Failed to serialize server event");
                            continue;
                        };
                        if sink.send(WsMessage::Text(json.into())).await.is_err() {
                            break;
                        }
                    }
                    None => break,
                }
            }
        }
    }

    for (_, task) in memberships {
        task.abort();
    }

    tracing::info!("WebSocket disconnected for user: {}", user_id);
}

/// Apply one client event to this connection's memberships
async fn handle_client_event(
    text: &str,
    state: &AppState,
    user_id: Uuid,
    outbox_tx: &mpsc::Sender<ServerEvent>,
    memberships: &mut HashMap<Uuid, JoinHandle<()>>,
) {
    let event: ClientEvent = match serde_json::from_str(text) {
        Ok(event) => event,
        Err(_) => {
            let _ = outbox_tx
                .send(ServerEvent::Error {
                    message: "Unrecognized event".to_string(),
                })
                .await;
            return;
        }
    };

    match event {
        ClientEvent::JoinMatch { match_id } => {
            if memberships.contains_key(&match_id) {
                return;
            }

            // Only a participant may join the room
            let allowed = match is_participant(&state.db_pool, match_id, user_id).await {
                Ok(allowed) => allowed,
                Err(e) => {
                    tracing::error!("Participant check failed: {:?}", e);
                    false
                }
            };

            if !allowed {
                tracing::warn!(
                    "User {} denied joining room for match {}",
                    user_id,
                    match_id
                );
                let _ = outbox_tx
                    .send(ServerEvent::Error {
                        message: "Not a participant in this match".to_string(),
                    })
                    .await;
                return;
            }

            let mut room_rx = state.rooms.get_sender(match_id).subscribe();
            let forward_tx = outbox_tx.clone();
            let task = tokio::spawn(async move {
                loop {
                    match room_rx.recv().await {
                        Ok(event) => {
                            if forward_tx.send(event).await.is_err() {
                                break;
                            }
                        }
                        Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                            tracing::warn!("Room receiver lagged, skipped {} events", skipped);
                        }
                        Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                    }
                }
            });

            memberships.insert(match_id, task);
            tracing::debug!("User {} joined room for match {}", user_id, match_id);
        }
        ClientEvent::LeaveMatch { match_id } => {
            if let Some(task) = memberships.remove(&match_id) {
                task.abort();
                tracing::debug!("User {} left room for match {}", user_id, match_id);
            }
        }
    }
}
