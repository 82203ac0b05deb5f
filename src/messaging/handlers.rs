/**
 * Messaging Handlers
 *
 * HTTP handlers for sending a message into a match thread and reading the
 * thread back.
 *
 * # Send Pipeline
 *
 * 1. Verify the match exists and the caller owns one of its dogs
 * 2. Persist the message
 * 3. Broadcast the persisted message to the match's room
 * 4. Best-effort-notify the other dog's owner
 *
 * A caller who owns neither dog is rejected before anything is persisted
 * or broadcast.
 */

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::dogs::db::get_dog_by_id;
use crate::error::ApiError;
use crate::matches::db::get_match_by_id;
use crate::messaging::db::{self, Message};
use crate::middleware::auth::AuthUser;
use crate::notifications::db::NotificationKind;
use crate::notifications::push::dispatch;
use crate::realtime::rooms::ServerEvent;
use crate::server::state::AppState;

/// Maximum message length in characters
pub const MAX_CONTENT_LEN: usize = 1000;

/// Message send request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub match_id: Uuid,
    pub content: String,
}

fn validate_content(content: &str) -> Result<(), ApiError> {
    if content.trim().is_empty() {
        return Err(ApiError::validation("Message content is required"));
    }
    if content.chars().count() > MAX_CONTENT_LEN {
        return Err(ApiError::validation(format!(
            "Message must be at most {MAX_CONTENT_LEN} characters"
        )));
    }
    Ok(())
}

/// Send a message (POST /api/messages)
pub async fn send_message(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Json(request): Json<SendMessageRequest>,
) -> Result<(StatusCode, Json<Message>), ApiError> {
    validate_content(&request.content)?;

    let found = get_match_by_id(&state.db_pool, request.match_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Match"))?;

    // Both dogs are needed: one for the ownership check, one to find the
    // other participant for the notification
    let dog1 = get_dog_by_id(&state.db_pool, found.dog1_id).await?;
    let dog2 = get_dog_by_id(&state.db_pool, found.dog2_id).await?;

    let caller_owns_dog1 = dog1
        .as_ref()
        .is_some_and(|d| d.owner_id == caller.user_id);
    let caller_owns_dog2 = dog2
        .as_ref()
        .is_some_and(|d| d.owner_id == caller.user_id);

    if !caller_owns_dog1 && !caller_owns_dog2 {
        return Err(ApiError::authorization(
            "Not authorized to send messages in this match",
        ));
    }

    let message =
        db::create_message(&state.db_pool, request.match_id, caller.user_id, &request.content)
            .await?;

    // Fan out to connected room members
    state
        .rooms
        .broadcast(request.match_id, ServerEvent::NewMessage(message.clone()));

    // Notify the other owner
    let (sender_dog, other_dog) = if caller_owns_dog1 {
        (dog1, dog2)
    } else {
        (dog2, dog1)
    };

    if let (Some(sender_dog), Some(other_dog)) = (sender_dog, other_dog) {
        dispatch(
            &state.db_pool,
            &state.push,
            other_dog.owner_id,
            NotificationKind::Message,
            "New Message!",
            &format!("{}'s owner sent you a message", sender_dog.name),
            Some(serde_json::json!({ "matchId": request.match_id })),
        )
        .await;
    }

    Ok((StatusCode::CREATED, Json(message)))
}

/// List a match's messages (GET /api/messages/{matchId}), participant only
pub async fn get_messages(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(match_id): Path<Uuid>,
) -> Result<Json<Vec<Message>>, ApiError> {
    let found = get_match_by_id(&state.db_pool, match_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Match"))?;

    let dog1 = get_dog_by_id(&state.db_pool, found.dog1_id).await?;
    let dog2 = get_dog_by_id(&state.db_pool, found.dog2_id).await?;

    let owns_side = |dog: &Option<crate::dogs::db::Dog>| {
        dog.as_ref().is_some_and(|d| d.owner_id == caller.user_id)
    };

    if !owns_side(&dog1) && !owns_side(&dog2) {
        return Err(ApiError::authorization(
            "Not authorized to view messages in this match",
        ));
    }

    let messages = db::list_messages_for_match(&state.db_pool, match_id).await?;

    Ok(Json(messages))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_validation() {
        assert!(validate_content("hello").is_ok());
        assert!(validate_content("").is_err());
        assert!(validate_content("   ").is_err());
        assert!(validate_content(&"x".repeat(1000)).is_ok());
        assert!(validate_content(&"x".repeat(1001)).is_err());
    }

    #[test]
    fn test_send_request_shape() {
        let request: SendMessageRequest = serde_json::from_value(serde_json::json!({
            "matchId": "7c9e6679-7425-40de-944b-e07fc1f90ae7",
            "content": "Park at 3?"
        }))
        .unwrap();
        assert_eq!(request.content, "Park at 3?");
    }
}
