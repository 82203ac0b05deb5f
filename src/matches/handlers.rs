/**
 * Match Handlers
 *
 * HTTP handlers for creating matches, reading them, accepting/rejecting,
 * and listing the caller's matches.
 *
 * # Authorization
 *
 * - Create: caller must own dog1
 * - Read: caller must own one of the two dogs
 * - Status update: only dog2's owner, and only out of `pending`
 */

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::dogs::db::get_dog_by_id;
use crate::error::types::is_unique_violation;
use crate::error::ApiError;
use crate::matches::db::{self, Match, MatchStatus};
use crate::middleware::auth::AuthUser;
use crate::notifications::db::NotificationKind;
use crate::notifications::push::dispatch;
use crate::server::state::AppState;

/// Match creation request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMatchRequest {
    pub dog1_id: Uuid,
    pub dog2_id: Uuid,
}

/// Status update request
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

/// Create a match (POST /api/matches)
///
/// # Errors
///
/// * `400` - dog1 and dog2 are the same dog
/// * `403` - caller does not own dog1
/// * `404` - dog2 does not exist
/// * `409` - a match for this dog pair already exists (either order)
pub async fn create_match(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Json(request): Json<CreateMatchRequest>,
) -> Result<(StatusCode, Json<Match>), ApiError> {
    if request.dog1_id == request.dog2_id {
        return Err(ApiError::validation("A dog cannot match with itself"));
    }

    // Verify dog1 belongs to the caller
    let dog1 = get_dog_by_id(&state.db_pool, request.dog1_id)
        .await?
        .filter(|dog| dog.owner_id == caller.user_id)
        .ok_or_else(|| {
            ApiError::authorization("Not authorized to create match for this dog")
        })?;

    // Verify dog2 exists
    let dog2 = get_dog_by_id(&state.db_pool, request.dog2_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Second dog"))?;

    // The unique pair index is the duplicate check; no pre-read
    let created = db::create_match(&state.db_pool, request.dog1_id, request.dog2_id)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                ApiError::conflict("Match already exists")
            } else {
                ApiError::from(e)
            }
        })?;

    tracing::info!("Match created: {} ({} -> {})", created.id, dog1.id, dog2.id);

    dispatch(
        &state.db_pool,
        &state.push,
        dog2.owner_id,
        NotificationKind::MatchRequest,
        "New Match Request!",
        &format!("{} wants to match with your dog!", dog1.name),
        Some(serde_json::json!({ "matchId": created.id })),
    )
    .await;

    Ok((StatusCode::CREATED, Json(created)))
}

/// Get a match (GET /api/matches/{id}), participant only
pub async fn get_match(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Match>, ApiError> {
    let found = db::get_match_by_id(&state.db_pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Match"))?;

    let dog1 = get_dog_by_id(&state.db_pool, found.dog1_id).await?;
    let dog2 = get_dog_by_id(&state.db_pool, found.dog2_id).await?;

    let owns_side = |dog: &Option<crate::dogs::db::Dog>| {
        dog.as_ref().is_some_and(|d| d.owner_id == caller.user_id)
    };

    if !owns_side(&dog1) && !owns_side(&dog2) {
        return Err(ApiError::authorization("Not authorized to view this match"));
    }

    Ok(Json(found))
}

/// Accept or reject a match (PUT /api/matches/{id}/status)
///
/// Only dog2's owner may decide, and only while the match is pending.
/// Any status value other than `accepted`/`rejected` is rejected.
pub async fn update_match_status(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<Match>, ApiError> {
    let status = MatchStatus::from_str(&request.status)
        .filter(|s| *s != MatchStatus::Pending)
        .ok_or_else(|| ApiError::validation("Invalid status"))?;

    let found = db::get_match_by_id(&state.db_pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Match"))?;

    if found.status != MatchStatus::Pending {
        return Err(ApiError::validation("Match has already been decided"));
    }

    // Only the receiving dog's owner decides
    let dog2 = get_dog_by_id(&state.db_pool, found.dog2_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Second dog"))?;

    if dog2.owner_id != caller.user_id {
        return Err(ApiError::authorization(
            "Not authorized to update this match",
        ));
    }

    let updated = db::update_match_status(&state.db_pool, id, status)
        .await?
        .ok_or_else(|| ApiError::not_found("Match"))?;

    tracing::info!("Match {} {}", updated.id, status.as_str());

    // Tell dog1's owner about the decision
    if let Some(dog1) = get_dog_by_id(&state.db_pool, found.dog1_id).await? {
        dispatch(
            &state.db_pool,
            &state.push,
            dog1.owner_id,
            NotificationKind::MatchUpdate,
            "Match Update!",
            &format!("{} has {} your match request!", dog2.name, status.as_str()),
            Some(serde_json::json!({ "matchId": updated.id })),
        )
        .await;
    }

    Ok(Json(updated))
}

/// List the caller's matches (GET /api/matches)
pub async fn list_matches(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
) -> Result<Json<Vec<Match>>, ApiError> {
    let matches = db::list_matches_for_owner(&state.db_pool, caller.user_id).await?;
    Ok(Json(matches))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_is_not_an_accepted_target() {
        let status = MatchStatus::from_str("pending").filter(|s| *s != MatchStatus::Pending);
        assert!(status.is_none());
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        assert!(MatchStatus::from_str("friendzoned").is_none());
    }

    #[test]
    fn test_decision_targets_parse() {
        assert_eq!(
            MatchStatus::from_str("accepted"),
            Some(MatchStatus::Accepted)
        );
        assert_eq!(
            MatchStatus::from_str("rejected"),
            Some(MatchStatus::Rejected)
        );
    }

    #[test]
    fn test_create_request_shape() {
        let request: CreateMatchRequest = serde_json::from_value(serde_json::json!({
            "dog1Id": "7c9e6679-7425-40de-944b-e07fc1f90ae7",
            "dog2Id": "16fd2706-8baf-433b-82eb-8c7fada847da"
        }))
        .unwrap();
        assert_ne!(request.dog1_id, request.dog2_id);
    }
}
