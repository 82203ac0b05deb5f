/**
 * User Service Handlers
 *
 * List/get/update/delete users, preferences, and the push device token.
 */

use axum::{
    extract::{Path, State},
    response::Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::handlers::types::is_valid_email;
use crate::auth::users::{self, Preferences, ProfileUpdate, UserProfile};
use crate::error::types::is_unique_violation;
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::server::state::AppState;

const MIN_RADIUS_KM: i32 = 1;
const MAX_RADIUS_KM: i32 = 100;

/// List all users (GET /api/users)
///
/// Authenticated-only; no further restriction.
pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<Vec<UserProfile>>, ApiError> {
    let users = users::list_users(&state.db_pool).await?;
    Ok(Json(users.into_iter().map(Into::into).collect()))
}

/// Get a user by ID (GET /api/users/{id})
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserProfile>, ApiError> {
    let user = users::get_user_by_id(&state.db_pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("User"))?;

    Ok(Json(user.into()))
}

/// Update a user (PUT /api/users/{id}), owner only
pub async fn update_user(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<Uuid>,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<UserProfile>, ApiError> {
    if id != caller.user_id {
        return Err(ApiError::authorization("Not authorized"));
    }

    if let Some(email) = &update.email {
        if !is_valid_email(email) {
            return Err(ApiError::validation("Invalid email format"));
        }
    }

    let user = users::update_profile(&state.db_pool, id, &update)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                ApiError::conflict("Email already registered")
            } else {
                ApiError::from(e)
            }
        })?
        .ok_or_else(|| ApiError::not_found("User"))?;

    Ok(Json(user.into()))
}

/// Delete a user account (DELETE /api/users/{id}), owner only
///
/// Removes the user row only. The account's dogs stay retrievable by id.
pub async fn delete_user(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if id != caller.user_id {
        return Err(ApiError::authorization("Not authorized"));
    }

    let deleted = users::delete_user(&state.db_pool, id).await?;
    if !deleted {
        return Err(ApiError::not_found("User"));
    }

    tracing::info!("User deleted: {}", id);

    Ok(Json(
        serde_json::json!({ "message": "User deleted successfully" }),
    ))
}

/// Update preferences (PUT /api/users/{id}/preferences), owner only
pub async fn update_preferences(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<Uuid>,
    Json(prefs): Json<Preferences>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if id != caller.user_id {
        return Err(ApiError::authorization("Not authorized"));
    }

    if !(MIN_RADIUS_KM..=MAX_RADIUS_KM).contains(&prefs.radius) {
        return Err(ApiError::validation(format!(
            "Radius must be {MIN_RADIUS_KM}-{MAX_RADIUS_KM} km"
        )));
    }

    users::update_preferences(&state.db_pool, id, &prefs)
        .await?
        .ok_or_else(|| ApiError::not_found("User"))?;

    Ok(Json(
        serde_json::json!({ "message": "Preferences updated successfully" }),
    ))
}

/// Device token update request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FcmTokenRequest {
    pub fcm_token: String,
}

/// Store the caller's push device token (PUT /api/users/fcm-token)
pub async fn update_fcm_token(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Json(request): Json<FcmTokenRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if request.fcm_token.trim().is_empty() {
        return Err(ApiError::validation("FCM token is required"));
    }

    let updated =
        users::update_fcm_token(&state.db_pool, caller.user_id, &request.fcm_token).await?;
    if !updated {
        return Err(ApiError::not_found("User"));
    }

    Ok(Json(
        serde_json::json!({ "message": "FCM token updated successfully" }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_radius_bounds() {
        assert!((MIN_RADIUS_KM..=MAX_RADIUS_KM).contains(&1));
        assert!((MIN_RADIUS_KM..=MAX_RADIUS_KM).contains(&100));
        assert!(!(MIN_RADIUS_KM..=MAX_RADIUS_KM).contains(&0));
        assert!(!(MIN_RADIUS_KM..=MAX_RADIUS_KM).contains(&101));
    }

    #[test]
    fn test_fcm_token_request_shape() {
        let request: FcmTokenRequest =
            serde_json::from_str(r#"{"fcmToken": "device-token-123"}"#).unwrap();
        assert_eq!(request.fcm_token, "device-token-123");
    }
}
