/**
 * Profile Handlers
 *
 * Implements GET /api/auth/profile and PUT /api/auth/profile for the
 * authenticated caller. The caller identity comes from the auth middleware
 * via the `AuthUser` extractor.
 */

use axum::{extract::State, response::Json};
use sqlx::PgPool;

use crate::auth::handlers::types::is_valid_email;
use crate::auth::users::{self, ProfileUpdate, UserProfile};
use crate::error::types::is_unique_violation;
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;

/// Get the caller's user document
///
/// # Errors
///
/// * `401` - missing/invalid token
/// * `404` - user row no longer exists
pub async fn get_profile(
    State(pool): State<PgPool>,
    AuthUser(caller): AuthUser,
) -> Result<Json<UserProfile>, ApiError> {
    let user = users::get_user_by_id(&pool, caller.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User"))?;

    Ok(Json(user.into()))
}

/// Update the caller's own profile
///
/// Accepts a partial update of name/email/phoneNumber/photoURL. A changed
/// email is re-validated; the store's unique constraint maps to 409.
pub async fn update_profile(
    State(pool): State<PgPool>,
    AuthUser(caller): AuthUser,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<UserProfile>, ApiError> {
    if let Some(email) = &update.email {
        if !is_valid_email(email) {
            return Err(ApiError::validation("Invalid email format"));
        }
    }

    if let Some(name) = &update.name {
        if name.trim().is_empty() {
            return Err(ApiError::validation("Name must not be empty"));
        }
    }

    let user = users::update_profile(&pool, caller.user_id, &update)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                ApiError::conflict("Email already registered")
            } else {
                ApiError::from(e)
            }
        })?
        .ok_or_else(|| ApiError::not_found("User"))?;

    tracing::info!("Profile updated for user: {}", caller.user_id);

    Ok(Json(user.into()))
}
