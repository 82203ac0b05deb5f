/**
 * Notification Handlers
 *
 * Owner-scoped read, mark-read, and delete endpoints. Every operation is
 * restricted to the notification's owner.
 */

use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::notifications::db::{self, Notification};
use crate::server::state::AppState;

/// Query parameters for listing notifications
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    /// When `true`, return unread notifications only
    pub unread: Option<bool>,
}

/// List the caller's notifications (GET /api/notifications)
pub async fn list_notifications(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Notification>>, ApiError> {
    let unread_only = params.unread.unwrap_or(false);
    let notifications = db::list_for_user(&state.db_pool, caller.user_id, unread_only).await?;
    Ok(Json(notifications))
}

/// Count unread notifications (GET /api/notifications/unread-count)
pub async fn get_unread_count(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let count = db::unread_count(&state.db_pool, caller.user_id).await?;
    Ok(Json(serde_json::json!({ "count": count })))
}

/// Fetch a notification and check the caller owns it
async fn owned_notification(
    state: &AppState,
    caller_id: Uuid,
    id: Uuid,
) -> Result<Notification, ApiError> {
    let notification = db::get_by_id(&state.db_pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Notification"))?;

    if notification.user_id != caller_id {
        return Err(ApiError::authorization("Not authorized"));
    }

    Ok(notification)
}

/// Mark a notification read (PUT /api/notifications/{id}/read)
///
/// Idempotent: re-marking an already-read notification succeeds and leaves
/// its original `read_at` in place.
pub async fn mark_notification_read(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    owned_notification(&state, caller.user_id, id).await?;

    db::mark_read(&state.db_pool, id).await?;

    Ok(Json(
        serde_json::json!({ "message": "Notification marked as read" }),
    ))
}

/// Delete a notification (DELETE /api/notifications/{id})
pub async fn delete_notification(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    owned_notification(&state, caller.user_id, id).await?;

    db::delete_notification(&state.db_pool, id).await?;

    Ok(Json(
        serde_json::json!({ "message": "Notification deleted successfully" }),
    ))
}
