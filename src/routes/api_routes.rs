/**
 * API Route Configuration
 *
 * Maps verbs and paths onto domain handlers. Registration and login are
 * public; every other route sits behind the authentication gate, applied
 * as a route layer so unmatched paths still fall through to the 404
 * handler.
 */

use axum::{middleware, routing, Router};

use crate::auth::handlers::{get_profile, login, register, update_profile};
use crate::dogs::handlers as dogs;
use crate::matches::handlers as matches;
use crate::messaging::handlers as messages;
use crate::middleware::auth::auth_middleware;
use crate::notifications::handlers as notifications;
use crate::server::state::AppState;
use crate::users::handlers as users;

/// Build the API routes
///
/// # Routes
///
/// ## Public
/// - `POST /api/auth/register` - account creation
/// - `POST /api/auth/login` - session token issuance
///
/// ## Protected (bearer token required)
/// - `/api/auth/profile` - caller's own document
/// - `/api/users/...` - user service
/// - `/api/dogs/...` - dog service, including the nearby search
/// - `/api/matches/...` - match service
/// - `/api/messages/...` - message service
/// - `/api/notifications/...` - notification service
pub fn configure_api_routes(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/api/auth/register", routing::post(register))
        .route("/api/auth/login", routing::post(login));

    let protected = Router::new()
        // Caller profile
        .route(
            "/api/auth/profile",
            routing::get(get_profile).put(update_profile),
        )
        // User service
        .route("/api/users", routing::get(users::list_users))
        .route("/api/users/fcm-token", routing::put(users::update_fcm_token))
        .route(
            "/api/users/{id}",
            routing::get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route(
            "/api/users/{id}/preferences",
            routing::put(users::update_preferences),
        )
        // Dog service; the static `nearby` segment is registered alongside
        // the `{id}` capture and takes precedence
        .route(
            "/api/dogs",
            routing::post(dogs::create_dog).get(dogs::list_my_dogs),
        )
        .route("/api/dogs/nearby", routing::get(dogs::nearby_dogs))
        .route(
            "/api/dogs/{id}",
            routing::get(dogs::get_dog)
                .put(dogs::update_dog)
                .delete(dogs::delete_dog),
        )
        // Match service
        .route(
            "/api/matches",
            routing::post(matches::create_match).get(matches::list_matches),
        )
        .route("/api/matches/{id}", routing::get(matches::get_match))
        .route(
            "/api/matches/{id}/status",
            routing::put(matches::update_match_status),
        )
        // Message service
        .route("/api/messages", routing::post(messages::send_message))
        .route("/api/messages/{match_id}", routing::get(messages::get_messages))
        // Notification service
        .route(
            "/api/notifications",
            routing::get(notifications::list_notifications),
        )
        .route(
            "/api/notifications/unread-count",
            routing::get(notifications::get_unread_count),
        )
        .route(
            "/api/notifications/{id}/read",
            routing::put(notifications::mark_notification_read),
        )
        .route(
            "/api/notifications/{id}",
            routing::delete(notifications::delete_notification),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    public.merge(protected)
}
