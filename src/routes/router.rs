/**
 * Router Configuration
 *
 * Combines the API routes, the WebSocket endpoint, request tracing, and
 * the 404 fallback into the final Axum router.
 *
 * The WebSocket endpoint authenticates at handshake time inside its own
 * handler (the token may arrive via query parameter), so it sits outside
 * the HTTP authentication layer.
 */

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::error::ApiError;
use crate::realtime::socket::ws_handler;
use crate::routes::api_routes::configure_api_routes;
use crate::server::state::AppState;

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router<()> {
    Router::new()
        .route("/ws", axum::routing::get(ws_handler))
        .merge(configure_api_routes(app_state.clone()))
        .layer(TraceLayer::new_for_http())
        .fallback(|| async { ApiError::not_found("Route") })
        .with_state(app_state)
}
