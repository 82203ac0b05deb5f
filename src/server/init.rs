/**
 * Server Initialization
 *
 * Builds the application: database pool, room registry, push client, and
 * the configured router.
 *
 * # Initialization Steps
 *
 * 1. Connect to the database and run migrations
 * 2. Create the room registry and push client
 * 3. Assemble the router
 * 4. Start the periodic room cleanup task
 */

use axum::Router;

use crate::notifications::push::PushClient;
use crate::realtime::rooms::MatchRooms;
use crate::routes::router::create_router;
use crate::server::config::load_database;
use crate::server::state::AppState;

/// Interval between room cleanup passes
const ROOM_CLEANUP_INTERVAL: std::time::Duration = std::time::Duration::from_secs(300);

/// Create and configure the Axum application
///
/// # Errors
///
/// Fails if the database cannot be reached or migrations do not apply;
/// the server does not start degraded.
pub async fn create_app() -> Result<Router<()>, sqlx::Error> {
    tracing::info!("Initializing PawMatch backend server");

    let db_pool = load_database().await?;

    let app_state = AppState {
        db_pool,
        rooms: MatchRooms::new(),
        push: PushClient::from_env(),
    };

    let app = create_router(app_state.clone());

    // Drop broadcast channels for rooms everyone has left
    let cleanup_rooms = app_state.rooms.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(ROOM_CLEANUP_INTERVAL);
        loop {
            interval.tick().await;
            cleanup_rooms.cleanup_inactive_channels();
            tracing::debug!("Cleaned up inactive match rooms");
        }
    });

    tracing::info!("Router configured");

    Ok(app)
}
