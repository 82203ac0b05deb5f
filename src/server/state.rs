/**
 * Application State Management
 *
 * This module defines the application state structure and the `FromRef`
 * implementations for Axum state extraction.
 *
 * # Architecture
 *
 * `AppState` is the central state container:
 * - Database connection pool
 * - Room registry for real-time message fan-out
 * - Push provider client
 *
 * All three are created once at process start and shared by cloning;
 * there are no ambient globals.
 */

use axum::extract::FromRef;
use sqlx::PgPool;

use crate::notifications::push::PushClient;
use crate::realtime::rooms::MatchRooms;

/// Application state shared by all request handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db_pool: PgPool,

    /// Room registry for real-time message delivery
    ///
    /// One shared instance; membership is per-process.
    pub rooms: MatchRooms,

    /// Push provider client
    pub push: PushClient,
}

/// Allow handlers to extract the pool directly with `State<PgPool>`
impl FromRef<AppState> for PgPool {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.db_pool.clone()
    }
}

/// Allow handlers to extract the room registry directly
impl FromRef<AppState> for MatchRooms {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.rooms.clone()
    }
}

/// Allow handlers to extract the push client directly
impl FromRef<AppState> for PushClient {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.push.clone()
    }
}
