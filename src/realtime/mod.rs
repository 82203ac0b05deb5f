/**
 * Real-time Channel
 *
 * WebSocket connections join and leave rooms keyed by match id. When a
 * message is persisted, the full message document is fanned out to every
 * connection in the match's room.
 *
 * The room registry is one shared instance created at process start and
 * injected through `AppState`; membership is scoped to this process.
 */

/// Room registry and event types
pub mod rooms;

/// WebSocket handshake and connection loop
pub mod socket;

pub use rooms::{ClientEvent, MatchRooms, ServerEvent};
pub use socket::ws_handler;
