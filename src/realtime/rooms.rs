/**
 * Room Registry
 *
 * Per-match broadcast channels for real-time message delivery. Each match
 * id maps to its own `tokio::sync::broadcast` channel so fan-out never
 * crosses rooms.
 */

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::messaging::db::Message;

/// Events sent from client to server over the WebSocket
#[derive(Debug, PartialEq, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum ClientEvent {
    /// Join the room for a match
    #[serde(rename_all = "camelCase")]
    JoinMatch { match_id: Uuid },
    /// Leave the room for a match
    #[serde(rename_all = "camelCase")]
    LeaveMatch { match_id: Uuid },
}

/// Events sent from server to room members
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerEvent {
    /// A new message was persisted in this room's match
    NewMessage(Message),
    /// A request from this connection was rejected
    Error { message: String },
}

/// Broadcast registry for match rooms
///
/// Manages per-match broadcast channels. Cloning shares the underlying
/// registry; the single instance lives in `AppState`.
#[derive(Clone)]
pub struct MatchRooms {
    channels: Arc<Mutex<HashMap<Uuid, broadcast::Sender<ServerEvent>>>>,
}

impl MatchRooms {
    pub fn new() -> Self {
        Self {
            channels: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Get or create the broadcast sender for a match room
    pub fn get_sender(&self, match_id: Uuid) -> broadcast::Sender<ServerEvent> {
        let mut channels = self.channels.lock().unwrap();
        channels
            .entry(match_id)
            .or_insert_with(|| broadcast::channel(100).0)
            .clone()
    }

    /// Broadcast an event to all members of a match room
    pub fn broadcast(&self, match_id: Uuid, event: ServerEvent) {
        if let Some(sender) = self.channels.lock().unwrap().get(&match_id) {
            // Ignore if the room has no members
            let _ = sender.send(event);
        }
    }

    /// Drop channels with no remaining members
    pub fn cleanup_inactive_channels(&self) {
        self.channels
            .lock()
            .unwrap()
            .retain(|_, sender| sender.receiver_count() > 0);
    }

    /// Number of members in a match room
    pub fn member_count(&self, match_id: Uuid) -> usize {
        self.channels
            .lock()
            .unwrap()
            .get(&match_id)
            .map(|sender| sender.receiver_count())
            .unwrap_or(0)
    }
}

impl Default for MatchRooms {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn test_message(match_id: Uuid) -> Message {
        Message {
            id: Uuid::new_v4(),
            match_id,
            sender_id: Uuid::new_v4(),
            content: "hello".to_string(),
            created_at: Utc::now(),
            read_at: None,
        }
    }

    #[tokio::test]
    async fn test_broadcast_reaches_room_members() {
        let rooms = MatchRooms::new();
        let match_id = Uuid::new_v4();

        let mut rx1 = rooms.get_sender(match_id).subscribe();
        let mut rx2 = rooms.get_sender(match_id).subscribe();

        rooms.broadcast(match_id, ServerEvent::NewMessage(test_message(match_id)));

        assert!(matches!(rx1.recv().await, Ok(ServerEvent::NewMessage(_))));
        assert!(matches!(rx2.recv().await, Ok(ServerEvent::NewMessage(_))));
    }

    #[tokio::test]
    async fn test_broadcast_does_not_cross_rooms() {
        let rooms = MatchRooms::new();
        let room_a = Uuid::new_v4();
        let room_b = Uuid::new_v4();

        let mut rx_b = rooms.get_sender(room_b).subscribe();

        rooms.broadcast(room_a, ServerEvent::NewMessage(test_message(room_a)));

        assert!(matches!(
            rx_b.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
    }

    #[tokio::test]
    async fn test_broadcast_to_empty_room_is_noop() {
        let rooms = MatchRooms::new();
        let match_id = Uuid::new_v4();

        // No members yet; must not panic
        rooms.broadcast(match_id, ServerEvent::NewMessage(test_message(match_id)));
        assert_eq!(rooms.member_count(match_id), 0);
    }

    #[tokio::test]
    async fn test_cleanup_drops_empty_channels() {
        let rooms = MatchRooms::new();
        let match_id = Uuid::new_v4();

        {
            let _rx = rooms.get_sender(match_id).subscribe();
            assert_eq!(rooms.member_count(match_id), 1);
        }

        rooms.cleanup_inactive_channels();
        assert_eq!(rooms.member_count(match_id), 0);
    }

    #[test]
    fn test_client_event_parsing() {
        let event: ClientEvent = serde_json::from_str(
            r#"{"event": "joinMatch", "matchId": "7c9e6679-7425-40de-944b-e07fc1f90ae7"}"#,
        )
        .unwrap();
        assert!(matches!(event, ClientEvent::JoinMatch { .. }));

        let event: ClientEvent = serde_json::from_str(
            r#"{"event": "leaveMatch", "matchId": "7c9e6679-7425-40de-944b-e07fc1f90ae7"}"#,
        )
        .unwrap();
        assert!(matches!(event, ClientEvent::LeaveMatch { .. }));
    }

    #[test]
    fn test_unknown_client_event_is_rejected() {
        let result: Result<ClientEvent, _> =
            serde_json::from_str(r#"{"event": "hackTheRoom", "matchId": "x"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_server_event_json_shape() {
        let match_id = Uuid::new_v4();
        let json =
            serde_json::to_value(ServerEvent::NewMessage(test_message(match_id))).unwrap();
        assert_eq!(json["event"], "newMessage");
        assert_eq!(json["data"]["content"], "hello");
    }
}
