//! Database operations for messages

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Row};
use uuid::Uuid;

/// A message document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: Uuid,
    pub match_id: Uuid,
    pub sender_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_at: Option<DateTime<Utc>>,
}

fn row_to_message(row: sqlx::postgres::PgRow) -> Message {
    Message {
        id: row.get("id"),
        match_id: row.get("match_id"),
        sender_id: row.get("sender_id"),
        content: row.get("content"),
        created_at: row.get("created_at"),
        read_at: row.get("read_at"),
    }
}

/// Persist a message in a match thread
pub async fn create_message(
    pool: &PgPool,
    match_id: Uuid,
    sender_id: Uuid,
    content: &str,
) -> Result<Message, sqlx::Error> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let row = sqlx::query(
        r#"
        INSERT INTO messages (id, match_id, sender_id, content, created_at)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, match_id, sender_id, content, created_at, read_at
        "#,
    )
    .bind(id)
    .bind(match_id)
    .bind(sender_id)
    .bind(content)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(row_to_message(row))
}

/// List a match's messages in creation order (oldest first)
pub async fn list_messages_for_match(
    pool: &PgPool,
    match_id: Uuid,
) -> Result<Vec<Message>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT id, match_id, sender_id, content, created_at, read_at
        FROM messages
        WHERE match_id = $1
        ORDER BY created_at ASC
        "#,
    )
    .bind(match_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(row_to_message).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_json_shape() {
        let message = Message {
            id: Uuid::new_v4(),
            match_id: Uuid::new_v4(),
            sender_id: Uuid::new_v4(),
            content: "Park at 3?".to_string(),
            created_at: Utc::now(),
            read_at: None,
        };

        let json = serde_json::to_value(&message).unwrap();
        assert!(json.get("matchId").is_some());
        assert!(json.get("senderId").is_some());
        assert!(json.get("readAt").is_none());
    }
}
