//! Database operations for notifications

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use uuid::Uuid;

/// Notification category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    MatchRequest,
    MatchUpdate,
    Message,
    System,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MatchRequest => "match_request",
            Self::MatchUpdate => "match_update",
            Self::Message => "message",
            Self::System => "system",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "match_request" => Some(Self::MatchRequest),
            "match_update" => Some(Self::MatchUpdate),
            "message" => Some(Self::Message),
            "system" => Some(Self::System),
            _ => None,
        }
    }
}

/// A notification document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_at: Option<DateTime<Utc>>,
}

fn row_to_notification(row: sqlx::postgres::PgRow) -> Notification {
    let kind: String = row.get("kind");
    let data: Option<Json<serde_json::Value>> = row.get("data");
    Notification {
        id: row.get("id"),
        user_id: row.get("user_id"),
        kind: NotificationKind::from_str(&kind).unwrap_or(NotificationKind::System),
        title: row.get("title"),
        body: row.get("body"),
        data: data.map(|j| j.0),
        created_at: row.get("created_at"),
        read_at: row.get("read_at"),
    }
}

/// Record a notification for a user
pub async fn create_notification(
    pool: &PgPool,
    user_id: Uuid,
    kind: NotificationKind,
    title: &str,
    body: &str,
    data: Option<serde_json::Value>,
) -> Result<Notification, sqlx::Error> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let row = sqlx::query(
        r#"
        INSERT INTO notifications (id, user_id, kind, title, body, data, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id, user_id, kind, title, body, data, created_at, read_at
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(kind.as_str())
    .bind(title)
    .bind(body)
    .bind(data.map(Json))
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(row_to_notification(row))
}

/// List a user's notifications, newest first
pub async fn list_for_user(
    pool: &PgPool,
    user_id: Uuid,
    unread_only: bool,
) -> Result<Vec<Notification>, sqlx::Error> {
    let sql = if unread_only {
        r#"
        SELECT id, user_id, kind, title, body, data, created_at, read_at
        FROM notifications
        WHERE user_id = $1 AND read_at IS NULL
        ORDER BY created_at DESC
        "#
    } else {
        r#"
        SELECT id, user_id, kind, title, body, data, created_at, read_at
        FROM notifications
        WHERE user_id = $1
        ORDER BY created_at DESC
        "#
    };

    let rows = sqlx::query(sql).bind(user_id).fetch_all(pool).await?;

    Ok(rows.into_iter().map(row_to_notification).collect())
}

/// Count a user's unread notifications
pub async fn unread_count(pool: &PgPool, user_id: Uuid) -> Result<i64, sqlx::Error> {
    let row = sqlx::query(
        "SELECT COUNT(*) AS count FROM notifications WHERE user_id = $1 AND read_at IS NULL",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(row.get("count"))
}

/// Get a notification by ID
pub async fn get_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Notification>, sqlx::Error> {
    let row = sqlx::query(
        "SELECT id, user_id, kind, title, body, data, created_at, read_at FROM notifications WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(row_to_notification))
}

/// Mark a notification read
///
/// `read_at` is only stamped the first time; marking an already-read
/// notification again is a no-op that still succeeds.
pub async fn mark_read(pool: &PgPool, id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE notifications SET read_at = $2 WHERE id = $1 AND read_at IS NULL")
        .bind(id)
        .bind(Utc::now())
        .execute(pool)
        .await?;

    Ok(())
}

/// Delete a notification
pub async fn delete_notification(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM notifications WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trip() {
        for kind in [
            NotificationKind::MatchRequest,
            NotificationKind::MatchUpdate,
            NotificationKind::Message,
            NotificationKind::System,
        ] {
            assert_eq!(NotificationKind::from_str(kind.as_str()), Some(kind));
        }
        assert_eq!(NotificationKind::from_str("spam"), None);
    }

    #[test]
    fn test_notification_json_uses_type_key() {
        let n = Notification {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            kind: NotificationKind::MatchRequest,
            title: "New Match Request!".to_string(),
            body: "Rex wants to match with your dog!".to_string(),
            data: None,
            created_at: Utc::now(),
            read_at: None,
        };

        let json = serde_json::to_value(&n).unwrap();
        assert_eq!(json["type"], "match_request");
        assert!(json.get("readAt").is_none());
    }
}
