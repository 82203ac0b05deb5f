//! Database operations for matches

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Row};
use uuid::Uuid;

/// Match lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Pending,
    Accepted,
    Rejected,
}

impl MatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "accepted" => Some(Self::Accepted),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }
}

/// A match document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: Uuid,
    pub dog1_id: Uuid,
    pub dog2_id: Uuid,
    pub status: MatchStatus,
    pub created_at: DateTime<Utc>,
}

fn row_to_match(row: sqlx::postgres::PgRow) -> Match {
    let status: String = row.get("status");
    Match {
        id: row.get("id"),
        dog1_id: row.get("dog1_id"),
        dog2_id: row.get("dog2_id"),
        status: MatchStatus::from_str(&status).unwrap_or(MatchStatus::Pending),
        created_at: row.get("created_at"),
    }
}

/// Create a match in `pending` state
///
/// The unique index on the unordered dog pair rejects a duplicate in either
/// order; callers map that violation to a conflict.
pub async fn create_match(
    pool: &PgPool,
    dog1_id: Uuid,
    dog2_id: Uuid,
) -> Result<Match, sqlx::Error> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let row = sqlx::query(
        r#"
        INSERT INTO matches (id, dog1_id, dog2_id, status, created_at)
        VALUES ($1, $2, $3, 'pending', $4)
        RETURNING id, dog1_id, dog2_id, status, created_at
        "#,
    )
    .bind(id)
    .bind(dog1_id)
    .bind(dog2_id)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(row_to_match(row))
}

/// Get a match by ID
pub async fn get_match_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Match>, sqlx::Error> {
    let row = sqlx::query("SELECT id, dog1_id, dog2_id, status, created_at FROM matches WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(row_to_match))
}

/// Set a match's status
pub async fn update_match_status(
    pool: &PgPool,
    id: Uuid,
    status: MatchStatus,
) -> Result<Option<Match>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        UPDATE matches SET status = $2 WHERE id = $1
        RETURNING id, dog1_id, dog2_id, status, created_at
        "#,
    )
    .bind(id)
    .bind(status.as_str())
    .fetch_optional(pool)
    .await?;

    Ok(row.map(row_to_match))
}

/// List matches involving any of the caller's dogs
///
/// Two queries, one per side, concatenated without de-duplication. The pair
/// constraint keeps a dog pair from appearing on both sides, so in practice
/// the union carries no duplicates; the two-sided shape is kept as-is.
pub async fn list_matches_for_owner(
    pool: &PgPool,
    owner_id: Uuid,
) -> Result<Vec<Match>, sqlx::Error> {
    let as_dog1 = sqlx::query(
        r#"
        SELECT m.id, m.dog1_id, m.dog2_id, m.status, m.created_at
        FROM matches m
        WHERE m.dog1_id IN (SELECT id FROM dogs WHERE owner_id = $1)
        ORDER BY m.created_at DESC
        "#,
    )
    .bind(owner_id)
    .fetch_all(pool)
    .await?;

    let as_dog2 = sqlx::query(
        r#"
        SELECT m.id, m.dog1_id, m.dog2_id, m.status, m.created_at
        FROM matches m
        WHERE m.dog2_id IN (SELECT id FROM dogs WHERE owner_id = $1)
        ORDER BY m.created_at DESC
        "#,
    )
    .bind(owner_id)
    .fetch_all(pool)
    .await?;

    Ok(as_dog1
        .into_iter()
        .chain(as_dog2)
        .map(row_to_match)
        .collect())
}

/// Check whether a user owns one of the two dogs in a match
///
/// Used by the messaging handlers and the realtime room join check.
pub async fn is_participant(
    pool: &PgPool,
    match_id: Uuid,
    user_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT COUNT(*) AS count
        FROM matches m
        JOIN dogs d ON d.id = m.dog1_id OR d.id = m.dog2_id
        WHERE m.id = $1 AND d.owner_id = $2
        "#,
    )
    .bind(match_id)
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    let count: i64 = row.get("count");
    Ok(count > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [
            MatchStatus::Pending,
            MatchStatus::Accepted,
            MatchStatus::Rejected,
        ] {
            assert_eq!(MatchStatus::from_str(status.as_str()), Some(status));
        }
        assert_eq!(MatchStatus::from_str("cancelled"), None);
    }

    #[test]
    fn test_status_json_is_lowercase() {
        assert_eq!(
            serde_json::to_string(&MatchStatus::Accepted).unwrap(),
            "\"accepted\""
        );
        let parsed: MatchStatus = serde_json::from_str("\"pending\"").unwrap();
        assert_eq!(parsed, MatchStatus::Pending);
    }

    #[test]
    fn test_match_json_shape() {
        let m = Match {
            id: Uuid::new_v4(),
            dog1_id: Uuid::new_v4(),
            dog2_id: Uuid::new_v4(),
            status: MatchStatus::Pending,
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&m).unwrap();
        assert!(json.get("dog1Id").is_some());
        assert!(json.get("dog2Id").is_some());
        assert_eq!(json["status"], "pending");
    }
}
