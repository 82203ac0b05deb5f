/**
 * User Records and Database Operations
 *
 * This module defines the user record, its API-facing profile shape, and
 * all database operations on the users table.
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Row};
use uuid::Uuid;

/// Search preferences stored per user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    /// Push notifications enabled
    pub notifications: bool,
    /// Email updates enabled
    pub email_updates: bool,
    /// Nearby search radius in kilometers (1..=100)
    pub radius: i32,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            notifications: true,
            email_updates: true,
            radius: 10,
        }
    }
}

/// A user row, including the password hash
///
/// Never serialized directly; API responses use [`UserProfile`].
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub photo_url: Option<String>,
    pub phone_number: Option<String>,
    pub preferences: Preferences,
    pub fcm_token: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// API-facing user document (no password hash)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    #[serde(rename = "photoURL", skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    pub preferences: Preferences,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            photo_url: user.photo_url,
            phone_number: user.phone_number,
            preferences: user.preferences,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Fields that may be changed on a profile update
///
/// All fields are optional; absent fields keep their current value.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    #[serde(rename = "photoURL")]
    pub photo_url: Option<String>,
    pub phone_number: Option<String>,
}

const USER_COLUMNS: &str = "id, email, password_hash, name, photo_url, phone_number, \
     notifications, email_updates, radius_km, fcm_token, created_at, updated_at";

fn row_to_user(row: sqlx::postgres::PgRow) -> User {
    User {
        id: row.get("id"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        name: row.get("name"),
        photo_url: row.get("photo_url"),
        phone_number: row.get("phone_number"),
        preferences: Preferences {
            notifications: row.get("notifications"),
            email_updates: row.get("email_updates"),
            radius: row.get("radius_km"),
        },
        fcm_token: row.get("fcm_token"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

/// Create a new user
///
/// # Arguments
/// * `pool` - Database connection pool
/// * `email` - User email (unique, enforced by the store)
/// * `password_hash` - Hashed password
/// * `name` - Display name
///
/// # Returns
/// Created user, or the underlying error (unique violation for a taken email)
pub async fn create_user(
    pool: &PgPool,
    email: String,
    password_hash: String,
    name: String,
) -> Result<User, sqlx::Error> {
    let id = Uuid::new_v4();
    let now = Utc::now();
    let prefs = Preferences::default();

    let row = sqlx::query(&format!(
        r#"
        INSERT INTO users (id, email, password_hash, name, notifications, email_updates, radius_km, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(&email)
    .bind(&password_hash)
    .bind(&name)
    .bind(prefs.notifications)
    .bind(prefs.email_updates)
    .bind(prefs.radius)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(row_to_user(row))
}

/// Get user by email
pub async fn get_user_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
    let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
        .bind(email)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(row_to_user))
}

/// Get user by ID
pub async fn get_user_by_id(pool: &PgPool, id: Uuid) -> Result<Option<User>, sqlx::Error> {
    let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(row_to_user))
}

/// List all users
pub async fn list_users(pool: &PgPool) -> Result<Vec<User>, sqlx::Error> {
    let rows = sqlx::query(&format!(
        "SELECT {USER_COLUMNS} FROM users ORDER BY created_at ASC"
    ))
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(row_to_user).collect())
}

/// Apply a partial profile update
///
/// Absent fields keep their current value. A changed email goes through the
/// store's unique constraint; callers map that violation to a conflict.
///
/// # Returns
/// Updated user, or `None` if the id is unknown
pub async fn update_profile(
    pool: &PgPool,
    user_id: Uuid,
    update: &ProfileUpdate,
) -> Result<Option<User>, sqlx::Error> {
    let now = Utc::now();

    let row = sqlx::query(&format!(
        r#"
        UPDATE users
        SET name = COALESCE($2, name),
            email = COALESCE($3, email),
            photo_url = COALESCE($4, photo_url),
            phone_number = COALESCE($5, phone_number),
            updated_at = $6
        WHERE id = $1
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(user_id)
    .bind(&update.name)
    .bind(&update.email)
    .bind(&update.photo_url)
    .bind(&update.phone_number)
    .bind(now)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(row_to_user))
}

/// Replace a user's search preferences
pub async fn update_preferences(
    pool: &PgPool,
    user_id: Uuid,
    prefs: &Preferences,
) -> Result<Option<User>, sqlx::Error> {
    let now = Utc::now();

    let row = sqlx::query(&format!(
        r#"
        UPDATE users
        SET notifications = $2, email_updates = $3, radius_km = $4, updated_at = $5
        WHERE id = $1
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(user_id)
    .bind(prefs.notifications)
    .bind(prefs.email_updates)
    .bind(prefs.radius)
    .bind(now)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(row_to_user))
}

/// Store the caller's push device token
pub async fn update_fcm_token(
    pool: &PgPool,
    user_id: Uuid,
    fcm_token: &str,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE users SET fcm_token = $2, updated_at = $3 WHERE id = $1")
        .bind(user_id)
        .bind(fcm_token)
        .bind(Utc::now())
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Get a user's push device token, if registered
pub async fn get_fcm_token(pool: &PgPool, user_id: Uuid) -> Result<Option<String>, sqlx::Error> {
    let row = sqlx::query("SELECT fcm_token FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

    Ok(row.and_then(|r| r.get("fcm_token")))
}

/// Delete a user account
///
/// Deletes the user row only. Dogs, matches, and notifications owned by the
/// user are left in place.
pub async fn delete_user(pool: &PgPool, user_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_preferences() {
        let prefs = Preferences::default();
        assert!(prefs.notifications);
        assert!(prefs.email_updates);
        assert_eq!(prefs.radius, 10);
    }

    #[test]
    fn test_profile_serialization_omits_hash() {
        let user = User {
            id: Uuid::new_v4(),
            email: "test@example.com".to_string(),
            password_hash: "$2b$12$secret".to_string(),
            name: "Test".to_string(),
            photo_url: None,
            phone_number: None,
            preferences: Preferences::default(),
            fcm_token: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let profile: UserProfile = user.into();
        let json = serde_json::to_string(&profile).unwrap();
        assert!(!json.contains("secret"));
        assert!(json.contains("\"emailUpdates\":true"));
    }

    #[test]
    fn test_profile_update_accepts_photo_url_key() {
        let update: ProfileUpdate =
            serde_json::from_str(r#"{"photoURL": "https://example.com/p.jpg"}"#).unwrap();
        assert_eq!(
            update.photo_url.as_deref(),
            Some("https://example.com/p.jpg")
        );
        assert!(update.name.is_none());
    }
}
