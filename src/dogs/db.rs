//! Database operations for dog profiles
//!
//! Dog rows store the location as flat latitude/longitude columns and the
//! optional trait/medical blocks as JSONB.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::dogs::geo::GeoPoint;

/// Dog gender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "male" => Some(Self::Male),
            "female" => Some(Self::Female),
            _ => None,
        }
    }
}

/// Coarse size bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DogSize {
    Small,
    Medium,
    Large,
}

/// Low/medium/high scale used for energy and friendliness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraitLevel {
    Low,
    Medium,
    High,
}

/// Optional temperament block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DogTraits {
    pub size: DogSize,
    pub energy: TraitLevel,
    pub friendliness: TraitLevel,
}

/// Optional medical block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalInfo {
    pub vaccinated: bool,
    pub neutered: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_checkup: Option<DateTime<Utc>>,
}

/// A dog document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dog {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub breed: String,
    pub age: i32,
    pub gender: Gender,
    pub photos: Vec<String>,
    pub description: String,
    pub location: GeoPoint,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub traits: Option<DogTraits>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medical_info: Option<MedicalInfo>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Creation payload
///
/// `owner_id` is never taken from the request body; the caller identity is.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DogCreate {
    pub name: String,
    pub breed: String,
    pub age: i32,
    pub gender: Gender,
    #[serde(default)]
    pub photos: Vec<String>,
    pub description: String,
    pub location: GeoPoint,
    pub traits: Option<DogTraits>,
    pub medical_info: Option<MedicalInfo>,
}

/// Partial update payload; absent fields keep their current value
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DogUpdate {
    pub name: Option<String>,
    pub breed: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<Gender>,
    pub photos: Option<Vec<String>>,
    pub description: Option<String>,
    pub location: Option<GeoPoint>,
    pub traits: Option<DogTraits>,
    pub medical_info: Option<MedicalInfo>,
}

const DOG_COLUMNS: &str = "id, owner_id, name, breed, age, gender, photos, description, \
     latitude, longitude, traits, medical_info, created_at, updated_at";

fn row_to_dog(row: sqlx::postgres::PgRow) -> Dog {
    let gender: String = row.get("gender");
    let traits: Option<Json<DogTraits>> = row.get("traits");
    let medical_info: Option<Json<MedicalInfo>> = row.get("medical_info");

    Dog {
        id: row.get("id"),
        owner_id: row.get("owner_id"),
        name: row.get("name"),
        breed: row.get("breed"),
        age: row.get("age"),
        gender: Gender::from_str(&gender).unwrap_or(Gender::Male),
        photos: row.get("photos"),
        description: row.get("description"),
        location: GeoPoint {
            latitude: row.get("latitude"),
            longitude: row.get("longitude"),
        },
        traits: traits.map(|j| j.0),
        medical_info: medical_info.map(|j| j.0),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

/// Create a dog profile owned by `owner_id`
pub async fn create_dog(
    pool: &PgPool,
    owner_id: Uuid,
    payload: DogCreate,
) -> Result<Dog, sqlx::Error> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let row = sqlx::query(&format!(
        r#"
        INSERT INTO dogs (id, owner_id, name, breed, age, gender, photos, description,
                          latitude, longitude, traits, medical_info, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $13)
        RETURNING {DOG_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(owner_id)
    .bind(&payload.name)
    .bind(&payload.breed)
    .bind(payload.age)
    .bind(payload.gender.as_str())
    .bind(&payload.photos)
    .bind(&payload.description)
    .bind(payload.location.latitude)
    .bind(payload.location.longitude)
    .bind(payload.traits.map(Json))
    .bind(payload.medical_info.map(Json))
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(row_to_dog(row))
}

/// Get a dog by ID
pub async fn get_dog_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Dog>, sqlx::Error> {
    let row = sqlx::query(&format!("SELECT {DOG_COLUMNS} FROM dogs WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(row_to_dog))
}

/// List dogs owned by a user
pub async fn list_dogs_for_owner(pool: &PgPool, owner_id: Uuid) -> Result<Vec<Dog>, sqlx::Error> {
    let rows = sqlx::query(&format!(
        "SELECT {DOG_COLUMNS} FROM dogs WHERE owner_id = $1 ORDER BY created_at ASC"
    ))
    .bind(owner_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(row_to_dog).collect())
}

/// Fetch the whole dogs collection
///
/// The nearby search filters this in memory; the linear scan over the full
/// table is a deliberate design choice for the expected data size.
pub async fn list_all_dogs(pool: &PgPool) -> Result<Vec<Dog>, sqlx::Error> {
    let rows = sqlx::query(&format!("SELECT {DOG_COLUMNS} FROM dogs"))
        .fetch_all(pool)
        .await?;

    Ok(rows.into_iter().map(row_to_dog).collect())
}

/// Apply a partial update to a dog profile
pub async fn update_dog(
    pool: &PgPool,
    id: Uuid,
    update: &DogUpdate,
) -> Result<Option<Dog>, sqlx::Error> {
    let now = Utc::now();

    let row = sqlx::query(&format!(
        r#"
        UPDATE dogs
        SET name = COALESCE($2, name),
            breed = COALESCE($3, breed),
            age = COALESCE($4, age),
            gender = COALESCE($5, gender),
            photos = COALESCE($6, photos),
            description = COALESCE($7, description),
            latitude = COALESCE($8, latitude),
            longitude = COALESCE($9, longitude),
            traits = COALESCE($10, traits),
            medical_info = COALESCE($11, medical_info),
            updated_at = $12
        WHERE id = $1
        RETURNING {DOG_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(&update.name)
    .bind(&update.breed)
    .bind(update.age)
    .bind(update.gender.map(|g| g.as_str()))
    .bind(&update.photos)
    .bind(&update.description)
    .bind(update.location.map(|l| l.latitude))
    .bind(update.location.map(|l| l.longitude))
    .bind(update.traits.clone().map(Json))
    .bind(update.medical_info.clone().map(Json))
    .bind(now)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(row_to_dog))
}

/// Delete a dog profile
pub async fn delete_dog(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM dogs WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gender_round_trip() {
        assert_eq!(Gender::from_str("male"), Some(Gender::Male));
        assert_eq!(Gender::from_str("female"), Some(Gender::Female));
        assert_eq!(Gender::from_str("other"), None);
        assert_eq!(Gender::Male.as_str(), "male");
    }

    #[test]
    fn test_dog_json_shape() {
        let dog = Dog {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            name: "Rex".to_string(),
            breed: "Labrador".to_string(),
            age: 3,
            gender: Gender::Male,
            photos: vec![],
            description: "A friendly lab".to_string(),
            location: GeoPoint {
                latitude: 40.7128,
                longitude: -74.0060,
            },
            traits: None,
            medical_info: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&dog).unwrap();
        assert!(json.get("ownerId").is_some());
        assert_eq!(json["gender"], "male");
        assert_eq!(json["location"]["latitude"], 40.7128);
        // Optional blocks are omitted, not null
        assert!(json.get("traits").is_none());
    }

    #[test]
    fn test_create_payload_ignores_owner_id() {
        // An ownerId in the body is not part of the payload type
        let payload: DogCreate = serde_json::from_value(serde_json::json!({
            "ownerId": "not-the-caller",
            "name": "Rex",
            "breed": "Labrador",
            "age": 3,
            "gender": "male",
            "description": "A friendly lab",
            "location": {"latitude": 40.7, "longitude": -74.0}
        }))
        .unwrap();

        assert_eq!(payload.name, "Rex");
        assert!(payload.photos.is_empty());
    }

    #[test]
    fn test_traits_deserialization() {
        let traits: DogTraits = serde_json::from_str(
            r#"{"size": "medium", "energy": "high", "friendliness": "high"}"#,
        )
        .unwrap();
        assert_eq!(traits.size, DogSize::Medium);
        assert_eq!(traits.energy, TraitLevel::High);
    }
}
