/**
 * Dog Profile Handlers
 *
 * HTTP handlers for dog CRUD and the nearby search.
 *
 * # Ownership
 *
 * Creation always records the caller as owner, regardless of anything in
 * the request body. Update and delete are restricted to the owner.
 *
 * # Nearby Search
 *
 * Fetches the whole collection, computes Haversine distance per candidate,
 * keeps `distance <= radius` (default 10 km), and excludes the caller's own
 * dogs.
 */

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::dogs::db::{self, Dog, DogCreate, DogUpdate};
use crate::dogs::geo::{haversine_km, GeoPoint};
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::server::state::AppState;

/// Default nearby search radius in kilometers
pub const DEFAULT_RADIUS_KM: f64 = 10.0;

const MIN_NAME_LEN: usize = 2;
const MAX_NAME_LEN: usize = 50;
const MAX_AGE: i32 = 30;
const MAX_PHOTOS: usize = 6;
const MAX_DESCRIPTION_LEN: usize = 500;

fn validate_name(name: &str) -> Result<(), ApiError> {
    let len = name.chars().count();
    if !(MIN_NAME_LEN..=MAX_NAME_LEN).contains(&len) {
        return Err(ApiError::validation(format!(
            "Name must be {MIN_NAME_LEN}-{MAX_NAME_LEN} characters"
        )));
    }
    Ok(())
}

fn validate_age(age: i32) -> Result<(), ApiError> {
    if !(0..=MAX_AGE).contains(&age) {
        return Err(ApiError::validation(format!("Age must be 0-{MAX_AGE}")));
    }
    Ok(())
}

fn validate_photos(photos: &[String]) -> Result<(), ApiError> {
    if photos.len() > MAX_PHOTOS {
        return Err(ApiError::validation(format!(
            "At most {MAX_PHOTOS} photos allowed"
        )));
    }
    Ok(())
}

fn validate_description(description: &str) -> Result<(), ApiError> {
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(ApiError::validation(format!(
            "Description must be at most {MAX_DESCRIPTION_LEN} characters"
        )));
    }
    Ok(())
}

fn validate_location(location: &GeoPoint) -> Result<(), ApiError> {
    if !location.is_valid() {
        return Err(ApiError::validation(
            "Latitude must be in [-90, 90] and longitude in [-180, 180]",
        ));
    }
    Ok(())
}

fn validate_create(payload: &DogCreate) -> Result<(), ApiError> {
    validate_name(&payload.name)?;
    if payload.breed.trim().is_empty() {
        return Err(ApiError::validation("Breed is required"));
    }
    validate_age(payload.age)?;
    validate_photos(&payload.photos)?;
    validate_description(&payload.description)?;
    validate_location(&payload.location)
}

fn validate_update(update: &DogUpdate) -> Result<(), ApiError> {
    if let Some(name) = &update.name {
        validate_name(name)?;
    }
    if let Some(breed) = &update.breed {
        if breed.trim().is_empty() {
            return Err(ApiError::validation("Breed must not be empty"));
        }
    }
    if let Some(age) = update.age {
        validate_age(age)?;
    }
    if let Some(photos) = &update.photos {
        validate_photos(photos)?;
    }
    if let Some(description) = &update.description {
        validate_description(description)?;
    }
    if let Some(location) = &update.location {
        validate_location(location)?;
    }
    Ok(())
}

/// Create a dog profile (POST /api/dogs)
///
/// The created dog is owned by the caller.
pub async fn create_dog(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Json(payload): Json<DogCreate>,
) -> Result<(StatusCode, Json<Dog>), ApiError> {
    validate_create(&payload)?;

    let dog = db::create_dog(&state.db_pool, caller.user_id, payload).await?;

    tracing::info!("Dog created: {} (owner {})", dog.id, dog.owner_id);

    Ok((StatusCode::CREATED, Json(dog)))
}

/// Get a dog profile (GET /api/dogs/{id})
pub async fn get_dog(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Dog>, ApiError> {
    let dog = db::get_dog_by_id(&state.db_pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Dog"))?;

    Ok(Json(dog))
}

/// List the caller's dogs (GET /api/dogs)
pub async fn list_my_dogs(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
) -> Result<Json<Vec<Dog>>, ApiError> {
    let dogs = db::list_dogs_for_owner(&state.db_pool, caller.user_id).await?;
    Ok(Json(dogs))
}

/// Update a dog profile (PUT /api/dogs/{id}), owner only
pub async fn update_dog(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<Uuid>,
    Json(update): Json<DogUpdate>,
) -> Result<Json<Dog>, ApiError> {
    validate_update(&update)?;

    let dog = db::get_dog_by_id(&state.db_pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Dog"))?;

    if dog.owner_id != caller.user_id {
        return Err(ApiError::authorization("Not authorized to update this dog"));
    }

    let updated = db::update_dog(&state.db_pool, id, &update)
        .await?
        .ok_or_else(|| ApiError::not_found("Dog"))?;

    Ok(Json(updated))
}

/// Delete a dog profile (DELETE /api/dogs/{id}), owner only
pub async fn delete_dog(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let dog = db::get_dog_by_id(&state.db_pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Dog"))?;

    if dog.owner_id != caller.user_id {
        return Err(ApiError::authorization("Not authorized to delete this dog"));
    }

    db::delete_dog(&state.db_pool, id).await?;

    tracing::info!("Dog deleted: {} (owner {})", id, caller.user_id);

    Ok(Json(
        serde_json::json!({ "message": "Dog profile deleted successfully" }),
    ))
}

/// Query parameters for the nearby search
#[derive(Debug, Deserialize)]
pub struct NearbyParams {
    pub latitude: f64,
    pub longitude: f64,
    pub radius: Option<f64>,
}

/// Nearby search (GET /api/dogs/nearby)
///
/// Linear scan over the full collection with a Haversine distance filter.
/// The caller's own dogs never appear in the results.
pub async fn nearby_dogs(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Query(params): Query<NearbyParams>,
) -> Result<Json<Vec<Dog>>, ApiError> {
    let center = GeoPoint {
        latitude: params.latitude,
        longitude: params.longitude,
    };
    validate_location(&center)?;

    let radius = params.radius.unwrap_or(DEFAULT_RADIUS_KM);
    if radius <= 0.0 {
        return Err(ApiError::validation("Radius must be positive"));
    }

    let dogs = db::list_all_dogs(&state.db_pool).await?;
    let nearby = filter_nearby(dogs, center, radius, caller.user_id);

    Ok(Json(nearby))
}

/// Apply the nearby filter to a candidate set
fn filter_nearby(dogs: Vec<Dog>, center: GeoPoint, radius_km: f64, caller_id: Uuid) -> Vec<Dog> {
    dogs.into_iter()
        .filter(|dog| dog.owner_id != caller_id)
        .filter(|dog| haversine_km(center, dog.location) <= radius_km)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dogs::db::Gender;
    use chrono::Utc;

    fn test_dog(owner_id: Uuid, latitude: f64, longitude: f64) -> Dog {
        Dog {
            id: Uuid::new_v4(),
            owner_id,
            name: "Rex".to_string(),
            breed: "Labrador".to_string(),
            age: 3,
            gender: Gender::Male,
            photos: vec![],
            description: "A friendly lab".to_string(),
            location: GeoPoint {
                latitude,
                longitude,
            },
            traits: None,
            medical_info: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_nearby_includes_within_radius() {
        let caller = Uuid::new_v4();
        let other = Uuid::new_v4();
        let center = GeoPoint {
            latitude: 40.7128,
            longitude: -74.0060,
        };
        // ~1.9 km from the center
        let dogs = vec![test_dog(other, 40.73, -74.02)];

        let result = filter_nearby(dogs, center, 10.0, caller);
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_nearby_excludes_outside_radius() {
        let caller = Uuid::new_v4();
        let other = Uuid::new_v4();
        let center = GeoPoint {
            latitude: 40.7128,
            longitude: -74.0060,
        };
        let dogs = vec![test_dog(other, 40.73, -74.02)];

        let result = filter_nearby(dogs, center, 1.0, caller);
        assert!(result.is_empty());
    }

    #[test]
    fn test_nearby_excludes_own_dogs() {
        let caller = Uuid::new_v4();
        let center = GeoPoint {
            latitude: 40.7128,
            longitude: -74.0060,
        };
        // The caller's own dog sits at the center itself
        let dogs = vec![
            test_dog(caller, 40.7128, -74.0060),
            test_dog(Uuid::new_v4(), 40.7128, -74.0060),
        ];

        let result = filter_nearby(dogs, center, 10.0, caller);
        assert_eq!(result.len(), 1);
        assert_ne!(result[0].owner_id, caller);
    }

    #[test]
    fn test_validate_create_rejects_bad_age() {
        let payload: DogCreate = serde_json::from_value(serde_json::json!({
            "name": "Rex",
            "breed": "Labrador",
            "age": 31,
            "gender": "male",
            "description": "ok",
            "location": {"latitude": 0.0, "longitude": 0.0}
        }))
        .unwrap();

        assert!(validate_create(&payload).is_err());
    }

    #[test]
    fn test_validate_create_rejects_out_of_range_location() {
        let payload: DogCreate = serde_json::from_value(serde_json::json!({
            "name": "Rex",
            "breed": "Labrador",
            "age": 3,
            "gender": "female",
            "description": "ok",
            "location": {"latitude": 95.0, "longitude": 0.0}
        }))
        .unwrap();

        assert!(validate_create(&payload).is_err());
    }

    #[test]
    fn test_validate_update_rejects_too_many_photos() {
        let update = DogUpdate {
            photos: Some(vec!["p".to_string(); 7]),
            ..Default::default()
        };
        assert!(validate_update(&update).is_err());
    }

    #[test]
    fn test_validate_update_accepts_partial() {
        let update = DogUpdate {
            description: Some("Updated description".to_string()),
            ..Default::default()
        };
        assert!(validate_update(&update).is_ok());
    }
}
