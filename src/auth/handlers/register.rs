/**
 * Registration Handler
 *
 * Implements POST /api/auth/register.
 *
 * # Registration Process
 *
 * 1. Validate email shape, password length, and name presence
 * 2. Hash the password with bcrypt
 * 3. Insert the user (email uniqueness enforced by the store)
 * 4. Issue a session token
 *
 * # Security
 *
 * - Passwords are hashed with bcrypt DEFAULT_COST and never returned
 * - A taken email maps to 409 via the unique constraint, not a pre-read
 */

use axum::{extract::State, http::StatusCode, response::Json};
use bcrypt::{hash, DEFAULT_COST};
use sqlx::PgPool;

use crate::auth::handlers::types::{
    is_valid_email, AuthResponse, RegisterRequest, MIN_PASSWORD_LENGTH,
};
use crate::auth::sessions::create_token;
use crate::auth::users::create_user;
use crate::error::types::is_unique_violation;
use crate::error::ApiError;

/// Register handler
///
/// Creates a new account and returns a session token for immediate use.
///
/// # Errors
///
/// * `400` - invalid email, short password, or empty name
/// * `409` - email already registered
/// * `500` - hashing, insert, or token generation failure
pub async fn register(
    State(pool): State<PgPool>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    tracing::info!("Registration request for email: {}", request.email);

    if !is_valid_email(&request.email) {
        return Err(ApiError::validation("Invalid email format"));
    }

    if request.password.len() < MIN_PASSWORD_LENGTH {
        return Err(ApiError::validation(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    if request.name.trim().is_empty() {
        return Err(ApiError::validation("Name is required"));
    }

    // Hash password
    let password_hash = hash(&request.password, DEFAULT_COST).map_err(|e| {
        tracing::error!("Failed to hash password: {:?}", e);
        ApiError::internal("Server error")
    })?;

    // Create user; the unique constraint on email is the only duplicate check
    let user = create_user(&pool, request.email.clone(), password_hash, request.name)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                ApiError::conflict("Email already registered")
            } else {
                tracing::error!("Failed to create user: {:?}", e);
                ApiError::from(e)
            }
        })?;

    // Create token
    let token = create_token(user.id, user.email.clone()).map_err(|e| {
        tracing::error!("Failed to create token: {:?}", e);
        ApiError::internal("Server error")
    })?;

    tracing::info!("User registered: {} ({})", user.name, user.email);

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: user.into(),
        }),
    ))
}
