/**
 * Login Handler
 *
 * Implements POST /api/auth/login.
 *
 * # Security
 *
 * - Unknown email and wrong password return the same 401 to prevent
 *   user enumeration
 * - Password verification uses bcrypt's constant-time comparison
 */

use axum::{extract::State, response::Json};
use bcrypt::verify;
use sqlx::PgPool;

use crate::auth::handlers::types::{AuthResponse, LoginRequest};
use crate::auth::sessions::create_token;
use crate::auth::users::get_user_by_email;
use crate::error::ApiError;

/// Login handler
///
/// Verifies the email and password and returns a session token.
///
/// # Errors
///
/// * `401` - unknown email or wrong password
/// * `500` - database or token generation failure
pub async fn login(
    State(pool): State<PgPool>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    tracing::info!("Login request for email: {}", request.email);

    let user = get_user_by_email(&pool, &request.email)
        .await?
        .ok_or_else(|| {
            tracing::warn!("Login for unknown email: {}", request.email);
            ApiError::authentication("Invalid email or password")
        })?;

    // Verify password
    let valid = verify(&request.password, &user.password_hash).map_err(|e| {
        tracing::error!("Password verification error: {:?}", e);
        ApiError::internal("Server error")
    })?;

    if !valid {
        tracing::warn!("Invalid password for user: {}", user.id);
        return Err(ApiError::authentication("Invalid email or password"));
    }

    let token = create_token(user.id, user.email.clone()).map_err(|e| {
        tracing::error!("Failed to create token: {:?}", e);
        ApiError::internal("Server error")
    })?;

    tracing::info!("User logged in: {}", user.id);

    Ok(Json(AuthResponse {
        token,
        user: user.into(),
    }))
}
