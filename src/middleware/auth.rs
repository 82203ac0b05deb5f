/**
 * Authentication Middleware
 *
 * This module provides the authentication gate for protected routes. It
 * extracts and verifies the session token from the Authorization header and
 * attaches the caller identity to the request.
 */

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::sessions::verify_token;
use crate::auth::users::get_user_by_id;
use crate::error::ApiError;
use crate::server::state::AppState;

/// Authenticated caller identity extracted from the session token
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub email: String,
}

/// Authentication middleware
///
/// 1. Extracts the bearer token from the Authorization header
/// 2. Verifies the token
/// 3. Confirms the account still exists (a token for a deleted account is
///    rejected)
/// 4. Attaches `AuthenticatedUser` to request extensions for handlers
///
/// Returns 401 if the token is missing, invalid, or expired.
pub async fn auth_middleware(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            tracing::warn!("Missing Authorization header");
            ApiError::authentication("No authorization header")
        })?;

    // Extract token (format: "Bearer <token>")
    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        tracing::warn!("Invalid Authorization header format");
        ApiError::authentication("No token provided")
    })?;

    // Verify token
    let claims = verify_token(token).map_err(|e| {
        tracing::warn!("Invalid token: {:?}", e);
        ApiError::from(e)
    })?;

    let user_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| ApiError::authentication("Invalid token"))?;

    // The account behind the token must still exist
    verify_user_exists(&app_state.db_pool, user_id).await?;

    request.extensions_mut().insert(AuthenticatedUser {
        user_id,
        email: claims.email,
    });

    Ok(next.run(request).await)
}

/// Verify the account behind a token still exists
async fn verify_user_exists(pool: &PgPool, user_id: Uuid) -> Result<(), ApiError> {
    get_user_by_id(pool, user_id)
        .await?
        .ok_or_else(|| {
            tracing::warn!("Token for deleted account: {}", user_id);
            ApiError::authentication("Account no longer exists")
        })?;

    Ok(())
}

/// Axum extractor for the authenticated caller
///
/// Used as a handler parameter to pull the identity the middleware attached
/// to request extensions.
#[derive(Clone, Debug)]
pub struct AuthUser(pub AuthenticatedUser);

impl axum::extract::FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| {
                tracing::warn!("AuthenticatedUser not found in request extensions");
                ApiError::authentication("Authentication required")
            })?;

        Ok(AuthUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    #[tokio::test]
    async fn test_extractor_reads_extensions() {
        let mut request = Request::builder()
            .uri("http://example.com")
            .body(())
            .unwrap();

        let user = AuthenticatedUser {
            user_id: Uuid::new_v4(),
            email: "test@example.com".to_string(),
        };
        request.extensions_mut().insert(user.clone());

        let (parts, _) = request.into_parts();
        let extracted = parts.extensions.get::<AuthenticatedUser>().cloned();
        assert_eq!(extracted.unwrap().user_id, user.user_id);
    }

    #[tokio::test]
    async fn test_extractor_missing_identity() {
        let request = Request::builder()
            .uri("http://example.com")
            .body(())
            .unwrap();

        let (parts, _) = request.into_parts();
        assert!(parts.extensions.get::<AuthenticatedUser>().is_none());
    }
}
