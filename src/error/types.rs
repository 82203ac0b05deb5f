/**
 * API Error Types
 *
 * This module defines the error taxonomy used across all request handlers.
 * Every error maps to one HTTP status code and a stable machine-readable
 * code string; the conversion module turns them into JSON responses.
 *
 * # Error Categories
 *
 * - `Validation` - malformed or out-of-range input (400)
 * - `Authentication` - missing/invalid/expired token (401)
 * - `Authorization` - caller is not the owner/participant (403)
 * - `NotFound` - unknown id or unmatched route (404)
 * - `Conflict` - a store-level uniqueness constraint was violated (409)
 * - `Database` / `Internal` - everything else (500)
 */

use axum::http::StatusCode;
use thiserror::Error;

/// Errors produced by request handlers and domain services
///
/// Each variant carries enough context for the JSON error body. Database
/// errors keep the underlying `sqlx::Error` for logging but never leak its
/// message to clients.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed or out-of-range input
    #[error("{message}")]
    Validation {
        /// Human-readable error message
        message: String,
    },

    /// Missing, invalid, or expired credentials
    #[error("{message}")]
    Authentication {
        /// Human-readable error message
        message: String,
    },

    /// Caller is authenticated but not allowed to perform this action
    #[error("{message}")]
    Authorization {
        /// Human-readable error message
        message: String,
    },

    /// Unknown id or unmatched route
    #[error("{resource} not found")]
    NotFound {
        /// The kind of resource that was looked up
        resource: String,
    },

    /// A uniqueness constraint was violated
    #[error("{message}")]
    Conflict {
        /// Human-readable error message
        message: String,
    },

    /// Database operation failure
    #[error(transparent)]
    Database(#[from] sqlx::Error),

    /// Anything else that should surface as a 500
    #[error("{message}")]
    Internal {
        /// Human-readable error message
        message: String,
    },
}

impl ApiError {
    /// Create a validation error (400)
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create an authentication error (401)
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
        }
    }

    /// Create an authorization error (403)
    pub fn authorization(message: impl Into<String>) -> Self {
        Self::Authorization {
            message: message.into(),
        }
    }

    /// Create a not-found error (404) for the named resource
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Create a conflict error (409)
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Create an internal error (500)
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::Authentication { .. } => StatusCode::UNAUTHORIZED,
            Self::Authorization { .. } => StatusCode::FORBIDDEN,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::Database(_) | Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the stable machine-readable code for the JSON body
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::Authentication { .. } => "AUTHENTICATION_ERROR",
            Self::Authorization { .. } => "AUTHORIZATION_ERROR",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Conflict { .. } => "CONFLICT",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal { .. } => "INTERNAL_SERVER_ERROR",
        }
    }

    /// Get the client-facing error message
    ///
    /// Database errors are replaced by a generic message; the underlying
    /// error is logged, not returned.
    pub fn message(&self) -> String {
        match self {
            Self::Database(_) => "Database operation failed".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<jsonwebtoken::errors::Error> for ApiError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;
        let message = match err.kind() {
            ErrorKind::ExpiredSignature => "Token expired",
            _ => "Invalid token",
        };
        Self::authentication(message)
    }
}

/// Check whether a database error is a unique-constraint violation
///
/// Used by handlers that map duplicate inserts (email, dog pair) to 409.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_mapping() {
        assert_eq!(
            ApiError::validation("bad input").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::authentication("no token").status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::authorization("not owner").status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::not_found("Dog").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::conflict("duplicate").status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::internal("boom").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_not_found_message() {
        let error = ApiError::not_found("Match");
        assert_eq!(error.message(), "Match not found");
        assert_eq!(error.code(), "NOT_FOUND");
    }

    #[test]
    fn test_database_error_does_not_leak() {
        let error = ApiError::Database(sqlx::Error::RowNotFound);
        assert_eq!(error.message(), "Database operation failed");
        assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_expired_token_maps_to_authentication() {
        let err = jsonwebtoken::errors::Error::from(
            jsonwebtoken::errors::ErrorKind::ExpiredSignature,
        );
        let error: ApiError = err.into();
        assert_eq!(error.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(error.message(), "Token expired");
    }
}
