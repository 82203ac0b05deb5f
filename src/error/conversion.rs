/**
 * Error Conversion
 *
 * This module implements `IntoResponse` for `ApiError`, turning every
 * domain error into the JSON error body used across the API:
 *
 * ```json
 * {
 *   "status": "error",
 *   "message": "Dog not found",
 *   "code": "NOT_FOUND"
 * }
 * ```
 *
 * Server-side failures are logged here with their full source error;
 * client errors are logged at warn level.
 */

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};

use crate::error::types::ApiError;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!("Request failed: {:?}", self);
        } else {
            tracing::warn!("Request rejected: {}", self.message());
        }

        let body = serde_json::json!({
            "status": "error",
            "message": self.message(),
            "code": self.code(),
        });

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_status() {
        let response = ApiError::not_found("Dog").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_error_response_is_json() {
        let response = ApiError::validation("Invalid status").into_response();
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert!(content_type.starts_with("application/json"));
    }
}
