/// API error types
pub mod types;

/// Conversion of errors into HTTP responses
pub mod conversion;

pub use types::ApiError;
