/**
 * Authentication Module
 *
 * Session token management, user records, and the register/login/profile
 * handlers. Token verification is a single scheme: HS256-signed session
 * tokens with an expiry claim. There is no secondary lookup path - a bearer
 * string either verifies as a session token or the request is rejected.
 */

/// Session token creation and verification
pub mod sessions;

/// User records and database operations
pub mod users;

/// Register, login, and profile handlers
pub mod handlers;

pub use handlers::{get_profile, login, register, update_profile};
