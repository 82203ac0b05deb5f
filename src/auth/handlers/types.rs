/**
 * Authentication Handler Types
 *
 * Request and response types used by the register and login handlers.
 */

use serde::{Deserialize, Serialize};

use crate::auth::users::UserProfile;

/// Registration request
#[derive(Debug, Deserialize, Serialize)]
pub struct RegisterRequest {
    /// User's email address
    pub email: String,
    /// User's password (hashed before storage)
    pub password: String,
    /// User's display name
    pub name: String,
}

/// Login request
#[derive(Debug, Deserialize, Serialize)]
pub struct LoginRequest {
    /// User's email address
    pub email: String,
    /// User's password (verified against the stored hash)
    pub password: String,
}

/// Returned by register and login
///
/// Contains the session token and the user document for immediate use.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    /// Session token (7-day expiration)
    pub token: String,
    /// User document (without sensitive data)
    pub user: UserProfile,
}

/// Basic email shape check
///
/// Mirrors the `local@domain.tld` pattern: non-empty local part, exactly
/// one `@`, a dot in the domain, no whitespace.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let mut parts = email.splitn(2, '@');
    let local = parts.next().unwrap_or_default();
    let domain = parts.next().unwrap_or_default();
    !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}

/// Minimum accepted password length
pub const MIN_PASSWORD_LENGTH: usize = 6;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_emails() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("a.b+c@sub.example.org"));
    }

    #[test]
    fn test_invalid_emails() {
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user@nodot"));
        assert!(!is_valid_email("user@.com"));
        assert!(!is_valid_email("user name@example.com"));
        assert!(!is_valid_email("user@example."));
    }
}
