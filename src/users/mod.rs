/**
 * User Service
 *
 * HTTP handlers for the users collection. Mutations are restricted to the
 * account owner; deletion removes the user row only and never cascades to
 * dogs, matches, or notifications.
 */

/// HTTP handlers
pub mod handlers;
