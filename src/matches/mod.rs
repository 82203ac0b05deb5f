/**
 * Match Requests
 *
 * A match links two dogs. It is initiated by dog1's owner, and only dog2's
 * owner may accept or reject it. The unordered dog pair is unique, enforced
 * by a store constraint.
 */

/// Match records and database operations
pub mod db;

/// HTTP handlers
pub mod handlers;
