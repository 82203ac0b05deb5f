/**
 * Dog Profiles
 *
 * Dog documents, owner-scoped mutation, and the nearby geo search.
 */

/// Dog records and database operations
pub mod db;

/// Great-circle distance
pub mod geo;

/// HTTP handlers
pub mod handlers;
