/**
 * Messaging
 *
 * One append-only chat thread per match. Sending persists the message,
 * fans it out to the match's room, and best-effort-notifies the other
 * participant.
 */

/// Message records and database operations
pub mod db;

/// HTTP handlers
pub mod handlers;
