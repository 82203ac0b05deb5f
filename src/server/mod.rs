/**
 * Server Module
 *
 * Application state, configuration loading, and server initialization.
 */

/// Server configuration
pub mod config;

/// Application state
pub mod state;

/// Server initialization
pub mod init;

pub use init::create_app;
pub use state::AppState;
