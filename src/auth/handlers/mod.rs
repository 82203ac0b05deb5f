/// Request/response types shared by the auth handlers
pub mod types;

/// User registration handler
pub mod register;

/// User login handler
pub mod login;

/// Profile read/update handlers
pub mod profile;

pub use login::login;
pub use profile::{get_profile, update_profile};
pub use register::register;
