//! Authentication
//!
//! Credential and session layer: user records, password validation,
//! JWT token pairs carried in cookies, and the REST handlers for
//! register / login / logout / refresh.

/// REST handlers for the auth endpoints
pub mod handlers;

/// Token pair issuance, verification, and cookie handling
pub mod sessions;

/// User model and database operations
pub mod users;

pub use sessions::AuthError;
pub use users::User;
