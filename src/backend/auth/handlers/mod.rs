//! Authentication Handlers
//!
//! REST handlers for the auth endpoints:
//!
//! - `POST /register` - create an account
//! - `POST /login` - verify credentials, set session cookies
//! - `POST /logout` - clear session cookies
//! - `POST /refresh` - rotate the token pair from a refresh cookie

/// Login handler and cookie-header helpers
pub mod login;

/// Registration handler
pub mod register;

/// Logout and refresh handlers
pub mod session;

/// Request/response types
pub mod types;

pub use login::login;
pub use register::register;
pub use session::{logout, refresh};
