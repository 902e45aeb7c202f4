//! Authentication Handler Types
//!
//! Request and response types used by the auth handlers.

use serde::{Deserialize, Serialize};

/// Registration request
#[derive(Deserialize, Serialize, Debug)]
pub struct RegisterRequest {
    /// User's chosen username
    pub username: String,
    /// User's email address
    pub email: String,
    /// User's password (hashed before storage)
    pub password: String,
}

/// Login request
#[derive(Deserialize, Serialize, Debug)]
pub struct LoginRequest {
    /// User's email address
    pub email: String,
    /// User's password (verified against the stored hash)
    pub password: String,
}

/// Registration response: the new user's id
#[derive(Serialize, Deserialize, Debug)]
pub struct RegisterResponse {
    pub message: String,
    #[serde(rename = "userId")]
    pub user_id: i64,
}

/// Generic success message
#[derive(Serialize, Deserialize, Debug)]
pub struct MessageResponse {
    pub message: String,
}
