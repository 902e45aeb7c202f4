//! Error Taxonomy
//!
//! `ApiError` covers every failure a handler can surface:
//!
//! - `Validation` - missing/empty required field (400)
//! - `Auth` - no/invalid/expired token, bad credentials (401)
//! - `NotFound` - referenced board absent (404)
//! - `Conflict` - duplicate username/email (409)
//! - `Store` - persistence failure, no partial-state cleanup (500)
//! - `Serialization` / `Token` - internal failures (500)
//!
//! Server-side failures are logged in full but surfaced to clients as a
//! generic message; see [`crate::backend::error::conversion`].

use axum::http::StatusCode;
use thiserror::Error;

use crate::backend::auth::sessions::AuthError;

/// Backend error taxonomy. Each variant maps to one HTTP status.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or empty required field
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// Authentication failure (token or credentials)
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Referenced record does not exist
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// Unique-constraint conflict (duplicate username/email)
    #[error("Conflict: {message}")]
    Conflict { message: String },

    /// Persistence failure
    #[error("Store error: {0}")]
    Store(#[from] sqlx::Error),

    /// JSON encode/decode failure
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Token signing failure
    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
}

impl ApiError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a not-found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::Auth(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::Store(_) | Self::Serialization(_) | Self::Token(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message safe to return to clients. Internal failures collapse to
    /// a generic message so details never leak out of the process.
    pub fn public_message(&self) -> String {
        match self {
            Self::Validation { message }
            | Self::NotFound { message }
            | Self::Conflict { message } => message.clone(),
            Self::Auth(err) => err.to_string(),
            Self::Store(_) | Self::Serialization(_) | Self::Token(_) => {
                "Server error".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_mapping() {
        assert_eq!(
            ApiError::validation("missing text").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Auth(AuthError::NoToken).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::not_found("Board not found").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::conflict("Email already exists").status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::Store(sqlx::Error::PoolClosed).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_errors_do_not_leak() {
        let error = ApiError::Store(sqlx::Error::PoolClosed);
        assert_eq!(error.public_message(), "Server error");
    }

    #[test]
    fn test_client_errors_keep_their_message() {
        let error = ApiError::validation("Missing text or location");
        assert_eq!(error.public_message(), "Missing text or location");
    }

    #[test]
    fn test_from_auth_error() {
        let error: ApiError = AuthError::InvalidToken.into();
        match error {
            ApiError::Auth(AuthError::InvalidToken) => {}
            _ => panic!("Expected Auth variant"),
        }
    }
}
