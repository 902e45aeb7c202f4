//! Registration Handler
//!
//! `POST /register` - create a new user account.
//!
//! # Validation
//!
//! - Username: 3-30 characters, starts with a letter, alphanumeric
//!   plus underscore
//! - Email: must contain '@'
//! - Password: at least 8 characters
//!
//! Duplicate usernames and emails return 409 Conflict with a message
//! saying which field collided.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use sqlx::SqlitePool;

use crate::backend::auth::handlers::types::{RegisterRequest, RegisterResponse};
use crate::backend::auth::users::create_user;
use crate::backend::error::ApiError;

/// Validate username format
///
/// Usernames must be:
/// - 3-30 characters long
/// - Contain only alphanumeric characters and underscores
/// - Start with a letter
fn is_valid_username(username: &str) -> bool {
    if username.len() < 3 || username.len() > 30 {
        return false;
    }

    let mut chars = username.chars();

    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }

    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Registration handler
///
/// # Errors
///
/// * `400 Bad Request` - missing/invalid username, email, or password
/// * `409 Conflict` - username or email already taken
/// * `500 Internal Server Error` - store failure
pub async fn register(
    State(pool): State<SqlitePool>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let username = request.username.trim();
    let email = request.email.trim();

    if username.is_empty() || email.is_empty() || request.password.is_empty() {
        return Err(ApiError::validation(
            "Username, email, and password are required",
        ));
    }

    if !is_valid_username(username) {
        tracing::warn!("Invalid username format: {username}");
        return Err(ApiError::validation(
            "Username must be 3-30 chars, start with a letter, and contain only letters, numbers, and underscores",
        ));
    }

    if !email.contains('@') {
        tracing::warn!("Invalid email format: {email}");
        return Err(ApiError::validation("Invalid email format"));
    }

    if request.password.len() < 8 {
        tracing::warn!("Password too short for registration of {username}");
        return Err(ApiError::validation(
            "Password must be at least 8 characters",
        ));
    }

    let user = create_user(&pool, username, email, &request.password).await?;

    tracing::info!("User registered: {} ({})", user.username, user.email);

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered successfully!".to_string(),
            user_id: user.id,
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::testing::memory_pool;
    use assert_matches::assert_matches;

    fn request(username: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_success() {
        let pool = memory_pool().await;

        let result = register(
            State(pool),
            Json(request("ada", "ada@example.com", "password123")),
        )
        .await;

        let (status, body) = result.unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert!(body.user_id > 0);
    }

    #[tokio::test]
    async fn test_register_missing_fields() {
        let pool = memory_pool().await;

        let result = register(State(pool), Json(request("", "", ""))).await;
        assert_matches!(result, Err(ApiError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_register_invalid_email() {
        let pool = memory_pool().await;

        let result = register(
            State(pool),
            Json(request("ada", "not-an-email", "password123")),
        )
        .await;
        assert_matches!(result, Err(ApiError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_register_short_password() {
        let pool = memory_pool().await;

        let result = register(State(pool), Json(request("ada", "ada@example.com", "short"))).await;
        assert_matches!(result, Err(ApiError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_register_bad_username() {
        let pool = memory_pool().await;

        let result = register(
            State(pool.clone()),
            Json(request("1ada", "ada@example.com", "password123")),
        )
        .await;
        assert_matches!(result, Err(ApiError::Validation { .. }));

        let result = register(
            State(pool),
            Json(request("ab", "ada@example.com", "password123")),
        )
        .await;
        assert_matches!(result, Err(ApiError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let pool = memory_pool().await;

        register(
            State(pool.clone()),
            Json(request("ada", "ada@example.com", "password123")),
        )
        .await
        .unwrap();

        let result = register(
            State(pool),
            Json(request("grace", "ada@example.com", "password123")),
        )
        .await;
        assert_matches!(result, Err(ApiError::Conflict { .. }));
    }

    #[test]
    fn test_username_validation() {
        assert!(is_valid_username("ada"));
        assert!(is_valid_username("ada_lovelace42"));
        assert!(!is_valid_username("ab"));
        assert!(!is_valid_username("1ada"));
        assert!(!is_valid_username("ada lovelace"));
        assert!(!is_valid_username(&"a".repeat(31)));
    }
}
