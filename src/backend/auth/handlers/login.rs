//! Login Handler
//!
//! `POST /login` - verify credentials and establish a session.
//!
//! On success both session cookies are set: `accessToken` (15 minutes,
//! used by REST and the channel handshake) and `refreshToken` (7 days,
//! used only by `POST /refresh`). Unknown emails, wrong passwords, and
//! deactivated accounts all return the same 401 so the response does
//! not reveal which accounts exist.

use axum::extract::State;
use axum::http::header::{HeaderName, SET_COOKIE};
use axum::response::{AppendHeaders, Json};
use sqlx::SqlitePool;

use crate::backend::auth::handlers::types::{LoginRequest, MessageResponse};
use crate::backend::auth::sessions::{
    clear_session_cookie, issue_token_pair, session_cookie, AuthError, TokenPair, ACCESS_COOKIE,
    ACCESS_TTL_SECS, REFRESH_COOKIE, REFRESH_TTL_SECS,
};
use crate::backend::auth::users::validate_login;
use crate::backend::error::ApiError;

/// `Set-Cookie` headers installing a freshly minted token pair
pub(crate) fn session_cookie_headers(pair: &TokenPair) -> [(HeaderName, String); 2] {
    [
        (
            SET_COOKIE,
            session_cookie(ACCESS_COOKIE, &pair.access_token, ACCESS_TTL_SECS),
        ),
        (
            SET_COOKIE,
            session_cookie(REFRESH_COOKIE, &pair.refresh_token, REFRESH_TTL_SECS),
        ),
    ]
}

/// `Set-Cookie` headers clearing both session cookies
pub(crate) fn clear_cookie_headers() -> [(HeaderName, String); 2] {
    [
        (SET_COOKIE, clear_session_cookie(ACCESS_COOKIE)),
        (SET_COOKIE, clear_session_cookie(REFRESH_COOKIE)),
    ]
}

/// Login handler
///
/// # Errors
///
/// * `400 Bad Request` - missing email or password
/// * `401 Unauthorized` - credentials do not match an active user
/// * `500 Internal Server Error` - store or token failure
pub async fn login(
    State(pool): State<SqlitePool>,
    Json(request): Json<LoginRequest>,
) -> Result<(AppendHeaders<[(HeaderName, String); 2]>, Json<MessageResponse>), ApiError> {
    if request.email.trim().is_empty() || request.password.is_empty() {
        return Err(ApiError::validation("Email and password required"));
    }

    let user = validate_login(&pool, request.email.trim(), &request.password)
        .await?
        .ok_or(AuthError::BadCredentials)?;

    let pair = issue_token_pair(user.id)?;

    tracing::info!("User logged in: {} ({})", user.username, user.email);

    Ok((
        AppendHeaders(session_cookie_headers(&pair)),
        Json(MessageResponse {
            message: "Logged in successfully, welcome!".to_string(),
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::auth::sessions::verify_token;
    use crate::backend::auth::users::create_user;
    use crate::backend::testing::memory_pool;
    use assert_matches::assert_matches;

    fn request(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_login_success_sets_both_cookies() {
        let pool = memory_pool().await;
        let user = create_user(&pool, "ada", "ada@example.com", "password123")
            .await
            .unwrap();

        let result = login(State(pool), Json(request("ada@example.com", "password123"))).await;
        let (AppendHeaders(cookies), _) = result.unwrap();

        assert!(cookies[0].1.starts_with("accessToken="));
        assert!(cookies[1].1.starts_with("refreshToken="));

        // Each cookie carries a token that verifies back to the user.
        for (_, cookie) in &cookies {
            let token = cookie
                .split_once('=')
                .unwrap()
                .1
                .split(';')
                .next()
                .unwrap();
            assert_eq!(verify_token(token).unwrap(), user.id);
        }
    }

    #[tokio::test]
    async fn test_login_missing_fields() {
        let pool = memory_pool().await;
        let result = login(State(pool), Json(request("", ""))).await;
        assert_matches!(result, Err(ApiError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let pool = memory_pool().await;
        create_user(&pool, "ada", "ada@example.com", "password123")
            .await
            .unwrap();

        let result = login(State(pool), Json(request("ada@example.com", "wrong"))).await;
        assert_matches!(result, Err(ApiError::Auth(AuthError::BadCredentials)));
    }

    #[tokio::test]
    async fn test_login_unknown_user() {
        let pool = memory_pool().await;
        let result = login(
            State(pool),
            Json(request("nobody@example.com", "password123")),
        )
        .await;
        assert_matches!(result, Err(ApiError::Auth(AuthError::BadCredentials)));
    }
}
