//! Logout and Refresh Handlers
//!
//! `POST /logout` clears both session cookies; the client is expected
//! to close its channel itself on logout (the server performs no
//! eviction). `POST /refresh` exchanges a valid refresh token for a
//! freshly minted pair, re-checking that the user still exists and is
//! active before issuing.

use axum::extract::State;
use axum::http::header::{self, HeaderName};
use axum::http::HeaderMap;
use axum::response::{AppendHeaders, Json};
use sqlx::SqlitePool;

use crate::backend::auth::handlers::login::{clear_cookie_headers, session_cookie_headers};
use crate::backend::auth::handlers::types::MessageResponse;
use crate::backend::auth::sessions::{
    issue_token_pair, verify_cookie_header, AuthError, REFRESH_COOKIE,
};
use crate::backend::auth::users::get_user_by_id;
use crate::backend::error::ApiError;

/// Logout handler: clears both cookies unconditionally
pub async fn logout() -> (AppendHeaders<[(HeaderName, String); 2]>, Json<MessageResponse>) {
    (
        AppendHeaders(clear_cookie_headers()),
        Json(MessageResponse {
            message: "Logged out successfully!".to_string(),
        }),
    )
}

/// Refresh handler: mint a new token pair from a valid refresh cookie
///
/// # Errors
///
/// * `401 Unauthorized` - refresh cookie missing, invalid, expired, or
///   the user no longer exists / was deactivated
/// * `500 Internal Server Error` - store or token failure
pub async fn refresh(
    State(pool): State<SqlitePool>,
    headers: HeaderMap,
) -> Result<(AppendHeaders<[(HeaderName, String); 2]>, Json<MessageResponse>), ApiError> {
    let cookie_header = headers
        .get(header::COOKIE)
        .and_then(|h| h.to_str().ok());

    let user_id = verify_cookie_header(cookie_header, REFRESH_COOKIE)?;

    // A valid token must still resolve to an existing, active user.
    let user = get_user_by_id(&pool, user_id)
        .await?
        .filter(|u| u.is_active)
        .ok_or(AuthError::InvalidToken)?;

    let pair = issue_token_pair(user.id)?;

    tracing::info!("Session refreshed for user {}", user.id);

    Ok((
        AppendHeaders(session_cookie_headers(&pair)),
        Json(MessageResponse {
            message: "Session refreshed".to_string(),
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::auth::sessions::{sign_token, REFRESH_TTL_SECS};
    use crate::backend::auth::users::{create_user, deactivate_user};
    use crate::backend::testing::memory_pool;
    use assert_matches::assert_matches;

    fn cookie_headers(raw: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, raw.parse().unwrap());
        headers
    }

    #[tokio::test]
    async fn test_logout_clears_cookies() {
        let (AppendHeaders(cookies), _) = logout().await;
        assert!(cookies[0].1.starts_with("accessToken=;"));
        assert!(cookies[1].1.starts_with("refreshToken=;"));
        assert!(cookies.iter().all(|(_, c)| c.contains("Max-Age=0")));
    }

    #[tokio::test]
    async fn test_refresh_issues_new_pair() {
        let pool = memory_pool().await;
        let user = create_user(&pool, "ada", "ada@example.com", "password123")
            .await
            .unwrap();
        let token = sign_token(user.id, REFRESH_TTL_SECS).unwrap();

        let result = refresh(State(pool), cookie_headers(&format!("refreshToken={token}"))).await;
        let (AppendHeaders(cookies), _) = result.unwrap();
        assert!(cookies[0].1.starts_with("accessToken="));
        assert!(cookies[1].1.starts_with("refreshToken="));
    }

    #[tokio::test]
    async fn test_refresh_without_cookie() {
        let pool = memory_pool().await;
        let result = refresh(State(pool), HeaderMap::new()).await;
        assert_matches!(result, Err(ApiError::Auth(AuthError::NoToken)));
    }

    #[tokio::test]
    async fn test_refresh_with_expired_token() {
        let pool = memory_pool().await;
        let user = create_user(&pool, "ada", "ada@example.com", "password123")
            .await
            .unwrap();
        let token = sign_token(user.id, -3600).unwrap();

        let result = refresh(State(pool), cookie_headers(&format!("refreshToken={token}"))).await;
        assert_matches!(result, Err(ApiError::Auth(AuthError::InvalidToken)));
    }

    #[tokio::test]
    async fn test_refresh_rejects_deactivated_user() {
        let pool = memory_pool().await;
        let user = create_user(&pool, "ada", "ada@example.com", "password123")
            .await
            .unwrap();
        deactivate_user(&pool, user.id).await.unwrap();
        let token = sign_token(user.id, REFRESH_TTL_SECS).unwrap();

        let result = refresh(State(pool), cookie_headers(&format!("refreshToken={token}"))).await;
        assert_matches!(result, Err(ApiError::Auth(AuthError::InvalidToken)));
    }
}
