//! Authentication Middleware
//!
//! Protects REST routes behind the session cookie. The middleware:
//!
//! 1. Reads the raw `Cookie` header and resolves the access token
//!    through the sessions module (the same seam the channel handshake
//!    uses)
//! 2. Confirms the resolved user still exists and is active
//! 3. Attaches [`AuthenticatedUser`] to request extensions for handlers
//!
//! Returns 401 if the token is missing, invalid, expired, or refers to
//! a deactivated user.

use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;

use crate::backend::auth::sessions::{verify_cookie_header, AuthError, ACCESS_COOKIE};
use crate::backend::auth::users::get_user_by_id;
use crate::backend::error::ApiError;
use crate::backend::server::state::AppState;

/// Authenticated user data resolved from the session cookie
#[derive(Clone, Copy, Debug)]
pub struct AuthenticatedUser {
    pub user_id: i64,
}

/// Authentication middleware for cookie-gated REST routes
pub async fn auth_middleware(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let cookie_header = request
        .headers()
        .get(header::COOKIE)
        .and_then(|h| h.to_str().ok());

    let user_id = verify_cookie_header(cookie_header, ACCESS_COOKIE).map_err(|e| {
        tracing::warn!("Rejected request: {e}");
        e
    })?;

    // A valid token must still resolve to an existing, active user.
    let user = get_user_by_id(&app_state.db_pool, user_id).await?;
    if !user.map(|u| u.is_active).unwrap_or(false) {
        tracing::warn!("Token for missing or deactivated user {user_id}");
        return Err(AuthError::InvalidToken.into());
    }

    request.extensions_mut().insert(AuthenticatedUser { user_id });

    Ok(next.run(request).await)
}

/// Axum extractor for the authenticated user
///
/// Usable as a handler parameter on any route behind
/// [`auth_middleware`].
#[derive(Clone, Copy, Debug)]
pub struct AuthUser(pub AuthenticatedUser);

impl axum::extract::FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .copied()
            .ok_or_else(|| {
                tracing::warn!("AuthenticatedUser not found in request extensions");
                ApiError::Auth(AuthError::NoToken)
            })?;

        Ok(AuthUser(user))
    }
}
