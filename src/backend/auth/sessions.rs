//! Session Tokens and the Cookie Seam
//!
//! This module owns the session token pair and every piece of cookie
//! handling in the crate. Access tokens (15 minutes) authenticate both
//! REST requests and channel handshakes; refresh tokens (7 days) are
//! used only to mint new pairs. Both are HS256 JWTs carried in
//! `HttpOnly; SameSite=Strict` cookies.
//!
//! Both transports - the REST middleware and the WebSocket handshake -
//! authenticate through the single [`verify_cookie_header`] entry
//! point, so there is exactly one cookie parser in the process.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Cookie carrying the short-lived access token
pub const ACCESS_COOKIE: &str = "accessToken";
/// Cookie carrying the long-lived refresh token
pub const REFRESH_COOKIE: &str = "refreshToken";

/// Access token lifetime: 15 minutes
pub const ACCESS_TTL_SECS: i64 = 15 * 60;
/// Refresh token lifetime: 7 days
pub const REFRESH_TTL_SECS: i64 = 7 * 24 * 60 * 60;

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: String,
    /// Issued at time (Unix timestamp)
    pub iat: u64,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
}

/// Authentication failure, as seen by either transport.
///
/// Malformed, bad-signature, and expired tokens are deliberately not
/// distinguished - they all verify to `InvalidToken`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No access token cookie was presented
    #[error("no token provided")]
    NoToken,
    /// The presented token failed verification for any reason
    #[error("invalid or expired token")]
    InvalidToken,
    /// Login credentials did not match an active user
    #[error("invalid credentials")]
    BadCredentials,
}

impl AuthError {
    /// Machine-readable rejection code, surfaced on handshake refusals
    pub fn code(&self) -> &'static str {
        match self {
            Self::NoToken => "AUTH_NO_TOKEN",
            Self::InvalidToken => "AUTH_INVALID_TOKEN",
            Self::BadCredentials => "AUTH_BAD_CREDENTIALS",
        }
    }
}

/// An access/refresh token pair, minted together at login or refresh.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Get JWT secret from environment
fn get_jwt_secret() -> String {
    std::env::var("JWT_SECRET").unwrap_or_else(|err| {
        tracing::warn!("Missing JWT_SECRET ({err}), using development fallback");
        "lightpost-dev-secret-change-in-production".to_string()
    })
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Sign a token for `user_id` expiring `ttl_secs` from now.
///
/// A negative TTL produces an already-expired token; tests use that to
/// exercise the expiry path.
pub(crate) fn sign_token(
    user_id: i64,
    ttl_secs: i64,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = unix_now();
    let exp = now.saturating_add_signed(ttl_secs);

    let claims = Claims {
        sub: user_id.to_string(),
        iat: now,
        exp,
    };

    let secret = get_jwt_secret();
    let key = EncodingKey::from_secret(secret.as_ref());

    encode(&Header::default(), &claims, &key)
}

/// Mint a fresh access/refresh pair for a user
pub fn issue_token_pair(user_id: i64) -> Result<TokenPair, jsonwebtoken::errors::Error> {
    Ok(TokenPair {
        access_token: sign_token(user_id, ACCESS_TTL_SECS)?,
        refresh_token: sign_token(user_id, REFRESH_TTL_SECS)?,
    })
}

/// Verify a token and resolve the user id it was issued for.
///
/// Any verification failure - malformed token, bad signature, expired -
/// collapses to [`AuthError::InvalidToken`].
pub fn verify_token(token: &str) -> Result<i64, AuthError> {
    let secret = get_jwt_secret();
    let key = DecodingKey::from_secret(secret.as_ref());
    let validation = Validation::default();

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| {
        tracing::debug!("token verification failed: {e}");
        AuthError::InvalidToken
    })?;

    token_data
        .claims
        .sub
        .parse::<i64>()
        .map_err(|_| AuthError::InvalidToken)
}

/// Pull one cookie's value out of a raw `Cookie` header.
fn cookie_value<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header
        .split(';')
        .filter_map(|part| part.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
}

/// The single authentication seam for both transports.
///
/// Takes the raw `Cookie` header (channel handshakes do not pass
/// through the REST middleware stack, so both callers hand the header
/// in unparsed) and resolves the named token cookie to a user id.
///
/// # Errors
///
/// * [`AuthError::NoToken`] - header absent or cookie not present
/// * [`AuthError::InvalidToken`] - cookie present but fails verification
pub fn verify_cookie_header(
    header: Option<&str>,
    cookie_name: &str,
) -> Result<i64, AuthError> {
    let token = header
        .and_then(|h| cookie_value(h, cookie_name))
        .filter(|t| !t.is_empty())
        .ok_or(AuthError::NoToken)?;
    verify_token(token)
}

fn secure_cookies() -> bool {
    std::env::var("APP_ENV").map(|env| env == "production").unwrap_or(false)
}

/// Build a `Set-Cookie` value for a session token.
///
/// `HttpOnly; SameSite=Strict; Path=/`, with `Secure` added in
/// production, and `Max-Age` matching the token TTL.
pub fn session_cookie(name: &str, value: &str, max_age_secs: i64) -> String {
    let mut cookie =
        format!("{name}={value}; Path=/; HttpOnly; SameSite=Strict; Max-Age={max_age_secs}");
    if secure_cookies() {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Build a `Set-Cookie` value that clears a session cookie
pub fn clear_session_cookie(name: &str) -> String {
    let mut cookie = format!("{name}=; Path=/; HttpOnly; SameSite=Strict; Max-Age=0");
    if secure_cookies() {
        cookie.push_str("; Secure");
    }
    cookie
}
