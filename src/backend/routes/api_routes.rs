//! API Route Configuration
//!
//! Public auth endpoints plus the cookie-gated board endpoints.
//!
//! ## Public
//!
//! - `POST /register` - user registration
//! - `POST /login` - user login (sets session cookies)
//! - `POST /logout` - clears session cookies
//! - `POST /refresh` - rotates the token pair
//!
//! ## Cookie-gated
//!
//! - `GET /boards` - full board snapshot
//! - `POST /pin` - pin a board (REST equivalent of the channel event)
//! - `POST /reply` - append a reply (REST equivalent)

use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use axum::Router;

use crate::backend::auth::handlers::{login, logout, refresh, register};
use crate::backend::boards::handlers::{list_boards, pin, reply};
use crate::backend::middleware::auth_middleware;
use crate::backend::server::state::AppState;

/// Add the API routes to the router
pub fn configure_api_routes(
    router: Router<AppState>,
    app_state: &AppState,
) -> Router<AppState> {
    let protected = Router::new()
        .route("/boards", get(list_boards))
        .route("/pin", post(pin))
        .route("/reply", post(reply))
        .layer(from_fn_with_state(app_state.clone(), auth_middleware));

    router
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/refresh", post(refresh))
        .merge(protected)
}
