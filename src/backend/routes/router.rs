//! Router Configuration
//!
//! Assembles all routes into the application router:
//!
//! 1. The real-time channel upgrade (`GET /channel`, does its own
//!    handshake auth)
//! 2. API routes - public auth endpoints and cookie-gated board
//!    endpoints
//! 3. CORS (reflected origin with credentials, so the browser client
//!    can send its cookies) and request tracing layers

use axum::http::{header, Method};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::backend::realtime::handle_channel;
use crate::backend::routes::api_routes::configure_api_routes;
use crate::backend::server::state::AppState;

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router<()> {
    let router = Router::new().route("/channel", axum::routing::get(handle_channel));

    let router = configure_api_routes(router, &app_state);

    // Cookies require a concrete reflected origin; a wildcard would
    // make the browser drop credentialed requests.
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    router
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
