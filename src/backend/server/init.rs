//! Server Initialization
//!
//! Assembles the application: database pool (with migrations), the
//! connection registry, and the router.

use axum::Router;

use crate::backend::realtime::ConnectionRegistry;
use crate::backend::routes::router::create_router;
use crate::backend::server::config::load_database;
use crate::backend::server::state::AppState;

/// Create and configure the Axum application.
///
/// # Initialization Steps
///
/// 1. Connect the database pool and run migrations
/// 2. Create the (empty) connection registry
/// 3. Assemble the router around the shared state
pub async fn create_app() -> Result<Router<()>, sqlx::Error> {
    tracing::info!("Initializing Lightpost server");

    let db_pool = load_database().await?;
    let registry = ConnectionRegistry::new();

    let app_state = AppState { db_pool, registry };

    Ok(create_router(app_state))
}
