//! Backend Module
//!
//! All server-side code for Lightpost: an Axum HTTP server with
//! cookie-based session auth, a SQLite-backed board store, and a
//! WebSocket channel that fans every successful mutation out to all
//! connected clients.
//!
//! # Architecture
//!
//! - **`auth`** - user records, JWT token pairs, cookie seam, auth
//!   REST handlers
//! - **`middleware`** - cookie auth middleware for REST routes
//! - **`boards`** - board store, mutation core, board REST handlers
//! - **`realtime`** - connection registry and the WebSocket channel
//! - **`routes`** - router assembly
//! - **`server`** - configuration, shared state, initialization
//! - **`error`** - error taxonomy and HTTP mapping
//!
//! # Concurrency model
//!
//! Everything runs on the tokio runtime; no locks are held across
//! store calls. The connection registry is the only shared mutable
//! resource: written by the connection lifecycle, read by the fan-out.
//! Reply appends are atomic at the store, so interleaved mutations
//! cannot lose updates.

/// Authentication and user management
pub mod auth;

/// Board store, mutations, and REST handlers
pub mod boards;

/// Backend error types
pub mod error;

/// Middleware for request processing
pub mod middleware;

/// Real-time channel and fan-out
pub mod realtime;

/// Route configuration
pub mod routes;

/// Server setup and configuration
pub mod server;

pub use error::ApiError;
pub use realtime::ConnectionRegistry;
pub use server::{create_app, AppState};

/// Shared test fixtures for the inline unit tests.
#[cfg(test)]
pub(crate) mod testing {
    use sqlx::sqlite::SqlitePoolOptions;
    use sqlx::SqlitePool;

    /// Fresh in-memory database with migrations applied. Single
    /// connection: in-memory SQLite is per-connection.
    pub async fn memory_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory pool");
        sqlx::migrate!()
            .run(&pool)
            .await
            .expect("migrations");
        pool
    }
}
