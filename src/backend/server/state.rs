//! Application State
//!
//! `AppState` is the central state container: the SQLite pool and the
//! connection registry. Both are cheap to clone and shared across all
//! handlers. The `FromRef` impls let handlers extract just the piece
//! they need (`State<SqlitePool>` for the auth handlers, the full
//! state elsewhere), following Axum's recommended pattern.

use axum::extract::FromRef;
use sqlx::SqlitePool;

use crate::backend::realtime::ConnectionRegistry;

/// Application state shared by every handler.
///
/// The registry is written only by the connection lifecycle (insert on
/// handshake, remove on disconnect) and read by the fan-out; the pool
/// serializes row operations internally.
#[derive(Clone)]
pub struct AppState {
    /// SQLite connection pool
    pub db_pool: SqlitePool,

    /// Table of currently connected channels, injected into the
    /// mutation core for fan-out
    pub registry: ConnectionRegistry,
}

impl FromRef<AppState> for SqlitePool {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.db_pool.clone()
    }
}

impl FromRef<AppState> for ConnectionRegistry {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.registry.clone()
    }
}
