//! Server Configuration
//!
//! Environment-driven configuration: the database URL and listen port.
//! Migrations run at startup as part of pool construction.

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

/// Default on-disk database when `DATABASE_URL` is not set.
/// `mode=rwc` creates the file on first run.
const DEFAULT_DATABASE_URL: &str = "sqlite://lightpost.db?mode=rwc";

/// Connect to the database named by `DATABASE_URL` and run migrations.
pub async fn load_database() -> Result<SqlitePool, sqlx::Error> {
    let database_url = std::env::var("DATABASE_URL").unwrap_or_else(|_| {
        tracing::warn!("DATABASE_URL not set, using {DEFAULT_DATABASE_URL}");
        DEFAULT_DATABASE_URL.to_string()
    });

    connect_database(&database_url).await
}

/// Build a pool for `url` and bring the schema up to date.
pub async fn connect_database(url: &str) -> Result<SqlitePool, sqlx::Error> {
    // An in-memory SQLite database exists per connection; a wider pool
    // would hand each connection its own empty database.
    let max_connections = if url.contains(":memory:") { 1 } else { 5 };

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect(url)
        .await?;

    tracing::info!("Database connection pool created");

    sqlx::migrate!().run(&pool).await?;
    tracing::info!("Database migrations completed");

    Ok(pool)
}

/// Listen port, from `SERVER_PORT` (default 3000)
pub fn server_port() -> u16 {
    std::env::var("SERVER_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000)
}
