//! Database operations for the storefront `SQLite` store.
//!
//! Stores local state only (the remote catalog API is the source of truth
//! for products and orders):
//!
//! ## Tables
//!
//! - `tower_sessions` - Tower-sessions storage, which carries each visitor's
//!   cart and order receipts
//!
//! The session table is created at startup by the session store's
//! `migrate()`, so there is no separate migration step.

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

/// Create a `SQLite` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the database cannot be opened.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<SqlitePool, sqlx::Error> {
    SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
