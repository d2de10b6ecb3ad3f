//! Helpers for opening disposable SQLite databases for tests.

use anyhow::{Context, Result};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

/// Open a private in-memory SQLite database.
///
/// The pool is capped at a single connection that is never recycled, so the
/// in-memory database stays alive for as long as the pool does.
///
/// # Errors
///
/// Returns an error if the database cannot be opened.
pub async fn memory_pool() -> Result<SqlitePool> {
    SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .context("failed to open in-memory sqlite database")
}
