//! Database access for the salah service
//!
//! One shared SQLite database holds the whole directory: geographic
//! hierarchy, masjids, per-date timing records, default schedules and
//! special events. Schema is created on startup by [`init::init_schema`].

pub mod init;
pub mod models;

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::path::Path;

use crate::Result;

/// Open (creating if needed) the database and initialize the schema
pub async fn connect(db_path: &Path) -> Result<SqlitePool> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // mode=rwc: read, write, create
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    tracing::debug!("Connecting to database: {}", db_url);

    let pool = SqlitePool::connect(&db_url).await?;
    sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await?;
    init::init_schema(&pool).await?;

    Ok(pool)
}

/// In-memory database with the full schema, for tests
///
/// Capped at one connection: each SQLite `:memory:` connection is its own
/// database, so a wider pool would hand out empty databases.
pub async fn connect_memory() -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;
    sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await?;
    init::init_schema(&pool).await?;
    Ok(pool)
}
