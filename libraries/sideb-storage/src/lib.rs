//! Sideb Storage
//!
//! SQLite database layer for Sideb.
//!
//! This crate provides persistent storage for users, tracks, playlists and
//! playlist membership, organized as vertical slices: each feature owns its
//! own queries and logic.
//!
//! The `entries` module is the ordering subsystem. It is the only writer of
//! `playlist_entries.position` and `playlists.track_count`, and it keeps the
//! positions of every playlist contiguous (`0..N-1`, no gaps, no duplicates)
//! across concurrent inserts, removals and reorders.
//!
//! # Example
//!
//! ```rust,no_run
//! use sideb_storage::{create_pool, run_migrations};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool("sqlite://sideb.db").await?;
//! run_migrations(&pool).await?;
//!
//! let playlists = sideb_storage::playlists::list(&pool, None, Default::default()).await?;
//! # Ok(())
//! # }
//! ```

mod error;

// Vertical slices
pub mod entries;
pub mod playlists;
pub mod tracks;
pub mod users;

pub use error::StorageError;

use sqlx::sqlite::SqlitePool;

/// Run database migrations
///
/// This should be called once when the application starts to ensure
/// the database schema is up to date.
///
/// # Errors
///
/// Returns an error if migrations fail to run
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), StorageError> {
    // Embedded migrations for reliability across different execution contexts
    const MIGRATIONS: &[&str] = &[
        include_str!("../migrations/0001_create_users.sql"),
        include_str!("../migrations/0002_create_tracks.sql"),
        include_str!("../migrations/0003_create_playlists.sql"),
        include_str!("../migrations/0004_create_playlist_entries.sql"),
    ];

    for migration in MIGRATIONS {
        sqlx::raw_sql(migration)
            .execute(pool)
            .await
            .map_err(|e| StorageError::Migration(e.to_string()))?;
    }

    Ok(())
}

/// Create a new `SQLite` pool
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `sqlite://sideb.db`)
///
/// # Errors
///
/// Returns an error if the connection fails
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal) // WAL mode for better concurrency
        .foreign_keys(true)
        .busy_timeout(std::time::Duration::from_secs(30)); // Wait up to 30s for locks

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    Ok(pool)
}
