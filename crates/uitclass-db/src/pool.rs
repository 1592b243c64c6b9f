//! Connection pool creation and configuration.

use std::time::Duration;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::OpenFlags;
use thiserror::Error;

/// Runtime tunables for SQLite connection behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DbRuntimeSettings {
    /// Busy timeout for SQLite connections, in milliseconds.
    pub busy_timeout_ms: u64,

    /// Maximum number of pooled SQLite connections.
    pub pool_max_size: u32,

    /// Age after which a pooled connection is closed and replaced, in seconds.
    /// Idle connections are reaped after the same period. Zero disables both.
    pub max_lifetime_secs: u64,
}

impl Default for DbRuntimeSettings {
    fn default() -> Self {
        Self {
            busy_timeout_ms: 5_000,
            pool_max_size: 8,
            max_lifetime_secs: 300,
        }
    }
}

/// A type alias for the SQLite connection pool.
pub type DbPool = Pool<SqliteConnectionManager>;

/// Errors that can occur when creating the database pool.
#[derive(Debug, Error)]
pub enum PoolError {
    /// Failed to build the connection pool.
    #[error("failed to create database connection pool: {0}")]
    PoolInit(#[from] r2d2::Error),
}

/// Resolves a database URL to the SQLite file path it names.
///
/// Accepts either a bare path (`todos.db`, `:memory:`) or a `sqlite://`
/// prefixed URL (`sqlite://data/todos.db`).
pub fn database_path(url: &str) -> &str {
    url.strip_prefix("sqlite://").unwrap_or(url)
}

/// Creates a new SQLite connection pool with WAL mode and bounded lifetimes.
///
/// # Arguments
///
/// * `database_url` - Path or `sqlite://` URL of the database file. Use
///   `:memory:` for an in-memory database; note that every pooled connection
///   then sees its own private database.
///
/// # Errors
///
/// Returns `PoolError::PoolInit` if the connection pool cannot be created.
pub fn create_pool(database_url: &str, settings: DbRuntimeSettings) -> Result<DbPool, PoolError> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_CREATE
        | OpenFlags::SQLITE_OPEN_FULL_MUTEX
        | OpenFlags::SQLITE_OPEN_URI;

    let manager = SqliteConnectionManager::file(database_path(database_url))
        .with_flags(flags)
        .with_init(move |conn| {
            // In-memory databases report "memory" which is expected.
            let journal_mode: String =
                conn.query_row("PRAGMA journal_mode = WAL;", [], |row| row.get(0))?;
            if journal_mode != "wal" && journal_mode != "memory" {
                return Err(rusqlite::Error::SqliteFailure(
                    rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_ERROR),
                    Some(format!(
                        "failed to set WAL journal mode, got: {}",
                        journal_mode
                    )),
                ));
            }
            conn.execute_batch(&format!(
                "PRAGMA busy_timeout = {};",
                settings.busy_timeout_ms
            ))
        });

    let lifetime =
        (settings.max_lifetime_secs > 0).then(|| Duration::from_secs(settings.max_lifetime_secs));
    let pool = Pool::builder()
        .max_size(settings.pool_max_size)
        .max_lifetime(lifetime)
        .idle_timeout(lifetime)
        .build(manager)?;

    tracing::debug!(
        max_size = settings.pool_max_size,
        max_lifetime_secs = settings.max_lifetime_secs,
        "database pool ready"
    );

    Ok(pool)
}
