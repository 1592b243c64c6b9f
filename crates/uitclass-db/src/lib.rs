//! Database layer for the uitclass Todo service.
//!
//! Provides SQLite connection pooling (via `r2d2`) with bounded connection
//! lifetimes, and the embedded schema migrations that create the `todo`
//! table on startup.
//!
//! A pooled connection is the request-scoped session: it is checked out at
//! the start of a request and returned to the pool when the guard drops, on
//! every exit path.

mod migrations;
mod pool;

pub use migrations::{run_migrations, MigrationError};
pub use pool::{create_pool, database_path, DbPool, DbRuntimeSettings, PoolError};
