//! Error types for Todo persistence.

/// Errors that can occur during Todo store operations.
#[derive(Debug, thiserror::Error)]
pub enum TodoError {
    /// A database operation failed.
    #[error("todo database error: {0}")]
    Database(#[from] rusqlite::Error),
}
