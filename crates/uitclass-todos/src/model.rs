use rusqlite::Row;
use serde::{Deserialize, Serialize};

/// A single todo item.
///
/// `id` is `None` until the store assigns one on insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    /// Store-assigned primary key.
    #[serde(default)]
    pub id: Option<i64>,
    /// Free-form text of the item.
    pub content: String,
}

impl Todo {
    /// Builds an unsaved todo with the given content.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            id: None,
            content: content.into(),
        }
    }

    pub(crate) fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            content: row.get(1)?,
        })
    }
}
