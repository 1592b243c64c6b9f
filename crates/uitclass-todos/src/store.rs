//! Persistence operations for the `todo` table.
//!
//! Reads come back in `id` order, which for rows that were never re-keyed is
//! insertion order.

use rusqlite::{params, Connection};

use crate::error::TodoError;
use crate::model::Todo;

/// Inserts a new todo and returns the stored row.
///
/// Any `id` on the payload is ignored; the store assigns a fresh one.
///
/// # Errors
///
/// Returns `TodoError::Database` on SQL failure.
pub fn create_todo(conn: &Connection, todo: &Todo) -> Result<Todo, TodoError> {
    let created = conn.query_row(
        "INSERT INTO todo (content) VALUES (?1) RETURNING id, content",
        params![todo.content],
        Todo::from_row,
    )?;
    Ok(created)
}

/// Lists every todo.
///
/// # Errors
///
/// Returns `TodoError::Database` on SQL failure.
pub fn list_todos(conn: &Connection) -> Result<Vec<Todo>, TodoError> {
    let mut stmt = conn.prepare("SELECT id, content FROM todo ORDER BY id ASC")?;
    let rows = stmt.query_map([], Todo::from_row)?;
    let mut todos = Vec::new();
    for row in rows {
        todos.push(row?);
    }
    Ok(todos)
}

/// Returns the todos whose id matches `todo_id`: zero or one rows.
///
/// # Errors
///
/// Returns `TodoError::Database` on SQL failure.
pub fn get_todos_by_id(conn: &Connection, todo_id: i64) -> Result<Vec<Todo>, TodoError> {
    let mut stmt = conn.prepare("SELECT id, content FROM todo WHERE id = ?1")?;
    let rows = stmt.query_map([todo_id], Todo::from_row)?;
    let mut todos = Vec::new();
    for row in rows {
        todos.push(row?);
    }
    Ok(todos)
}

/// Overwrites the `id` and `content` of every row matching `todo_id` with
/// the values from `todo`.
///
/// A payload without an id keeps the row's existing key. Missing rows are
/// not an error: the function returns the number of rows touched, which is
/// zero when nothing matched.
///
/// # Errors
///
/// Returns `TodoError::Database` on SQL failure, including a primary key
/// conflict when `todo.id` already belongs to another row.
pub fn update_todos_by_id(
    conn: &Connection,
    todo_id: i64,
    todo: &Todo,
) -> Result<usize, TodoError> {
    let updated = conn.execute(
        "UPDATE todo SET id = COALESCE(?1, id), content = ?2 WHERE id = ?3",
        params![todo.id, todo.content, todo_id],
    )?;
    tracing::debug!(todo_id, updated, "updated todos");
    Ok(updated)
}

/// Deletes every row matching `todo_id` and returns the rows that remain.
///
/// The delete and the follow-up read run in one transaction, so the returned
/// list reflects exactly the state this delete committed.
///
/// # Errors
///
/// Returns `TodoError::Database` on SQL failure.
pub fn delete_todos_by_id(conn: &Connection, todo_id: i64) -> Result<Vec<Todo>, TodoError> {
    let tx = conn.unchecked_transaction()?;
    let deleted = tx.execute("DELETE FROM todo WHERE id = ?1", [todo_id])?;
    let remaining = list_todos(&tx)?;
    tx.commit()?;

    tracing::debug!(todo_id, deleted, remaining = remaining.len(), "deleted todos");
    Ok(remaining)
}
