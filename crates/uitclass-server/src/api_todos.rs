//! Todo CRUD handlers.
//!
//! Each handler checks a connection out of the pool inside a blocking task.
//! The pooled connection is dropped, and so returned to the pool, when that
//! task finishes, whether the statement succeeded, failed, or panicked.

use crate::api::{todo_from_body, ApiError};
use crate::AppState;
use axum::extract::{
    rejection::{JsonRejection, PathRejection},
    Extension, Json, Path,
};
use rusqlite::Connection;
use serde_json::Value;
use std::sync::Arc;
use uitclass_todos::{
    create_todo, delete_todos_by_id, get_todos_by_id, list_todos, update_todos_by_id, Todo,
    TodoError,
};

/// Runs `op` against a pooled connection on the blocking thread pool.
async fn with_connection<T, F>(
    state: &AppState,
    operation: &'static str,
    op: F,
) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&Connection) -> Result<T, TodoError> + Send + 'static,
{
    let pool = state.pool.clone();
    tokio::task::spawn_blocking(move || {
        let conn = pool.get().map_err(|e| {
            tracing::error!(error = %e, operation, "failed to get db connection");
            ApiError::InternalServerError(format!("db connection failed: {}", e))
        })?;
        op(&*conn).map_err(|e| {
            tracing::error!(error = %e, operation, "todo operation failed");
            ApiError::InternalServerError(e.to_string())
        })
    })
    .await
    .map_err(|e| {
        tracing::error!(error = %e, operation, "task join error");
        ApiError::InternalServerError(format!("task join error: {}", e))
    })?
}

/// POST /todos/
pub async fn create_todo_handler(
    Extension(state): Extension<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Todo>, ApiError> {
    let todo = todo_from_body(payload)?;
    let created =
        with_connection(&state, "create_todo", move |conn| create_todo(conn, &todo)).await?;
    Ok(Json(created))
}

/// GET /todos/
pub async fn list_todos_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<Vec<Todo>>, ApiError> {
    let todos = with_connection(&state, "list_todos", list_todos).await?;
    Ok(Json(todos))
}

/// GET /todos/:todoId
///
/// Always answers with a list; an unknown id yields `[]`.
pub async fn get_todo_handler(
    Extension(state): Extension<Arc<AppState>>,
    todo_id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Vec<Todo>>, ApiError> {
    let Path(todo_id) = todo_id?;
    let todos = with_connection(&state, "get_todos_by_id", move |conn| {
        get_todos_by_id(conn, todo_id)
    })
    .await?;
    Ok(Json(todos))
}

/// PUT /todos/:todoId
///
/// Echoes the submitted payload rather than re-reading the stored row. An
/// unknown id changes nothing.
pub async fn update_todo_handler(
    Extension(state): Extension<Arc<AppState>>,
    todo_id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Todo>, ApiError> {
    let Path(todo_id) = todo_id?;
    let todo = todo_from_body(payload)?;

    let submitted = todo.clone();
    with_connection(&state, "update_todos_by_id", move |conn| {
        update_todos_by_id(conn, todo_id, &submitted)
    })
    .await?;

    Ok(Json(todo))
}

/// DELETE /todos/:todoId
///
/// Returns every todo left after the delete. An unknown id changes nothing.
pub async fn delete_todo_handler(
    Extension(state): Extension<Arc<AppState>>,
    todo_id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Vec<Todo>>, ApiError> {
    let Path(todo_id) = todo_id?;
    let remaining = with_connection(&state, "delete_todos_by_id", move |conn| {
        delete_todos_by_id(conn, todo_id)
    })
    .await?;
    Ok(Json(remaining))
}
