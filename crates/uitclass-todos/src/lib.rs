//! The Todo entity and its persistence operations.
//!
//! Every operation is a plain function over a borrowed
//! [`rusqlite::Connection`]; the caller owns the connection's scope (in the
//! server, a pooled connection checked out for the duration of a request).
//!
//! Lookups by id deliberately return a `Vec<Todo>` rather than an
//! `Option<Todo>`: the query is not constrained to uniqueness at the type
//! level, and callers signal "not found" with an empty list.

mod error;
mod model;
mod store;

pub use error::TodoError;
pub use model::Todo;
pub use store::{
    create_todo, delete_todos_by_id, get_todos_by_id, list_todos, update_todos_by_id,
};
