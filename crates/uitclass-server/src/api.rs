//! Shared API plumbing: the error type and the root greeting.

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;
use uitclass_todos::Todo;

/// One entry in a validation error response.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ValidationDetail {
    /// Where the offending input lives, e.g. `["body", "content"]` or `["path", "todo_id"]`.
    pub loc: Vec<String>,
    /// Human-readable description of the problem.
    pub msg: String,
    /// Machine-readable error kind.
    #[serde(rename = "type")]
    pub kind: String,
}

/// API error type mapping to HTTP status codes.
///
/// Absent rows are never an error here; handlers signal them with empty
/// lists or silent no-ops.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request did not match the expected shape or types.
    #[error("validation failed ({status}): {details:?}")]
    Validation {
        status: StatusCode,
        details: Vec<ValidationDetail>,
    },
    /// A pool, database, or task failure.
    #[error("internal server error: {0}")]
    InternalServerError(String),
}

impl ValidationDetail {
    fn new(loc: &[&str], msg: impl Into<String>, kind: &str) -> Self {
        Self {
            loc: loc.iter().map(|s| s.to_string()).collect(),
            msg: msg.into(),
            kind: kind.to_string(),
        }
    }
}

impl ApiError {
    fn validation(status: StatusCode, loc: &[&str], msg: String, kind: &str) -> Self {
        ApiError::Validation {
            status,
            details: vec![ValidationDetail::new(loc, msg, kind)],
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let kind = match &rejection {
            JsonRejection::JsonDataError(_) => "value_error",
            JsonRejection::JsonSyntaxError(_) => "json_invalid",
            JsonRejection::MissingJsonContentType(_) => "content_type",
            _ => "body",
        };
        ApiError::validation(rejection.status(), &["body"], rejection.body_text(), kind)
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::validation(
            StatusCode::UNPROCESSABLE_ENTITY,
            &["path", "todo_id"],
            rejection.body_text(),
            "int_parsing",
        )
    }
}

/// Checks a JSON body against the `Todo` shape and converts it.
///
/// Every offending field is reported with its own `loc`, so a body missing
/// `content` and carrying a non-integer `id` yields two details.
///
/// # Errors
///
/// Returns `ApiError::Validation` for body rejections or shape mismatches.
pub fn todo_from_body(payload: Result<Json<Value>, JsonRejection>) -> Result<Todo, ApiError> {
    let Json(body) = payload?;

    let mut details = Vec::new();
    match body.as_object() {
        None => details.push(ValidationDetail::new(
            &["body"],
            "Input should be a valid object",
            "model_attributes_type",
        )),
        Some(fields) => {
            match fields.get("content") {
                None => details.push(ValidationDetail::new(
                    &["body", "content"],
                    "Field required",
                    "missing",
                )),
                Some(Value::String(_)) => {}
                Some(_) => details.push(ValidationDetail::new(
                    &["body", "content"],
                    "Input should be a valid string",
                    "string_type",
                )),
            }
            match fields.get("id") {
                None | Some(Value::Null) => {}
                Some(id) if id.is_i64() => {}
                Some(_) => details.push(ValidationDetail::new(
                    &["body", "id"],
                    "Input should be a valid integer",
                    "int_type",
                )),
            }
        }
    }

    if !details.is_empty() {
        return Err(ApiError::Validation {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            details,
        });
    }

    serde_json::from_value(body).map_err(|e| {
        ApiError::validation(
            StatusCode::UNPROCESSABLE_ENTITY,
            &["body"],
            e.to_string(),
            "value_error",
        )
    })
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation { status, details } => {
                (status, Json(json!({ "detail": details }))).into_response()
            }
            ApiError::InternalServerError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "detail": "Internal Server Error" })),
            )
                .into_response(),
        }
    }
}

/// Handler for `GET /`.
pub async fn root_handler() -> Json<Value> {
    Json(json!({ "Hello": "World" }))
}
