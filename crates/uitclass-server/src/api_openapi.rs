//! Machine-readable description of the HTTP surface.
//!
//! Serves a hand-maintained OpenAPI 3.1 document so API clients and tooling
//! can discover the endpoints. Keep it in step with the router in `lib.rs`.

use crate::AppState;
use axum::{extract::Extension, Json};
use serde_json::{json, Value};
use std::sync::Arc;

/// Title advertised in the API description.
pub const API_TITLE: &str = "Hello World API with DB";

/// Builds the OpenAPI document for the given public base URL.
pub fn openapi_document(public_url: &str) -> Value {
    let todo_ref = json!({ "$ref": "#/components/schemas/Todo" });
    let todo_list = json!({ "type": "array", "items": todo_ref });
    let todo_id_param = json!({
        "name": "todo_id",
        "in": "path",
        "required": true,
        "schema": { "type": "integer" }
    });
    let validation_error = json!({
        "description": "Validation Error",
        "content": { "application/json": { "schema": { "$ref": "#/components/schemas/HTTPValidationError" } } }
    });

    json!({
        "openapi": "3.1.0",
        "info": {
            "title": API_TITLE,
            "version": env!("CARGO_PKG_VERSION")
        },
        "servers": [
            { "url": public_url, "description": "Development Server" }
        ],
        "paths": {
            "/": {
                "get": {
                    "summary": "Read Root",
                    "operationId": "read_root",
                    "responses": { "200": { "description": "Successful Response" } }
                }
            },
            "/todos/": {
                "post": {
                    "summary": "Create Todo",
                    "operationId": "create_todo",
                    "requestBody": {
                        "required": true,
                        "content": { "application/json": { "schema": todo_ref } }
                    },
                    "responses": {
                        "200": { "description": "Successful Response", "content": { "application/json": { "schema": todo_ref } } },
                        "422": validation_error
                    }
                },
                "get": {
                    "summary": "Read Todos",
                    "operationId": "read_todos",
                    "responses": {
                        "200": { "description": "Successful Response", "content": { "application/json": { "schema": todo_list } } }
                    }
                }
            },
            "/todos/{todo_id}": {
                "get": {
                    "summary": "Read Todo By Id",
                    "operationId": "read_todo_by_id",
                    "parameters": [todo_id_param],
                    "responses": {
                        "200": { "description": "Successful Response", "content": { "application/json": { "schema": todo_list } } },
                        "422": validation_error
                    }
                },
                "put": {
                    "summary": "Update Todo By Id",
                    "operationId": "update_todo_by_id",
                    "parameters": [todo_id_param],
                    "requestBody": {
                        "required": true,
                        "content": { "application/json": { "schema": todo_ref } }
                    },
                    "responses": {
                        "200": { "description": "Successful Response", "content": { "application/json": { "schema": todo_ref } } },
                        "422": validation_error
                    }
                },
                "delete": {
                    "summary": "Delete Todo",
                    "operationId": "delete_todo",
                    "parameters": [todo_id_param],
                    "responses": {
                        "200": { "description": "Successful Response", "content": { "application/json": { "schema": todo_list } } },
                        "422": validation_error
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "Todo": {
                    "title": "Todo",
                    "type": "object",
                    "required": ["content"],
                    "properties": {
                        "id": { "anyOf": [{ "type": "integer" }, { "type": "null" }], "title": "Id" },
                        "content": { "type": "string", "title": "Content" }
                    }
                },
                "ValidationError": {
                    "title": "ValidationError",
                    "type": "object",
                    "required": ["loc", "msg", "type"],
                    "properties": {
                        "loc": { "type": "array", "items": { "type": "string" } },
                        "msg": { "type": "string" },
                        "type": { "type": "string" }
                    }
                },
                "HTTPValidationError": {
                    "title": "HTTPValidationError",
                    "type": "object",
                    "properties": {
                        "detail": { "type": "array", "items": { "$ref": "#/components/schemas/ValidationError" } }
                    }
                }
            }
        }
    })
}

/// Handler for `GET /openapi.json`.
pub async fn openapi_handler(Extension(state): Extension<Arc<AppState>>) -> Json<Value> {
    Json(openapi_document(&state.public_url))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_todo_operation() {
        let doc = openapi_document("http://localhost:8000");
        let paths = &doc["paths"];
        assert!(paths["/"]["get"].is_object());
        for method in ["get", "post"] {
            assert!(paths["/todos/"][method].is_object(), "missing {method} /todos/");
        }
        for method in ["get", "put", "delete"] {
            assert!(
                paths["/todos/{todo_id}"][method].is_object(),
                "missing {method} /todos/{{todo_id}}"
            );
        }
    }

    #[test]
    fn document_advertises_configured_server() {
        let doc = openapi_document("https://abc.ngrok.example");
        assert_eq!(doc["info"]["title"], API_TITLE);
        assert_eq!(doc["info"]["version"], "0.0.1");
        assert_eq!(doc["servers"][0]["url"], "https://abc.ngrok.example");
    }
}
