//! uitclass server library logic.

pub mod api;
pub mod api_openapi;
pub mod api_todos;
pub mod config;

use axum::{http::HeaderValue, routing::get, Extension, Router};
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use uitclass_db::DbPool;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool, built once at startup.
    pub pool: DbPool,
    /// Externally reachable base URL.
    pub public_url: String,
    /// Origins allowed to make credentialed cross-origin requests.
    pub cors_origins: Vec<String>,
}

/// Builds the CORS policy: listed origins only, any method or header,
/// credentials allowed.
///
/// Methods and headers are mirrored from the preflight request because a
/// literal wildcard is not permitted together with credentials.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            // A wildcard cannot be combined with credentials.
            Ok(_) if origin == "*" => {
                tracing::warn!("ignoring wildcard CORS origin, list origins explicitly");
                None
            }
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(%origin, error = %e, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

/// Builds the application router with all routes.
pub fn app(state: AppState) -> Router {
    let todos = get(api_todos::list_todos_handler).post(api_todos::create_todo_handler);

    Router::new()
        .route("/", get(api::root_handler))
        .route("/openapi.json", get(api_openapi::openapi_handler))
        .route("/todos/", todos.clone())
        .route("/todos", todos)
        .route(
            "/todos/{todo_id}",
            get(api_todos::get_todo_handler)
                .put(api_todos::update_todo_handler)
                .delete(api_todos::delete_todo_handler),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&state.cors_origins))
        .layer(Extension(Arc::new(state)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Method, Request};
    use tower::ServiceExt;

    #[tokio::test]
    async fn wildcard_origin_is_dropped_from_cors_list() {
        let cors = cors_layer(&["*".to_string(), "http://localhost:3000".to_string()]);
        let router = Router::new().route("/", get(api::root_handler)).layer(cors);

        let request = Request::builder()
            .method(Method::GET)
            .uri("/")
            .header(header::ORIGIN, "http://anything.example")
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(request).await.unwrap();

        assert!(response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
    }
}
