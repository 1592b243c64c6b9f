#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;
use uitclass_db::{create_pool, run_migrations, DbPool, DbRuntimeSettings};
use uitclass_server::{app, config::DEFAULT_CORS_ORIGINS, AppState};

/// A router over a throwaway database file. Keep `_dir` alive for the
/// duration of the test.
pub struct TestApp {
    pub router: Router,
    pub pool: DbPool,
    pub _dir: TempDir,
}

pub fn setup_app() -> TestApp {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = dir.path().join("todos.db");
    let pool = create_pool(path.to_str().unwrap(), DbRuntimeSettings::default()).unwrap();
    {
        let conn = pool.get().unwrap();
        run_migrations(&conn).unwrap();
    }

    let state = AppState {
        pool: pool.clone(),
        public_url: "http://localhost:8000".to_string(),
        cors_origins: DEFAULT_CORS_ORIGINS.iter().map(|o| o.to_string()).collect(),
    };

    TestApp {
        router: app(state),
        pool,
        _dir: dir,
    }
}

/// Sends a request with an optional raw JSON body and returns the status and
/// the parsed JSON response (`Value::Null` for an empty body).
pub async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    body: Option<String>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json)
        }
        None => Body::empty(),
    };

    let response = router
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

pub async fn create(router: &Router, content: &str) -> Value {
    let (status, json) = send(
        router,
        Method::POST,
        "/todos/",
        Some(serde_json::json!({ "content": content }).to_string()),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "create should succeed: {json}");
    json
}

pub async fn list(router: &Router) -> Vec<Value> {
    let (status, json) = send(router, Method::GET, "/todos/", None).await;
    assert_eq!(status, StatusCode::OK);
    json.as_array().expect("list should be an array").clone()
}
