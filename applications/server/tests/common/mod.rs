/// Common test utilities and fixtures
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use sideb_server::{api, state::AppState};
use sqlx::SqlitePool;
use tempfile::TempDir;
use tower::util::ServiceExt;

/// Test app wrapper; the temp dir keeps the SQLite file alive
pub struct TestApp {
    pub app: Router,
    pub pool: SqlitePool,
    _temp_dir: TempDir,
}

/// Create a test app over a real SQLite file with migrations applied
pub async fn create_test_app() -> TestApp {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let db_url = format!("sqlite://{}", db_path.display());

    let pool = sideb_storage::create_pool(&db_url)
        .await
        .expect("Failed to create pool");
    sideb_storage::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    let app = api::router(AppState::new(pool.clone()));

    TestApp {
        app,
        pool,
        _temp_dir: temp_dir,
    }
}

/// Send one request and return (status, parsed body). Empty bodies (204)
/// come back as `Value::Null`.
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    user_id: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user_id) = user_id {
        builder = builder.header("x-user-id", user_id);
    }

    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("Request failed");

    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes();

    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("Body is not JSON")
    };

    (status, value)
}
