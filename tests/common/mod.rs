// Shared harness for the HTTP integration tests
//
// Every test runs against the full router wired to a fresh in-memory
// backend, so requests exercise the same code paths as production minus
// the database driver.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use calendar_api::config::AppConfig;
use calendar_api::storage::{password::hash_password, CreateUserRow, StorageBackend};

pub struct TestApp {
    pub app: Router,
    pub db: StorageBackend,
}

pub fn spawn_app() -> TestApp {
    let config = AppConfig::default();
    let db = StorageBackend::in_memory();
    let app = calendar_api::build_router(&config, db.clone());
    TestApp { app, db }
}

/// Fire one request at the router and decode the JSON body (if any).
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

/// Register a fresh account through the API; returns (user id, token).
pub async fn register_user(app: &Router, email: &str) -> (Uuid, String) {
    let (status, body) = send(
        app,
        "POST",
        "/api/users/register",
        None,
        Some(json!({
            "name": "Test User",
            "email": email,
            "password": "verysecretindeed",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {body}");

    let id = body["user"]["id"].as_str().unwrap().parse().unwrap();
    let token = body["token"].as_str().unwrap().to_string();
    (id, token)
}

/// Seed an admin account directly in storage, then sign it in through the
/// API. Registration never grants the admin role, so tests cannot obtain
/// one any other way.
pub async fn login_as_admin(test_app: &TestApp) -> String {
    let password = "adminpassword";
    test_app
        .db
        .create_user(CreateUserRow {
            id: Uuid::new_v4(),
            name: "Admin".to_string(),
            email: "admin@example.com".to_string(),
            password_hash: hash_password(password).unwrap(),
            roles: vec!["user".to_string(), "admin".to_string()],
        })
        .await
        .unwrap();

    let (status, body) = send(
        &test_app.app,
        "POST",
        "/api/users/login",
        None,
        Some(json!({"email": "admin@example.com", "password": password})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "admin login failed: {body}");
    body["token"].as_str().unwrap().to_string()
}

/// Create an event through the API; returns the event body.
pub async fn create_event(app: &Router, token: &str, title: &str, date: &str) -> Value {
    let (status, body) = send(
        app,
        "POST",
        "/api/events",
        Some(token),
        Some(json!({
            "title": title,
            "description": format!("{title} description"),
            "date": date,
            "type": "School",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create event failed: {body}");
    body
}
