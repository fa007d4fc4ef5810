// Account and session endpoint integration tests

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{login_as_admin, register_user, send, spawn_app};

#[tokio::test]
async fn register_returns_session_without_hash() {
    let test_app = spawn_app();
    let (status, body) = send(
        &test_app.app,
        "POST",
        "/api/users/register",
        None,
        Some(json!({
            "name": "Thomas",
            "email": "thomas@example.com",
            "password": "verysecretindeed",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["name"], "Thomas");
    assert_eq!(body["user"]["email"], "thomas@example.com");
    assert_eq!(body["user"]["roles"], json!(["user"]));
    assert!(body["token"].as_str().is_some());
    assert!(body["user"].get("passwordHash").is_none());
}

#[tokio::test]
async fn register_rejects_short_password_and_bad_email() {
    let test_app = spawn_app();

    let (status, body) = send(
        &test_app.app,
        "POST",
        "/api/users/register",
        None,
        Some(json!({
            "name": "Thomas",
            "email": "thomas@example.com",
            "password": "tooshort",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_FAILED");

    let (status, _) = send(
        &test_app.app,
        "POST",
        "/api/users/register",
        None,
        Some(json!({
            "name": "Thomas",
            "email": "not-an-email",
            "password": "verysecretindeed",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn duplicate_email_conflicts() {
    let test_app = spawn_app();
    register_user(&test_app.app, "thomas@example.com").await;

    let (status, body) = send(
        &test_app.app,
        "POST",
        "/api/users/register",
        None,
        Some(json!({
            "name": "Impostor",
            "email": "thomas@example.com",
            "password": "anotherpassword",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");
}

#[tokio::test]
async fn login_failures_are_indistinguishable() {
    let test_app = spawn_app();
    register_user(&test_app.app, "thomas@example.com").await;

    let (status, wrong_password) = send(
        &test_app.app,
        "POST",
        "/api/users/login",
        None,
        Some(json!({"email": "thomas@example.com", "password": "wrong-password"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, unknown_email) = send(
        &test_app.app,
        "POST",
        "/api/users/login",
        None,
        Some(json!({"email": "nobody@example.com", "password": "wrong-password"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    assert_eq!(wrong_password["details"], unknown_email["details"]);
}

#[tokio::test]
async fn listing_users_requires_admin() {
    let test_app = spawn_app();
    let (_user_id, token) = register_user(&test_app.app, "thomas@example.com").await;

    let (status, body) = send(&test_app.app, "GET", "/api/users", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "FORBIDDEN");

    let admin_token = login_as_admin(&test_app).await;
    let (status, page) = send(&test_app.app, "GET", "/api/users", Some(&admin_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["count"], 2);
    // Ordered by email: admin@… before thomas@…
    let data = page["data"].as_array().unwrap();
    assert_eq!(data[0]["email"], "admin@example.com");
    assert_eq!(data[1]["email"], "thomas@example.com");
}

#[tokio::test]
async fn users_limit_is_capped() {
    let test_app = spawn_app();
    let admin_token = login_as_admin(&test_app).await;

    let (status, body) = send(
        &test_app.app,
        "GET",
        "/api/users?limit=1001&offset=0",
        Some(&admin_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_FAILED");
}

#[tokio::test]
async fn get_single_user_needs_only_a_session() {
    let test_app = spawn_app();
    let (user_id, token) = register_user(&test_app.app, "thomas@example.com").await;

    let (status, body) = send(
        &test_app.app,
        "GET",
        &format!("/api/users/{user_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], user_id.to_string());

    let (status, _) = send(
        &test_app.app,
        "GET",
        &format!("/api/users/{user_id}"),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_can_update_and_delete_accounts() {
    let test_app = spawn_app();
    let (user_id, user_token) = register_user(&test_app.app, "thomas@example.com").await;
    let admin_token = login_as_admin(&test_app).await;

    // Non-admin cannot update
    let (status, _) = send(
        &test_app.app,
        "PUT",
        &format!("/api/users/{user_id}"),
        Some(&user_token),
        Some(json!({"name": "Renamed"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &test_app.app,
        "PUT",
        &format!("/api/users/{user_id}"),
        Some(&admin_token),
        Some(json!({"name": "Renamed"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "update failed: {body}");
    assert_eq!(body["name"], "Renamed");
    assert_eq!(body["email"], "thomas@example.com");

    let (status, _) = send(
        &test_app.app,
        "DELETE",
        &format!("/api/users/{user_id}"),
        Some(&admin_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(
        &test_app.app,
        "GET",
        &format!("/api/users/{user_id}"),
        Some(&admin_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_to_taken_email_conflicts() {
    let test_app = spawn_app();
    let (user_id, _token) = register_user(&test_app.app, "thomas@example.com").await;
    register_user(&test_app.app, "other@example.com").await;
    let admin_token = login_as_admin(&test_app).await;

    let (status, body) = send(
        &test_app.app,
        "PUT",
        &format!("/api/users/{user_id}"),
        Some(&admin_token),
        Some(json!({"email": "other@example.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");
}
