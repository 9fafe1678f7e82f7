mod common;

use axum::Router;
use axum::body::Body;
use common::{DAY_MS, T0, test_app};
use http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use staffhub_server::build_app;
use tower::ServiceExt;

async fn send(app: &Router, method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(http::header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(http::header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
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

async fn login(app: &Router, email: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": email, "password": "password123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["token"].as_str().unwrap().to_string()
}

/// admin "alice" of Acme + employee "bob", both logged in
async fn setup() -> (common::TestApp, Router, String, String, i64) {
    let test = test_app().await;
    let app = build_app(test.state.clone());

    let (status, admin) = send(
        &app,
        "POST",
        "/api/auth/signup",
        None,
        Some(json!({
            "username": "alice",
            "email": "alice@acme.test",
            "password": "password123",
            "company": "Acme"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{admin}");
    assert!(admin.get("hash_pass").is_none());
    let admin_token = login(&app, "alice@acme.test").await;

    let (status, bob) = send(
        &app,
        "POST",
        "/api/employees",
        Some(&admin_token),
        Some(json!({
            "username": "bob",
            "email": "bob@acme.test",
            "password": "password123",
            "department": "Warehouse"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{bob}");
    let bob_id = bob["id"].as_i64().unwrap();
    let bob_token = login(&app, "bob@acme.test").await;

    (test, app, admin_token, bob_token, bob_id)
}

#[tokio::test]
async fn health_is_public() {
    let test = test_app().await;
    let app = build_app(test.state.clone());
    let (status, body) = send(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn api_requires_token() {
    let test = test_app().await;
    let app = build_app(test.state.clone());

    let (status, _) = send(&app, "GET", "/api/tasks/my", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, "GET", "/api/shifts", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn me_returns_profile() {
    let (_test, app, admin_token, _, _) = setup().await;
    let (status, body) = send(&app, "GET", "/api/auth/me", Some(&admin_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "admin");
    assert_eq!(body["company"], "Acme");
}

#[tokio::test]
async fn duplicate_company_admin_is_409() {
    let (_test, app, _, _, _) = setup().await;
    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/signup",
        None,
        Some(json!({
            "username": "mallory",
            "email": "mallory@acme.test",
            "password": "password123",
            "company": "Acme"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Admin already exists for this company");
}

#[tokio::test]
async fn task_flow_over_http() {
    let (_test, app, admin_token, bob_token, bob_id) = setup().await;

    let (status, task) = send(
        &app,
        "POST",
        "/api/tasks/assign",
        Some(&admin_token),
        Some(json!({
            "title": "Count pallets",
            "description": "Aisle 4",
            "assigned_to": bob_id,
            "due_date": T0 + 5 * DAY_MS
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{task}");
    assert_eq!(task["status"], "assigned");
    assert_eq!(task["is_scheduled"], false);
    let task_id = task["id"].as_i64().unwrap();

    // employees cannot assign
    let (status, _) = send(
        &app,
        "POST",
        "/api/tasks/assign",
        Some(&bob_token),
        Some(json!({ "title": "x", "assigned_to": bob_id, "due_date": T0 })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, mine) = send(&app, "GET", "/api/tasks/my", Some(&bob_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mine.as_array().unwrap().len(), 1);

    // assigned -> completed is rejected
    let uri = format!("/api/tasks/update/{task_id}");
    let (status, body) = send(
        &app,
        "PUT",
        &uri,
        Some(&bob_token),
        Some(json!({ "status": "completed" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Cannot change status from \"assigned\" to \"completed\"."
    );

    let (status, body) = send(
        &app,
        "PUT",
        &uri,
        Some(&bob_token),
        Some(json!({ "status": "bogus" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid status provided.");

    let (status, body) = send(
        &app,
        "PUT",
        &uri,
        Some(&bob_token),
        Some(json!({ "status": "in-progress" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Task status updated successfully");
    assert_eq!(body["data"]["status"], "in-progress");
    assert_eq!(body["data"]["started_at"], T0);

    // admin is not the assignee
    let (status, _) = send(
        &app,
        "PUT",
        &uri,
        Some(&admin_token),
        Some(json!({ "status": "completed" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, list) = send(&app, "GET", "/api/tasks", Some(&admin_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["id"], task_id);
    assert_eq!(list[0]["assignee"]["username"], "bob");
    assert_eq!(list[0]["assignee"]["email"], "bob@acme.test");
    assert_eq!(list[0]["assigner"]["username"], "alice");

    let (status, list) = send(
        &app,
        "GET",
        &format!("/api/tasks/employee/{bob_id}"),
        Some(&admin_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);

    let task_uri = format!("/api/tasks/{task_id}");
    let (status, _) = send(&app, "DELETE", &task_uri, Some(&bob_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, body) = send(&app, "DELETE", &task_uri, Some(&admin_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::Bool(true));
    let (status, _) = send(&app, "GET", &task_uri, Some(&bob_token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn shift_flow_over_http() {
    let (test, app, admin_token, bob_token, _) = setup().await;

    let (status, current) = send(&app, "GET", "/api/shifts/current", Some(&bob_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(current, Value::Null);

    let (status, shift) = send(&app, "POST", "/api/shifts/start", Some(&bob_token), None).await;
    assert_eq!(status, StatusCode::CREATED, "{shift}");
    let shift_id = shift["id"].as_i64().unwrap();

    let (status, body) = send(&app, "POST", "/api/shifts/start", Some(&bob_token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Shift already in progress");

    let end_uri = format!("/api/shifts/end/{shift_id}");
    let (status, _) = send(&app, "PUT", &end_uri, Some(&bob_token), Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    test.clock.set(T0 + 2 * 60 * 60 * 1000);
    let (status, ended) = send(
        &app,
        "PUT",
        &end_uri,
        Some(&bob_token),
        Some(json!({ "work_summary": "Unloaded two trucks" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ended["total_hours"], 2.0);
    assert_eq!(ended["work_summary"], "Unloaded two trucks");

    let (status, body) = send(
        &app,
        "PUT",
        &end_uri,
        Some(&bob_token),
        Some(json!({ "work_summary": "again" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Shift already ended");

    let (status, one) = send(
        &app,
        "GET",
        &format!("/api/shifts/{shift_id}"),
        Some(&admin_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(one["id"], shift_id);

    let (status, all) = send(&app, "GET", "/api/shifts", Some(&admin_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().unwrap().len(), 1);

    let (status, _) = send(&app, "GET", "/api/shifts/999", Some(&admin_token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unreadable_input_gets_structured_400() {
    let (_test, app, admin_token, bob_token, bob_id) = setup().await;

    let (_, task) = send(
        &app,
        "POST",
        "/api/tasks/assign",
        Some(&admin_token),
        Some(json!({ "title": "Restock", "assigned_to": bob_id, "due_date": T0 + DAY_MS })),
    )
    .await;
    let uri = format!("/api/tasks/update/{}", task["id"].as_i64().unwrap());

    // a non-string status is just another unknown status
    let (status, body) = send(&app, "PUT", &uri, Some(&bob_token), Some(json!({ "status": 5 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid status provided.");
    assert_eq!(body["details"]["status"], "5");

    // field of the wrong JSON type
    let (status, body) = send(
        &app,
        "POST",
        "/api/tasks/assign",
        Some(&admin_token),
        Some(json!({ "title": "Restock", "assigned_to": "bob", "due_date": T0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 2);
    assert_eq!(body["details"]["reason"], "invalid_field");

    // non-numeric id
    let (status, body) = send(
        &app,
        "PUT",
        "/api/shifts/end/abc",
        Some(&bob_token),
        Some(json!({ "work_summary": "done" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 2);
    assert_eq!(body["details"]["reason"], "invalid_path");

    let (status, body) = send(&app, "GET", "/api/employees/abc", Some(&admin_token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["reason"], "invalid_path");

    // broken JSON syntax
    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"email\": "))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["details"]["reason"], "malformed_json");
}
