mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn requests_without_valid_key_or_user_are_unauthorized() {
    let app = TestApp::spawn("users-auth").await;

    let (status, body) = app
        .send(
            Request::builder()
                .uri("/api/users")
                .header("x-user-id", app.admin_id.to_string())
                .body(Body::empty())
                .expect("failed to build request"),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], json!(false));

    let (status, _) = app
        .send(
            Request::builder()
                .uri("/api/users")
                .header("authorization", format!("Bearer {}", common::API_KEY))
                .header("x-user-id", app.admin_id.to_string())
                .body(Body::empty())
                .expect("failed to build request"),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.call("GET", "/api/users", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.call("GET", "/api/users", Some(777), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app.call("GET", "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!("OK"));
}

#[tokio::test]
async fn admins_only_manage_cashiers() {
    let app = TestApp::spawn("users-roles").await;
    let admin = app
        .create_user(app.admin_id, "Office", "office@school.local", "ADMIN")
        .await;

    let (status, _) = app
        .call(
            "POST",
            "/api/users",
            Some(admin),
            Some(json!({ "name": "Other", "email": "other@school.local", "role": "ADMIN" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let cashier = app
        .create_user(admin, "Till", "till@school.local", "CASHIER")
        .await;

    let (status, _) = app
        .call(
            "POST",
            "/api/users",
            Some(cashier),
            Some(json!({ "name": "Sneaky", "email": "s@school.local", "role": "CASHIER" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .call("DELETE", &format!("/api/users/{}", app.admin_id), Some(admin), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .call("DELETE", &format!("/api/users/{cashier}"), Some(admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], json!("user deleted"));
}

#[tokio::test]
async fn user_listing_is_filtered_by_role() {
    let app = TestApp::spawn("users-listing").await;
    let admin = app
        .create_user(app.admin_id, "Office", "office@school.local", "ADMIN")
        .await;
    let cashier = app
        .create_user(admin, "Till", "till@school.local", "CASHIER")
        .await;

    let emails = |body: &serde_json::Value| -> Vec<String> {
        body["data"]
            .as_array()
            .expect("user list")
            .iter()
            .filter_map(|u| u["email"].as_str().map(str::to_string))
            .collect()
    };

    let (_, body) = app.call("GET", "/api/users", Some(app.admin_id), None).await;
    assert_eq!(emails(&body).len(), 3);

    let (_, body) = app.call("GET", "/api/users", Some(admin), None).await;
    assert_eq!(
        emails(&body),
        vec!["office@school.local".to_string(), "till@school.local".to_string()]
    );

    let (_, body) = app.call("GET", "/api/users", Some(cashier), None).await;
    assert_eq!(emails(&body), vec!["till@school.local".to_string()]);
}

#[tokio::test]
async fn malformed_body_is_reported_in_envelope() {
    let app = TestApp::spawn("users-malformed").await;
    let (status, body) = app
        .call(
            "POST",
            "/api/users",
            Some(app.admin_id),
            Some(json!({ "name": "X", "email": "x@school.local", "role": "JANITOR" })),
        )
        .await;
    assert!(status.is_client_error());
    assert_eq!(body["success"], json!(false));

    let (status, _) = app
        .call(
            "POST",
            "/api/users",
            Some(app.admin_id),
            Some(json!({ "name": "X", "email": "not-an-email", "role": "CASHIER" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
