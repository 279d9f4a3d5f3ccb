mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn startup_seeds_a_current_session() {
    let app = TestApp::spawn("sessions-seed").await;
    let (status, body) = app
        .call("GET", "/api/sessions", Some(app.admin_id), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let sessions = body["data"].as_array().expect("session list");
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0]["name"], json!("2025-2026"));
    assert_eq!(sessions[0]["isCurrent"], json!(true));
}

#[tokio::test]
async fn students_follow_the_current_session() {
    let app = TestApp::spawn("sessions-switch").await;

    let (status, body) = app
        .call(
            "POST",
            "/api/sessions",
            Some(app.admin_id),
            Some(json!({ "name": "2026-2027", "startDate": "2026-04-01", "endDate": "2027-03-31" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "create session failed: {body}");
    let next = body["data"]["id"].as_i64().expect("session id");
    assert_eq!(body["data"]["isCurrent"], json!(false));

    let (status, _) = app
        .call(
            "POST",
            "/api/sessions",
            Some(app.admin_id),
            Some(json!({ "name": "Broken", "startDate": "2026-04-01", "endDate": "2026-03-01" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let returning = app.create_student("Old Hand", "S-001", 1200).await;

    let (status, body) = app
        .call(
            "POST",
            &format!("/api/sessions/{next}/current"),
            Some(app.admin_id),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["isCurrent"], json!(true));

    let (_, body) = app
        .call("GET", "/api/sessions", Some(app.admin_id), None)
        .await;
    let current: Vec<&str> = body["data"]
        .as_array()
        .expect("session list")
        .iter()
        .filter(|s| s["isCurrent"] == json!(true))
        .filter_map(|s| s["name"].as_str())
        .collect();
    assert_eq!(current, vec!["2026-2027"]);

    let newcomer = app.create_student("New Kid", "S-002", 1200).await;
    let (_, body) = app
        .call(
            "GET",
            &format!("/api/students/{newcomer}"),
            Some(app.admin_id),
            None,
        )
        .await;
    assert_eq!(body["data"]["sessionId"], json!(next));

    let enrollments = format!("/api/students/{returning}/enrollments");
    let (status, body) = app
        .call(
            "POST",
            &enrollments,
            Some(app.admin_id),
            Some(json!({ "sessionId": next })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "enroll failed: {body}");

    let (status, _) = app
        .call(
            "POST",
            &enrollments,
            Some(app.admin_id),
            Some(json!({ "sessionId": next })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, body) = app.call("GET", &enrollments, Some(app.admin_id), None).await;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(2));

    let (status, _) = app
        .call("POST", "/api/sessions/999/current", Some(app.admin_id), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn classes_and_students_reject_duplicates() {
    let app = TestApp::spawn("sessions-classes").await;
    let (status, body) = app
        .call(
            "POST",
            "/api/classes",
            Some(app.admin_id),
            Some(json!({ "name": "Grade 5", "section": "A" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let class_id = body["data"]["id"].as_i64().expect("class id");

    let (status, _) = app
        .call(
            "POST",
            "/api/students",
            Some(app.admin_id),
            Some(json!({ "name": "Dev", "admissionNo": "D-1", "classId": class_id })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .call(
            "POST",
            "/api/students",
            Some(app.admin_id),
            Some(json!({ "name": "Dev Two", "admissionNo": "D-1" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app
        .call(
            "POST",
            "/api/students",
            Some(app.admin_id),
            Some(json!({ "name": "Lost", "admissionNo": "D-2", "classId": 404 })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
