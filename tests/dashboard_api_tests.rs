mod common;

use axum::http::StatusCode;
use chrono::{Days, Local};
use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn dashboard_rolls_up_school_totals() {
    let app = TestApp::spawn("dashboard").await;
    let today = Local::now().date_naive();

    app.create_student("Asha", "A-1", 500).await;
    app.create_student("Bala", "B-1", 700).await;

    let (status, _) = app
        .call(
            "POST",
            "/api/staff",
            Some(app.admin_id),
            Some(json!({ "name": "Nila", "designation": "Teacher", "salary": 30000 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app
        .call(
            "POST",
            "/api/vendors",
            Some(app.admin_id),
            Some(json!({ "name": "Milk Co" })),
        )
        .await;
    let vendor = body["data"]["id"].as_i64().expect("vendor id");
    let (status, _) = app
        .call(
            "POST",
            &format!("/api/vendors/{vendor}/bills"),
            Some(app.admin_id),
            Some(json!({ "amount": 2500 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let month = today.format("%Y-%m").to_string();
    let (status, _) = app
        .call(
            "POST",
            "/api/fees/generate",
            Some(app.admin_id),
            Some(json!({ "from": month })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let soon = today
        .checked_add_days(Days::new(2))
        .expect("date out of range")
        .to_string();
    let (status, _) = app
        .call(
            "POST",
            "/api/holidays",
            Some(app.admin_id),
            Some(json!({ "name": "Today", "startDate": today.to_string(), "endDate": soon })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let cashier = app
        .create_user(app.admin_id, "Till", "till@school.local", "CASHIER")
        .await;
    let (status, body) = app
        .call("GET", "/api/dashboard", Some(cashier), None)
        .await;
    assert_eq!(status, StatusCode::OK, "dashboard failed: {body}");
    let data = &body["data"];
    assert_eq!(data["students"], json!(2));
    assert_eq!(data["staff"], json!(1));
    assert_eq!(data["currentSession"], json!("2025-2026"));
    assert_eq!(data["month"], json!(month));
    assert_eq!(data["fees"]["totalPayable"], json!(1200));
    assert_eq!(data["fees"]["status"], json!("PENDING"));
    assert_eq!(data["vendorDue"], json!(2500));
    assert_eq!(data["activeHolidays"].as_array().map(Vec::len), Some(1));
    assert_eq!(data["upcomingHolidays"], json!([]));
}

#[tokio::test]
async fn staff_can_be_updated_and_removed() {
    let app = TestApp::spawn("staff").await;
    let (_, body) = app
        .call(
            "POST",
            "/api/staff",
            Some(app.admin_id),
            Some(json!({ "name": "Ravi", "designation": "Driver", "joinedOn": "2024-06-01" })),
        )
        .await;
    let id = body["data"]["id"].as_i64().expect("staff id");

    let (status, body) = app
        .call(
            "PUT",
            &format!("/api/staff/{id}"),
            Some(app.admin_id),
            Some(json!({ "name": "Ravi K", "designation": "Senior Driver", "salary": 18000 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["designation"], json!("Senior Driver"));

    let (status, _) = app
        .call(
            "PUT",
            &format!("/api/staff/{id}"),
            Some(app.admin_id),
            Some(json!({ "name": "Ravi K", "designation": "Driver", "salary": -1 })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .call("DELETE", &format!("/api/staff/{id}"), Some(app.admin_id), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app.call("GET", "/api/staff", Some(app.admin_id), None).await;
    assert_eq!(body["data"], json!([]));
}
