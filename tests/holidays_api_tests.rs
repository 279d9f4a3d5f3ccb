mod common;

use axum::http::StatusCode;
use chrono::{Days, Local, NaiveDate};
use common::TestApp;
use serde_json::json;

fn shift(day: NaiveDate, offset: i64) -> String {
    let shifted = if offset >= 0 {
        day.checked_add_days(Days::new(offset as u64))
    } else {
        day.checked_sub_days(Days::new(offset.unsigned_abs()))
    };
    shifted.expect("date out of range").to_string()
}

async fn create_holiday(app: &TestApp, name: &str, start: String, end: String) -> i64 {
    let (status, body) = app
        .call(
            "POST",
            "/api/holidays",
            Some(app.admin_id),
            Some(json!({ "name": name, "startDate": start, "endDate": end })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "create holiday failed: {body}");
    body["data"]["id"].as_i64().expect("holiday id")
}

#[tokio::test]
async fn holidays_are_listed_active_then_upcoming_then_past() {
    let app = TestApp::spawn("holidays-order").await;
    let today = Local::now().date_naive();

    let old = create_holiday(&app, "Old break", shift(today, -60), shift(today, -58)).await;
    let recent = create_holiday(&app, "Recent break", shift(today, -5), shift(today, -4)).await;
    let far = create_holiday(&app, "Far festival", shift(today, 40), shift(today, 40)).await;
    let near = create_holiday(&app, "Near festival", shift(today, 3), shift(today, 7)).await;
    let now = create_holiday(&app, "Ongoing", shift(today, -1), shift(today, 1)).await;

    let (status, body) = app
        .call("GET", "/api/holidays", Some(app.admin_id), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));

    let list = body["data"].as_array().expect("holiday list");
    let ids: Vec<i64> = list.iter().filter_map(|h| h["id"].as_i64()).collect();
    assert_eq!(ids, vec![now, near, far, recent, old]);

    let statuses: Vec<&str> = list.iter().filter_map(|h| h["status"].as_str()).collect();
    assert_eq!(
        statuses,
        vec!["active", "upcoming", "upcoming", "past", "past"]
    );
    assert_eq!(list[0]["days"], json!(3));
    assert_eq!(list[1]["days"], json!(5));
    assert_eq!(list[0]["deletable"], json!(true));
    assert_eq!(list[4]["deletable"], json!(false));
}

#[tokio::test]
async fn holiday_with_end_before_start_is_rejected() {
    let app = TestApp::spawn("holidays-range").await;
    let (status, body) = app
        .call(
            "POST",
            "/api/holidays",
            Some(app.admin_id),
            Some(json!({
                "name": "Backwards",
                "startDate": "2025-10-24",
                "endDate": "2025-10-20",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
    assert!(body["message"].as_str().is_some());
}

#[tokio::test]
async fn display_range_spans_years() {
    let app = TestApp::spawn("holidays-display").await;
    create_holiday(
        &app,
        "Winter break",
        "2025-12-30".to_string(),
        "2026-01-02".to_string(),
    )
    .await;
    create_holiday(
        &app,
        "Republic Day",
        "2025-01-26".to_string(),
        "2025-01-26".to_string(),
    )
    .await;

    let (_, body) = app
        .call("GET", "/api/holidays", Some(app.admin_id), None)
        .await;
    let ranges: Vec<&str> = body["data"]
        .as_array()
        .expect("holiday list")
        .iter()
        .filter_map(|h| h["displayRange"].as_str())
        .collect();
    assert!(ranges.contains(&"30 Dec 2025 - 2 Jan 2026"));
    assert!(ranges.contains(&"26 Jan 2025"));
}

#[tokio::test]
async fn past_holidays_cannot_be_deleted() {
    let app = TestApp::spawn("holidays-delete").await;
    let today = Local::now().date_naive();
    let past = create_holiday(&app, "Done", shift(today, -10), shift(today, -9)).await;
    let upcoming = create_holiday(&app, "Soon", shift(today, 9), shift(today, 10)).await;

    let (status, body) = app
        .call("DELETE", &format!("/api/holidays/{past}"), Some(app.admin_id), None)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], json!(false));

    let (status, body) = app
        .call(
            "DELETE",
            &format!("/api/holidays/{upcoming}"),
            Some(app.admin_id),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!(upcoming));

    let (status, _) = app
        .call("DELETE", "/api/holidays/9999", Some(app.admin_id), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn cashier_cannot_manage_holidays() {
    let app = TestApp::spawn("holidays-cashier").await;
    let cashier = app
        .create_user(app.admin_id, "Cash", "cash@school.local", "CASHIER")
        .await;

    let (status, _) = app
        .call(
            "POST",
            "/api/holidays",
            Some(cashier),
            Some(json!({ "name": "Nope", "startDate": "2030-01-01", "endDate": "2030-01-01" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.call("GET", "/api/holidays", Some(cashier), None).await;
    assert_eq!(status, StatusCode::OK);
}
