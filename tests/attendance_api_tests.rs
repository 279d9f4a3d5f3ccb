mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn summary_excludes_holidays_from_working_days() {
    let app = TestApp::spawn("attendance-summary").await;
    let student = app.create_student("Meera", "M-001", 1000).await;

    for (start, end) in [("2025-01-05", "2025-01-06"), ("2025-01-06", "2025-01-07")] {
        let (status, body) = app
            .call(
                "POST",
                "/api/holidays",
                Some(app.admin_id),
                Some(json!({ "name": "Break", "startDate": start, "endDate": end })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "holiday failed: {body}");
    }

    for (date, mark) in [
        ("2025-01-02", "PRESENT"),
        ("2025-01-03", "ABSENT"),
        ("2025-01-04", "LATE"),
    ] {
        let (status, body) = app
            .call(
                "POST",
                "/api/attendance",
                Some(app.admin_id),
                Some(json!({ "date": date, "records": [{ "studentId": student, "status": mark }] })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "mark failed: {body}");
    }

    // re-marking the same day overwrites
    let (status, _) = app
        .call(
            "POST",
            "/api/attendance",
            Some(app.admin_id),
            Some(json!({ "date": "2025-01-03", "records": [{ "studentId": student, "status": "PRESENT" }] })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .call(
            "GET",
            &format!("/api/attendance/summary?studentId={student}&from=2025-01-01&to=2025-01-10"),
            Some(app.admin_id),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK, "summary failed: {body}");
    let summary = &body["data"];
    assert_eq!(summary["calendarDays"], json!(10));
    assert_eq!(summary["holidayDays"], json!(3));
    assert_eq!(summary["workingDays"], json!(7));
    assert_eq!(summary["present"], json!(2));
    assert_eq!(summary["absent"], json!(0));
    assert_eq!(summary["late"], json!(1));
    assert_eq!(summary["unmarked"], json!(4));
    let per_holiday: Vec<i64> = summary["holidays"]
        .as_array()
        .expect("holiday overlaps")
        .iter()
        .filter_map(|h| h["days"].as_i64())
        .collect();
    assert_eq!(per_holiday, vec![2, 2]);

    let (_, body) = app
        .call("GET", "/api/attendance?date=2025-01-03", Some(app.admin_id), None)
        .await;
    let rows = body["data"].as_array().expect("attendance rows");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["status"], json!("PRESENT"));
}

#[tokio::test]
async fn attendance_batches_are_validated() {
    let app = TestApp::spawn("attendance-validation").await;
    let student = app.create_student("Kiran", "K-001", 0).await;

    let (status, _) = app
        .call(
            "POST",
            "/api/attendance",
            Some(app.admin_id),
            Some(json!({ "date": "2025-02-01", "records": [] })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .call(
            "POST",
            "/api/attendance",
            Some(app.admin_id),
            Some(json!({
                "date": "2025-02-01",
                "records": [
                    { "studentId": student, "status": "PRESENT" },
                    { "studentId": 9999, "status": "PRESENT" },
                ],
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = app
        .call("GET", "/api/attendance?date=2025-02-01", Some(app.admin_id), None)
        .await;
    assert_eq!(body["data"], json!([]));

    let (status, _) = app
        .call(
            "GET",
            &format!("/api/attendance/summary?studentId={student}&from=2025-02-10&to=2025-02-01"),
            Some(app.admin_id),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn marks_on_holidays_do_not_count_as_working_day_attendance() {
    let app = TestApp::spawn("attendance-holiday-marks").await;
    let student = app.create_student("Asha", "A-001", 0).await;

    let (status, body) = app
        .call(
            "POST",
            "/api/holidays",
            Some(app.admin_id),
            Some(json!({ "name": "Founders Day", "startDate": "2025-03-05", "endDate": "2025-03-05" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "holiday failed: {body}");

    for date in ["2025-03-03", "2025-03-05"] {
        let (status, _) = app
            .call(
                "POST",
                "/api/attendance",
                Some(app.admin_id),
                Some(json!({ "date": date, "records": [{ "studentId": student, "status": "PRESENT" }] })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = app
        .call(
            "GET",
            &format!("/api/attendance/summary?studentId={student}&from=2025-03-01&to=2025-03-07"),
            Some(app.admin_id),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK, "summary failed: {body}");
    let summary = &body["data"];
    assert_eq!(summary["workingDays"], json!(6));
    assert_eq!(summary["present"], json!(1));
    assert_eq!(summary["onHolidays"], json!(1));
    assert_eq!(summary["unmarked"], json!(5));
}
