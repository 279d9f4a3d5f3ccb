use axum::extract::State;
use tracing::info;

use super::{ApiResult, JsonBody, QueryParams, ok};
use crate::db::models::{AttendanceStatus, DbAttendance};
use crate::error::SchoolError;
use crate::middleware::CurrentUser;
use crate::server::router::SchoolState;
use crate::service::holiday_calendar::{self, DateRange};
use crate::types::payloads::{AttendanceQuery, AttendanceSummaryQuery, MarkAttendance};
use crate::types::views::{AttendanceSummary, HolidayOverlap};

/// POST /api/attendance -> upsert a day's marks.
pub async fn mark_attendance(
    State(state): State<SchoolState>,
    user: CurrentUser,
    JsonBody(body): JsonBody<MarkAttendance>,
) -> ApiResult<u64> {
    if body.records.is_empty() {
        return Err(SchoolError::validation("records must not be empty"));
    }
    let written = state.store.mark_attendance(user.school_id, &body).await?;
    info!(actor = user.id, date = %body.date, written, "attendance marked");
    ok(written)
}

/// GET /api/attendance?date=YYYY-MM-DD
pub async fn list_attendance(
    State(state): State<SchoolState>,
    user: CurrentUser,
    QueryParams(query): QueryParams<AttendanceQuery>,
) -> ApiResult<Vec<DbAttendance>> {
    ok(state.store.attendance_on(user.school_id, query.date).await?)
}

/// GET /api/attendance/summary?studentId=..&from=..&to=..
///
/// Working days are the calendar days of the window minus school holidays.
/// Marks that fall on a holiday are reported separately.
pub async fn attendance_summary(
    State(state): State<SchoolState>,
    user: CurrentUser,
    QueryParams(query): QueryParams<AttendanceSummaryQuery>,
) -> ApiResult<AttendanceSummary> {
    let window = DateRange::new(query.from, query.to)
        .ok_or_else(|| SchoolError::validation("`to` must not be before `from`"))?;
    if state
        .store
        .get_student(user.school_id, query.student_id)
        .await?
        .is_none()
    {
        return Err(SchoolError::NotFound("student"));
    }

    let rows = state
        .store
        .holidays_between(user.school_id, query.from, query.to)
        .await?;
    let mut holidays = Vec::with_capacity(rows.len());
    let mut overlaps = Vec::with_capacity(rows.len());
    for row in rows {
        let Some(range) = DateRange::new(row.start_date, row.end_date) else {
            continue;
        };
        overlaps.push(HolidayOverlap {
            holiday_id: row.id,
            name: row.name,
            days: holiday_calendar::overlap_days(&range, &window),
        });
        holidays.push(range);
    }
    let holiday_days = holiday_calendar::holiday_days_in(&window, &holidays);

    let mut summary = AttendanceSummary {
        student_id: query.student_id,
        from: Some(query.from),
        to: Some(query.to),
        calendar_days: window.days(),
        holiday_days,
        working_days: holiday_calendar::working_days(&window, &holidays),
        holidays: overlaps,
        ..Default::default()
    };
    for (day, status) in state
        .store
        .attendance_marks(query.student_id, query.from, query.to)
        .await?
    {
        if holidays.iter().any(|h| h.contains(day)) {
            summary.on_holidays += 1;
            continue;
        }
        match status {
            AttendanceStatus::Present => summary.present += 1,
            AttendanceStatus::Absent => summary.absent += 1,
            AttendanceStatus::Late => summary.late += 1,
        }
    }
    summary.unmarked =
        (summary.working_days - summary.present - summary.absent - summary.late).max(0);
    ok(summary)
}
