use axum::extract::State;
use tracing::info;

use super::{ApiResult, JsonBody, PathParam, deleted, ok, today};
use crate::error::SchoolError;
use crate::middleware::CurrentUser;
use crate::server::router::SchoolState;
use crate::service::holiday_calendar::{self, HolidayStatus};
use crate::types::payloads::NewHoliday;
use crate::types::views::HolidayView;

/// GET /api/holidays -> active first, then upcoming, then past.
pub async fn list_holidays(
    State(state): State<SchoolState>,
    user: CurrentUser,
) -> ApiResult<Vec<HolidayView>> {
    let holidays = state.store.list_holidays(user.school_id).await?;
    ok(HolidayView::sorted(holidays, today()))
}

pub async fn create_holiday(
    State(state): State<SchoolState>,
    user: CurrentUser,
    JsonBody(body): JsonBody<NewHoliday>,
) -> ApiResult<HolidayView> {
    user.require_admin()?;
    let range = body.validate()?;
    let holiday = state
        .store
        .create_holiday(user.school_id, user.id, &body)
        .await?;
    info!(
        actor = user.id,
        holiday_id = holiday.id,
        days = range.days(),
        "holiday created"
    );
    ok(HolidayView::new(holiday, today()))
}

pub async fn update_holiday(
    State(state): State<SchoolState>,
    user: CurrentUser,
    PathParam(id): PathParam<i64>,
    JsonBody(body): JsonBody<NewHoliday>,
) -> ApiResult<HolidayView> {
    user.require_admin()?;
    body.validate()?;
    let holiday = state.store.update_holiday(user.school_id, id, &body).await?;
    info!(actor = user.id, holiday_id = id, "holiday updated");
    ok(HolidayView::new(holiday, today()))
}

/// DELETE /api/holidays/{id}. Holidays that already ended are kept.
pub async fn delete_holiday(
    State(state): State<SchoolState>,
    user: CurrentUser,
    PathParam(id): PathParam<i64>,
) -> ApiResult<i64> {
    user.require_admin()?;
    let holiday = state
        .store
        .get_holiday(user.school_id, id)
        .await?
        .ok_or(SchoolError::NotFound("holiday"))?;
    if holiday_calendar::classify(holiday.start_date, holiday.end_date, today())
        == HolidayStatus::Past
    {
        return Err(SchoolError::Conflict(
            "past holidays cannot be deleted".to_string(),
        ));
    }
    state.store.delete_holiday(user.school_id, id).await?;
    info!(actor = user.id, holiday_id = id, "holiday deleted");
    deleted("holiday", id)
}
