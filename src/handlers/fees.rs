use axum::extract::State;
use tracing::info;

use super::{ApiResult, JsonBody, PathParam, QueryParams, ok, today};
use crate::db::models::DbFeePayment;
use crate::error::SchoolError;
use crate::middleware::CurrentUser;
use crate::server::router::SchoolState;
use crate::service::fee_period::FeeMonth;
use crate::types::payloads::{FeeQuery, GenerateFees, NewMonthlyFee, NewPayment};
use crate::types::views::{FeeGeneration, FeeReceipt, FeeView};

/// Upper bound on months generated by one request.
const MAX_GENERATED_MONTHS: usize = 24;

/// GET /api/fees?month=YYYY-MM&studentId=..
pub async fn list_fees(
    State(state): State<SchoolState>,
    user: CurrentUser,
    QueryParams(query): QueryParams<FeeQuery>,
) -> ApiResult<Vec<FeeView>> {
    let rows = state.store.list_fees(user.school_id, &query).await?;
    ok(rows.into_iter().map(FeeView::from).collect())
}

pub async fn create_fee(
    State(state): State<SchoolState>,
    user: CurrentUser,
    JsonBody(body): JsonBody<NewMonthlyFee>,
) -> ApiResult<FeeView> {
    user.require_admin()?;
    body.validate()?;
    let session_id = state.store.current_session(user.school_id).await?.map(|s| s.id);
    let fee = state
        .store
        .create_fee(user.school_id, session_id, &body)
        .await?;
    info!(actor = user.id, fee_id = fee.id, month = %fee.month, "monthly fee created");
    ok(fee.into())
}

/// POST /api/fees/generate -> one row per enrolled student and month of
/// `[from, to]` in the current session.
pub async fn generate_fees(
    State(state): State<SchoolState>,
    user: CurrentUser,
    JsonBody(body): JsonBody<GenerateFees>,
) -> ApiResult<FeeGeneration> {
    user.require_admin()?;
    let to = body.to.unwrap_or(body.from);
    if to < body.from {
        return Err(SchoolError::validation("`to` must not be before `from`"));
    }
    let months = FeeMonth::span(body.from, to);
    if months.len() > MAX_GENERATED_MONTHS {
        return Err(SchoolError::validation(format!(
            "at most {MAX_GENERATED_MONTHS} months can be generated at once"
        )));
    }
    let session = state
        .store
        .current_session(user.school_id)
        .await?
        .ok_or_else(|| SchoolError::validation("no current academic session"))?;

    let schedule = state.store.enrolled_fee_schedule(session.id).await?;
    let created = state
        .store
        .generate_fees(session.id, &months, &schedule)
        .await?;
    info!(
        actor = user.id,
        session_id = session.id,
        months = months.len(),
        students = schedule.len(),
        created,
        "monthly fees generated"
    );
    ok(FeeGeneration {
        session_id: session.id,
        months,
        students: schedule.len(),
        created,
    })
}

/// POST /api/fees/{id}/payments
pub async fn record_fee_payment(
    State(state): State<SchoolState>,
    user: CurrentUser,
    PathParam(id): PathParam<i64>,
    JsonBody(body): JsonBody<NewPayment>,
) -> ApiResult<FeeReceipt> {
    body.validate()?;
    let paid_on = body.paid_on.unwrap_or_else(today);
    let payment = state
        .store
        .record_fee_payment(user.school_id, id, body.amount, paid_on, user.id)
        .await?;
    let fee = state
        .store
        .get_fee(user.school_id, id)
        .await?
        .ok_or(SchoolError::NotFound("fee"))?;
    info!(
        actor = user.id,
        fee_id = id,
        amount = body.amount,
        remaining = fee.payable - fee.paid,
        "fee payment recorded"
    );
    ok(FeeReceipt {
        payment,
        fee: fee.into(),
    })
}

/// GET /api/fees/{id}/payments
pub async fn list_fee_payments(
    State(state): State<SchoolState>,
    user: CurrentUser,
    PathParam(id): PathParam<i64>,
) -> ApiResult<Vec<DbFeePayment>> {
    if state.store.get_fee(user.school_id, id).await?.is_none() {
        return Err(SchoolError::NotFound("fee"));
    }
    ok(state.store.list_fee_payments(id).await?)
}
