use axum::extract::State;
use tracing::info;

use super::{ApiResult, JsonBody, PathParam, deleted, ok, today};
use crate::db::models::{DbVendorBill, DbVendorPayment};
use crate::error::SchoolError;
use crate::middleware::CurrentUser;
use crate::server::router::SchoolState;
use crate::service::dues;
use crate::types::payloads::{NewPayment, NewVendor, NewVendorBill};
use crate::types::views::{VendorLedger, VendorView};

async fn load_vendor(state: &SchoolState, school_id: i64, id: i64) -> Result<VendorView, SchoolError> {
    state
        .store
        .get_vendor(school_id, id)
        .await?
        .map(VendorView::from)
        .ok_or(SchoolError::NotFound("vendor"))
}

/// GET /api/vendors -> every vendor with billed, paid and due totals.
pub async fn list_vendors(
    State(state): State<SchoolState>,
    user: CurrentUser,
) -> ApiResult<Vec<VendorView>> {
    let rows = state.store.list_vendors(user.school_id).await?;
    ok(rows.into_iter().map(VendorView::from).collect())
}

pub async fn get_vendor(
    State(state): State<SchoolState>,
    user: CurrentUser,
    PathParam(id): PathParam<i64>,
) -> ApiResult<VendorView> {
    ok(load_vendor(&state, user.school_id, id).await?)
}

pub async fn create_vendor(
    State(state): State<SchoolState>,
    user: CurrentUser,
    JsonBody(body): JsonBody<NewVendor>,
) -> ApiResult<VendorView> {
    user.require_admin()?;
    body.validate()?;
    let vendor = state.store.create_vendor(user.school_id, &body).await?;
    info!(actor = user.id, vendor_id = vendor.id, "vendor created");
    ok(load_vendor(&state, user.school_id, vendor.id).await?)
}

pub async fn update_vendor(
    State(state): State<SchoolState>,
    user: CurrentUser,
    PathParam(id): PathParam<i64>,
    JsonBody(body): JsonBody<NewVendor>,
) -> ApiResult<VendorView> {
    user.require_admin()?;
    body.validate()?;
    state.store.update_vendor(user.school_id, id, &body).await?;
    info!(actor = user.id, vendor_id = id, "vendor updated");
    ok(load_vendor(&state, user.school_id, id).await?)
}

pub async fn delete_vendor(
    State(state): State<SchoolState>,
    user: CurrentUser,
    PathParam(id): PathParam<i64>,
) -> ApiResult<i64> {
    user.require_admin()?;
    state.store.delete_vendor(user.school_id, id).await?;
    info!(actor = user.id, vendor_id = id, "vendor deleted");
    deleted("vendor", id)
}

/// POST /api/vendors/{id}/bills
pub async fn add_vendor_bill(
    State(state): State<SchoolState>,
    user: CurrentUser,
    PathParam(id): PathParam<i64>,
    JsonBody(body): JsonBody<NewVendorBill>,
) -> ApiResult<DbVendorBill> {
    user.require_admin()?;
    body.validate()?;
    let billed_on = body.billed_on.unwrap_or_else(today);
    let bill = state
        .store
        .add_vendor_bill(user.school_id, id, &body, billed_on)
        .await?;
    info!(actor = user.id, vendor_id = id, amount = bill.amount, "vendor bill added");
    ok(bill)
}

/// POST /api/vendors/{id}/payments. Rejected when the amount is not
/// positive or exceeds what the school currently owes the vendor.
pub async fn record_vendor_payment(
    State(state): State<SchoolState>,
    user: CurrentUser,
    PathParam(id): PathParam<i64>,
    JsonBody(body): JsonBody<NewPayment>,
) -> ApiResult<DbVendorPayment> {
    body.validate()?;
    let paid_on = body.paid_on.unwrap_or_else(today);
    let payment = state
        .store
        .record_vendor_payment(user.school_id, id, body.amount, paid_on, body.note.as_deref())
        .await?;
    info!(actor = user.id, vendor_id = id, amount = payment.amount, "vendor payment recorded");
    ok(payment)
}

/// GET /api/vendors/{id}/ledger
pub async fn vendor_ledger(
    State(state): State<SchoolState>,
    user: CurrentUser,
    PathParam(id): PathParam<i64>,
) -> ApiResult<VendorLedger> {
    let vendor = load_vendor(&state, user.school_id, id).await?;
    let bills = state.store.list_vendor_bills(id).await?;
    let payments = state.store.list_vendor_payments(id).await?;
    let entries = dues::build_ledger(
        bills
            .into_iter()
            .map(|b| (b.id, b.billed_on, b.amount, b.description)),
        payments
            .into_iter()
            .map(|p| (p.id, p.paid_on, p.amount, p.note)),
    );
    ok(VendorLedger { vendor, entries })
}
