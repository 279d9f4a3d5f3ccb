use axum::extract::State;
use tracing::info;

use super::{ApiResult, JsonBody, PathParam, deleted, ok};
use crate::db::models::DbStaff;
use crate::middleware::CurrentUser;
use crate::server::router::SchoolState;
use crate::types::payloads::NewStaff;

pub async fn list_staff(
    State(state): State<SchoolState>,
    user: CurrentUser,
) -> ApiResult<Vec<DbStaff>> {
    ok(state.store.list_staff(user.school_id).await?)
}

pub async fn create_staff(
    State(state): State<SchoolState>,
    user: CurrentUser,
    JsonBody(body): JsonBody<NewStaff>,
) -> ApiResult<DbStaff> {
    user.require_admin()?;
    body.validate()?;
    let staff = state.store.create_staff(user.school_id, &body).await?;
    info!(actor = user.id, staff_id = staff.id, "staff member added");
    ok(staff)
}

pub async fn update_staff(
    State(state): State<SchoolState>,
    user: CurrentUser,
    PathParam(id): PathParam<i64>,
    JsonBody(body): JsonBody<NewStaff>,
) -> ApiResult<DbStaff> {
    user.require_admin()?;
    body.validate()?;
    let staff = state.store.update_staff(user.school_id, id, &body).await?;
    info!(actor = user.id, staff_id = id, "staff member updated");
    ok(staff)
}

pub async fn delete_staff(
    State(state): State<SchoolState>,
    user: CurrentUser,
    PathParam(id): PathParam<i64>,
) -> ApiResult<i64> {
    user.require_admin()?;
    state.store.delete_staff(user.school_id, id).await?;
    info!(actor = user.id, staff_id = id, "staff member removed");
    deleted("staff member", id)
}
