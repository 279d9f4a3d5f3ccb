use axum::extract::State;
use tracing::info;

use super::{ApiResult, JsonBody, PathParam, ok};
use crate::db::models::{DbClass, DbSession};
use crate::middleware::CurrentUser;
use crate::server::router::SchoolState;
use crate::types::payloads::{NewClass, NewSession};

pub async fn list_sessions(
    State(state): State<SchoolState>,
    user: CurrentUser,
) -> ApiResult<Vec<DbSession>> {
    ok(state.store.list_sessions(user.school_id).await?)
}

pub async fn create_session(
    State(state): State<SchoolState>,
    user: CurrentUser,
    JsonBody(body): JsonBody<NewSession>,
) -> ApiResult<DbSession> {
    user.require_admin()?;
    body.validate()?;
    let session = state.store.create_session(user.school_id, &body).await?;
    info!(actor = user.id, session_id = session.id, name = %session.name, "session created");
    ok(session)
}

/// POST /api/sessions/{id}/current
pub async fn set_current_session(
    State(state): State<SchoolState>,
    user: CurrentUser,
    PathParam(id): PathParam<i64>,
) -> ApiResult<DbSession> {
    user.require_admin()?;
    let session = state.store.set_current_session(user.school_id, id).await?;
    info!(actor = user.id, session_id = id, "current session switched");
    ok(session)
}

pub async fn list_classes(
    State(state): State<SchoolState>,
    user: CurrentUser,
) -> ApiResult<Vec<DbClass>> {
    ok(state.store.list_classes(user.school_id).await?)
}

pub async fn create_class(
    State(state): State<SchoolState>,
    user: CurrentUser,
    JsonBody(body): JsonBody<NewClass>,
) -> ApiResult<DbClass> {
    user.require_admin()?;
    body.validate()?;
    let class = state.store.create_class(user.school_id, &body).await?;
    info!(actor = user.id, class_id = class.id, "class created");
    ok(class)
}
