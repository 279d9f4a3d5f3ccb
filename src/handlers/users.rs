use axum::extract::State;
use tracing::info;

use super::{ApiResult, JsonBody, PathParam, deleted, ok};
use crate::db::models::DbUser;
use crate::error::SchoolError;
use crate::middleware::CurrentUser;
use crate::server::router::SchoolState;
use crate::service::access::require_manage;
use crate::types::payloads::NewUser;

/// GET /api/users -> accounts the caller is allowed to see.
pub async fn list_users(
    State(state): State<SchoolState>,
    user: CurrentUser,
) -> ApiResult<Vec<DbUser>> {
    let users = state.store.list_users(user.school_id).await?;
    let visible = users
        .into_iter()
        .filter(|u| u.id == user.id || user.role.can_view(u.role))
        .collect();
    ok(visible)
}

/// POST /api/users
pub async fn create_user(
    State(state): State<SchoolState>,
    user: CurrentUser,
    JsonBody(body): JsonBody<NewUser>,
) -> ApiResult<DbUser> {
    body.validate()?;
    require_manage(user.role, body.role)?;
    let created = state.store.create_user(user.school_id, &body).await?;
    info!(actor = user.id, user_id = created.id, role = %created.role, "user created");
    ok(created)
}

async fn load_target(
    state: &SchoolState,
    actor: &CurrentUser,
    id: i64,
) -> Result<DbUser, SchoolError> {
    state
        .store
        .get_user(id)
        .await?
        .filter(|u| u.school_id == actor.school_id)
        .ok_or(SchoolError::NotFound("user"))
}

/// PUT /api/users/{id}
pub async fn update_user(
    State(state): State<SchoolState>,
    user: CurrentUser,
    PathParam(id): PathParam<i64>,
    JsonBody(body): JsonBody<NewUser>,
) -> ApiResult<DbUser> {
    body.validate()?;
    let target = load_target(&state, &user, id).await?;
    require_manage(user.role, target.role)?;
    require_manage(user.role, body.role)?;
    if target.id == user.id && body.role != user.role {
        return Err(SchoolError::forbidden("you cannot change your own role"));
    }
    let updated = state.store.update_user(id, &body).await?;
    info!(actor = user.id, user_id = id, "user updated");
    ok(updated)
}

/// DELETE /api/users/{id}
pub async fn delete_user(
    State(state): State<SchoolState>,
    user: CurrentUser,
    PathParam(id): PathParam<i64>,
) -> ApiResult<i64> {
    if id == user.id {
        return Err(SchoolError::forbidden("you cannot delete your own account"));
    }
    let target = load_target(&state, &user, id).await?;
    require_manage(user.role, target.role)?;
    state.store.delete_user(id).await?;
    info!(actor = user.id, user_id = id, "user deleted");
    deleted("user", id)
}
