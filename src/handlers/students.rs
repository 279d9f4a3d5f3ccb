use axum::extract::State;
use tracing::info;

use super::{ApiResult, JsonBody, PathParam, deleted, ok};
use crate::db::models::{DbEnrollment, DbStudent};
use crate::error::SchoolError;
use crate::middleware::CurrentUser;
use crate::server::router::SchoolState;
use crate::types::payloads::{NewEnrollment, NewStudent};

async fn ensure_class(
    state: &SchoolState,
    school_id: i64,
    class_id: Option<i64>,
) -> Result<(), SchoolError> {
    let Some(class_id) = class_id else {
        return Ok(());
    };
    let known = state
        .store
        .list_classes(school_id)
        .await?
        .iter()
        .any(|c| c.id == class_id);
    if !known {
        return Err(SchoolError::NotFound("class"));
    }
    Ok(())
}

pub async fn list_students(
    State(state): State<SchoolState>,
    user: CurrentUser,
) -> ApiResult<Vec<DbStudent>> {
    ok(state.store.list_students(user.school_id).await?)
}

pub async fn get_student(
    State(state): State<SchoolState>,
    user: CurrentUser,
    PathParam(id): PathParam<i64>,
) -> ApiResult<DbStudent> {
    let student = state
        .store
        .get_student(user.school_id, id)
        .await?
        .ok_or(SchoolError::NotFound("student"))?;
    ok(student)
}

pub async fn create_student(
    State(state): State<SchoolState>,
    user: CurrentUser,
    JsonBody(body): JsonBody<NewStudent>,
) -> ApiResult<DbStudent> {
    user.require_admin()?;
    body.validate()?;
    ensure_class(&state, user.school_id, body.class_id).await?;
    let student = state.store.create_student(user.school_id, &body).await?;
    info!(actor = user.id, student_id = student.id, "student admitted");
    ok(student)
}

pub async fn update_student(
    State(state): State<SchoolState>,
    user: CurrentUser,
    PathParam(id): PathParam<i64>,
    JsonBody(body): JsonBody<NewStudent>,
) -> ApiResult<DbStudent> {
    user.require_admin()?;
    body.validate()?;
    ensure_class(&state, user.school_id, body.class_id).await?;
    let student = state.store.update_student(user.school_id, id, &body).await?;
    info!(actor = user.id, student_id = id, "student updated");
    ok(student)
}

pub async fn delete_student(
    State(state): State<SchoolState>,
    user: CurrentUser,
    PathParam(id): PathParam<i64>,
) -> ApiResult<i64> {
    user.require_admin()?;
    state.store.delete_student(user.school_id, id).await?;
    info!(actor = user.id, student_id = id, "student deleted");
    deleted("student", id)
}

/// GET /api/students/{id}/enrollments
pub async fn list_enrollments(
    State(state): State<SchoolState>,
    user: CurrentUser,
    PathParam(id): PathParam<i64>,
) -> ApiResult<Vec<DbEnrollment>> {
    if state.store.get_student(user.school_id, id).await?.is_none() {
        return Err(SchoolError::NotFound("student"));
    }
    ok(state.store.list_enrollments(id).await?)
}

/// POST /api/students/{id}/enrollments
pub async fn create_enrollment(
    State(state): State<SchoolState>,
    user: CurrentUser,
    PathParam(id): PathParam<i64>,
    JsonBody(body): JsonBody<NewEnrollment>,
) -> ApiResult<DbEnrollment> {
    user.require_admin()?;
    if state.store.get_student(user.school_id, id).await?.is_none() {
        return Err(SchoolError::NotFound("student"));
    }
    if state
        .store
        .get_session(user.school_id, body.session_id)
        .await?
        .is_none()
    {
        return Err(SchoolError::NotFound("session"));
    }
    ensure_class(&state, user.school_id, body.class_id).await?;
    let enrollment = state.store.create_enrollment(id, &body).await?;
    info!(
        actor = user.id,
        student_id = id,
        session_id = body.session_id,
        "student enrolled"
    );
    ok(enrollment)
}
