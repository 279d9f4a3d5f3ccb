use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::{StatusCode, request::Parts},
};
use chrono::{Local, NaiveDate};
use serde::de::DeserializeOwned;

use crate::error::SchoolError;
use crate::types::ApiResponse;

pub mod attendance;
pub mod dashboard;
pub mod fees;
pub mod holidays;
pub mod sessions;
pub mod staff;
pub mod students;
pub mod users;
pub mod vendors;

pub type ApiResult<T> = Result<Json<ApiResponse<T>>, SchoolError>;

pub fn ok<T>(data: T) -> ApiResult<T> {
    Ok(Json(ApiResponse::ok(data)))
}

/// Success envelope for deletions: the removed id plus a short notice.
pub fn deleted(what: &str, id: i64) -> ApiResult<i64> {
    Ok(Json(ApiResponse::ok_with_message(id, format!("{what} deleted"))))
}

/// Today's calendar date in the server's local time zone.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Malformed input is a 400; transport-level rejections (413, 415, ...)
/// keep their own status.
fn rejected(status: StatusCode, message: String) -> SchoolError {
    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            SchoolError::Validation(message)
        }
        status => SchoolError::Rejected { status, message },
    }
}

/// JSON body whose rejections are reported in the API envelope.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = SchoolError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(body)) => Ok(JsonBody(body)),
            Err(rejection) => Err(rejected(rejection.status(), rejection.body_text())),
        }
    }
}

/// Query string, enveloped like [`JsonBody`].
pub struct QueryParams<T>(pub T);

impl<S, T> FromRequestParts<S> for QueryParams<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = SchoolError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(query)) => Ok(QueryParams(query)),
            Err(rejection) => Err(rejected(rejection.status(), rejection.body_text())),
        }
    }
}

/// Path parameters, enveloped like [`JsonBody`].
pub struct PathParam<T>(pub T);

impl<S, T> FromRequestParts<S> for PathParam<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = SchoolError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(PathParam(value)),
            Err(rejection) => Err(rejected(rejection.status(), rejection.body_text())),
        }
    }
}

pub async fn health() -> ApiResult<&'static str> {
    ok("OK")
}

/// Unknown routes get the same envelope as every other failure.
pub async fn not_found() -> SchoolError {
    SchoolError::NotFound("route")
}
