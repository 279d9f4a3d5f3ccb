use axum::RequestPartsExt;
use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, request::Parts};
use axum_extra::TypedHeader;
use headers::authorization::Bearer;
use headers::{Authorization, Header, HeaderMapExt, HeaderName, HeaderValue};
use subtle::ConstantTimeEq;

use crate::error::SchoolError;
use crate::server::router::SchoolState;
use crate::service::access::{self, Role};

static X_USER_ID: HeaderName = HeaderName::from_static("x-user-id");

fn key_matches(candidate: &str, expected: &str) -> bool {
    bool::from(candidate.as_bytes().ct_eq(expected.as_bytes()))
}

/// Ensure the inbound request carries the dashboard API key.
/// Accepts either:
/// - Header: `x-api-key: ...`
/// - Header: `Authorization: Bearer ...`
pub fn ensure_authorized(headers: &HeaderMap, expected: &str) -> Result<(), SchoolError> {
    if let Some(hv) = headers.get("x-api-key").and_then(|v| v.to_str().ok())
        && key_matches(hv.trim(), expected)
    {
        return Ok(());
    }

    if let Some(Authorization(bearer)) = headers.typed_get::<Authorization<Bearer>>()
        && key_matches(bearer.token(), expected)
    {
        return Ok(());
    }

    Err(SchoolError::Unauthorized)
}

/// `x-user-id` header naming the account the dashboard acts as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActingUserId(pub i64);

impl Header for ActingUserId {
    fn name() -> &'static HeaderName {
        &X_USER_ID
    }

    fn decode<'i, I>(values: &mut I) -> Result<Self, headers::Error>
    where
        I: Iterator<Item = &'i HeaderValue>,
    {
        values
            .next()
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse().ok())
            .map(ActingUserId)
            .ok_or_else(headers::Error::invalid)
    }

    fn encode<E: Extend<HeaderValue>>(&self, values: &mut E) {
        values.extend(std::iter::once(HeaderValue::from(self.0)));
    }
}

/// Authenticated caller, resolved from the API key and `x-user-id`.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub school_id: i64,
    pub name: String,
    pub role: Role,
}

impl CurrentUser {
    pub fn require_admin(&self) -> Result<(), SchoolError> {
        access::require_admin(self.role)
    }
}

impl FromRequestParts<SchoolState> for CurrentUser {
    type Rejection = SchoolError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SchoolState,
    ) -> Result<Self, Self::Rejection> {
        ensure_authorized(&parts.headers, &state.api_key)?;

        let TypedHeader(ActingUserId(user_id)) = parts
            .extract::<TypedHeader<ActingUserId>>()
            .await
            .map_err(|_| SchoolError::UnknownUser)?;
        let user = state
            .store
            .get_user(user_id)
            .await?
            .ok_or(SchoolError::UnknownUser)?;

        Ok(Self {
            id: user.id,
            school_id: user.school_id,
            name: user.name,
            role: user.role,
        })
    }
}
