use axum::{Json, http::StatusCode, response::IntoResponse};
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;
use tracing::{debug, error};

use crate::types::envelope::ApiResponse;

#[derive(Debug, ThisError)]
pub enum SchoolError {
    #[error("{0}")]
    Validation(String),

    #[error("invalid or missing API key")]
    Unauthorized,

    #[error("missing or unknown acting user")]
    UnknownUser,

    #[error("{0}")]
    Forbidden(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Conflict(String),

    /// Transport-level rejection (oversized body, wrong content type).
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },

    #[error("Database error: {0}")]
    DatabaseError(SqlxError),

    #[error("Migration error: {0}")]
    Migration(String),
}

impl SchoolError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }
}

impl From<SqlxError> for SchoolError {
    fn from(e: SqlxError) -> Self {
        match &e {
            SqlxError::RowNotFound => SchoolError::NotFound("record"),
            SqlxError::Database(db) if db.is_unique_violation() => {
                SchoolError::Conflict("a record with the same key already exists".to_string())
            }
            SqlxError::Database(db) if db.is_foreign_key_violation() => {
                SchoolError::Conflict("change would break a link between records".to_string())
            }
            _ => SchoolError::DatabaseError(e),
        }
    }
}

impl IntoResponse for SchoolError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match &self {
            SchoolError::Validation(msg) => {
                debug!(reason = %msg, "request rejected");
                (StatusCode::BAD_REQUEST, msg.clone())
            }
            SchoolError::Unauthorized | SchoolError::UnknownUser => {
                (StatusCode::UNAUTHORIZED, self.to_string())
            }
            SchoolError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            SchoolError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            SchoolError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            SchoolError::Rejected { status, message } => {
                debug!(%status, reason = %message, "request rejected");
                (*status, message.clone())
            }
            SchoolError::DatabaseError(_) | SchoolError::Migration(_) => {
                error!(error = %self, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred.".to_string(),
                )
            }
        };
        (status, Json(ApiResponse::<()>::failure(message))).into_response()
    }
}
