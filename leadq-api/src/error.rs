//! API error type
//!
//! Validation and storage errors are the only errors API consumers see.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// One violated request field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    /// Request body failed field validation (400)
    #[error("Validation failed: {}", describe_fields(.0))]
    Validation(Vec<FieldError>),

    /// Malformed request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// leadq-common error (500)
    #[error("Common error: {0}")]
    Common(#[from] leadq_common::Error),
}

fn describe_fields(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(|f| format!("{}: {}", f.field, f.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = self.to_string();

        let (status, body) = match self {
            ApiError::Validation(fields) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": {
                        "code": "VALIDATION_ERROR",
                        "message": message,
                        "fields": fields,
                    }
                }),
            ),
            ApiError::BadRequest(_) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": { "code": "BAD_REQUEST", "message": message } }),
            ),
            ApiError::Common(ref err) => {
                error!(error = %err, "Request failed");
                let code = if err.is_storage() { "DATABASE_ERROR" } else { "INTERNAL_ERROR" };
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": { "code": code, "message": message } }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
