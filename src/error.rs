//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Registration/startup failures. A route set that fails with one of these is never served.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("unknown field '{field}' on {record}")]
    UnknownField { record: &'static str, field: String },
    #[error("duplicate field on {record}: '{first}' and '{second}' resolve to the same name")]
    DuplicateField {
        record: &'static str,
        first: String,
        second: String,
    },
    #[error("duplicate path segment: {0}")]
    DuplicatePathSegment(String),
    #[error("invalid identifier for {kind}: '{value}'")]
    InvalidIdentifier { kind: &'static str, value: String },
    #[error("config load: {0}")]
    Load(String),
    #[error("validation: {0}")]
    Validation(String),
}

/// Errors reported by a persistence collaborator.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("record not found: {0}")]
    NotFound(String),
    #[error("unknown column: {0}")]
    UnknownColumn(String),
    #[error("unknown relation: {0}")]
    UnknownRelation(String),
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
    #[error("decode: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("{0}")]
    Other(String),
}

/// Per-request failures. Every variant is terminal for the request.
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("invalid parameter '{key}' = '{value}': {reason}")]
    InvalidParameter {
        key: String,
        value: String,
        reason: String,
    },
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("missing id: path parameter '{0}' is empty")]
    MissingId(String),
    #[error("process failed: {0}")]
    ProcessFailed(#[from] StoreError),
    #[error("encode: {0}")]
    Encode(#[from] serde_json::Error),
}

impl AppError {
    /// Stable machine-readable code carried in the error envelope.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Config(_) => "config_error",
            AppError::InvalidParameter { .. } | AppError::BadRequest(_) => "bad_request",
            AppError::MissingId(_) => "missing_id",
            AppError::ProcessFailed(_) => "process_failed",
            AppError::Encode(_) => "encode_error",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidParameter { .. } | AppError::BadRequest(_) | AppError::MissingId(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::ProcessFailed(StoreError::NotFound(_)) => StatusCode::NOT_FOUND,
            AppError::Config(_) | AppError::ProcessFailed(_) | AppError::Encode(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let details = match &self {
            AppError::InvalidParameter { key, .. } => Some(serde_json::json!({ "parameter": key })),
            AppError::MissingId(param) => Some(serde_json::json!({ "parameter": param })),
            _ => None,
        };
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code().to_string(),
                message: self.to_string(),
                details,
            },
        };
        (self.status(), Json(body)).into_response()
    }
}
