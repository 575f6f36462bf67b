use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;

#[derive(Debug)]
pub enum AppError {
    DatabaseError(sea_orm::DbErr),
    NotFound(String),
    Unauthorized(String),
    AccessDenied(String),
    InvalidInput(String),
    Conflict(String),
    QuotaExceeded(String),
    UpstreamFailure(String),
    UpstreamTimeout(String),
    InternalServerError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, kind, error_message) = match self {
            AppError::DatabaseError(e) => {
                eprintln!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal",
                    "Internal server error".to_string(),
                )
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg),
            AppError::AccessDenied(msg) => (StatusCode::FORBIDDEN, "access_denied", msg),
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, "invalid_input", msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg),
            AppError::QuotaExceeded(msg) => (StatusCode::TOO_MANY_REQUESTS, "quota_exceeded", msg),
            AppError::UpstreamFailure(msg) => (StatusCode::BAD_GATEWAY, "upstream_failure", msg),
            AppError::UpstreamTimeout(msg) => (StatusCode::GATEWAY_TIMEOUT, "upstream_timeout", msg),
            AppError::InternalServerError(msg) => {
                eprintln!("Internal server error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal",
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
            "kind": kind,
        }));

        (status, body).into_response()
    }
}

impl From<sea_orm::DbErr> for AppError {
    fn from(err: sea_orm::DbErr) -> Self {
        AppError::DatabaseError(err)
    }
}
