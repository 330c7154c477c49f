// src/server/error.rs
//! Mapping library errors onto HTTP responses

use crate::error::Error;
use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Error returned by every API handler
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError(Error::ParseError(rejection.body_text()))
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        ApiError(Error::InitError(format!("Request task failed: {err}")))
    }
}

fn detail(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "detail": message.into() }))).into_response()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.0 {
            Error::Validation(errors) => (StatusCode::BAD_REQUEST, Json(errors)).into_response(),
            Error::AlreadyExists(msg) | Error::ParseError(msg) => {
                detail(StatusCode::BAD_REQUEST, msg)
            }
            Error::NotFound(msg) => detail(StatusCode::NOT_FOUND, format!("Not found: {msg}")),
            Error::PermissionDenied(msg) => detail(StatusCode::FORBIDDEN, msg),
            Error::Unauthorized(msg) => detail(StatusCode::UNAUTHORIZED, msg),
            err => {
                tracing::error!("Request failed: {}", err);
                detail(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}
