//! Structured error type for the conversion API.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Error payload for requests the service itself could not handle.
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
}

/// Application-level error that converts into an HTTP response.
///
/// Recognized conversion failures never take this path; they ride in the
/// regular response body with status 200.
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn internal(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = axum::Json(ApiError {
            error: self.message,
        });
        (self.status, body).into_response()
    }
}
