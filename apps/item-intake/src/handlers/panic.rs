//! Last-resort response for panics raised while serving a request

use std::any::Any;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;

use crate::dto::ingestion::InternalErrorResponse;

/// Marker placed in the `error` field of unanticipated failures
pub const INTERNAL_ERROR: &str = "internal_error";

/// Build the `500 internal_error` response carrying `message`
pub fn internal_error_response(message: impl Into<String>) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(InternalErrorResponse {
            error: INTERNAL_ERROR.to_string(),
            message: message.into(),
        }),
    )
        .into_response()
}

/// Panic hook for `tower_http::catch_panic::CatchPanicLayer`
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(message) = err.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = err.downcast_ref::<&str>() {
        message.to_string()
    } else {
        "unknown panic".to_string()
    };

    error!(message = %message, "Request handler panicked");
    internal_error_response(message)
}
