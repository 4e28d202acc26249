use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::models::{ApiSendFailure, GENERIC_FAILURE_MESSAGE};

pub mod contact;
pub mod health;

/// Generic 500 response. The cause is logged for operators and never
/// included in the body.
pub fn internal_server_error(err: impl Into<anyhow::Error>) -> Response {
    let err = err.into();
    tracing::error!("internal server error: {err}");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiSendFailure {
            success: false,
            error: GENERIC_FAILURE_MESSAGE,
        }),
    )
        .into_response()
}
