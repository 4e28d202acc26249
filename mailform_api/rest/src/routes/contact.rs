use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing, Json, Router,
};
use mailform_core_contact_contracts::{ContactSendMessageError, ContactService};
use mailform_models::contact::{ContactMessage, ContactMessageDraft};
use mailform_ratelimit_contracts::RateLimitService;

use super::internal_server_error;
use crate::{
    middlewares,
    models::{ApiSendSuccess, ApiValidationErrors, SEND_SUCCESS_MESSAGE},
};

pub fn router(
    service: Arc<impl ContactService>,
    rate_limit: Arc<impl RateLimitService>,
) -> Router<()> {
    let router = Router::new()
        .route("/contact", routing::post(send_message))
        .with_state(service);
    middlewares::rate_limit::add(rate_limit)(router)
}

async fn send_message(
    service: State<Arc<impl ContactService>>,
    Json(draft): Json<ContactMessageDraft>,
) -> Response {
    let message = match ContactMessage::try_from(draft) {
        Ok(message) => message,
        Err(errors) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiValidationErrors { errors: errors.0 }),
            )
                .into_response();
        }
    };

    match service.send_message(message).await {
        Ok(()) => Json(ApiSendSuccess {
            success: true,
            message: SEND_SUCCESS_MESSAGE,
        })
        .into_response(),
        Err(ContactSendMessageError::Send) => {
            internal_server_error(anyhow::anyhow!("mail provider rejected the message"))
        }
        Err(ContactSendMessageError::Other(err)) => internal_server_error(err),
    }
}
