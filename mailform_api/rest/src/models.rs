use mailform_models::contact::ContactFieldError;
use serde::Serialize;

pub const SEND_SUCCESS_MESSAGE: &str = "Your message has been sent successfully!";
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to send message. Please try again later.";

/// Success body of the contact endpoint.
#[derive(Debug, Serialize)]
pub struct ApiSendSuccess {
    pub success: bool,
    pub message: &'static str,
}

/// Generic failure body. Never carries diagnostic detail.
#[derive(Debug, Serialize)]
pub struct ApiSendFailure {
    pub success: bool,
    pub error: &'static str,
}

/// Validation failure body: one entry per violated field rule.
#[derive(Debug, Serialize)]
pub struct ApiValidationErrors {
    pub errors: Vec<ContactFieldError>,
}
