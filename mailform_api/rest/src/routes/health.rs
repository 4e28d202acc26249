use std::sync::Arc;

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing, Json, Router,
};
use chrono::{DateTime, Utc};
use mailform_core_health_contracts::{HealthService, HealthStatus};
use serde::Serialize;

pub fn router(service: Arc<impl HealthService>) -> Router<()> {
    Router::new()
        .route("/", routing::get(health))
        .with_state(service)
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    service: String,
    timestamp: DateTime<Utc>,
}

async fn health(state: State<Arc<impl HealthService>>) -> Response {
    let HealthStatus { service, timestamp } = state.get_status();

    Json(HealthResponse {
        status: "ok",
        service,
        timestamp,
    })
    .into_response()
}
