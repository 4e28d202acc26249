use std::{sync::Arc, time::Duration};

use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::{from_fn, Next},
    response::{IntoResponse, Response},
    Router,
};
use mailform_ratelimit_contracts::{RateLimitDecision, RateLimitService};
use tracing::warn;

use crate::middlewares::client_ip::ClientIp;

pub const RATE_LIMITED_MESSAGE: &str =
    "Too many requests from this IP, please try again later.";

/// Counts every request against the client's quota before it reaches the
/// route handler.
pub fn add<S: Clone + Send + Sync + 'static>(
    service: Arc<impl RateLimitService>,
) -> impl FnOnce(Router<S>) -> Router<S> {
    |router| {
        router.layer(from_fn(move |request: Request, next: Next| {
            let service = Arc::clone(&service);
            async move {
                let client_ip = *request.extensions().get::<ClientIp>().unwrap();
                match service.check(&client_ip.to_string()).await {
                    RateLimitDecision::Allowed { .. } => next.run(request).await,
                    RateLimitDecision::Limited { retry_after } => {
                        warn!(%client_ip, ?retry_after, "rate limit exceeded");
                        rate_limited(retry_after)
                    }
                }
            }
        }))
    }
}

fn rate_limited(retry_after: Duration) -> Response {
    let secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
    (
        StatusCode::TOO_MANY_REQUESTS,
        [(header::RETRY_AFTER, secs.to_string())],
        RATE_LIMITED_MESSAGE,
    )
        .into_response()
}
