use std::{net::SocketAddr, time::Duration};

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{TimeZone, Utc};
use http_body_util::BodyExt;
use mailform_api_rest::{RestServer, RestServerConfig};
use mailform_core_contact_contracts::{ContactSendMessageError, MockContactService};
use mailform_core_health_contracts::{HealthStatus, MockHealthService};
use mailform_models::contact::{ContactMessage, ContactMessageDraft};
use mailform_ratelimit_contracts::{MockRateLimitService, RateLimitDecision};
use pretty_assertions::assert_eq;
use serde_json::json;
use tower::ServiceExt;

fn router(
    health: MockHealthService,
    contact: MockContactService,
    rate_limit: MockRateLimitService,
) -> Router {
    RestServer::new(
        health,
        contact,
        rate_limit,
        RestServerConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 0,
            allowed_origins: vec!["https://example.com".into()],
            max_request_size: 10 * 1024,
            real_ip_config: None,
        },
    )
    .router()
    .unwrap()
}

fn allowed() -> MockRateLimitService {
    MockRateLimitService::new().with_check(
        "127.0.0.1".into(),
        RateLimitDecision::Allowed { remaining: 99 },
    )
}

fn request(method: Method, uri: &str, body: Body) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .extension(ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 40000))))
        .body(body)
        .unwrap()
}

fn post_contact(body: serde_json::Value) -> Request<Body> {
    request(Method::POST, "/contact", Body::from(body.to_string()))
}

fn valid_draft() -> serde_json::Value {
    json!({
        "name": "Max Mustermann",
        "email": "max.mustermann@example.de",
        "subject": "Test",
        "message": "Hello World!",
    })
}

fn valid_message() -> ContactMessage {
    ContactMessage::try_from(ContactMessageDraft {
        name: "Max Mustermann".into(),
        email: "max.mustermann@example.de".into(),
        subject: "Test".into(),
        message: "Hello World!".into(),
    })
    .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn valid_submission_is_relayed() {
    let contact = MockContactService::new().with_send_message(valid_message(), Ok(()));
    let router = router(MockHealthService::new(), contact, allowed());

    let response = router.oneshot(post_contact(valid_draft())).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({
            "success": true,
            "message": "Your message has been sent successfully!",
        })
    );
}

#[tokio::test]
async fn validation_failure_reports_every_field_and_sends_nothing() {
    let router = router(
        MockHealthService::new(),
        MockContactService::new(),
        allowed(),
    );

    let response = router
        .oneshot(post_contact(json!({
            "name": "x",
            "email": "nope",
            "subject": "",
            "message": "",
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await,
        json!({
            "errors": [
                { "field": "name", "message": "Name must be between 2 and 100 characters" },
                { "field": "email", "message": "A valid email address is required" },
                { "field": "subject", "message": "Subject is required and must be at most 200 characters" },
                { "field": "message", "message": "Message is required and must be at most 2000 characters" },
            ],
        })
    );
}

#[tokio::test]
async fn provider_failure_is_reported_generically() {
    let contact = MockContactService::new()
        .with_send_message(valid_message(), Err(ContactSendMessageError::Send));
    let router = router(MockHealthService::new(), contact, allowed());

    let response = router.oneshot(post_contact(valid_draft())).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await,
        json!({
            "success": false,
            "error": "Failed to send message. Please try again later.",
        })
    );
}

#[tokio::test]
async fn rate_limited_requests_are_rejected_before_the_handler() {
    let rate_limit = MockRateLimitService::new().with_check(
        "127.0.0.1".into(),
        RateLimitDecision::Limited {
            retry_after: Duration::from_secs(15 * 60),
        },
    );
    let router = router(
        MockHealthService::new(),
        MockContactService::new(),
        rate_limit,
    );

    let response = router.oneshot(post_contact(valid_draft())).await.unwrap();

    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(response.headers()[header::RETRY_AFTER], "900");
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(
        &bytes[..],
        "Too many requests from this IP, please try again later.".as_bytes()
    );
}

#[tokio::test]
async fn oversized_payload_is_rejected_before_validation() {
    let router = router(
        MockHealthService::new(),
        MockContactService::new(),
        allowed(),
    );

    let response = router
        .oneshot(post_contact(json!({
            "name": "Max Mustermann",
            "email": "max.mustermann@example.de",
            "subject": "Test",
            "message": "a".repeat(11 * 1024),
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn health_reports_liveness() {
    let health = MockHealthService::new().with_get_status(HealthStatus {
        service: "mailform".into(),
        timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(),
    });
    let router = router(health, MockContactService::new(), MockRateLimitService::new());

    let response = router
        .oneshot(request(Method::GET, "/", Body::empty()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({
            "status": "ok",
            "service": "mailform",
            "timestamp": "2024-01-01T12:00:00Z",
        })
    );
}

#[tokio::test]
async fn defensive_headers_are_set_on_every_response() {
    let health = MockHealthService::new().with_get_status(HealthStatus {
        service: "mailform".into(),
        timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(),
    });
    let router = router(health, MockContactService::new(), MockRateLimitService::new());

    let response = router
        .oneshot(request(Method::GET, "/", Body::empty()))
        .await
        .unwrap();

    let headers = response.headers();
    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert_eq!(headers["x-frame-options"], "DENY");
    assert_eq!(headers["referrer-policy"], "no-referrer");
    assert_eq!(headers["cross-origin-resource-policy"], "same-origin");
    assert!(headers.contains_key("x-request-id"));
    assert!(!headers.contains_key("server"));
    assert!(!headers.contains_key("x-powered-by"));
}

#[tokio::test]
async fn preflight_allows_only_configured_origins() {
    let router = router(
        MockHealthService::new(),
        MockContactService::new(),
        MockRateLimitService::new(),
    );

    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/contact")
                .header(header::ORIGIN, "https://example.com")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .extension(ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 40000))))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "https://example.com"
    );

    let response = router
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/contact")
                .header(header::ORIGIN, "https://evil.example")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .extension(ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 40000))))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert!(!response
        .headers()
        .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
}

#[tokio::test]
async fn contact_accepts_only_post() {
    let router = router(
        MockHealthService::new(),
        MockContactService::new(),
        allowed(),
    );

    let response = router
        .oneshot(request(Method::GET, "/contact", Body::empty()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
