use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
};

use anyhow::Context;
use axum::{extract::DefaultBodyLimit, http::Method, Router};
use mailform_core_contact_contracts::ContactService;
use mailform_core_health_contracts::HealthService;
use mailform_ratelimit_contracts::RateLimitService;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::warn;

mod middlewares;
mod models;
mod routes;

#[derive(Debug, Clone)]
pub struct RestServer<Health, Contact, RateLimit> {
    health: Health,
    contact: Contact,
    rate_limit: RateLimit,
    config: RestServerConfig,
}

#[derive(Debug, Clone)]
pub struct RestServerConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Origins allowed to call the contact endpoint from a browser. A `"*"`
    /// entry disables the restriction.
    pub allowed_origins: Vec<String>,
    /// Maximum accepted request body size in bytes; larger payloads are
    /// rejected before they reach the JSON parser.
    pub max_request_size: usize,
    pub real_ip_config: Option<Arc<RestServerRealIpConfig>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestServerRealIpConfig {
    pub header: String,
    pub set_from: IpAddr,
}

impl<Health, Contact, RateLimit> RestServer<Health, Contact, RateLimit>
where
    Health: HealthService,
    Contact: ContactService,
    RateLimit: RateLimitService,
{
    pub fn new(
        health: Health,
        contact: Contact,
        rate_limit: RateLimit,
        config: RestServerConfig,
    ) -> Self {
        Self {
            health,
            contact,
            rate_limit,
            config,
        }
    }

    pub async fn serve(self) -> anyhow::Result<()> {
        let (host, port) = (self.config.host, self.config.port);
        let router = self.router()?;
        let listener = TcpListener::bind((host, port)).await?;
        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .map_err(Into::into)
    }

    /// Builds the full middleware/route stack. Public so tests can drive the
    /// server without binding a socket.
    pub fn router(self) -> anyhow::Result<Router<()>> {
        let cors = self.cors()?;
        let real_ip_config = self.config.real_ip_config.clone();

        let router = Router::new()
            .merge(routes::health::router(self.health.into()))
            .merge(routes::contact::router(
                self.contact.into(),
                self.rate_limit.into(),
            ))
            .layer(cors)
            .layer(DefaultBodyLimit::max(self.config.max_request_size));

        let router = middlewares::trace::add(router);
        let router = middlewares::request_id::add(router);
        let router = middlewares::client_ip::add(real_ip_config)(router);
        let router = middlewares::panic_handler::add(router);
        Ok(middlewares::security_headers::add(router))
    }

    fn cors(&self) -> anyhow::Result<CorsLayer> {
        let layer = CorsLayer::new()
            .allow_methods([Method::POST])
            .allow_headers([axum::http::header::CONTENT_TYPE]);

        if self.config.allowed_origins.iter().any(|origin| origin == "*") {
            warn!(
                "http.allowed_origins contains \"*\"; any website can submit the contact form. \
                 Configure explicit origins in production."
            );
            return Ok(layer.allow_origin(AllowOrigin::any()));
        }

        let origins = self
            .config
            .allowed_origins
            .iter()
            .map(|origin| {
                origin
                    .parse::<axum::http::HeaderValue>()
                    .with_context(|| format!("Invalid origin in http.allowed_origins: {origin}"))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(layer.allow_origin(AllowOrigin::list(origins)))
    }
}
