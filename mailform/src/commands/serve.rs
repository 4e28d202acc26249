use std::sync::Arc;

use mailform_api_rest::{RestServer, RestServerConfig, RestServerRealIpConfig};
use mailform_config::Config;
use mailform_core_contact_impl::{ContactServiceConfig, ContactServiceImpl};
use mailform_core_health_impl::{HealthServiceConfig, HealthServiceImpl};
use mailform_email_contracts::EmailService;
use mailform_ratelimit_memory::{MemoryRateLimitServiceConfig, MemoryRateLimitServiceImpl};
use mailform_shared_impl::time::TimeServiceImpl;
use mailform_templates_impl::TemplateServiceImpl;
use tracing::info;

use crate::email;

pub async fn serve(config: Config) -> anyhow::Result<()> {
    info!("Connecting to smtp server");
    let email = email::connect(&config.email)?;
    email.ping().await?;

    let time = TimeServiceImpl;
    let template = TemplateServiceImpl::new();

    let health = HealthServiceImpl::new(
        time,
        HealthServiceConfig {
            service: config.health.service.clone(),
        },
    );
    let contact = ContactServiceImpl::new(
        time,
        template,
        email,
        ContactServiceConfig {
            recipient: config.contact.recipient.clone(),
        },
    );
    let rate_limit = MemoryRateLimitServiceImpl::new(
        time,
        MemoryRateLimitServiceConfig {
            max_requests: config.contact.rate_limit.max_requests,
            window: config.contact.rate_limit.window.into(),
        },
    );

    let server = RestServer::new(
        health,
        contact,
        rate_limit,
        RestServerConfig {
            host: config.http.host,
            port: config.http.port,
            allowed_origins: config.http.allowed_origins.clone(),
            max_request_size: config.http.max_request_size,
            real_ip_config: config.http.real_ip.as_ref().map(|real_ip| {
                Arc::new(RestServerRealIpConfig {
                    header: real_ip.header.clone(),
                    set_from: real_ip.set_from,
                })
            }),
        },
    );

    info!(
        "Starting http server on {}:{}",
        config.http.host, config.http.port
    );
    server.serve().await
}
