use anyhow::Context;
use mailform_config::EmailConfig;
use mailform_email_impl::EmailServiceImpl;

/// Build the SMTP transport from the configuration.
pub fn connect(config: &EmailConfig) -> anyhow::Result<EmailServiceImpl> {
    EmailServiceImpl::new(&config.smtp_url, config.from.clone(), config.timeout.into())
        .context("Failed to connect to SMTP server")
}
