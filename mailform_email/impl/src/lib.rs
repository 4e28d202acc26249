use std::time::Duration;

use anyhow::anyhow;
use lettre::{
    message::{
        header::{self, Header, HeaderName, HeaderValue},
        MessageBuilder,
    },
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use mailform_email_contracts::{Email, EmailService, Priority};
use mailform_models::email_address::EmailAddressWithName;
use mailform_utils::Apply;

#[derive(Debug, Clone)]
pub struct EmailServiceImpl {
    from: EmailAddressWithName,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl EmailServiceImpl {
    pub fn new(
        url: &str,
        from: EmailAddressWithName,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::from_url(url)?
            .timeout(Some(timeout))
            .build();

        Ok(Self { from, transport })
    }

    fn build_message(&self, email: Email) -> anyhow::Result<Message> {
        Message::builder()
            .from(self.from.0.clone())
            .to(email.recipient.0)
            .apply_map(email.reply_to.map(|x| x.0), MessageBuilder::reply_to)
            .subject(email.subject)
            .header(match email.content_type {
                mailform_email_contracts::ContentType::Text => header::ContentType::TEXT_PLAIN,
                mailform_email_contracts::ContentType::Html => header::ContentType::TEXT_HTML,
            })
            .header(XPriority(email.priority))
            .body(email.body)
            .map_err(Into::into)
    }
}

impl EmailService for EmailServiceImpl {
    async fn send(&self, email: Email) -> anyhow::Result<bool> {
        let message = self.build_message(email)?;

        self.transport
            .send(message)
            .await
            .map(|response| response.is_positive())
            .map_err(Into::into)
    }

    async fn ping(&self) -> anyhow::Result<()> {
        self.transport
            .test_connection()
            .await?
            .then_some(())
            .ok_or_else(|| anyhow!("Failed to ping smtp server"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct XPriority(Priority);

impl Header for XPriority {
    fn name() -> HeaderName {
        HeaderName::new_from_ascii_str("X-Priority")
    }

    fn parse(s: &str) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        match s.trim() {
            "1" => Ok(Self(Priority::High)),
            "3" => Ok(Self(Priority::Normal)),
            _ => Err("invalid X-Priority value".into()),
        }
    }

    fn display(&self) -> HeaderValue {
        let value = match self.0 {
            Priority::High => "1",
            Priority::Normal => "3",
        };
        HeaderValue::new(Self::name(), value.into())
    }
}
