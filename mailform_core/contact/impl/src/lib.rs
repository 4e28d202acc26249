use mailform_core_contact_contracts::{ContactSendMessageError, ContactService};
use mailform_email_contracts::{ContentType, Email, EmailService, Priority};
use mailform_models::{contact::ContactMessage, email_address::EmailAddressWithName};
use mailform_shared_contracts::time::TimeService;
use mailform_templates_contracts::{ContactMessageTemplate, TemplateService};

#[derive(Debug, Clone)]
pub struct ContactServiceImpl<Time, Template, Email> {
    time: Time,
    template: Template,
    email: Email,
    config: ContactServiceConfig,
}

#[derive(Debug, Clone)]
pub struct ContactServiceConfig {
    pub recipient: EmailAddressWithName,
}

impl<Time, Template, Email> ContactServiceImpl<Time, Template, Email> {
    pub fn new(time: Time, template: Template, email: Email, config: ContactServiceConfig) -> Self {
        Self {
            time,
            template,
            email,
            config,
        }
    }
}

impl<Time, TemplateS, EmailS> ContactService for ContactServiceImpl<Time, TemplateS, EmailS>
where
    Time: TimeService,
    TemplateS: TemplateService,
    EmailS: EmailService,
{
    async fn send_message(&self, message: ContactMessage) -> Result<(), ContactSendMessageError> {
        let sent_at = self.time.now();

        let body = self.template.render(&ContactMessageTemplate {
            name: (*message.author.name).clone(),
            email: message.author.email.as_str().to_owned(),
            subject: (*message.subject).clone(),
            message: (*message.content).clone(),
            sent_at: sent_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        })?;

        let email = Email {
            recipient: self.config.recipient.clone(),
            subject: format!("[Contact Form] {}", *message.subject),
            body,
            content_type: ContentType::Html,
            reply_to: Some(
                message
                    .author
                    .email
                    .with_name((*message.author.name).clone()),
            ),
            priority: Priority::High,
        };

        if !self.email.send(email).await? {
            return Err(ContactSendMessageError::Send);
        }

        Ok(())
    }
}
