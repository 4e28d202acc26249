use nutype::nutype;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::email_address::EmailAddress;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactMessage {
    pub author: ContactMessageAuthor,
    pub subject: ContactMessageSubject,
    pub content: ContactMessageContent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactMessageAuthor {
    pub name: ContactMessageAuthorName,
    pub email: EmailAddress,
}

#[nutype(
    sanitize(trim),
    validate(len_char_min = 2, len_char_max = 100),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Serialize, Deserialize)
)]
pub struct ContactMessageAuthorName(String);

#[nutype(
    sanitize(trim),
    validate(len_char_min = 1, len_char_max = 200),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Serialize, Deserialize)
)]
pub struct ContactMessageSubject(String);

#[nutype(
    sanitize(trim),
    validate(len_char_min = 1, len_char_max = 2000),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Serialize, Deserialize)
)]
pub struct ContactMessageContent(String);

/// Raw, unvalidated form fields as they arrive in the request body.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ContactMessageDraft {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactField {
    Name,
    Email,
    Subject,
    Message,
}

impl std::fmt::Display for ContactField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Subject => "subject",
            Self::Message => "message",
        }
        .fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ContactFieldError {
    pub field: ContactField,
    pub message: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("contact message validation failed")]
pub struct ContactValidationErrors(pub Vec<ContactFieldError>);

impl TryFrom<ContactMessageDraft> for ContactMessage {
    type Error = ContactValidationErrors;

    /// Validates and normalizes all four fields, reporting every violated
    /// rule at once. Field order in the error list follows the form layout.
    fn try_from(draft: ContactMessageDraft) -> Result<Self, Self::Error> {
        let mut errors = Vec::new();

        let name = ContactMessageAuthorName::try_from(draft.name)
            .map_err(|_| {
                errors.push(ContactFieldError {
                    field: ContactField::Name,
                    message: "Name must be between 2 and 100 characters",
                })
            })
            .ok();

        let email = draft
            .email
            .trim()
            .to_lowercase()
            .parse::<EmailAddress>()
            .map_err(|_| {
                errors.push(ContactFieldError {
                    field: ContactField::Email,
                    message: "A valid email address is required",
                })
            })
            .ok();

        let subject = ContactMessageSubject::try_from(draft.subject)
            .map_err(|_| {
                errors.push(ContactFieldError {
                    field: ContactField::Subject,
                    message: "Subject is required and must be at most 200 characters",
                })
            })
            .ok();

        let content = ContactMessageContent::try_from(draft.message)
            .map_err(|_| {
                errors.push(ContactFieldError {
                    field: ContactField::Message,
                    message: "Message is required and must be at most 2000 characters",
                })
            })
            .ok();

        match (name, email, subject, content) {
            (Some(name), Some(email), Some(subject), Some(content)) => Ok(Self {
                author: ContactMessageAuthor { name, email },
                subject,
                content,
            }),
            _ => Err(ContactValidationErrors(errors)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> ContactMessageDraft {
        ContactMessageDraft {
            name: "Max Mustermann".into(),
            email: "max.mustermann@example.de".into(),
            subject: "Test".into(),
            message: "Hello World!".into(),
        }
    }

    #[test]
    fn accepts_valid_draft() {
        let message = ContactMessage::try_from(draft()).unwrap();
        assert_eq!(*message.author.name, "Max Mustermann");
        assert_eq!(message.author.email.as_str(), "max.mustermann@example.de");
        assert_eq!(*message.subject, "Test");
        assert_eq!(*message.content, "Hello World!");
    }

    #[test]
    fn name_length_boundaries() {
        for (len, ok) in [(1, false), (2, true), (100, true), (101, false)] {
            let result = ContactMessage::try_from(ContactMessageDraft {
                name: "x".repeat(len),
                ..draft()
            });
            assert_eq!(result.is_ok(), ok, "name of {len} characters");
        }
    }

    #[test]
    fn subject_length_boundaries() {
        for (len, ok) in [(0, false), (1, true), (200, true), (201, false)] {
            let result = ContactMessage::try_from(ContactMessageDraft {
                subject: "x".repeat(len),
                ..draft()
            });
            assert_eq!(result.is_ok(), ok, "subject of {len} characters");
        }
    }

    #[test]
    fn message_length_boundaries() {
        for (len, ok) in [(0, false), (1, true), (2000, true), (2001, false)] {
            let result = ContactMessage::try_from(ContactMessageDraft {
                message: "x".repeat(len),
                ..draft()
            });
            assert_eq!(result.is_ok(), ok, "message of {len} characters");
        }
    }

    #[test]
    fn fields_are_trimmed_before_validation() {
        let message = ContactMessage::try_from(ContactMessageDraft {
            name: "  Jo  ".into(),
            subject: " Hi ".into(),
            message: "\n Hello \n".into(),
            ..draft()
        })
        .unwrap();
        assert_eq!(*message.author.name, "Jo");
        assert_eq!(*message.subject, "Hi");
        assert_eq!(*message.content, "Hello");
    }

    #[test]
    fn whitespace_only_fields_are_rejected() {
        let err = ContactMessage::try_from(ContactMessageDraft {
            subject: "   ".into(),
            message: " \n\t ".into(),
            ..draft()
        })
        .unwrap_err();
        let fields = err.0.iter().map(|e| e.field).collect::<Vec<_>>();
        assert_eq!(fields, [ContactField::Subject, ContactField::Message]);
    }

    #[test]
    fn email_is_normalized_to_lowercase() {
        let message = ContactMessage::try_from(ContactMessageDraft {
            email: "  Max.Mustermann@Example.DE ".into(),
            ..draft()
        })
        .unwrap();
        assert_eq!(message.author.email.as_str(), "max.mustermann@example.de");
    }

    #[test]
    fn invalid_email_is_rejected() {
        for email in ["", "not-an-email", "a@", "@example.com", "a b@example.com"] {
            let err = ContactMessage::try_from(ContactMessageDraft {
                email: email.into(),
                ..draft()
            })
            .unwrap_err();
            assert_eq!(
                err.0,
                [ContactFieldError {
                    field: ContactField::Email,
                    message: "A valid email address is required",
                }],
                "email {email:?}"
            );
        }
    }

    #[test]
    fn all_violations_are_reported_at_once() {
        let err = ContactMessage::try_from(ContactMessageDraft {
            name: "x".into(),
            email: "nope".into(),
            subject: "".into(),
            message: "".into(),
        })
        .unwrap_err();
        let fields = err.0.iter().map(|e| e.field).collect::<Vec<_>>();
        assert_eq!(
            fields,
            [
                ContactField::Name,
                ContactField::Email,
                ContactField::Subject,
                ContactField::Message,
            ]
        );
    }

    #[test]
    fn field_errors_serialize_with_field_and_message() {
        let err = ContactFieldError {
            field: ContactField::Name,
            message: "Name must be between 2 and 100 characters",
        };
        assert_eq!(
            serde_json::to_value(err).unwrap(),
            serde_json::json!({
                "field": "name",
                "message": "Name must be between 2 and 100 characters",
            })
        );
    }
}
