use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::subscriber::NotificationPreferences;
use crate::domain::types::{
    Email, EmailSubject, PersonName, SubscriberStatus, TypeConstraintError,
};
use crate::forms::non_blank;

#[derive(Debug, Error)]
pub enum SubscriberFormError {
    #[error("Subscriber form validation failed: {0}")]
    Validation(String),
    #[error("Subscriber form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for SubscriberFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for SubscriberFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct SubscriberForm {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub notifications: Option<NotificationPreferences>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubscriberPayload {
    pub name: PersonName,
    pub email: Email,
    pub status: SubscriberStatus,
    pub notifications: NotificationPreferences,
}

impl TryFrom<SubscriberForm> for SubscriberPayload {
    type Error = SubscriberFormError;

    fn try_from(value: SubscriberForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            name: PersonName::new(value.name)?,
            email: Email::new(value.email)?,
            status: non_blank(value.status)
                .map(SubscriberStatus::try_from)
                .transpose()?
                .unwrap_or(SubscriberStatus::Inactive),
            notifications: value.notifications.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct SubscriberStatusForm {
    pub status: String,
}

impl TryFrom<SubscriberStatusForm> for SubscriberStatus {
    type Error = SubscriberFormError;

    fn try_from(value: SubscriberStatusForm) -> Result<Self, Self::Error> {
        Ok(SubscriberStatus::try_from(value.status)?)
    }
}

/// Preference toggles; an absent flag keeps its stored value.
#[derive(Debug, Default, Deserialize)]
pub struct NotificationsForm {
    #[serde(default)]
    pub push: Option<bool>,
    #[serde(default)]
    pub email: Option<bool>,
}

impl NotificationsForm {
    pub fn apply(&self, current: NotificationPreferences) -> NotificationPreferences {
        NotificationPreferences {
            push: self.push.unwrap_or(current.push),
            email: self.email.unwrap_or(current.email),
        }
    }
}

/// Add (or refresh) a subscriber and mail them in one step.
#[derive(Debug, Deserialize, Validate)]
pub struct SubscriberMailForm {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub subject: String,
    #[validate(length(min = 1))]
    pub body: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubscriberMailPayload {
    pub name: PersonName,
    pub email: Email,
    pub subject: EmailSubject,
    pub body: String,
}

impl TryFrom<SubscriberMailForm> for SubscriberMailPayload {
    type Error = SubscriberFormError;

    fn try_from(value: SubscriberMailForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            name: PersonName::new(value.name)?,
            email: Email::new(value.email)?,
            subject: EmailSubject::new(value.subject)?,
            body: value.body,
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct BulkEmailForm {
    #[validate(length(min = 1))]
    pub subject: String,
    #[validate(length(min = 1))]
    pub body: String,
    #[validate(length(min = 1))]
    pub recipients: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BulkEmailPayload {
    pub subject: EmailSubject,
    pub body: String,
    pub recipients: Vec<Email>,
}

impl TryFrom<BulkEmailForm> for BulkEmailPayload {
    type Error = SubscriberFormError;

    fn try_from(value: BulkEmailForm) -> Result<Self, Self::Error> {
        value.validate()?;

        let mut recipients: Vec<Email> = Vec::with_capacity(value.recipients.len());
        for raw in value.recipients {
            let email = Email::new(raw)?;
            if !recipients.contains(&email) {
                recipients.push(email);
            }
        }

        Ok(Self {
            subject: EmailSubject::new(value.subject)?,
            body: value.body,
            recipients,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_subscribers_start_inactive_with_email_notifications() {
        let payload = SubscriberPayload::try_from(SubscriberForm {
            name: "Meera".into(),
            email: "meera@example.com".into(),
            status: None,
            notifications: None,
        })
        .unwrap();
        assert_eq!(payload.status, SubscriberStatus::Inactive);
        assert!(payload.notifications.email);
        assert!(!payload.notifications.push);
    }

    #[test]
    fn notifications_form_keeps_absent_flags() {
        let form = NotificationsForm {
            push: Some(true),
            email: None,
        };
        let updated = form.apply(NotificationPreferences::default());
        assert!(updated.push);
        assert!(updated.email);
    }

    #[test]
    fn bulk_email_dedupes_recipients() {
        let payload = BulkEmailPayload::try_from(BulkEmailForm {
            subject: "Sale".into(),
            body: "Everything 10% off".into(),
            recipients: vec!["A@example.com".into(), "a@example.com".into()],
        })
        .unwrap();
        assert_eq!(payload.recipients.len(), 1);

        let empty = BulkEmailPayload::try_from(BulkEmailForm {
            subject: "Sale".into(),
            body: "Body".into(),
            recipients: vec![],
        });
        assert!(matches!(empty, Err(SubscriberFormError::Validation(_))));
    }
}
