use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::email_log::{EmailLog as DomainEmailLog, NewEmailLog as DomainNewEmailLog};
use crate::domain::types::{Email, EmailLogStatus, TypeConstraintError};

/// Diesel model representing the `email_logs` table.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::email_logs)]
pub struct EmailLog {
    pub id: i32,
    pub subject: String,
    pub recipients: String,
    pub status: String,
    pub error: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::email_logs)]
pub struct NewEmailLog {
    pub subject: String,
    pub recipients: String,
    pub status: String,
    pub error: Option<String>,
    pub created_at: NaiveDateTime,
}

impl TryFrom<EmailLog> for DomainEmailLog {
    type Error = TypeConstraintError;

    fn try_from(log: EmailLog) -> Result<Self, Self::Error> {
        Ok(Self {
            id: log.id.try_into()?,
            subject: log.subject,
            recipients: log
                .recipients
                .split(',')
                .filter(|r| !r.is_empty())
                .map(Email::new)
                .collect::<Result<Vec<_>, _>>()?,
            status: EmailLogStatus::try_from(log.status)?,
            error: log.error,
            timestamp: log.created_at,
        })
    }
}

impl From<DomainNewEmailLog> for NewEmailLog {
    fn from(log: DomainNewEmailLog) -> Self {
        Self {
            subject: log.subject,
            recipients: log
                .recipients
                .iter()
                .map(Email::as_str)
                .collect::<Vec<_>>()
                .join(","),
            status: log.status.into(),
            error: log.error,
            created_at: log.timestamp,
        }
    }
}
