use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{Email, EmailLogId, EmailLogStatus};

/// Audit record of one bulk email dispatch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EmailLog {
    pub id: EmailLogId,
    pub subject: String,
    pub recipients: Vec<Email>,
    pub status: EmailLogStatus,
    pub error: Option<String>,
    pub timestamp: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewEmailLog {
    pub subject: String,
    pub recipients: Vec<Email>,
    pub status: EmailLogStatus,
    pub error: Option<String>,
    pub timestamp: NaiveDateTime,
}
