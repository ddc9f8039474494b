use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{BookRequestId, Email, PersonName, PhoneNumber, UserId};

/// Customer request for a title the store does not carry yet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookRequest {
    pub id: BookRequestId,
    pub user_id: UserId,
    pub name: PersonName,
    pub email: Email,
    pub mobile: PhoneNumber,
    pub book_title: String,
    pub publisher: String,
    pub author: String,
    pub class_level: String,
    pub message: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewBookRequest {
    pub user_id: UserId,
    pub name: PersonName,
    pub email: Email,
    pub mobile: PhoneNumber,
    pub book_title: String,
    pub publisher: String,
    pub author: String,
    pub class_level: String,
    pub message: String,
    pub created_at: NaiveDateTime,
}
