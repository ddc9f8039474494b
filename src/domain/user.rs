use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{Email, PhoneNumber, Role, UserId, UserName};

/// Registered account. Secrets never leave the process in serialized form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub username: UserName,
    pub email: Email,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub phone: PhoneNumber,
    pub role: Role,
    #[serde(skip, default)]
    pub reset_token_hash: Option<String>,
    #[serde(skip, default)]
    pub reset_token_expires_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Data required to insert a new [`User`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub username: UserName,
    pub email: Email,
    pub password_hash: String,
    pub phone: PhoneNumber,
    pub role: Role,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}
