use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{Email, PersonName, SubscriberId, SubscriberStatus};

/// Channels a subscriber agreed to be contacted on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotificationPreferences {
    pub push: bool,
    pub email: bool,
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self {
            push: false,
            email: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Subscriber {
    pub id: SubscriberId,
    pub name: PersonName,
    pub email: Email,
    pub status: SubscriberStatus,
    pub notifications: NotificationPreferences,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewSubscriber {
    pub name: PersonName,
    pub email: Email,
    pub status: SubscriberStatus,
    pub notifications: NotificationPreferences,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}
