use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::subscriber::{
    NewSubscriber as DomainNewSubscriber, NotificationPreferences, Subscriber as DomainSubscriber,
};
use crate::domain::types::{Email, PersonName, SubscriberStatus, TypeConstraintError};

/// Diesel model representing the `subscribers` table.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::subscribers)]
pub struct Subscriber {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub status: String,
    pub notify_push: bool,
    pub notify_email: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::subscribers)]
pub struct NewSubscriber {
    pub name: String,
    pub email: String,
    pub status: String,
    pub notify_push: bool,
    pub notify_email: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<Subscriber> for DomainSubscriber {
    type Error = TypeConstraintError;

    fn try_from(subscriber: Subscriber) -> Result<Self, Self::Error> {
        Ok(Self {
            id: subscriber.id.try_into()?,
            name: PersonName::new(subscriber.name)?,
            email: Email::new(subscriber.email)?,
            status: SubscriberStatus::try_from(subscriber.status)?,
            notifications: NotificationPreferences {
                push: subscriber.notify_push,
                email: subscriber.notify_email,
            },
            created_at: subscriber.created_at,
            updated_at: subscriber.updated_at,
        })
    }
}

impl From<DomainNewSubscriber> for NewSubscriber {
    fn from(subscriber: DomainNewSubscriber) -> Self {
        Self {
            name: subscriber.name.into_inner(),
            email: subscriber.email.into_inner(),
            status: subscriber.status.into(),
            notify_push: subscriber.notifications.push,
            notify_email: subscriber.notifications.email,
            created_at: subscriber.created_at,
            updated_at: subscriber.updated_at,
        }
    }
}
