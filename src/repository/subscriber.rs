use chrono::Utc;
use diesel::prelude::*;

use crate::domain::subscriber::{NewSubscriber, Subscriber};
use crate::domain::types::{Email, SubscriberId};
use crate::models::subscriber::{NewSubscriber as DbNewSubscriber, Subscriber as DbSubscriber};
use crate::repository::{DieselRepository, RepositoryResult, SubscriberReader, SubscriberWriter};

impl SubscriberReader for DieselRepository {
    fn list_subscribers(&self) -> RepositoryResult<Vec<Subscriber>> {
        use crate::schema::subscribers;

        let mut conn = self.conn()?;

        let items = subscribers::table
            .order((subscribers::created_at.desc(), subscribers::id.desc()))
            .load::<DbSubscriber>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Subscriber>, _>>()?;

        Ok(items)
    }

    fn get_subscriber_by_id(&self, id: SubscriberId) -> RepositoryResult<Option<Subscriber>> {
        use crate::schema::subscribers;

        let mut conn = self.conn()?;

        let subscriber = subscribers::table
            .find(id.get())
            .first::<DbSubscriber>(&mut conn)
            .optional()?;

        Ok(subscriber.map(TryInto::try_into).transpose()?)
    }

    fn get_subscriber_by_email(&self, email: &Email) -> RepositoryResult<Option<Subscriber>> {
        use crate::schema::subscribers;

        let mut conn = self.conn()?;

        let subscriber = subscribers::table
            .filter(subscribers::email.eq(email.as_str()))
            .first::<DbSubscriber>(&mut conn)
            .optional()?;

        Ok(subscriber.map(TryInto::try_into).transpose()?)
    }
}

impl SubscriberWriter for DieselRepository {
    fn create_subscriber(&self, subscriber: &NewSubscriber) -> RepositoryResult<Subscriber> {
        use crate::schema::subscribers;

        let mut conn = self.conn()?;
        let db_subscriber: DbNewSubscriber = subscriber.clone().into();

        let created = diesel::insert_into(subscribers::table)
            .values(&db_subscriber)
            .get_result::<DbSubscriber>(&mut conn)?;

        Ok(created.try_into()?)
    }

    fn update_subscriber(&self, subscriber: &Subscriber) -> RepositoryResult<usize> {
        use crate::schema::subscribers;

        let mut conn = self.conn()?;

        let affected = diesel::update(subscribers::table.find(subscriber.id.get()))
            .set((
                subscribers::name.eq(subscriber.name.as_str()),
                subscribers::email.eq(subscriber.email.as_str()),
                subscribers::status.eq(subscriber.status.as_str()),
                subscribers::notify_push.eq(subscriber.notifications.push),
                subscribers::notify_email.eq(subscriber.notifications.email),
                subscribers::updated_at.eq(Utc::now().naive_utc()),
            ))
            .execute(&mut conn)?;

        Ok(affected)
    }

    fn delete_subscriber(&self, id: SubscriberId) -> RepositoryResult<usize> {
        use crate::schema::subscribers;

        let mut conn = self.conn()?;
        let affected = diesel::delete(subscribers::table.find(id.get())).execute(&mut conn)?;
        Ok(affected)
    }
}
