use chrono::Utc;
use diesel::prelude::*;

use crate::domain::review::{NewReview, Review};
use crate::domain::types::ReviewId;
use crate::models::review::{NewReview as DbNewReview, Review as DbReview};
use crate::repository::{
    DieselRepository, RepositoryResult, ReviewListQuery, ReviewReader, ReviewWriter,
};

impl ReviewReader for DieselRepository {
    fn list_reviews(&self, query: ReviewListQuery) -> RepositoryResult<Vec<Review>> {
        use crate::schema::reviews;

        let mut conn = self.conn()?;

        let mut items = reviews::table.into_boxed::<diesel::sqlite::Sqlite>();
        if let Some(book_id) = query.book_id {
            items = items.filter(reviews::book_id.eq(book_id.get()));
        }
        if let Some(status) = query.status {
            items = items.filter(reviews::status.eq(status.as_str()));
        }

        let items = items
            .order((reviews::created_at.desc(), reviews::id.desc()))
            .load::<DbReview>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Review>, _>>()?;

        Ok(items)
    }

    fn get_review_by_id(&self, id: ReviewId) -> RepositoryResult<Option<Review>> {
        use crate::schema::reviews;

        let mut conn = self.conn()?;

        let review = reviews::table
            .find(id.get())
            .first::<DbReview>(&mut conn)
            .optional()?;

        Ok(review.map(TryInto::try_into).transpose()?)
    }
}

impl ReviewWriter for DieselRepository {
    fn create_review(&self, review: &NewReview) -> RepositoryResult<Review> {
        use crate::schema::reviews;

        let mut conn = self.conn()?;
        let db_review: DbNewReview = review.clone().into();

        let created = diesel::insert_into(reviews::table)
            .values(&db_review)
            .get_result::<DbReview>(&mut conn)?;

        Ok(created.try_into()?)
    }

    fn update_review(&self, review: &Review) -> RepositoryResult<usize> {
        use crate::schema::reviews;

        let mut conn = self.conn()?;

        let affected = diesel::update(reviews::table.find(review.id.get()))
            .set((
                reviews::rating.eq(review.rating.get()),
                reviews::comment.eq(review.comment.as_str()),
                reviews::status.eq(review.status.as_str()),
                reviews::updated_at.eq(Utc::now().naive_utc()),
            ))
            .execute(&mut conn)?;

        Ok(affected)
    }

    fn delete_review(&self, id: ReviewId) -> RepositoryResult<usize> {
        use crate::schema::reviews;

        let mut conn = self.conn()?;
        let affected = diesel::delete(reviews::table.find(id.get())).execute(&mut conn)?;
        Ok(affected)
    }
}
