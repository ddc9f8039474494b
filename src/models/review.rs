use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::review::{NewReview as DomainNewReview, Review as DomainReview};
use crate::domain::types::{
    Email, PersonName, Rating, ReviewComment, ReviewStatus, TypeConstraintError,
};

/// Diesel model representing the `reviews` table.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::reviews)]
pub struct Review {
    pub id: i32,
    pub book_id: i32,
    pub category_name: String,
    pub name: String,
    pub email: Option<String>,
    pub rating: i32,
    pub comment: String,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::reviews)]
pub struct NewReview {
    pub book_id: i32,
    pub category_name: String,
    pub name: String,
    pub email: Option<String>,
    pub rating: i32,
    pub comment: String,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<Review> for DomainReview {
    type Error = TypeConstraintError;

    fn try_from(review: Review) -> Result<Self, Self::Error> {
        Ok(Self {
            id: review.id.try_into()?,
            book_id: review.book_id.try_into()?,
            category_name: review.category_name,
            name: PersonName::new(review.name)?,
            email: review.email.map(Email::new).transpose()?,
            rating: Rating::new(review.rating)?,
            comment: ReviewComment::new(review.comment)?,
            status: ReviewStatus::try_from(review.status)?,
            created_at: review.created_at,
            updated_at: review.updated_at,
        })
    }
}

impl From<DomainNewReview> for NewReview {
    fn from(review: DomainNewReview) -> Self {
        Self {
            book_id: review.book_id.get(),
            category_name: review.category_name,
            name: review.name.into_inner(),
            email: review.email.map(Email::into_inner),
            rating: review.rating.get(),
            comment: review.comment.into_inner(),
            status: review.status.into(),
            created_at: review.created_at,
            updated_at: review.updated_at,
        }
    }
}
