use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    BookId, Email, PersonName, Rating, ReviewComment, ReviewId, ReviewStatus,
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: ReviewId,
    pub book_id: BookId,
    pub category_name: String,
    pub name: PersonName,
    pub email: Option<Email>,
    pub rating: Rating,
    pub comment: ReviewComment,
    pub status: ReviewStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewReview {
    pub book_id: BookId,
    pub category_name: String,
    pub name: PersonName,
    pub email: Option<Email>,
    pub rating: Rating,
    pub comment: ReviewComment,
    pub status: ReviewStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Moderator edits; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewUpdate {
    pub rating: Option<Rating>,
    pub comment: Option<ReviewComment>,
    pub status: Option<ReviewStatus>,
}
