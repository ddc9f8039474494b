use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::review::ReviewUpdate;
use crate::domain::types::{
    BookId, Email, PersonName, Rating, ReviewComment, ReviewStatus, TypeConstraintError,
};
use crate::forms::non_blank;

#[derive(Debug, Error)]
pub enum ReviewFormError {
    #[error("Review form validation failed: {0}")]
    Validation(String),
    #[error("Review form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for ReviewFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for ReviewFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewForm {
    #[validate(range(min = 1))]
    pub book_id: i32,
    #[validate(length(min = 1))]
    pub category_name: String,
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[validate(range(min = 1, max = 5))]
    pub rating: i32,
    #[validate(length(min = 1))]
    pub comment: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateReviewPayload {
    pub book_id: BookId,
    pub category_name: String,
    pub name: PersonName,
    pub email: Option<Email>,
    pub rating: Rating,
    pub comment: ReviewComment,
}

impl TryFrom<CreateReviewForm> for CreateReviewPayload {
    type Error = ReviewFormError;

    fn try_from(value: CreateReviewForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            book_id: BookId::new(value.book_id)?,
            category_name: value.category_name.trim().to_string(),
            name: PersonName::new(value.name)?,
            email: non_blank(value.email).map(Email::new).transpose()?,
            rating: Rating::new(value.rating)?,
            comment: ReviewComment::new(value.comment)?,
        })
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateReviewForm {
    #[serde(default)]
    #[validate(range(min = 1, max = 5))]
    pub rating: Option<i32>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl TryFrom<UpdateReviewForm> for ReviewUpdate {
    type Error = ReviewFormError;

    fn try_from(value: UpdateReviewForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            rating: value.rating.map(Rating::new).transpose()?,
            comment: value.comment.map(ReviewComment::new).transpose()?,
            status: value.status.map(ReviewStatus::try_from).transpose()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_must_be_between_one_and_five() {
        let form: CreateReviewForm = serde_json::from_value(serde_json::json!({
            "bookId": 1,
            "categoryName": "School",
            "name": "Ravi",
            "rating": 6,
            "comment": "Great"
        }))
        .unwrap();
        assert!(matches!(
            CreateReviewPayload::try_from(form),
            Err(ReviewFormError::Validation(_))
        ));
    }

    #[test]
    fn update_parses_status() {
        let update = ReviewUpdate::try_from(UpdateReviewForm {
            status: Some("Approved".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(update.status, Some(ReviewStatus::Approved));
        assert!(update.rating.is_none());

        let bad = ReviewUpdate::try_from(UpdateReviewForm {
            status: Some("hidden".into()),
            ..Default::default()
        });
        assert!(matches!(bad, Err(ReviewFormError::TypeConstraint(_))));
    }
}
