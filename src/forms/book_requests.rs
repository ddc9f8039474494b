use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::types::{Email, PersonName, PhoneNumber, TypeConstraintError};

#[derive(Debug, Error)]
pub enum BookRequestFormError {
    #[error("Book request form validation failed: {0}")]
    Validation(String),
    #[error("Book request form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for BookRequestFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for BookRequestFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BookRequestForm {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub mobile: String,
    #[validate(length(min = 1))]
    pub book_title: String,
    #[validate(length(min = 1))]
    pub publisher: String,
    #[validate(length(min = 1))]
    pub author: String,
    #[validate(length(min = 1))]
    pub class_level: String,
    #[validate(length(min = 1))]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BookRequestPayload {
    pub name: PersonName,
    pub email: Email,
    pub mobile: PhoneNumber,
    pub book_title: String,
    pub publisher: String,
    pub author: String,
    /// Display name of the category the title belongs to.
    pub class_level: String,
    pub message: String,
}

impl TryFrom<BookRequestForm> for BookRequestPayload {
    type Error = BookRequestFormError;

    fn try_from(value: BookRequestForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            name: PersonName::new(value.name)?,
            email: Email::new(value.email)?,
            mobile: PhoneNumber::new(value.mobile)?,
            book_title: value.book_title.trim().to_string(),
            publisher: value.publisher.trim().to_string(),
            author: value.author.trim().to_string(),
            class_level: value.class_level.trim().to_string(),
            message: value.message.trim().to_string(),
        })
    }
}
