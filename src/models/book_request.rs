use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::book_request::{
    BookRequest as DomainBookRequest, NewBookRequest as DomainNewBookRequest,
};
use crate::domain::types::{Email, PersonName, PhoneNumber, TypeConstraintError};

/// Diesel model representing the `book_requests` table.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::book_requests)]
pub struct BookRequest {
    pub id: i32,
    pub user_id: i32,
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub book_title: String,
    pub publisher: String,
    pub author: String,
    pub class_level: String,
    pub message: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::book_requests)]
pub struct NewBookRequest {
    pub user_id: i32,
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub book_title: String,
    pub publisher: String,
    pub author: String,
    pub class_level: String,
    pub message: String,
    pub created_at: NaiveDateTime,
}

impl TryFrom<BookRequest> for DomainBookRequest {
    type Error = TypeConstraintError;

    fn try_from(request: BookRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            id: request.id.try_into()?,
            user_id: request.user_id.try_into()?,
            name: PersonName::new(request.name)?,
            email: Email::new(request.email)?,
            mobile: PhoneNumber::new(request.mobile)?,
            book_title: request.book_title,
            publisher: request.publisher,
            author: request.author,
            class_level: request.class_level,
            message: request.message,
            created_at: request.created_at,
        })
    }
}

impl From<DomainNewBookRequest> for NewBookRequest {
    fn from(request: DomainNewBookRequest) -> Self {
        Self {
            user_id: request.user_id.get(),
            name: request.name.into_inner(),
            email: request.email.into_inner(),
            mobile: request.mobile.into_inner(),
            book_title: request.book_title,
            publisher: request.publisher,
            author: request.author,
            class_level: request.class_level,
            message: request.message,
            created_at: request.created_at,
        }
    }
}
