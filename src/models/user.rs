use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::types::{Email, PhoneNumber, Role, TypeConstraintError, UserName};
use crate::domain::user::{NewUser as DomainNewUser, User as DomainUser};

/// Diesel model representing the `users` table.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::users)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub phone: String,
    pub role: String,
    pub reset_token_hash: Option<String>,
    pub reset_token_expires_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub phone: String,
    pub role: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<User> for DomainUser {
    type Error = TypeConstraintError;

    fn try_from(user: User) -> Result<Self, Self::Error> {
        Ok(Self {
            id: user.id.try_into()?,
            username: UserName::new(user.username)?,
            email: Email::new(user.email)?,
            password_hash: user.password_hash,
            phone: PhoneNumber::new(user.phone)?,
            role: Role::try_from(user.role)?,
            reset_token_hash: user.reset_token_hash,
            reset_token_expires_at: user.reset_token_expires_at,
            created_at: user.created_at,
            updated_at: user.updated_at,
        })
    }
}

impl From<DomainNewUser> for NewUser {
    fn from(user: DomainNewUser) -> Self {
        Self {
            username: user.username.into_inner(),
            email: user.email.into_inner(),
            password_hash: user.password_hash,
            phone: user.phone.into_inner(),
            role: user.role.into(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}
