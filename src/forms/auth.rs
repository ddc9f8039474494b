use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::types::{Email, PhoneNumber, Role, TypeConstraintError, UserName};
use crate::forms::non_blank;

pub const MIN_PASSWORD_LENGTH: u64 = 6;

#[derive(Debug, Error)]
pub enum AuthFormError {
    #[error("Auth form validation failed: {0}")]
    Validation(String),
    #[error("Auth form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for AuthFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for AuthFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct SignupForm {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = MIN_PASSWORD_LENGTH))]
    pub password: String,
    #[validate(length(min = 1))]
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignupPayload {
    pub username: UserName,
    pub email: Email,
    pub password: String,
    pub phone: PhoneNumber,
}

impl TryFrom<SignupForm> for SignupPayload {
    type Error = AuthFormError;

    fn try_from(value: SignupForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            username: UserName::new(value.username)?,
            email: Email::new(value.email)?,
            password: value.password,
            phone: PhoneNumber::new(value.phone)?,
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginForm {
    #[validate(length(min = 1))]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoginPayload {
    pub email: Email,
    pub password: String,
}

impl TryFrom<LoginForm> for LoginPayload {
    type Error = AuthFormError;

    fn try_from(value: LoginForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            email: Email::new(value.email)?,
            password: value.password,
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct ForgotPasswordForm {
    #[validate(email)]
    pub email: String,
}

impl TryFrom<ForgotPasswordForm> for Email {
    type Error = AuthFormError;

    fn try_from(value: ForgotPasswordForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Email::new(value.email)?)
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct ResetPasswordForm {
    /// Reset token when it is not carried in the URL.
    #[serde(default)]
    pub token: Option<String>,
    #[validate(length(min = MIN_PASSWORD_LENGTH))]
    pub password: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResetPasswordPayload {
    pub token: String,
    pub password: String,
}

impl ResetPasswordPayload {
    pub fn new(token: String, form: ResetPasswordForm) -> Result<Self, AuthFormError> {
        form.validate()?;
        if token.trim().is_empty() {
            return Err(TypeConstraintError::EmptyString("token").into());
        }
        Ok(Self {
            token: token.trim().to_string(),
            password: form.password,
        })
    }
}

impl TryFrom<ResetPasswordForm> for ResetPasswordPayload {
    type Error = AuthFormError;

    fn try_from(mut value: ResetPasswordForm) -> Result<Self, Self::Error> {
        let token = value.token.take().unwrap_or_default();
        Self::new(token, value)
    }
}

/// One row of a bulk user import.
#[derive(Debug, Clone, Deserialize)]
pub struct BulkUserForm {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BulkUserPayload {
    pub username: UserName,
    pub email: Email,
    /// `None` asks the service to generate a random password.
    pub password: Option<String>,
    pub phone: PhoneNumber,
    pub role: Role,
}

impl TryFrom<BulkUserForm> for BulkUserPayload {
    type Error = AuthFormError;

    fn try_from(value: BulkUserForm) -> Result<Self, Self::Error> {
        let password = non_blank(value.password);
        if let Some(password) = &password
            && (password.chars().count() as u64) < MIN_PASSWORD_LENGTH
        {
            return Err(AuthFormError::Validation(format!(
                "password must be at least {MIN_PASSWORD_LENGTH} characters"
            )));
        }

        Ok(Self {
            username: UserName::new(value.username.unwrap_or_default())?,
            email: Email::new(value.email.unwrap_or_default())?,
            password,
            phone: PhoneNumber::new(value.phone.unwrap_or_default())?,
            role: non_blank(value.role)
                .map(Role::try_from)
                .transpose()?
                .unwrap_or_default(),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct BulkUsersForm {
    pub users: Vec<BulkUserForm>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signup_normalizes_email() {
        let payload = SignupPayload::try_from(SignupForm {
            username: "Reader".into(),
            email: "Reader@Example.com".into(),
            password: "secret1".into(),
            phone: "555-0100".into(),
        })
        .unwrap();
        assert_eq!(payload.email.as_str(), "reader@example.com");
    }

    #[test]
    fn signup_rejects_short_password() {
        let result = SignupPayload::try_from(SignupForm {
            username: "Reader".into(),
            email: "reader@example.com".into(),
            password: "123".into(),
            phone: "555-0100".into(),
        });
        assert!(matches!(result, Err(AuthFormError::Validation(_))));
    }

    #[test]
    fn reset_token_may_come_from_the_body() {
        let payload = ResetPasswordPayload::try_from(ResetPasswordForm {
            token: Some(" abc123 ".into()),
            password: "secret1".into(),
        })
        .unwrap();
        assert_eq!(payload.token, "abc123");

        let missing = ResetPasswordPayload::try_from(ResetPasswordForm {
            token: None,
            password: "secret1".into(),
        });
        assert!(matches!(missing, Err(AuthFormError::TypeConstraint(_))));
    }

    #[test]
    fn bulk_row_defaults_role_and_password() {
        let payload = BulkUserPayload::try_from(BulkUserForm {
            username: Some("Admin".into()),
            email: Some("admin@example.com".into()),
            password: None,
            phone: Some("555".into()),
            role: Some("admin".into()),
        })
        .unwrap();
        assert_eq!(payload.role, Role::Admin);
        assert!(payload.password.is_none());

        let row = BulkUserForm {
            username: Some("Reader".into()),
            email: Some("reader@example.com".into()),
            password: None,
            phone: Some("555".into()),
            role: None,
        };
        assert_eq!(BulkUserPayload::try_from(row).unwrap().role, Role::User);
    }

    #[test]
    fn bulk_row_without_email_is_rejected() {
        let row = BulkUserForm {
            username: Some("Reader".into()),
            email: None,
            password: None,
            phone: Some("555".into()),
            role: None,
        };
        assert!(BulkUserPayload::try_from(row).is_err());
    }
}
