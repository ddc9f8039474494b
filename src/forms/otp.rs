use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::types::{Email, PersonName, TypeConstraintError};

#[derive(Debug, Error)]
pub enum OtpFormError {
    #[error("OTP form validation failed: {0}")]
    Validation(String),
    #[error("OTP form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for OtpFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for OtpFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct SendOtpForm {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(email)]
    pub email: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SendOtpPayload {
    pub name: PersonName,
    pub email: Email,
}

impl TryFrom<SendOtpForm> for SendOtpPayload {
    type Error = OtpFormError;

    fn try_from(value: SendOtpForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            name: PersonName::new(value.name)?,
            email: Email::new(value.email)?,
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct VerifyOtpForm {
    #[validate(email)]
    pub email: String,
    #[validate(length(equal = 6))]
    pub otp: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VerifyOtpPayload {
    pub email: Email,
    pub otp: String,
}

impl TryFrom<VerifyOtpForm> for VerifyOtpPayload {
    type Error = OtpFormError;

    fn try_from(value: VerifyOtpForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            email: Email::new(value.email)?,
            otp: value.otp,
        })
    }
}
