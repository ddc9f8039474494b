use thiserror::Error;

use crate::repository::RepositoryError;

/// Generic error type used by service layer functions. Each variant carries
/// the message returned to the client.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// No valid session, or the credentials did not match.
    #[error("{0}")]
    Unauthorized(String),
    /// The session is valid but lacks the required role or ownership.
    #[error("{0}")]
    Forbidden(String),
    /// Requested resource was not found.
    #[error("{0}")]
    NotFound(String),
    /// The operation collides with existing data.
    #[error("{0}")]
    Conflict(String),
    /// Submitted form failed validation.
    #[error("{0}")]
    Form(String),
    /// A value failed a domain type constraint.
    #[error("{0}")]
    TypeConstraint(String),
    /// The request is well-formed but cannot be applied.
    #[error("{0}")]
    BadRequest(String),
    /// The mail relay or payment gateway failed.
    #[error("{0}")]
    Upstream(String),
    /// An unexpected internal error occurred.
    #[error("internal error")]
    Internal,
}

impl ServiceError {
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    /// Log an unexpected repository failure and hide it behind `Internal`.
    pub fn internal(context: &str, error: RepositoryError) -> Self {
        log::error!("Failed to {context}: {error}");
        Self::Internal
    }
}

/// Convenient alias for results returned from service functions.
pub type ServiceResult<T> = Result<T, ServiceError>;
