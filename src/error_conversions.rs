//! Error conversion glue between layers.
//!
//! The domain layer must not depend on repository or service error types, so
//! the conversions live here. Only the repository conversion is available to
//! `data` feature consumers.

use crate::domain::types::TypeConstraintError;
use crate::repository::RepositoryError;

impl From<TypeConstraintError> for RepositoryError {
    fn from(val: TypeConstraintError) -> Self {
        RepositoryError::ValidationError(val.to_string())
    }
}

#[cfg(feature = "server")]
mod server {
    use crate::domain::types::TypeConstraintError;
    use crate::forms::auth::AuthFormError;
    use crate::forms::book_requests::BookRequestFormError;
    use crate::forms::books::BookFormError;
    use crate::forms::cart::CartFormError;
    use crate::forms::categories::CategoryFormError;
    use crate::forms::orders::OrderFormError;
    use crate::forms::otp::OtpFormError;
    use crate::forms::payments::PaymentFormError;
    use crate::forms::reviews::ReviewFormError;
    use crate::forms::settings::SettingsFormError;
    use crate::forms::subscribers::SubscriberFormError;
    use crate::services::ServiceError;

    impl From<TypeConstraintError> for ServiceError {
        fn from(val: TypeConstraintError) -> Self {
            ServiceError::TypeConstraint(val.to_string())
        }
    }

    macro_rules! form_error_into_service_error {
        ($($error:ty),+ $(,)?) => {
            $(
                impl From<$error> for ServiceError {
                    fn from(val: $error) -> Self {
                        ServiceError::Form(val.to_string())
                    }
                }
            )+
        };
    }

    form_error_into_service_error!(
        AuthFormError,
        BookFormError,
        BookRequestFormError,
        CartFormError,
        CategoryFormError,
        OrderFormError,
        OtpFormError,
        PaymentFormError,
        ReviewFormError,
        SettingsFormError,
        SubscriberFormError,
    );
}
