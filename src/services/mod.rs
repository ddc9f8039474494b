//! Business operations invoked by the HTTP handlers.
//!
//! Services are generic over the repository traits they need so they can be
//! exercised against [`crate::repository::test::TestRepository`] in unit
//! tests and against [`crate::repository::DieselRepository`] in production.

use chrono::{NaiveDateTime, Utc};
use serde::Serialize;

use crate::auth::AuthenticatedUser;
use crate::domain::types::UserId;

pub mod auth;
pub mod book_requests;
pub mod books;
pub mod cart;
pub mod categories;
pub mod errors;
pub mod orders;
pub mod otp;
pub mod payments;
pub mod reviews;
pub mod settings;
pub mod subscribers;

pub use errors::{ServiceError, ServiceResult};

/// Reject callers without the admin role.
pub fn ensure_admin(user: &AuthenticatedUser) -> ServiceResult<()> {
    if user.is_admin() {
        Ok(())
    } else {
        Err(ServiceError::forbidden("Access denied. Admins only."))
    }
}

/// Account id carried by the session token.
pub fn session_user_id(user: &AuthenticatedUser) -> ServiceResult<UserId> {
    user.user_id().map_err(|e| {
        log::warn!("Session token carries an invalid subject: {e}");
        ServiceError::unauthorized("Invalid token")
    })
}

/// A row of a bulk import that was not stored.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SkippedRow {
    pub index: usize,
    pub reason: String,
}

/// Outcome of a bulk import: the stored records and the rejected rows.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BulkReport<T> {
    pub created: Vec<T>,
    pub skipped: Vec<SkippedRow>,
}

impl<T> Default for BulkReport<T> {
    fn default() -> Self {
        Self {
            created: Vec::new(),
            skipped: Vec::new(),
        }
    }
}

impl<T> BulkReport<T> {
    fn skip(&mut self, index: usize, reason: impl Into<String>) {
        self.skipped.push(SkippedRow {
            index,
            reason: reason.into(),
        });
    }
}

pub(crate) fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! Sample records shared by the service tests.

    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::DateTime;

    use crate::auth::AuthenticatedUser;
    use crate::domain::book::Book;
    use crate::domain::category::Category;
    use crate::mail::{EmailMessage, MailError, Mailer};
    use crate::domain::types::{
        BookCondition, BookId, BookTitle, CategoryId, CategoryName, CategoryPath,
        DiscountPercent, Price, Role, StockQuantity,
    };

    pub fn sample_user() -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "1".into(),
            email: "reader@example.com".into(),
            name: "Reader".into(),
            phone: "555-0100".into(),
            role: Role::User,
            exp: 0,
        }
    }

    pub fn sample_admin() -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "2".into(),
            email: "admin@example.com".into(),
            name: "Admin".into(),
            phone: "555-0101".into(),
            role: Role::Admin,
            exp: 0,
        }
    }

    pub fn sample_category(id: i32, path: &str, discount: f64) -> Category {
        let path = CategoryPath::new(path).unwrap();
        Category {
            id: CategoryId::new(id).unwrap(),
            name: CategoryName::new(path.last_segment()).unwrap(),
            parent_id: None,
            path,
            tags: vec![],
            seo_title: None,
            seo_description: None,
            discount: DiscountPercent::new(discount).unwrap(),
            created_at: DateTime::from_timestamp(0, 0).unwrap().naive_utc(),
            updated_at: DateTime::from_timestamp(0, 0).unwrap().naive_utc(),
        }
    }

    pub fn sample_book(id: i32, path: &str) -> Book {
        Book {
            id: BookId::new(id).unwrap(),
            title: BookTitle::new(format!("Book {id}")).unwrap(),
            category_path: CategoryPath::new(path).unwrap(),
            tags: vec![],
            seo_title: None,
            seo_description: None,
            price: Some(Price::new(200.0).unwrap()),
            description: None,
            estimated_delivery: None,
            condition: BookCondition::New,
            author: None,
            publisher: None,
            image_url: None,
            quantity_new: StockQuantity::new(5).unwrap(),
            quantity_old: StockQuantity::new(2).unwrap(),
            discount_new: DiscountPercent::new(5.0).unwrap(),
            discount_old: DiscountPercent::new(15.0).unwrap(),
            is_best_seller: false,
            is_new_arrival: false,
            created_at: DateTime::from_timestamp(0, 0).unwrap().naive_utc(),
            updated_at: DateTime::from_timestamp(0, 0).unwrap().naive_utc(),
        }
    }

    /// Mailer that records every message and fails for one address.
    #[derive(Default)]
    pub struct RecordingMailer {
        pub sent: Mutex<Vec<EmailMessage>>,
        pub fail_for: Option<String>,
    }

    impl RecordingMailer {
        pub fn failing_for(address: &str) -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                fail_for: Some(address.to_string()),
            }
        }

        pub fn sent(&self) -> Vec<EmailMessage> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send(&self, message: EmailMessage) -> Result<(), MailError> {
            if self.fail_for.as_deref() == Some(message.to.as_str()) {
                return Err(MailError::Transport("relay unreachable".into()));
            }
            self.sent.lock().unwrap().push(message);
            Ok(())
        }
    }
}
