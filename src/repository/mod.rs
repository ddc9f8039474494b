use chrono::NaiveDateTime;

use crate::db::{DbConnection, DbPool};
use crate::domain::book::{Book, NewBook};
use crate::domain::book_request::{BookRequest, NewBookRequest};
use crate::domain::cart::{CartItem, NewCartItem};
use crate::domain::category::{Category, NewCategory, PathRewrite, SubtreeDeletion};
use crate::domain::email_log::{EmailLog, NewEmailLog};
use crate::domain::order::{NewOrder, NewPayment, Order};
use crate::domain::review::{NewReview, Review};
use crate::domain::settings::{NewSiteSettings, SiteSettings};
use crate::domain::subscriber::{NewSubscriber, Subscriber};
use crate::domain::types::{
    BookCondition, BookId, CategoryPath, Email, OrderId, OrderStatus, Quantity, ReviewId,
    ReviewStatus, SubscriberId, UserId,
};
use crate::domain::user::{NewUser, User};

pub mod book;
pub mod book_request;
pub mod cart;
pub mod category;
pub mod email_log;
pub mod errors;
pub mod order;
pub mod review;
pub mod settings;
pub mod subscriber;
pub mod user;

pub use errors::{RepositoryError, RepositoryResult};

/// Repository implementation backed by Diesel and SQLite.
///
/// The underlying `r2d2::Pool` is cheap to clone, allowing the repository to
/// be passed around freely between handlers.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
}

impl DieselRepository {
    /// Create a new repository from an established database pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a pooled database connection.
    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// LIKE pattern (escaped with `\`) matching every path strictly below `path`.
pub(crate) fn descendant_pattern(path: &CategoryPath) -> String {
    let mut pattern = String::with_capacity(path.as_str().len() + 2);
    push_escaped(&mut pattern, path.as_str());
    pattern.push_str("/%");
    pattern
}

/// LIKE pattern (escaped with `\`) matching values containing `needle`.
pub(crate) fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    push_escaped(&mut pattern, needle);
    pattern.push('%');
    pattern
}

fn push_escaped(pattern: &mut String, value: &str) {
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
}

/// Query parameters used when listing books.
#[derive(Debug, Clone, Default)]
pub struct BookListQuery {
    /// Restrict to books at this category path or below it.
    pub category_path: Option<CategoryPath>,
    /// Case-insensitive title substring.
    pub title: Option<String>,
    pub best_sellers_only: bool,
    pub new_arrivals_only: bool,
    pub limit: Option<usize>,
}

impl BookListQuery {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn under(mut self, path: CategoryPath) -> Self {
        self.category_path = Some(path);
        self
    }
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
    pub fn best_sellers(mut self) -> Self {
        self.best_sellers_only = true;
        self
    }
    pub fn new_arrivals(mut self) -> Self {
        self.new_arrivals_only = true;
        self
    }
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Query parameters used when listing orders.
#[derive(Debug, Clone, Default)]
pub struct OrderListQuery {
    /// Restrict to orders placed with this email address.
    pub email: Option<Email>,
}

impl OrderListQuery {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn email(mut self, email: Email) -> Self {
        self.email = Some(email);
        self
    }
}

/// Query parameters used when listing reviews.
#[derive(Debug, Clone, Default)]
pub struct ReviewListQuery {
    pub book_id: Option<BookId>,
    pub status: Option<ReviewStatus>,
}

impl ReviewListQuery {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn book(mut self, book_id: BookId) -> Self {
        self.book_id = Some(book_id);
        self
    }
    pub fn status(mut self, status: ReviewStatus) -> Self {
        self.status = Some(status);
        self
    }
}

/// Read-only operations for category entities.
pub trait CategoryReader {
    /// List every category ordered by path.
    fn list_categories(&self) -> RepositoryResult<Vec<Category>>;
    /// Retrieve a category by its materialized path.
    fn get_category_by_path(&self, path: &CategoryPath) -> RepositoryResult<Option<Category>>;
    /// Retrieve a category by display name, ignoring ASCII case.
    fn get_category_by_name(&self, name: &str) -> RepositoryResult<Option<Category>>;
}

/// Write operations for category entities.
pub trait CategoryWriter {
    /// Persist a new category. A taken path yields [`RepositoryError::Conflict`].
    fn create_category(&self, category: &NewCategory) -> RepositoryResult<Category>;
    /// Save edits to a category. When its path differs from `previous_path`
    /// every descendant path and book `category_path` under the old prefix is
    /// rewritten in the same transaction.
    fn update_category(
        &self,
        category: &Category,
        previous_path: &CategoryPath,
    ) -> RepositoryResult<PathRewrite>;
    /// Delete the category at `path`, its descendants and all their books.
    fn delete_category_subtree(&self, path: &CategoryPath) -> RepositoryResult<SubtreeDeletion>;
    /// Delete every category and every book.
    fn delete_all_categories(&self) -> RepositoryResult<SubtreeDeletion>;
}

/// Read-only operations for book entities.
pub trait BookReader {
    fn list_books(&self, query: BookListQuery) -> RepositoryResult<Vec<Book>>;
    fn get_book_by_id(&self, id: BookId) -> RepositoryResult<Option<Book>>;
}

/// Write operations for book entities.
pub trait BookWriter {
    fn create_book(&self, book: &NewBook) -> RepositoryResult<Book>;
    fn update_book(&self, book: &Book) -> RepositoryResult<Book>;
    fn delete_book(&self, id: BookId) -> RepositoryResult<usize>;
    fn delete_all_books(&self) -> RepositoryResult<usize>;
}

/// Read-only operations for user accounts.
pub trait UserReader {
    fn get_user_by_id(&self, id: UserId) -> RepositoryResult<Option<User>>;
    fn get_user_by_email(&self, email: &Email) -> RepositoryResult<Option<User>>;
    /// Find the user holding an unexpired reset token with this hash.
    fn get_user_by_reset_token(
        &self,
        token_hash: &str,
        now: NaiveDateTime,
    ) -> RepositoryResult<Option<User>>;
    fn list_users(&self) -> RepositoryResult<Vec<User>>;
}

/// Write operations for user accounts.
pub trait UserWriter {
    fn create_user(&self, user: &NewUser) -> RepositoryResult<User>;
    fn set_reset_token(
        &self,
        id: UserId,
        token_hash: &str,
        expires_at: NaiveDateTime,
    ) -> RepositoryResult<usize>;
    /// Replace the password hash and clear any pending reset token.
    fn update_password(&self, id: UserId, password_hash: &str) -> RepositoryResult<usize>;
}

/// Read-only operations for carts.
pub trait CartReader {
    fn list_cart_items(&self, user_id: UserId) -> RepositoryResult<Vec<CartItem>>;
}

/// Write operations for carts.
pub trait CartWriter {
    /// Add a line, merging quantity into an existing line for the same book
    /// and condition.
    fn add_cart_item(&self, item: &NewCartItem) -> RepositoryResult<CartItem>;
    fn set_cart_item_quantity(
        &self,
        user_id: UserId,
        book_id: BookId,
        condition: BookCondition,
        quantity: Quantity,
    ) -> RepositoryResult<usize>;
    fn remove_cart_item(
        &self,
        user_id: UserId,
        book_id: BookId,
        condition: BookCondition,
    ) -> RepositoryResult<usize>;
    fn clear_cart(&self, user_id: UserId) -> RepositoryResult<usize>;
}

/// Read-only operations for orders.
pub trait OrderReader {
    fn list_orders(&self, query: OrderListQuery) -> RepositoryResult<Vec<Order>>;
    fn get_order_by_id(&self, id: OrderId) -> RepositoryResult<Option<Order>>;
    fn get_order_by_gateway_id(&self, gateway_order_id: &str) -> RepositoryResult<Option<Order>>;
}

/// Write operations for orders.
pub trait OrderWriter {
    /// Reserve stock for the order's condition and insert it atomically.
    /// Short stock yields [`RepositoryError::InsufficientStock`].
    fn place_order(&self, order: &NewOrder) -> RepositoryResult<Order>;
    /// Insert an order awaiting gateway payment; stock is not reserved.
    fn create_gateway_order(&self, order: &NewOrder) -> RepositoryResult<Order>;
    fn update_order_status(&self, id: OrderId, status: OrderStatus) -> RepositoryResult<usize>;
    /// Mark the order cancelled and release any stock it holds.
    fn cancel_order(&self, id: OrderId, reason: &str) -> RepositoryResult<usize>;
    /// Delete the order and release any stock it holds.
    fn delete_order(&self, id: OrderId) -> RepositoryResult<usize>;
    /// Apply a gateway payment event to the order with `gateway_order_id`.
    /// Returns `None` when no such order exists.
    fn record_payment(
        &self,
        gateway_order_id: &str,
        status: OrderStatus,
        payment_type: Option<&str>,
        payment: &NewPayment,
    ) -> RepositoryResult<Option<Order>>;
}

/// Read-only operations for reviews.
pub trait ReviewReader {
    fn list_reviews(&self, query: ReviewListQuery) -> RepositoryResult<Vec<Review>>;
    fn get_review_by_id(&self, id: ReviewId) -> RepositoryResult<Option<Review>>;
}

/// Write operations for reviews.
pub trait ReviewWriter {
    fn create_review(&self, review: &NewReview) -> RepositoryResult<Review>;
    fn update_review(&self, review: &Review) -> RepositoryResult<usize>;
    fn delete_review(&self, id: ReviewId) -> RepositoryResult<usize>;
}

/// Read-only operations for book requests.
pub trait BookRequestReader {
    /// List requests, optionally only those filed by `user_id`.
    fn list_book_requests(&self, user_id: Option<UserId>) -> RepositoryResult<Vec<BookRequest>>;
}

/// Write operations for book requests.
pub trait BookRequestWriter {
    fn create_book_request(&self, request: &NewBookRequest) -> RepositoryResult<BookRequest>;
}

/// Read-only operations for newsletter subscribers.
pub trait SubscriberReader {
    /// List subscribers, newest first.
    fn list_subscribers(&self) -> RepositoryResult<Vec<Subscriber>>;
    fn get_subscriber_by_id(&self, id: SubscriberId) -> RepositoryResult<Option<Subscriber>>;
    fn get_subscriber_by_email(&self, email: &Email) -> RepositoryResult<Option<Subscriber>>;
}

/// Write operations for newsletter subscribers.
pub trait SubscriberWriter {
    fn create_subscriber(&self, subscriber: &NewSubscriber) -> RepositoryResult<Subscriber>;
    fn update_subscriber(&self, subscriber: &Subscriber) -> RepositoryResult<usize>;
    fn delete_subscriber(&self, id: SubscriberId) -> RepositoryResult<usize>;
}

/// Read-only operations for marketing email logs.
pub trait EmailLogReader {
    /// List logs, newest first.
    fn list_email_logs(&self) -> RepositoryResult<Vec<EmailLog>>;
}

/// Write operations for marketing email logs.
pub trait EmailLogWriter {
    fn create_email_log(&self, log: &NewEmailLog) -> RepositoryResult<EmailLog>;
}

/// Read-only operations for the site settings singleton.
pub trait SettingsReader {
    fn get_settings(&self) -> RepositoryResult<Option<SiteSettings>>;
}

/// Write operations for the site settings singleton.
pub trait SettingsWriter {
    /// Insert the settings record; fails with a conflict when one exists.
    fn create_settings(&self, settings: &NewSiteSettings) -> RepositoryResult<SiteSettings>;
    fn update_settings(&self, settings: &SiteSettings) -> RepositoryResult<usize>;
    fn delete_settings(&self) -> RepositoryResult<usize>;
}
