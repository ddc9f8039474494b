//! Strongly-typed value objects used by domain entities.
//!
//! Domain structs carry these wrappers instead of raw primitives so that
//! identifiers, category paths, money values and enumerations are validated
//! once at the boundary.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use thiserror::Error;
use validator::ValidateEmail;

/// Errors produced when attempting to construct constrained domain types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// An identifier was zero or negative.
    #[error("{0} must be greater than zero")]
    NonPositiveId(&'static str),
    /// A numeric value required to be positive was zero/negative or invalid.
    #[error("{0} must be greater than zero")]
    NonPositiveNumber(&'static str),
    /// A numeric value required to be non-negative was negative.
    #[error("{0} must be zero or greater")]
    NegativeNumber(&'static str),
    /// A numeric value fell outside its permitted range.
    #[error("{field} must be within {range}")]
    OutOfRange {
        field: &'static str,
        range: &'static str,
    },
    /// A string was empty or whitespace-only after trimming.
    #[error("{0} cannot be empty")]
    EmptyString(&'static str),
    /// Email validation failed.
    #[error("{0} must be a valid email address")]
    InvalidEmail(&'static str),
    /// A slug or path contained a forbidden character.
    #[error("{field} cannot contain '{character}'")]
    ForbiddenCharacter {
        field: &'static str,
        character: char,
    },
    /// Catch-all for custom validation failures.
    #[error("invalid value: {0}")]
    InvalidValue(String),
}

fn trim_and_require_non_empty<S: Into<String>>(
    value: S,
    field: &'static str,
) -> Result<String, TypeConstraintError> {
    let trimmed = value.into().trim().to_string();
    if trimmed.is_empty() {
        Err(TypeConstraintError::EmptyString(field))
    } else {
        Ok(trimmed)
    }
}

/// Wrapper for non-empty, trimmed strings.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Trims whitespace and rejects empty inputs.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        Self::new_for_field(value, "value")
    }

    /// Same as [`Self::new`] but with field-specific error context.
    pub fn new_for_field<S: Into<String>>(
        value: S,
        field: &'static str,
    ) -> Result<Self, TypeConstraintError> {
        trim_and_require_non_empty(value, field).map(Self)
    }

    /// Borrow the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper returning the owned string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for NonEmptyString {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::ops::Deref for NonEmptyString {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl AsRef<str> for NonEmptyString {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl TryFrom<String> for NonEmptyString {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for NonEmptyString {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

/// Macro to generate lightweight newtypes for positive identifiers.
macro_rules! id_newtype {
    ($name:ident, $doc:expr, $field:expr) => {
        #[doc = $doc]
        #[derive(
            Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord,
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Creates a new identifier ensuring it is greater than zero.
            pub fn new(value: i32) -> Result<Self, TypeConstraintError> {
                if value > 0 {
                    Ok(Self(value))
                } else {
                    Err(TypeConstraintError::NonPositiveId($field))
                }
            }

            /// Returns the raw `i32` backing this identifier.
            pub const fn get(self) -> i32 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<i32> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: i32) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i32 {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl PartialEq<i32> for $name {
            fn eq(&self, other: &i32) -> bool {
                self.0 == *other
            }
        }

        impl PartialEq<$name> for i32 {
            fn eq(&self, other: &$name) -> bool {
                *self == other.0
            }
        }
    };
}

macro_rules! non_empty_string_newtype {
    ($name:ident, $doc:expr, $field:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Constructs a trimmed, non-empty value.
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                let inner = NonEmptyString::new_for_field(value, $field)?;
                Ok(Self(inner.into_inner()))
            }

            /// Borrow the value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the owned string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::ops::Deref for $name {
            type Target = str;

            fn deref(&self) -> &Self::Target {
                self.as_str()
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.as_str() == *other
            }
        }

        impl PartialEq<$name> for &str {
            fn eq(&self, other: &$name) -> bool {
                *self == other.as_str()
            }
        }
    };
}

macro_rules! non_negative_f64_newtype {
    ($name:ident, $doc:expr, $field:expr) => {
        #[doc = $doc]
        #[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, PartialOrd)]
        #[serde(transparent)]
        pub struct $name(f64);

        impl $name {
            /// Constructs a finite numeric value that is zero or greater.
            pub fn new(value: f64) -> Result<Self, TypeConstraintError> {
                if value.is_finite() && value >= 0.0 {
                    Ok(Self(value))
                } else {
                    Err(TypeConstraintError::NegativeNumber($field))
                }
            }

            /// Returns the raw `f64` value.
            pub const fn get(self) -> f64 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<f64> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: f64) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for f64 {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl PartialEq<f64> for $name {
            fn eq(&self, other: &f64) -> bool {
                self.0 == *other
            }
        }

        impl PartialEq<$name> for f64 {
            fn eq(&self, other: &$name) -> bool {
                *self == other.0
            }
        }
    };
}

macro_rules! non_negative_i32_newtype {
    ($name:ident, $doc:expr, $field:expr) => {
        #[doc = $doc]
        #[derive(
            Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord,
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            pub const ZERO: Self = Self(0);

            /// Constructs a value that must be zero or greater.
            pub fn new(value: i32) -> Result<Self, TypeConstraintError> {
                if value >= 0 {
                    Ok(Self(value))
                } else {
                    Err(TypeConstraintError::NegativeNumber($field))
                }
            }

            /// Returns the raw `i32` value.
            pub const fn get(self) -> i32 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<i32> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: i32) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i32 {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl PartialEq<i32> for $name {
            fn eq(&self, other: &i32) -> bool {
                self.0 == *other
            }
        }

        impl PartialEq<$name> for i32 {
            fn eq(&self, other: &$name) -> bool {
                *self == other.0
            }
        }
    };
}

macro_rules! positive_i32_newtype {
    ($name:ident, $doc:expr, $field:expr) => {
        #[doc = $doc]
        #[derive(
            Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord,
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Constructs a value that must be strictly positive.
            pub fn new(value: i32) -> Result<Self, TypeConstraintError> {
                if value > 0 {
                    Ok(Self(value))
                } else {
                    Err(TypeConstraintError::NonPositiveNumber($field))
                }
            }

            /// Returns the raw `i32` value.
            pub const fn get(self) -> i32 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<i32> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: i32) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i32 {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

/// Generates a string-backed enum persisted and serialized by its canonical
/// label. Parsing is case-insensitive and accepts the listed aliases.
macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $field:expr, {
            $($variant:ident => $label:literal $(| $alias:literal)*),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
        #[serde(try_from = "String", into = "String")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Canonical label used in persistence and JSON.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }

        impl TryFrom<&str> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                let value = value.trim();
                $(
                    if value.eq_ignore_ascii_case($label)
                        $(|| value.eq_ignore_ascii_case($alias))*
                    {
                        return Ok(Self::$variant);
                    }
                )+
                Err(TypeConstraintError::InvalidValue(format!("{}: {value}", $field)))
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::try_from(value.as_str())
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.as_str().to_string()
            }
        }
    };
}

id_newtype!(UserId, "Unique identifier for a user account.", "user_id");
id_newtype!(
    CategoryId,
    "Unique identifier for a category.",
    "category_id"
);
id_newtype!(BookId, "Unique identifier for a book.", "book_id");
id_newtype!(
    CartItemId,
    "Unique identifier for a cart line.",
    "cart_item_id"
);
id_newtype!(OrderId, "Unique identifier for an order.", "order_id");
id_newtype!(
    PaymentRecordId,
    "Unique identifier for a recorded gateway payment.",
    "payment_record_id"
);
id_newtype!(ReviewId, "Unique identifier for a review.", "review_id");
id_newtype!(
    BookRequestId,
    "Unique identifier for a book request.",
    "book_request_id"
);
id_newtype!(
    SubscriberId,
    "Unique identifier for a newsletter subscriber.",
    "subscriber_id"
);
id_newtype!(
    EmailLogId,
    "Unique identifier for a marketing email log entry.",
    "email_log_id"
);
id_newtype!(
    SiteSettingsId,
    "Unique identifier for the site settings record.",
    "site_settings_id"
);

non_empty_string_newtype!(
    CategoryName,
    "Category display name enforcing non-empty values.",
    "category name"
);
non_empty_string_newtype!(
    BookTitle,
    "Book title enforcing non-empty values.",
    "title"
);
non_empty_string_newtype!(
    UserName,
    "Account display name enforcing non-empty values.",
    "username"
);
non_empty_string_newtype!(
    PhoneNumber,
    "Contact phone number enforcing non-empty values.",
    "phone"
);
non_empty_string_newtype!(
    PersonName,
    "Name of a customer, reviewer or subscriber.",
    "name"
);
non_empty_string_newtype!(
    ReviewComment,
    "Review body enforcing non-empty values.",
    "comment"
);
non_empty_string_newtype!(
    EmailSubject,
    "Marketing email subject enforcing non-empty values.",
    "subject"
);

non_negative_f64_newtype!(
    Price,
    "Non-negative price value in standard currency units.",
    "price"
);

non_negative_i32_newtype!(
    StockQuantity,
    "Number of copies available for sale.",
    "quantity"
);

positive_i32_newtype!(
    Quantity,
    "Number of copies requested in a cart line or order.",
    "quantity"
);

string_enum!(
    /// Physical condition of a copy; stock and discounts are tracked per condition.
    BookCondition, "book condition", {
        New => "New",
        Old => "Old" | "used",
    }
);

string_enum!(
    /// Access role carried by accounts and session tokens.
    Role, "role", {
        User => "User",
        Admin => "Admin",
    }
);

string_enum!(
    /// Fulfilment and payment status of an order.
    OrderStatus, "order status", {
        Pending => "Pending",
        Processing => "Processing",
        Shipped => "Shipped",
        Delivered => "Delivered",
        Cancelled => "Cancelled" | "canceled",
        Created => "created",
        Paid => "paid",
        Failed => "failed",
        Refunded => "refunded",
    }
);

string_enum!(
    /// Payment options accepted for manually placed orders.
    PaymentType, "payment type", {
        CreditCard => "Credit Card",
        DebitCard => "Debit Card",
        Upi => "UPI",
        CashOnDelivery => "Cash on Delivery" | "cod",
    }
);

string_enum!(
    /// Moderation state of a review.
    ReviewStatus, "review status", {
        Pending => "pending",
        Approved => "approved",
        Disapproved => "disapproved",
    }
);

string_enum!(
    SubscriberStatus, "subscriber status", {
        Active => "Active",
        Inactive => "Inactive",
    }
);

string_enum!(
    /// Outcome of a bulk email dispatch.
    EmailLogStatus, "email log status", {
        Success => "success",
        Failed => "failed",
    }
);

impl Default for BookCondition {
    fn default() -> Self {
        Self::New
    }
}

impl Default for Role {
    fn default() -> Self {
        Self::User
    }
}

impl OrderStatus {
    /// Statuses an administrator may set by hand.
    pub const fn is_manual(self) -> bool {
        matches!(
            self,
            Self::Pending | Self::Processing | Self::Shipped | Self::Delivered | Self::Cancelled
        )
    }
}

/// Lowercased, validated email address.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let trimmed = trim_and_require_non_empty(value, "email")?.to_lowercase();
        if !trimmed.as_str().validate_email() {
            return Err(TypeConstraintError::InvalidEmail("email"));
        }
        Ok(Self(trimmed))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for Email {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Email {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for Email {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

/// Percentage discount in the inclusive range [0, 100].
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, PartialOrd)]
#[serde(try_from = "f64", into = "f64")]
pub struct DiscountPercent(f64);

impl DiscountPercent {
    pub const ZERO: Self = Self(0.0);

    pub fn new(value: f64) -> Result<Self, TypeConstraintError> {
        if value.is_finite() && (0.0..=100.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(TypeConstraintError::OutOfRange {
                field: "discount",
                range: "0..=100",
            })
        }
    }

    pub const fn get(self) -> f64 {
        self.0
    }

    /// Whether this discount overrides less specific ones.
    pub fn is_positive(self) -> bool {
        self.0 > 0.0
    }

    /// Price after the discount is taken off.
    pub fn apply(self, price: Price) -> f64 {
        price.get() * (1.0 - self.0 / 100.0)
    }
}

impl Display for DiscountPercent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<f64> for DiscountPercent {
    type Error = TypeConstraintError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DiscountPercent> for f64 {
    fn from(value: DiscountPercent) -> Self {
        value.0
    }
}

impl PartialEq<f64> for DiscountPercent {
    fn eq(&self, other: &f64) -> bool {
        self.0 == *other
    }
}

/// Star rating from 1 to 5.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(try_from = "i32", into = "i32")]
pub struct Rating(i32);

impl Rating {
    pub fn new(value: i32) -> Result<Self, TypeConstraintError> {
        if (1..=5).contains(&value) {
            Ok(Self(value))
        } else {
            Err(TypeConstraintError::OutOfRange {
                field: "rating",
                range: "1..=5",
            })
        }
    }

    pub const fn get(self) -> i32 {
        self.0
    }
}

impl TryFrom<i32> for Rating {
    type Error = TypeConstraintError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for i32 {
    fn from(value: Rating) -> Self {
        value.0
    }
}

/// Turn a display name into a lowercase kebab-case slug: surrounding
/// whitespace is dropped and inner whitespace runs collapse into `-`.
pub fn slugify(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase()
}

fn slug_for_field(
    value: &str,
    field: &'static str,
    forbidden: &[char],
) -> Result<String, TypeConstraintError> {
    let slug = slugify(value);
    if slug.is_empty() {
        return Err(TypeConstraintError::EmptyString(field));
    }
    if let Some(character) = slug.chars().find(|c| forbidden.contains(c)) {
        return Err(TypeConstraintError::ForbiddenCharacter { field, character });
    }
    Ok(slug)
}

/// One segment of a category path.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct CategorySlug(String);

impl CategorySlug {
    /// Slug the given category name.
    pub fn new(name: &str) -> Result<Self, TypeConstraintError> {
        slug_for_field(name, "category name", &['/']).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CategorySlug {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<CategorySlug> for String {
    fn from(value: CategorySlug) -> Self {
        value.0
    }
}

/// Slugged tag attached to categories and books.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "String", into = "String")]
pub struct Tag(String);

impl Tag {
    pub fn new(value: &str) -> Result<Self, TypeConstraintError> {
        slug_for_field(value, "tag", &[',', '/']).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse a comma-joined tag list as stored in the database.
    pub fn parse_list(value: &str) -> Result<Vec<Self>, TypeConstraintError> {
        value
            .split(',')
            .filter(|part| !part.trim().is_empty())
            .map(Self::new)
            .collect()
    }

    /// Join tags into the comma-separated storage form.
    pub fn join_list(tags: &[Self]) -> String {
        tags.iter().map(Tag::as_str).collect::<Vec<_>>().join(",")
    }
}

impl Display for Tag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Tag {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<Tag> for String {
    fn from(value: Tag) -> Self {
        value.0
    }
}

/// Materialized category path: slash-joined lowercase kebab segments, e.g.
/// `fiction/sci-fi`. The root level has depth 0.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "String", into = "String")]
pub struct CategoryPath(String);

impl CategoryPath {
    /// Normalize a raw path: outer slashes are stripped and every segment is
    /// slugged. Empty segments are rejected.
    pub fn new(value: &str) -> Result<Self, TypeConstraintError> {
        let trimmed = value.trim().trim_matches('/');
        if trimmed.is_empty() {
            return Err(TypeConstraintError::EmptyString("category path"));
        }

        let mut segments = Vec::new();
        for part in trimmed.split('/') {
            let slug = slugify(part);
            if slug.is_empty() {
                return Err(TypeConstraintError::InvalidValue(
                    "category path contains empty segments".to_string(),
                ));
            }
            segments.push(slug);
        }

        Ok(Self(segments.join("/")))
    }

    /// Path of a root category.
    pub fn root(slug: &CategorySlug) -> Self {
        Self(slug.as_str().to_string())
    }

    /// Path of a direct child of this category.
    pub fn child(&self, slug: &CategorySlug) -> Self {
        Self(format!("{}/{}", self.0, slug.as_str()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/')
    }

    /// Number of `/` separators: 0 for a root category.
    pub fn depth(&self) -> usize {
        self.0.matches('/').count()
    }

    pub fn last_segment(&self) -> &str {
        match self.0.rsplit_once('/') {
            Some((_, last)) => last,
            None => &self.0,
        }
    }

    pub fn parent(&self) -> Option<Self> {
        self.0
            .rsplit_once('/')
            .map(|(parent, _)| Self(parent.to_string()))
    }

    /// Same position in the tree with the last segment replaced.
    pub fn with_last_segment(&self, slug: &CategorySlug) -> Self {
        match self.parent() {
            Some(parent) => parent.child(slug),
            None => Self::root(slug),
        }
    }

    /// Prefix made of the first `segments` segments, if the path is at least
    /// that long.
    pub fn ancestor(&self, segments: usize) -> Option<Self> {
        if segments == 0 || segments > self.depth() + 1 {
            return None;
        }
        Some(Self(
            self.segments().take(segments).collect::<Vec<_>>().join("/"),
        ))
    }

    /// True when this path equals `ancestor` or lies below it.
    pub fn is_within(&self, ancestor: &CategoryPath) -> bool {
        let prefix = ancestor.as_str();
        self.0 == prefix
            || (self.0.len() > prefix.len()
                && self.0.starts_with(prefix)
                && self.0.as_bytes()[prefix.len()] == b'/')
    }

    /// Move this path from under `from` to under `to`, keeping the suffix.
    pub fn rebase(&self, from: &CategoryPath, to: &CategoryPath) -> Option<Self> {
        if !self.is_within(from) {
            return None;
        }
        Some(Self(format!("{}{}", to.0, &self.0[from.0.len()..])))
    }
}

impl Display for CategoryPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for CategoryPath {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl TryFrom<&str> for CategoryPath {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CategoryPath> for String {
    fn from(value: CategoryPath) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_normalizes_segments() {
        let path = CategoryPath::new(" /Fiction/Science  Fiction/ ").unwrap();
        assert_eq!(path.as_str(), "fiction/science-fiction");
        assert_eq!(path.depth(), 1);
        assert_eq!(path.last_segment(), "science-fiction");
    }

    #[test]
    fn path_rejects_empty_segments() {
        assert!(CategoryPath::new("fiction//scifi").is_err());
        assert!(CategoryPath::new("  / ").is_err());
    }

    #[test]
    fn ancestor_and_parent() {
        let path = CategoryPath::new("school/class-10/maths").unwrap();
        assert_eq!(path.ancestor(1).unwrap().as_str(), "school");
        assert_eq!(path.ancestor(2).unwrap().as_str(), "school/class-10");
        assert_eq!(path.ancestor(3).unwrap(), path);
        assert!(path.ancestor(4).is_none());
        assert_eq!(path.parent().unwrap().as_str(), "school/class-10");
        assert!(CategoryPath::new("school").unwrap().parent().is_none());
    }

    #[test]
    fn is_within_respects_segment_boundaries() {
        let scifi = CategoryPath::new("fiction/scifi").unwrap();
        assert!(CategoryPath::new("fiction/scifi").unwrap().is_within(&scifi));
        assert!(
            CategoryPath::new("fiction/scifi/space")
                .unwrap()
                .is_within(&scifi)
        );
        assert!(
            !CategoryPath::new("fiction/scifi-classics")
                .unwrap()
                .is_within(&scifi)
        );
        assert!(!CategoryPath::new("fiction").unwrap().is_within(&scifi));
    }

    #[test]
    fn rebase_replaces_prefix_only() {
        let from = CategoryPath::new("fiction/scifi").unwrap();
        let to = CategoryPath::new("fiction/sci-fi").unwrap();
        let moved = CategoryPath::new("fiction/scifi/space")
            .unwrap()
            .rebase(&from, &to)
            .unwrap();
        assert_eq!(moved.as_str(), "fiction/sci-fi/space");
        assert!(
            CategoryPath::new("fiction/scifi-classics")
                .unwrap()
                .rebase(&from, &to)
                .is_none()
        );
    }

    #[test]
    fn slugs_and_tags() {
        assert_eq!(slugify("  Science   Fiction "), "science-fiction");
        assert!(CategorySlug::new("a/b").is_err());
        assert!(Tag::new("a,b").is_err());
        let tags = Tag::parse_list("new-releases,,Award Winners").unwrap();
        assert_eq!(Tag::join_list(&tags), "new-releases,award-winners");
    }

    #[test]
    fn discount_bounds() {
        assert!(DiscountPercent::new(100.0).is_ok());
        assert!(DiscountPercent::new(100.5).is_err());
        assert!(DiscountPercent::new(-1.0).is_err());
        let price = Price::new(200.0).unwrap();
        assert_eq!(DiscountPercent::new(25.0).unwrap().apply(price), 150.0);
    }

    #[test]
    fn enums_parse_case_insensitively() {
        assert_eq!(BookCondition::try_from("new").unwrap(), BookCondition::New);
        assert_eq!(BookCondition::try_from("used").unwrap(), BookCondition::Old);
        assert_eq!(OrderStatus::try_from("PAID").unwrap(), OrderStatus::Paid);
        assert!(OrderStatus::try_from("lost").is_err());
        assert!(OrderStatus::Shipped.is_manual());
        assert!(!OrderStatus::Paid.is_manual());
    }

    #[test]
    fn email_is_lowercased_and_validated() {
        assert_eq!(
            Email::new(" Reader@Example.COM ").unwrap().as_str(),
            "reader@example.com"
        );
        assert!(Email::new("not-an-email").is_err());
    }
}
