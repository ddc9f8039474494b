use serde::Serialize;

use crate::domain::book::Book;
use crate::domain::cart::CartItem;
use crate::domain::order::Order;
use crate::domain::pricing::PricedBook;
use crate::domain::review::Review;
use crate::domain::types::{BookId, CategoryPath, Price};

/// Title shown for orders whose book has since been deleted.
pub const UNKNOWN_BOOK: &str = "Unknown Book";

/// Short book description embedded in reviews.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookSummary {
    pub id: BookId,
    pub title: String,
    pub price: Option<Price>,
    pub image_url: Option<String>,
    pub category_path: CategoryPath,
}

impl From<&Book> for BookSummary {
    fn from(value: &Book) -> Self {
        Self {
            id: value.id,
            title: value.title.as_str().to_string(),
            price: value.price,
            image_url: value.image_url.clone(),
            category_path: value.category_path.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartLineView {
    #[serde(flatten)]
    pub item: CartItem,
    /// `None` when the book no longer exists.
    pub book: Option<PricedBook>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<CartLineView>,
    pub total_quantity: i32,
    pub total_price: f64,
}

impl CartView {
    pub fn new(items: Vec<CartLineView>) -> Self {
        let total_quantity = items.iter().map(|line| line.item.quantity.get()).sum();
        let total_price = items
            .iter()
            .filter_map(|line| {
                let price = line.book.as_ref()?.discounted_price?;
                Some(price * f64::from(line.item.quantity.get()))
            })
            .sum();
        Self {
            items,
            total_quantity,
            total_price,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    #[serde(flatten)]
    pub order: Order,
    pub book_title: String,
    pub book_image: Option<String>,
}

impl OrderView {
    pub fn new(order: Order, book: Option<&Book>) -> Self {
        Self {
            order,
            book_title: book
                .map(|b| b.title.as_str().to_string())
                .unwrap_or_else(|| UNKNOWN_BOOK.to_string()),
            book_image: book.and_then(|b| b.image_url.clone()),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReviewView {
    #[serde(flatten)]
    pub review: Review,
    pub book: Option<BookSummary>,
}

impl ReviewView {
    pub fn new(review: Review, book: Option<&Book>) -> Self {
        Self {
            review,
            book: book.map(BookSummary::from),
        }
    }
}
