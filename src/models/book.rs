use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::book::{Book as DomainBook, NewBook as DomainNewBook};
use crate::domain::types::{
    BookCondition, BookTitle, CategoryPath, DiscountPercent, Price, StockQuantity, Tag,
    TypeConstraintError,
};

/// Diesel model representing the `books` table.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::books)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub category_path: String,
    pub tags: String,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub price: Option<f64>,
    pub description: Option<String>,
    pub estimated_delivery: Option<String>,
    pub book_condition: String,
    pub author: Option<String>,
    pub publisher: Option<String>,
    pub image_url: Option<String>,
    pub quantity_new: i32,
    pub quantity_old: i32,
    pub discount_new: f64,
    pub discount_old: f64,
    pub is_best_seller: bool,
    pub is_new_arrival: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Insertable/patchable form of [`Book`].
#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::books, treat_none_as_null = true)]
pub struct NewBook {
    pub title: String,
    pub category_path: String,
    pub tags: String,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub price: Option<f64>,
    pub description: Option<String>,
    pub estimated_delivery: Option<String>,
    pub book_condition: String,
    pub author: Option<String>,
    pub publisher: Option<String>,
    pub image_url: Option<String>,
    pub quantity_new: i32,
    pub quantity_old: i32,
    pub discount_new: f64,
    pub discount_old: f64,
    pub is_best_seller: bool,
    pub is_new_arrival: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<Book> for DomainBook {
    type Error = TypeConstraintError;

    fn try_from(book: Book) -> Result<Self, Self::Error> {
        Ok(Self {
            id: book.id.try_into()?,
            title: BookTitle::new(book.title)?,
            category_path: CategoryPath::new(&book.category_path)?,
            tags: Tag::parse_list(&book.tags)?,
            seo_title: book.seo_title,
            seo_description: book.seo_description,
            price: book.price.map(Price::new).transpose()?,
            description: book.description,
            estimated_delivery: book.estimated_delivery,
            condition: BookCondition::try_from(book.book_condition)?,
            author: book.author,
            publisher: book.publisher,
            image_url: book.image_url,
            quantity_new: StockQuantity::new(book.quantity_new)?,
            quantity_old: StockQuantity::new(book.quantity_old)?,
            discount_new: DiscountPercent::new(book.discount_new)?,
            discount_old: DiscountPercent::new(book.discount_old)?,
            is_best_seller: book.is_best_seller,
            is_new_arrival: book.is_new_arrival,
            created_at: book.created_at,
            updated_at: book.updated_at,
        })
    }
}

impl From<DomainNewBook> for NewBook {
    fn from(book: DomainNewBook) -> Self {
        Self {
            title: book.title.into_inner(),
            category_path: book.category_path.into(),
            tags: Tag::join_list(&book.tags),
            seo_title: book.seo_title,
            seo_description: book.seo_description,
            price: book.price.map(Price::get),
            description: book.description,
            estimated_delivery: book.estimated_delivery,
            book_condition: book.condition.into(),
            author: book.author,
            publisher: book.publisher,
            image_url: book.image_url,
            quantity_new: book.quantity_new.get(),
            quantity_old: book.quantity_old.get(),
            discount_new: book.discount_new.get(),
            discount_old: book.discount_old.get(),
            is_best_seller: book.is_best_seller,
            is_new_arrival: book.is_new_arrival,
            created_at: book.created_at,
            updated_at: book.updated_at,
        }
    }
}

impl From<&DomainBook> for NewBook {
    fn from(book: &DomainBook) -> Self {
        Self {
            title: book.title.as_str().to_string(),
            category_path: book.category_path.as_str().to_string(),
            tags: Tag::join_list(&book.tags),
            seo_title: book.seo_title.clone(),
            seo_description: book.seo_description.clone(),
            price: book.price.map(Price::get),
            description: book.description.clone(),
            estimated_delivery: book.estimated_delivery.clone(),
            book_condition: book.condition.into(),
            author: book.author.clone(),
            publisher: book.publisher.clone(),
            image_url: book.image_url.clone(),
            quantity_new: book.quantity_new.get(),
            quantity_old: book.quantity_old.get(),
            discount_new: book.discount_new.get(),
            discount_old: book.discount_old.get(),
            is_best_seller: book.is_best_seller,
            is_new_arrival: book.is_new_arrival,
            created_at: book.created_at,
            updated_at: book.updated_at,
        }
    }
}
