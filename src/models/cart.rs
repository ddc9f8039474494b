use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::cart::{CartItem as DomainCartItem, NewCartItem as DomainNewCartItem};
use crate::domain::types::{
    BookCondition, Quantity, StockQuantity, TypeConstraintError,
};

/// Diesel model representing the `cart_items` table.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::cart_items)]
pub struct CartItem {
    pub id: i32,
    pub user_id: i32,
    pub book_id: i32,
    pub book_condition: String,
    pub quantity: i32,
    pub stock: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::cart_items)]
pub struct NewCartItem {
    pub user_id: i32,
    pub book_id: i32,
    pub book_condition: String,
    pub quantity: i32,
    pub stock: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<CartItem> for DomainCartItem {
    type Error = TypeConstraintError;

    fn try_from(item: CartItem) -> Result<Self, Self::Error> {
        Ok(Self {
            id: item.id.try_into()?,
            user_id: item.user_id.try_into()?,
            book_id: item.book_id.try_into()?,
            condition: BookCondition::try_from(item.book_condition)?,
            quantity: Quantity::new(item.quantity)?,
            stock: item.stock.map(StockQuantity::new).transpose()?,
            created_at: item.created_at,
            updated_at: item.updated_at,
        })
    }
}

impl NewCartItem {
    pub fn from_domain(item: &DomainNewCartItem, now: NaiveDateTime) -> Self {
        Self {
            user_id: item.user_id.get(),
            book_id: item.book_id.get(),
            book_condition: item.condition.into(),
            quantity: item.quantity.get(),
            stock: item.stock.map(StockQuantity::get),
            created_at: now,
            updated_at: now,
        }
    }
}
