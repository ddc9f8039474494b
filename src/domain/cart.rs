use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{BookCondition, BookId, CartItemId, Quantity, StockQuantity, UserId};

/// One line of a user's cart. A cart holds at most one line per
/// `(book_id, condition)` pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: CartItemId,
    pub user_id: UserId,
    pub book_id: BookId,
    pub condition: BookCondition,
    pub quantity: Quantity,
    pub stock: Option<StockQuantity>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Line to add to a cart; merged into an existing line for the same book and
/// condition.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCartItem {
    pub user_id: UserId,
    pub book_id: BookId,
    pub condition: BookCondition,
    pub quantity: Quantity,
    pub stock: Option<StockQuantity>,
}
