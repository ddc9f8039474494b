use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    BookCondition, BookId, BookTitle, CategoryPath, DiscountPercent, Price, StockQuantity, Tag,
};

/// Catalog entry. `category_path` is a denormalized copy of the owning
/// category's path and is rewritten together with it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: BookId,
    pub title: BookTitle,
    pub category_path: CategoryPath,
    pub tags: Vec<Tag>,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub price: Option<Price>,
    pub description: Option<String>,
    pub estimated_delivery: Option<String>,
    pub condition: BookCondition,
    pub author: Option<String>,
    pub publisher: Option<String>,
    pub image_url: Option<String>,
    pub quantity_new: StockQuantity,
    pub quantity_old: StockQuantity,
    pub discount_new: DiscountPercent,
    pub discount_old: DiscountPercent,
    pub is_best_seller: bool,
    pub is_new_arrival: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Book {
    /// Book-level discount for the listed condition.
    pub fn own_discount(&self) -> DiscountPercent {
        match self.condition {
            BookCondition::New => self.discount_new,
            BookCondition::Old => self.discount_old,
        }
    }

    /// Copies on hand for the given condition.
    pub fn stock(&self, condition: BookCondition) -> StockQuantity {
        match condition {
            BookCondition::New => self.quantity_new,
            BookCondition::Old => self.quantity_old,
        }
    }
}

/// Data required to insert a new [`Book`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewBook {
    pub title: BookTitle,
    pub category_path: CategoryPath,
    pub tags: Vec<Tag>,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub price: Option<Price>,
    pub description: Option<String>,
    pub estimated_delivery: Option<String>,
    pub condition: BookCondition,
    pub author: Option<String>,
    pub publisher: Option<String>,
    pub image_url: Option<String>,
    pub quantity_new: StockQuantity,
    pub quantity_old: StockQuantity,
    pub discount_new: DiscountPercent,
    pub discount_old: DiscountPercent,
    pub is_best_seller: bool,
    pub is_new_arrival: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}
