use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::types::{
    BookCondition, BookTitle, CategoryPath, DiscountPercent, Price, StockQuantity, Tag,
    TypeConstraintError,
};
use crate::forms::{TagList, non_blank};

#[derive(Debug, Error)]
pub enum BookFormError {
    #[error("Book form validation failed: {0}")]
    Validation(String),
    #[error("Book form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for BookFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for BookFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

/// Book body shared by create, update and bulk import. Absent fields keep
/// their stored value on update.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BookForm {
    #[serde(default, alias = "bookName")]
    #[validate(length(min = 1))]
    pub title: Option<String>,
    #[serde(default)]
    pub category_path: Option<String>,
    #[serde(default)]
    pub tags: Option<TagList>,
    #[serde(default)]
    pub seo_title: Option<String>,
    #[serde(default)]
    pub seo_description: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub estimated_delivery: Option<String>,
    #[serde(default)]
    pub condition: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub publisher: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub quantity_new: Option<i32>,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub quantity_old: Option<i32>,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 100.0))]
    pub discount_new: Option<f64>,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 100.0))]
    pub discount_old: Option<f64>,
    #[serde(default)]
    pub is_best_seller: Option<bool>,
    #[serde(default)]
    pub is_new_arrival: Option<bool>,
}

/// Validated book fields; `None` means "not supplied".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookPayload {
    pub title: Option<BookTitle>,
    pub category_path: Option<CategoryPath>,
    pub tags: Option<Vec<Tag>>,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub price: Option<Price>,
    pub description: Option<String>,
    pub estimated_delivery: Option<String>,
    pub condition: Option<BookCondition>,
    pub author: Option<String>,
    pub publisher: Option<String>,
    pub image_url: Option<String>,
    pub quantity_new: Option<StockQuantity>,
    pub quantity_old: Option<StockQuantity>,
    pub discount_new: Option<DiscountPercent>,
    pub discount_old: Option<DiscountPercent>,
    pub is_best_seller: Option<bool>,
    pub is_new_arrival: Option<bool>,
}

impl TryFrom<BookForm> for BookPayload {
    type Error = BookFormError;

    fn try_from(value: BookForm) -> Result<Self, Self::Error> {
        value.validate()?;

        Ok(Self {
            title: value.title.map(BookTitle::new).transpose()?,
            category_path: non_blank(value.category_path)
                .map(|path| CategoryPath::new(&path))
                .transpose()?,
            tags: value.tags.map(TagList::into_tags).transpose()?,
            seo_title: value.seo_title,
            seo_description: value.seo_description,
            price: value.price.map(Price::new).transpose()?,
            description: value.description,
            estimated_delivery: value.estimated_delivery,
            condition: non_blank(value.condition)
                .map(BookCondition::try_from)
                .transpose()?,
            author: value.author,
            publisher: value.publisher,
            image_url: value.image_url,
            quantity_new: value.quantity_new.map(StockQuantity::new).transpose()?,
            quantity_old: value.quantity_old.map(StockQuantity::new).transpose()?,
            discount_new: value.discount_new.map(DiscountPercent::new).transpose()?,
            discount_old: value.discount_old.map(DiscountPercent::new).transpose()?,
            is_best_seller: value.is_best_seller,
            is_new_arrival: value.is_new_arrival,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct BulkBooksForm {
    pub books: Vec<BookForm>,
}

#[derive(Debug, Deserialize)]
pub struct SearchBooksQuery {
    #[serde(rename = "bookName", default)]
    pub book_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_book_name_alias_and_used_condition() {
        let form: BookForm = serde_json::from_value(serde_json::json!({
            "bookName": "Dune",
            "categoryPath": "Fiction/Sci Fi",
            "condition": "used",
            "tags": "classic, space",
            "price": 499.0,
            "discountOld": 10
        }))
        .unwrap();

        let payload = BookPayload::try_from(form).unwrap();
        assert_eq!(payload.title.unwrap().as_str(), "Dune");
        assert_eq!(payload.category_path.unwrap().as_str(), "fiction/sci-fi");
        assert_eq!(payload.condition, Some(BookCondition::Old));
        assert_eq!(payload.tags.unwrap().len(), 2);
        assert_eq!(payload.discount_old.unwrap(), 10.0);
        assert!(payload.quantity_new.is_none());
    }

    #[test]
    fn rejects_negative_stock() {
        let form = BookForm {
            title: Some("Dune".into()),
            quantity_new: Some(-1),
            ..Default::default()
        };
        assert!(matches!(
            BookPayload::try_from(form),
            Err(BookFormError::Validation(_))
        ));
    }

    #[test]
    fn rejects_unknown_condition() {
        let form = BookForm {
            condition: Some("mint".into()),
            ..Default::default()
        };
        assert!(matches!(
            BookPayload::try_from(form),
            Err(BookFormError::TypeConstraint(_))
        ));
    }
}
