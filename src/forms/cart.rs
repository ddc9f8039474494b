use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::types::{BookCondition, BookId, Quantity, StockQuantity, TypeConstraintError};
use crate::forms::non_blank;

#[derive(Debug, Error)]
pub enum CartFormError {
    #[error("Cart form validation failed: {0}")]
    Validation(String),
    #[error("Cart form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for CartFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for CartFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

fn parse_condition(value: Option<String>) -> Result<BookCondition, TypeConstraintError> {
    Ok(non_blank(value)
        .map(BookCondition::try_from)
        .transpose()?
        .unwrap_or_default())
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CartItemForm {
    #[validate(range(min = 1))]
    pub book_id: i32,
    #[serde(default)]
    pub condition: Option<String>,
    #[serde(default = "default_quantity")]
    #[validate(range(min = 1))]
    pub quantity: i32,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub stock: Option<i32>,
}

fn default_quantity() -> i32 {
    1
}

#[derive(Debug, Clone, PartialEq)]
pub struct CartItemPayload {
    pub book_id: BookId,
    pub condition: BookCondition,
    pub quantity: Quantity,
    pub stock: Option<StockQuantity>,
}

impl TryFrom<CartItemForm> for CartItemPayload {
    type Error = CartFormError;

    fn try_from(value: CartItemForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            book_id: BookId::new(value.book_id)?,
            condition: parse_condition(value.condition)?,
            quantity: Quantity::new(value.quantity)?,
            stock: value.stock.map(StockQuantity::new).transpose()?,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct RemoveItemQuery {
    #[serde(default)]
    pub condition: Option<String>,
}

impl RemoveItemQuery {
    pub fn condition(self) -> Result<BookCondition, CartFormError> {
        Ok(parse_condition(self.condition)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_one_new_copy() {
        let form: CartItemForm = serde_json::from_str(r#"{"bookId": 3}"#).unwrap();
        let payload = CartItemPayload::try_from(form).unwrap();
        assert_eq!(payload.condition, BookCondition::New);
        assert_eq!(payload.quantity.get(), 1);
    }

    #[test]
    fn rejects_zero_quantity() {
        let form: CartItemForm =
            serde_json::from_str(r#"{"bookId": 3, "quantity": 0, "condition": "Old"}"#).unwrap();
        assert!(CartItemPayload::try_from(form).is_err());
    }
}
