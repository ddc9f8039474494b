use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::order::{DEFAULT_CURRENCY, ShippingAddress};
use crate::domain::types::{BookCondition, BookId, Price, Quantity, TypeConstraintError};
use crate::forms::non_blank;
use crate::forms::orders::AddressForm;

#[derive(Debug, Error)]
pub enum PaymentFormError {
    #[error("Payment form validation failed: {0}")]
    Validation(String),
    #[error("Payment form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for PaymentFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for PaymentFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

/// Checkout request. `amount` is already in the smallest currency unit.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentOrderForm {
    #[validate(range(min = 1.0))]
    pub amount: f64,
    #[serde(default)]
    pub currency: Option<String>,
    #[validate(nested)]
    pub address: AddressForm,
    #[validate(range(min = 1))]
    pub book_id: i32,
    #[validate(range(min = 1))]
    pub quantity: i32,
    #[validate(range(min = 0.0))]
    pub price: f64,
    #[serde(default)]
    pub condition: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreatePaymentOrderPayload {
    pub amount: i64,
    pub currency: String,
    pub address: ShippingAddress,
    pub book_id: BookId,
    pub quantity: Quantity,
    pub price: Price,
    pub condition: BookCondition,
}

impl TryFrom<CreatePaymentOrderForm> for CreatePaymentOrderPayload {
    type Error = PaymentFormError;

    fn try_from(value: CreatePaymentOrderForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            amount: value.amount.round() as i64,
            currency: non_blank(value.currency)
                .map(|c| c.to_uppercase())
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            address: value.address.into(),
            book_id: BookId::new(value.book_id)?,
            quantity: Quantity::new(value.quantity)?,
            price: Price::new(value.price)?,
            condition: non_blank(value.condition)
                .map(BookCondition::try_from)
                .transpose()?
                .unwrap_or_default(),
        })
    }
}

/// Checkout confirmation posted by the storefront after the gateway widget
/// completes.
#[derive(Debug, Deserialize, Validate)]
pub struct VerifyPaymentForm {
    #[validate(length(min = 1))]
    pub razorpay_order_id: String,
    #[validate(length(min = 1))]
    pub razorpay_payment_id: String,
    #[validate(length(min = 1))]
    pub razorpay_signature: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyPaymentPayload {
    pub order_id: String,
    pub payment_id: String,
    pub signature: String,
}

impl TryFrom<VerifyPaymentForm> for VerifyPaymentPayload {
    type Error = PaymentFormError;

    fn try_from(value: VerifyPaymentForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            order_id: value.razorpay_order_id,
            payment_id: value.razorpay_payment_id,
            signature: value.razorpay_signature,
        })
    }
}

/// Form-encoded body the gateway posts to the callback page.
#[derive(Debug, Default, Deserialize)]
pub struct PaymentCallbackForm {
    #[serde(default)]
    pub razorpay_order_id: Option<String>,
    #[serde(default)]
    pub razorpay_payment_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_amount_and_defaults_currency() {
        let form: CreatePaymentOrderForm = serde_json::from_value(serde_json::json!({
            "amount": 49999.6,
            "address": {
                "street": "1 MG Road",
                "city": "Pune",
                "state": "MH",
                "country": "India",
                "pinCode": "411001"
            },
            "bookId": 2,
            "quantity": 1,
            "price": 500.0
        }))
        .unwrap();

        let payload = CreatePaymentOrderPayload::try_from(form).unwrap();
        assert_eq!(payload.amount, 50000);
        assert_eq!(payload.currency, "INR");
        assert_eq!(payload.condition, BookCondition::New);
    }

    #[test]
    fn verify_requires_all_fields() {
        let form = VerifyPaymentForm {
            razorpay_order_id: "order_1".into(),
            razorpay_payment_id: String::new(),
            razorpay_signature: "abc".into(),
        };
        assert!(VerifyPaymentPayload::try_from(form).is_err());
    }
}
