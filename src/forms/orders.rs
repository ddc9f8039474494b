use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::order::ShippingAddress;
use crate::domain::types::{
    BookCondition, BookId, Email, OrderStatus, PaymentType, PersonName, PhoneNumber, Price,
    Quantity, TypeConstraintError,
};
use crate::forms::non_blank;

#[derive(Debug, Error)]
pub enum OrderFormError {
    #[error("Order form validation failed: {0}")]
    Validation(String),
    #[error("Order form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for OrderFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for OrderFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddressForm {
    #[validate(length(min = 1))]
    pub street: String,
    #[validate(length(min = 1))]
    pub city: String,
    #[validate(length(min = 1))]
    pub state: String,
    #[validate(length(min = 1))]
    pub country: String,
    #[validate(length(min = 1))]
    pub pin_code: String,
}

impl From<AddressForm> for ShippingAddress {
    fn from(value: AddressForm) -> Self {
        Self {
            street: value.street.trim().to_string(),
            city: value.city.trim().to_string(),
            state: value.state.trim().to_string(),
            country: value.country.trim().to_string(),
            pin_code: value.pin_code.trim().to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderForm {
    #[validate(length(min = 1))]
    pub customer_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub mobile_number: String,
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
    pub payment_type: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlaceOrderPayload {
    pub customer_name: PersonName,
    pub email: Email,
    pub mobile_number: PhoneNumber,
    pub address: ShippingAddress,
    pub book_id: BookId,
    pub quantity: Quantity,
    pub price: Price,
    pub condition: BookCondition,
    pub payment_type: PaymentType,
}

impl TryFrom<PlaceOrderForm> for PlaceOrderPayload {
    type Error = OrderFormError;

    fn try_from(value: PlaceOrderForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            customer_name: PersonName::new(value.customer_name)?,
            email: Email::new(value.email)?,
            mobile_number: PhoneNumber::new(value.mobile_number)?,
            address: value.address.into(),
            book_id: BookId::new(value.book_id)?,
            quantity: Quantity::new(value.quantity)?,
            price: Price::new(value.price)?,
            condition: non_blank(value.condition)
                .map(BookCondition::try_from)
                .transpose()?
                .unwrap_or_default(),
            payment_type: PaymentType::try_from(value.payment_type)?,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateOrderStatusForm {
    pub status: String,
}

impl TryFrom<UpdateOrderStatusForm> for OrderStatus {
    type Error = OrderFormError;

    fn try_from(value: UpdateOrderStatusForm) -> Result<Self, Self::Error> {
        match OrderStatus::try_from(value.status) {
            Ok(status) if status.is_manual() => Ok(status),
            _ => Err(OrderFormError::Validation("Invalid status value".to_string())),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CancelOrderForm {
    #[serde(default)]
    pub reason: Option<String>,
}

impl CancelOrderForm {
    pub fn reason(self) -> Result<String, OrderFormError> {
        non_blank(self.reason)
            .ok_or_else(|| OrderFormError::Validation("Cancellation reason is required".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_form() -> serde_json::Value {
        serde_json::json!({
            "customerName": "Asha",
            "email": "asha@example.com",
            "mobileNumber": "9999999999",
            "address": {
                "street": "1 MG Road",
                "city": "Pune",
                "state": "MH",
                "country": "India",
                "pinCode": "411001"
            },
            "bookId": 4,
            "quantity": 2,
            "price": 250.0,
            "condition": "Old",
            "paymentType": "UPI"
        })
    }

    #[test]
    fn parses_complete_order() {
        let form: PlaceOrderForm = serde_json::from_value(sample_form()).unwrap();
        let payload = PlaceOrderPayload::try_from(form).unwrap();
        assert_eq!(payload.condition, BookCondition::Old);
        assert_eq!(payload.payment_type, PaymentType::Upi);
        assert_eq!(payload.address.pin_code, "411001");
    }

    #[test]
    fn rejects_blank_address_fields() {
        let mut value = sample_form();
        value["address"]["city"] = serde_json::json!("");
        let form: PlaceOrderForm = serde_json::from_value(value).unwrap();
        assert!(matches!(
            PlaceOrderPayload::try_from(form),
            Err(OrderFormError::Validation(_))
        ));
    }

    #[test]
    fn status_updates_are_limited_to_manual_statuses() {
        let ok = OrderStatus::try_from(UpdateOrderStatusForm {
            status: "Delivered".into(),
        });
        assert_eq!(ok.unwrap(), OrderStatus::Delivered);

        let paid = OrderStatus::try_from(UpdateOrderStatusForm {
            status: "paid".into(),
        });
        assert!(paid.is_err());
    }

    #[test]
    fn cancel_requires_reason() {
        assert!(CancelOrderForm { reason: None }.reason().is_err());
        assert_eq!(
            CancelOrderForm {
                reason: Some(" Other ".into())
            }
            .reason()
            .unwrap(),
            "Other"
        );
    }
}
