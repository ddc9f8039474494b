use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    BookCondition, BookId, Email, OrderId, OrderStatus, PaymentRecordId, PersonName, PhoneNumber,
    Price, Quantity, UserId,
};

/// Reasons offered to customers cancelling an order.
pub const CANCEL_REASONS: [&str; 8] = [
    "I changed my mind",
    "I don't like the book content",
    "Found the book cheaper elsewhere",
    "The book is taking too long to arrive",
    "I ordered the wrong book",
    "I wanted a different edition or format",
    "I no longer need the book",
    "Other",
];

pub const DEFAULT_CURRENCY: &str = "INR";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub street: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub pin_code: String,
}

/// Gateway payment attempt recorded against an order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: PaymentRecordId,
    pub payment_id: String,
    pub status: String,
    pub method: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPayment {
    pub payment_id: String,
    pub status: String,
    pub method: Option<String>,
}

/// Single-book order, placed manually or through the payment gateway.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub user_id: Option<UserId>,
    pub customer_name: PersonName,
    pub email: Email,
    pub mobile_number: PhoneNumber,
    pub address: ShippingAddress,
    pub book_id: BookId,
    pub quantity: Quantity,
    pub price: Price,
    pub condition: BookCondition,
    pub payment_type: Option<String>,
    pub status: OrderStatus,
    pub cancel_reason: Option<String>,
    pub gateway_order_id: Option<String>,
    pub receipt: Option<String>,
    pub amount: Option<i64>,
    pub currency: String,
    pub payments: Vec<Payment>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Order {
    /// Whether the customer may still cancel.
    pub fn is_cancellable(&self) -> bool {
        !matches!(self.status, OrderStatus::Cancelled | OrderStatus::Delivered)
    }
}

/// Data required to insert a new [`Order`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub user_id: Option<UserId>,
    pub customer_name: PersonName,
    pub email: Email,
    pub mobile_number: PhoneNumber,
    pub address: ShippingAddress,
    pub book_id: BookId,
    pub quantity: Quantity,
    pub price: Price,
    pub condition: BookCondition,
    pub payment_type: Option<String>,
    pub status: OrderStatus,
    pub gateway_order_id: Option<String>,
    pub receipt: Option<String>,
    pub amount: Option<i64>,
    pub currency: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}
