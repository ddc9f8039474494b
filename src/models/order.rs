use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::order::{
    NewOrder as DomainNewOrder, Order as DomainOrder, Payment as DomainPayment, ShippingAddress,
};
use crate::domain::types::{
    BookCondition, Email, OrderStatus, PersonName, PhoneNumber, Price, Quantity,
    TypeConstraintError, UserId,
};

/// Diesel model representing the `orders` table.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::orders)]
pub struct Order {
    pub id: i32,
    pub user_id: Option<i32>,
    pub customer_name: String,
    pub email: String,
    pub mobile_number: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub pin_code: String,
    pub book_id: i32,
    pub quantity: i32,
    pub price: f64,
    pub book_condition: String,
    pub payment_type: Option<String>,
    pub status: String,
    pub cancel_reason: Option<String>,
    pub gateway_order_id: Option<String>,
    pub receipt: Option<String>,
    pub amount: Option<i64>,
    pub currency: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::orders)]
pub struct NewOrder {
    pub user_id: Option<i32>,
    pub customer_name: String,
    pub email: String,
    pub mobile_number: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub pin_code: String,
    pub book_id: i32,
    pub quantity: i32,
    pub price: f64,
    pub book_condition: String,
    pub payment_type: Option<String>,
    pub status: String,
    pub gateway_order_id: Option<String>,
    pub receipt: Option<String>,
    pub amount: Option<i64>,
    pub currency: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Diesel model representing the `order_payments` table.
#[derive(Debug, Clone, Identifiable, Queryable, Associations)]
#[diesel(belongs_to(Order))]
#[diesel(table_name = crate::schema::order_payments)]
pub struct OrderPayment {
    pub id: i32,
    pub order_id: i32,
    pub payment_id: String,
    pub status: String,
    pub method: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::order_payments)]
pub struct NewOrderPayment<'a> {
    pub order_id: i32,
    pub payment_id: &'a str,
    pub status: &'a str,
    pub method: Option<&'a str>,
    pub created_at: NaiveDateTime,
}

impl TryFrom<OrderPayment> for DomainPayment {
    type Error = TypeConstraintError;

    fn try_from(payment: OrderPayment) -> Result<Self, Self::Error> {
        Ok(Self {
            id: payment.id.try_into()?,
            payment_id: payment.payment_id,
            status: payment.status,
            method: payment.method,
            created_at: payment.created_at,
        })
    }
}

impl TryFrom<(Order, Vec<OrderPayment>)> for DomainOrder {
    type Error = TypeConstraintError;

    fn try_from((order, payments): (Order, Vec<OrderPayment>)) -> Result<Self, Self::Error> {
        Ok(Self {
            id: order.id.try_into()?,
            user_id: order.user_id.map(UserId::new).transpose()?,
            customer_name: PersonName::new(order.customer_name)?,
            email: Email::new(order.email)?,
            mobile_number: PhoneNumber::new(order.mobile_number)?,
            address: ShippingAddress {
                street: order.street,
                city: order.city,
                state: order.state,
                country: order.country,
                pin_code: order.pin_code,
            },
            book_id: order.book_id.try_into()?,
            quantity: Quantity::new(order.quantity)?,
            price: Price::new(order.price)?,
            condition: BookCondition::try_from(order.book_condition)?,
            payment_type: order.payment_type,
            status: OrderStatus::try_from(order.status)?,
            cancel_reason: order.cancel_reason,
            gateway_order_id: order.gateway_order_id,
            receipt: order.receipt,
            amount: order.amount,
            currency: order.currency,
            payments: payments
                .into_iter()
                .map(TryInto::try_into)
                .collect::<Result<Vec<_>, _>>()?,
            created_at: order.created_at,
            updated_at: order.updated_at,
        })
    }
}

impl From<DomainNewOrder> for NewOrder {
    fn from(order: DomainNewOrder) -> Self {
        Self {
            user_id: order.user_id.map(UserId::get),
            customer_name: order.customer_name.into_inner(),
            email: order.email.into_inner(),
            mobile_number: order.mobile_number.into_inner(),
            street: order.address.street,
            city: order.address.city,
            state: order.address.state,
            country: order.address.country,
            pin_code: order.address.pin_code,
            book_id: order.book_id.get(),
            quantity: order.quantity.get(),
            price: order.price.get(),
            book_condition: order.condition.into(),
            payment_type: order.payment_type,
            status: order.status.into(),
            gateway_order_id: order.gateway_order_id,
            receipt: order.receipt,
            amount: order.amount,
            currency: order.currency,
            created_at: order.created_at,
            updated_at: order.updated_at,
        }
    }
}
