//! Gateway checkout: order creation, signature verification, webhooks.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::API_PREFIX;
use crate::auth::AuthenticatedUser;
use crate::domain::order::{NewOrder, NewPayment, Order};
use crate::domain::types::{Email, OrderStatus, PersonName, PhoneNumber};
use crate::forms::payments::{CreatePaymentOrderPayload, PaymentCallbackForm, VerifyPaymentPayload};
use crate::payments::{GatewayOrderRequest, PaymentGateway};
use crate::repository::{OrderReader, OrderWriter};

use super::{ServiceError, ServiceResult, now, session_user_id};

/// Payment status stored when the checkout signature checks out.
pub const CAPTURED: &str = "captured";

/// What the storefront needs to open the gateway checkout widget.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSession {
    pub order_id: String,
    pub amount: i64,
    pub currency: String,
    pub key_id: String,
    #[serde(rename = "callback_url")]
    pub callback_url: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PaymentStatus {
    pub status: OrderStatus,
    pub order: Order,
}

/// Result of processing a webhook delivery.
#[derive(Debug, Clone, PartialEq)]
pub enum WebhookOutcome {
    Applied(Order),
    /// Event type we do not act on, or an order we never created.
    Ignored,
}

#[derive(Debug, Deserialize)]
struct WebhookEvent {
    event: String,
    #[serde(default)]
    payload: WebhookPayload,
}

#[derive(Debug, Default, Deserialize)]
struct WebhookPayload {
    #[serde(default)]
    payment: Option<PaymentWrapper>,
}

#[derive(Debug, Deserialize)]
struct PaymentWrapper {
    entity: PaymentEntity,
}

#[derive(Debug, Deserialize)]
struct PaymentEntity {
    id: String,
    order_id: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    method: Option<String>,
}

/// Open a gateway order and store a local order awaiting payment.
pub async fn create_checkout<R>(
    payload: CreatePaymentOrderPayload,
    user: &AuthenticatedUser,
    app_base_url: &str,
    gateway: &dyn PaymentGateway,
    repo: &R,
) -> ServiceResult<CheckoutSession>
where
    R: OrderWriter,
{
    let user_id = session_user_id(user)?;
    let customer_name = PersonName::new(user.name.as_str())?;
    let email = Email::new(user.email.as_str())?;
    let mobile_number = PhoneNumber::new(user.phone.as_str())?;

    let receipt = format!("rcpt_{}", Utc::now().timestamp_millis());
    let request = GatewayOrderRequest {
        amount: payload.amount,
        currency: payload.currency.clone(),
        receipt: receipt.clone(),
        notes: serde_json::json!({ "userId": user_id.get() }),
    };

    let gateway_order = gateway.create_order(request).await.map_err(|e| {
        log::error!("Failed to create gateway order: {e}");
        ServiceError::Upstream("Unable to create order".into())
    })?;

    let timestamp = now();
    let order = NewOrder {
        user_id: Some(user_id),
        customer_name,
        email,
        mobile_number,
        address: payload.address,
        book_id: payload.book_id,
        quantity: payload.quantity,
        price: payload.price,
        condition: payload.condition,
        payment_type: None,
        status: OrderStatus::Created,
        gateway_order_id: Some(gateway_order.id.clone()),
        receipt: Some(receipt),
        amount: Some(gateway_order.amount),
        currency: gateway_order.currency.clone(),
        created_at: timestamp,
        updated_at: timestamp,
    };
    repo.create_gateway_order(&order)
        .map_err(|e| ServiceError::internal("store gateway order", e))?;

    log::info!("Opened gateway order {}", gateway_order.id);
    Ok(CheckoutSession {
        order_id: gateway_order.id,
        amount: gateway_order.amount,
        currency: gateway_order.currency,
        key_id: gateway.key_id().to_string(),
        callback_url: format!(
            "{}{API_PREFIX}/callback",
            app_base_url.trim_end_matches('/')
        ),
    })
}

/// Check the checkout signature and mark the order paid.
pub fn verify_payment<R>(
    payload: VerifyPaymentPayload,
    gateway: &dyn PaymentGateway,
    repo: &R,
) -> ServiceResult<Order>
where
    R: OrderWriter,
{
    if !gateway.verify_payment(&payload.order_id, &payload.payment_id, &payload.signature) {
        log::warn!("Rejected checkout signature for order {}", payload.order_id);
        return Err(ServiceError::bad_request("Invalid signature"));
    }

    let payment = NewPayment {
        payment_id: payload.payment_id,
        status: CAPTURED.to_string(),
        method: None,
    };
    match repo.record_payment(&payload.order_id, OrderStatus::Paid, None, &payment) {
        Ok(Some(order)) => Ok(order),
        Ok(None) => Err(ServiceError::not_found("Order not found")),
        Err(e) => Err(ServiceError::internal("record payment", e)),
    }
}

/// Apply a signed gateway event. Unknown events and orders are acknowledged
/// without changes so the gateway stops retrying.
pub fn handle_webhook<R>(
    body: &[u8],
    signature: Option<&str>,
    gateway: &dyn PaymentGateway,
    repo: &R,
) -> ServiceResult<WebhookOutcome>
where
    R: OrderWriter,
{
    let Some(signature) = signature.filter(|s| !s.trim().is_empty()) else {
        return Err(ServiceError::bad_request("Missing signature"));
    };
    if !gateway.verify_webhook(body, signature) {
        log::warn!("Rejected webhook with invalid signature");
        return Err(ServiceError::bad_request("Invalid signature"));
    }

    let event: WebhookEvent = serde_json::from_slice(body).map_err(|e| {
        log::warn!("Unreadable webhook body: {e}");
        ServiceError::bad_request("Invalid webhook payload")
    })?;

    let status = match event.event.as_str() {
        "payment.captured" => OrderStatus::Paid,
        "payment.failed" => OrderStatus::Failed,
        other => {
            log::debug!("Ignoring webhook event {other}");
            return Ok(WebhookOutcome::Ignored);
        }
    };
    let Some(entity) = event.payload.payment.map(|p| p.entity) else {
        return Err(ServiceError::bad_request("Invalid webhook payload"));
    };
    let Some(order_id) = entity.order_id.as_deref() else {
        return Ok(WebhookOutcome::Ignored);
    };

    let payment = NewPayment {
        payment_id: entity.id.clone(),
        status: entity
            .status
            .clone()
            .unwrap_or_else(|| status.as_str().to_string()),
        method: entity.method.clone(),
    };
    match repo.record_payment(order_id, status, entity.method.as_deref(), &payment) {
        Ok(Some(order)) => {
            log::info!("Webhook {} applied to order {order_id}", event.event);
            Ok(WebhookOutcome::Applied(order))
        }
        Ok(None) => {
            log::warn!("Webhook for unknown order {order_id}");
            Ok(WebhookOutcome::Ignored)
        }
        Err(e) => Err(ServiceError::internal("record webhook payment", e)),
    }
}

pub fn payment_status<R>(gateway_order_id: &str, repo: &R) -> ServiceResult<PaymentStatus>
where
    R: OrderReader,
{
    match repo.get_order_by_gateway_id(gateway_order_id) {
        Ok(Some(order)) => Ok(PaymentStatus {
            status: order.status,
            order,
        }),
        Ok(None) => Err(ServiceError::not_found("Order not found")),
        Err(e) => Err(ServiceError::internal("get order", e)),
    }
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Confirmation page the gateway redirects the customer to.
pub fn callback_page(form: &PaymentCallbackForm) -> String {
    let order_id = escape_html(form.razorpay_order_id.as_deref().unwrap_or("-"));
    let payment_id = escape_html(form.razorpay_payment_id.as_deref().unwrap_or("-"));
    format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>Payment received</title></head>\n<body>\n<h1>Thank you for your order</h1>\n<p>Order: {order_id}</p>\n<p>Payment: {payment_id}</p>\n</body>\n</html>\n"
    )
}
