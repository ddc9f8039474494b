//! Razorpay orders API client and signature verification.

use std::time::Duration;

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;

use crate::models::config::RazorpayConfig;

type HmacSha256 = Hmac<Sha256>;

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("payment gateway request failed: {0}")]
    Transport(String),
    #[error("payment gateway rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("invalid payment gateway response: {0}")]
    InvalidResponse(String),
}

/// Order to open with the gateway. `amount` is in the smallest currency unit.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GatewayOrderRequest {
    pub amount: i64,
    pub currency: String,
    pub receipt: String,
    pub notes: serde_json::Value,
}

/// Order as acknowledged by the gateway.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct GatewayOrder {
    pub id: String,
    pub amount: i64,
    pub currency: String,
    #[serde(default)]
    pub receipt: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Payment provider used by the checkout flow.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Public key handed to the storefront checkout widget.
    fn key_id(&self) -> &str;

    async fn create_order(&self, request: GatewayOrderRequest)
    -> Result<GatewayOrder, PaymentError>;

    /// Check the checkout signature over `order_id|payment_id`.
    fn verify_payment(&self, order_id: &str, payment_id: &str, signature: &str) -> bool;

    /// Check a webhook signature over the raw request body.
    fn verify_webhook(&self, body: &[u8], signature: &str) -> bool;
}

/// Lowercase hex HMAC-SHA256 of `payload` under `secret`.
pub fn sign_hex(secret: &str, payload: &[u8]) -> String {
    match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(mut mac) => {
            mac.update(payload);
            hex::encode(mac.finalize().into_bytes())
        }
        Err(_) => String::new(),
    }
}

/// Constant-time comparison of a hex signature against the HMAC of `payload`.
pub fn verify_signature(secret: &str, payload: &[u8], signature_hex: &str) -> bool {
    let Ok(expected) = hex::decode(signature_hex.trim()) else {
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(payload);
    mac.verify_slice(&expected).is_ok()
}

/// Client for the Razorpay REST API.
#[derive(Clone)]
pub struct RazorpayClient {
    config: RazorpayConfig,
    client: reqwest::Client,
}

impl RazorpayClient {
    pub fn new(config: RazorpayConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { config, client }
    }

    fn orders_url(&self) -> String {
        format!("{}/orders", self.config.api_base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl PaymentGateway for RazorpayClient {
    fn key_id(&self) -> &str {
        &self.config.key_id
    }

    async fn create_order(
        &self,
        request: GatewayOrderRequest,
    ) -> Result<GatewayOrder, PaymentError> {
        let response = self
            .client
            .post(self.orders_url())
            .basic_auth(&self.config.key_id, Some(&self.config.key_secret))
            .json(&request)
            .send()
            .await
            .map_err(|e| PaymentError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<GatewayOrder>()
                .await
                .map_err(|e| PaymentError::InvalidResponse(e.to_string()));
        }

        let body = response.bytes().await.unwrap_or_default();
        let message = serde_json::from_slice::<serde_json::Value>(&body)
            .ok()
            .and_then(|value| {
                value
                    .pointer("/error/description")
                    .and_then(|v| v.as_str())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| String::from_utf8_lossy(&body).to_string());

        Err(PaymentError::Rejected {
            status: status.as_u16(),
            message,
        })
    }

    fn verify_payment(&self, order_id: &str, payment_id: &str, signature: &str) -> bool {
        let payload = format!("{order_id}|{payment_id}");
        verify_signature(&self.config.key_secret, payload.as_bytes(), signature)
    }

    fn verify_webhook(&self, body: &[u8], signature: &str) -> bool {
        verify_signature(&self.config.webhook_secret, body, signature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config() -> RazorpayConfig {
        RazorpayConfig {
            key_id: "rzp_test_key".into(),
            key_secret: "key-secret".into(),
            webhook_secret: "hook-secret".into(),
            api_base_url: "https://api.razorpay.com/v1/".into(),
        }
    }

    #[test]
    fn checkout_signature_covers_order_and_payment() {
        let client = RazorpayClient::new(sample_config());
        let signature = sign_hex("key-secret", b"order_1|pay_1");
        assert!(client.verify_payment("order_1", "pay_1", &signature));
        assert!(!client.verify_payment("order_1", "pay_2", &signature));
    }

    #[test]
    fn webhook_signature_uses_webhook_secret() {
        let client = RazorpayClient::new(sample_config());
        let body = br#"{"event":"payment.captured"}"#;
        assert!(client.verify_webhook(body, &sign_hex("hook-secret", body)));
        assert!(!client.verify_webhook(body, &sign_hex("key-secret", body)));
        assert!(!client.verify_webhook(body, "zz-not-hex"));
    }

    #[test]
    fn orders_url_trims_trailing_slash() {
        let client = RazorpayClient::new(sample_config());
        assert_eq!(client.orders_url(), "https://api.razorpay.com/v1/orders");
    }
}
