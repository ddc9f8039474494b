use serde::Deserialize;

fn default_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_token_ttl_hours() -> i64 {
    24
}

fn default_otp_ttl_seconds() -> u64 {
    300
}

fn default_razorpay_api_base() -> String {
    "https://api.razorpay.com/v1".to_string()
}

fn default_mail_from() -> String {
    "Bookstore <no-reply@bookstore.local>".to_string()
}

/// Configuration options for the bookstore service.
#[derive(Clone, Debug, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_address")]
    pub address: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub database_url: String,
    /// HMAC secret used to sign session tokens.
    pub jwt_secret: String,
    #[serde(default = "default_token_ttl_hours")]
    pub token_ttl_hours: i64,
    /// Mark the session cookie `Secure`; enable behind HTTPS.
    #[serde(default)]
    pub secure_cookies: bool,
    /// Public URL of the storefront, used in emailed links and gateway callbacks.
    pub app_base_url: String,
    #[serde(default = "default_otp_ttl_seconds")]
    pub otp_ttl_seconds: u64,
    pub razorpay: RazorpayConfig,
    #[serde(default)]
    pub mail: MailConfig,
}

/// Credentials for the Razorpay orders API and webhook verification.
#[derive(Clone, Debug, Deserialize)]
pub struct RazorpayConfig {
    pub key_id: String,
    pub key_secret: String,
    pub webhook_secret: String,
    #[serde(default = "default_razorpay_api_base")]
    pub api_base_url: String,
}

/// Outbound mail relay. Without `relay_url` messages are only logged.
#[derive(Clone, Debug, Deserialize)]
pub struct MailConfig {
    pub relay_url: Option<String>,
    pub relay_token: Option<String>,
    #[serde(default = "default_mail_from")]
    pub from: String,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            relay_url: None,
            relay_token: None,
            from: default_mail_from(),
        }
    }
}
