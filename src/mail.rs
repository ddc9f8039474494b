//! Outbound email delivery.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::models::config::MailConfig;

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    /// Plain-text body.
    pub text: String,
    pub html: Option<String>,
}

impl EmailMessage {
    pub fn text(to: impl Into<String>, subject: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            text: text.into(),
            html: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum MailError {
    #[error("mail relay request failed: {0}")]
    Transport(String),
    #[error("mail relay rejected message ({status}): {message}")]
    Rejected { status: u16, message: String },
}

/// Delivers a single message.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: EmailMessage) -> Result<(), MailError>;
}

#[derive(Serialize)]
struct RelayPayload<'a> {
    from: &'a str,
    #[serde(flatten)]
    message: &'a EmailMessage,
}

/// Posts messages as JSON to an HTTP mail relay.
#[derive(Clone)]
pub struct RelayMailer {
    relay_url: String,
    token: Option<String>,
    from: String,
    client: reqwest::Client,
}

impl RelayMailer {
    pub fn new(relay_url: impl Into<String>, token: Option<String>, from: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            relay_url: relay_url.into(),
            token,
            from: from.into(),
            client,
        }
    }
}

#[async_trait]
impl Mailer for RelayMailer {
    async fn send(&self, message: EmailMessage) -> Result<(), MailError> {
        let mut request = self.client.post(&self.relay_url).json(&RelayPayload {
            from: &self.from,
            message: &message,
        });
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            log::info!("Sent email '{}' to {}", message.subject, message.to);
            return Ok(());
        }

        let message = response
            .text()
            .await
            .unwrap_or_else(|e| format!("unreadable body: {e}"));
        Err(MailError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}

/// Logs messages instead of sending them; used when no relay is configured.
#[derive(Debug, Clone, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, message: EmailMessage) -> Result<(), MailError> {
        log::info!(
            "Mail relay not configured; dropping email '{}' to {}",
            message.subject,
            message.to
        );
        Ok(())
    }
}

/// Pick the relay mailer when a relay URL is configured.
pub fn mailer_from_config(config: &MailConfig) -> Arc<dyn Mailer> {
    match &config.relay_url {
        Some(url) => Arc::new(RelayMailer::new(
            url.clone(),
            config.relay_token.clone(),
            config.from.clone(),
        )),
        None => {
            log::warn!("No mail relay configured; outgoing email will only be logged");
            Arc::new(LogMailer)
        }
    }
}
