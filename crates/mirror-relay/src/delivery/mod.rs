//! Webhook delivery
//!
//! The boundary between the mirror and its destinations. Delivery is
//! at-most-once: failures are logged here and never propagated.

use crate::normalize::NormalizedMessage;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Delivery errors
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The request could not be sent (connect failure, timeout)
    #[error("Delivery request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The destination rejected the message
    #[error("Destination rejected message with status {0}")]
    Rejected(reqwest::StatusCode),
}

/// Consumer of normalized messages
///
/// The router hands finished messages to a sink and moves on; a sink must
/// swallow its own failures.
#[async_trait]
pub trait MessageSink: Send + Sync {
    /// Deliver one message to its destination
    async fn deliver(&self, message: NormalizedMessage);
}

/// Wire body of a webhook delivery call
#[derive(Debug, Serialize)]
struct WebhookBody<'a> {
    username: &'a str,
    #[serde(rename = "avatarURL")]
    avatar_url: &'a str,
    content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    embeds: Option<&'a Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    files: Option<&'a Vec<String>>,
}

impl<'a> WebhookBody<'a> {
    fn from_message(message: &'a NormalizedMessage) -> Self {
        Self {
            username: &message.username,
            avatar_url: &message.avatar_url,
            content: &message.content,
            embeds: message.embeds.as_ref(),
            files: message.files.as_ref(),
        }
    }
}

/// Webhook delivery client
///
/// One shared `reqwest` client posts to every destination URL.
#[derive(Debug, Clone)]
pub struct WebhookClient {
    http: reqwest::Client,
}

impl WebhookClient {
    /// Create a webhook client on top of a shared HTTP client
    #[must_use]
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// Execute one delivery call
    ///
    /// # Errors
    /// Returns an error if the request fails or the destination responds
    /// with a non-success status
    pub async fn execute(&self, message: &NormalizedMessage) -> Result<(), DeliveryError> {
        let response = self
            .http
            .post(&message.destination_url)
            .json(&WebhookBody::from_message(message))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DeliveryError::Rejected(status));
        }

        Ok(())
    }
}

#[async_trait]
impl MessageSink for WebhookClient {
    async fn deliver(&self, message: NormalizedMessage) {
        if let Err(e) = self.execute(&message).await {
            tracing::warn!(
                destination = %message.destination_url,
                error = %e,
                "Webhook delivery failed"
            );
        }
    }
}
