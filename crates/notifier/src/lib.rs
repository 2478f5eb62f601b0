//! Telegram delivery of status notifications.
//!
//! Delivery never raises: failures are logged and reported as `false` so a
//! broken chat channel cannot take down the polling loop. Retrying is the
//! caller's decision.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use herald_common::config::AppConfig;
use herald_common::error::DeliveryError;

/// Destination for notification text.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Attempt one delivery. Returns `true` on success.
    async fn notify(&self, text: &str) -> bool;
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
}

/// Subset of the Bot API response envelope.
#[derive(Debug, Deserialize)]
struct BotApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Sends messages to a single chat through the Telegram Bot API.
pub struct TelegramNotifier {
    client: reqwest::Client,
    api_url: String,
    token: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(
        client: reqwest::Client,
        api_url: impl Into<String>,
        token: impl Into<String>,
        chat_id: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_url: api_url.into(),
            token: token.into(),
            chat_id: chat_id.into(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self::new(
            client,
            config.telegram_api_url.clone(),
            config.telegram_token.clone(),
            config.telegram_chat_id.clone(),
        ))
    }

    pub fn chat_id(&self) -> &str {
        &self.chat_id
    }

    fn send_message_url(&self) -> String {
        format!(
            "{}/bot{}/sendMessage",
            self.api_url.trim_end_matches('/'),
            self.token
        )
    }

    /// Single `sendMessage` call.
    pub async fn send(&self, text: &str) -> Result<(), DeliveryError> {
        let response = self
            .client
            .post(self.send_message_url())
            .json(&SendMessageRequest {
                chat_id: &self.chat_id,
                text,
            })
            .send()
            .await
            .map_err(|e| DeliveryError::Request(e.without_url()))?;

        let status = response.status();
        let body: Option<BotApiResponse> = response.json().await.ok();

        match body {
            Some(BotApiResponse { ok: true, .. }) if status.is_success() => Ok(()),
            Some(BotApiResponse { description, .. }) => Err(DeliveryError::Api {
                status: status.as_u16(),
                description: description.unwrap_or_else(|| "no description".to_string()),
            }),
            None => Err(DeliveryError::Api {
                status: status.as_u16(),
                description: "unreadable response body".to_string(),
            }),
        }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify(&self, text: &str) -> bool {
        match self.send(text).await {
            Ok(()) => {
                tracing::debug!(chat_id = %self.chat_id, "Message delivered to Telegram");
                true
            }
            Err(e) => {
                tracing::error!(chat_id = %self.chat_id, error = %e, "Failed to deliver message to Telegram");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_message_url_strips_trailing_slash() {
        let notifier = TelegramNotifier::new(
            reqwest::Client::new(),
            "https://api.telegram.org/",
            "123:abc",
            "42",
        );
        assert_eq!(
            notifier.send_message_url(),
            "https://api.telegram.org/bot123:abc/sendMessage"
        );
    }

    #[test]
    fn test_request_body_shape() {
        let body = serde_json::to_value(SendMessageRequest {
            chat_id: "42",
            text: "Привет",
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"chat_id": "42", "text": "Привет"}));
    }
}
