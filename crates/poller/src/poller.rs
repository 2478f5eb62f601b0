use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use herald_common::config::AppConfig;
use herald_common::error::TransportError;
use herald_common::types::TimeCursor;

/// Source of raw homework status responses.
#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Issue one request for changes since `cursor`. No retries.
    async fn fetch(&self, cursor: TimeCursor) -> Result<Value, TransportError>;
}

/// HTTP client for the homework status endpoint.
pub struct HttpPoller {
    client: reqwest::Client,
    endpoint: String,
    token: String,
}

impl HttpPoller {
    pub fn new(client: reqwest::Client, endpoint: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            token: token.into(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self::new(
            client,
            config.endpoint.clone(),
            config.practicum_token.clone(),
        ))
    }
}

#[async_trait]
impl StatusSource for HttpPoller {
    async fn fetch(&self, cursor: TimeCursor) -> Result<Value, TransportError> {
        tracing::debug!(endpoint = %self.endpoint, from_date = cursor.as_secs(), "Polling status API");

        let response = self
            .client
            .get(&self.endpoint)
            .header(reqwest::header::AUTHORIZATION, format!("OAuth {}", self.token))
            .query(&[("from_date", cursor.as_secs())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| TransportError::Decode(e.to_string()))
    }
}
