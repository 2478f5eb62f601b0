use std::time::Duration;

use crate::error::{ConfigError, CredentialError};

pub const DEFAULT_ENDPOINT: &str = "https://practicum.yandex.ru/api/user_api/homework_statuses/";
pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";

/// Names of the credentials that must be set before the loop starts.
pub const REQUIRED_CREDENTIALS: [&str; 3] = ["PRACTICUM_TOKEN", "TELEGRAM_TOKEN", "TELEGRAM_CHAT_ID"];

/// Application configuration, built once at startup and never mutated.
#[derive(Clone)]
pub struct AppConfig {
    /// OAuth token for the homework status API
    pub practicum_token: String,

    /// Telegram bot token
    pub telegram_token: String,

    /// Chat that receives every notification
    pub telegram_chat_id: String,

    /// Homework status endpoint
    pub endpoint: String,

    /// Telegram Bot API base URL (overridable for tests and proxies)
    pub telegram_api_url: String,

    /// Interval between cycles and between delivery retries (default: 600s)
    pub retry_period: Duration,

    /// Per-request HTTP timeout (default: 30s)
    pub request_timeout: Duration,

    /// Initial `from_date`; `None` means "now"
    pub initial_from_date: Option<i64>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("practicum_token", &"<redacted>")
            .field("telegram_token", &"<redacted>")
            .field("telegram_chat_id", &self.telegram_chat_id)
            .field("endpoint", &self.endpoint)
            .field("telegram_api_url", &self.telegram_api_url)
            .field("retry_period", &self.retry_period)
            .field("request_timeout", &self.request_timeout)
            .field("initial_from_date", &self.initial_from_date)
            .finish()
    }
}

impl AppConfig {
    /// Load configuration from `.env` (if present) and the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// All missing credentials are collected before failing, so the error
    /// names every one of them at once.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let missing: Vec<&'static str> = REQUIRED_CREDENTIALS
            .into_iter()
            .filter(|name| non_empty(*name).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(CredentialError { missing }.into());
        }

        Ok(Self {
            practicum_token: non_empty("PRACTICUM_TOKEN").unwrap_or_default(),
            telegram_token: non_empty("TELEGRAM_TOKEN").unwrap_or_default(),
            telegram_chat_id: non_empty("TELEGRAM_CHAT_ID").unwrap_or_default(),
            endpoint: non_empty("PRACTICUM_ENDPOINT").unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            telegram_api_url: non_empty("TELEGRAM_API_URL")
                .unwrap_or_else(|| DEFAULT_TELEGRAM_API_URL.to_string()),
            retry_period: Duration::from_secs(parse_or(
                non_empty("RETRY_PERIOD_SECS"),
                "RETRY_PERIOD_SECS",
                600,
            )?),
            request_timeout: Duration::from_secs(parse_or(
                non_empty("REQUEST_TIMEOUT_SECS"),
                "REQUEST_TIMEOUT_SECS",
                30,
            )?),
            initial_from_date: non_empty("INITIAL_FROM_DATE")
                .map(|v| {
                    v.trim().parse::<i64>().map_err(|_| ConfigError::Invalid {
                        name: "INITIAL_FROM_DATE",
                        expected: "Unix timestamp",
                        value: v,
                    })
                })
                .transpose()?,
        })
    }
}

fn parse_or(value: Option<String>, name: &'static str, default: u64) -> Result<u64, ConfigError> {
    match value {
        None => Ok(default),
        Some(v) => v.trim().parse().map_err(|_| ConfigError::Invalid {
            name,
            expected: "u64",
            value: v,
        }),
    }
}
