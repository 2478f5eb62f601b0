use thiserror::Error;

/// Required credentials absent at startup.
#[derive(Debug, Error)]
#[error("Missing required environment variables: {}", missing.join(", "))]
pub struct CredentialError {
    pub missing: Vec<&'static str>,
}

/// Optional settings that are present but unusable.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Credentials(#[from] CredentialError),

    #[error("{name} must be a valid {expected}, got {value:?}")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Failure of a single poll request. Always transient.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Request to status API failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Status API responded with HTTP {status}")]
    Status { status: u16 },

    #[error("Status API returned an undecodable body: {0}")]
    Decode(String),
}

/// The poll response violates the expected contract. Always fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("API response must be a JSON object, got {found}")]
    Shape { found: &'static str },

    #[error("API response has no \"homeworks\" key")]
    MissingHomeworks,

    #[error("\"homeworks\" must be a list, got {found}")]
    HomeworksNotList { found: &'static str },
}

/// A single homework record that cannot be translated. Skipped, never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("Homework record has no \"{field}\" field")]
    MissingField { field: &'static str },

    #[error("Homework record must be a JSON object, got {found}")]
    NotAnObject { found: &'static str },
}

/// Telegram delivery failure. Reported as `false` by notifiers.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("Telegram request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Telegram API rejected the message (HTTP {status}): {description}")]
    Api { status: u16, description: String },
}

/// Errors that end the process, mapped to exit codes by the binary.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl AppError {
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Config(_) => 1,
            AppError::Validation(_) => 2,
        }
    }
}

/// Name of a JSON value's kind, for error messages.
pub fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_error_lists_all_missing() {
        let err = CredentialError {
            missing: vec!["PRACTICUM_TOKEN", "TELEGRAM_CHAT_ID"],
        };
        assert_eq!(
            err.to_string(),
            "Missing required environment variables: PRACTICUM_TOKEN, TELEGRAM_CHAT_ID"
        );
    }

    #[test]
    fn test_exit_codes() {
        let config = AppError::from(ConfigError::from(CredentialError {
            missing: vec!["TELEGRAM_TOKEN"],
        }));
        assert_eq!(config.exit_code(), 1);
        assert_eq!(
            AppError::from(ValidationError::MissingHomeworks).exit_code(),
            2
        );
    }

    #[test]
    fn test_json_kind() {
        assert_eq!(json_kind(&serde_json::json!([])), "array");
        assert_eq!(json_kind(&serde_json::json!("x")), "string");
        assert_eq!(json_kind(&serde_json::Value::Null), "null");
    }
}
