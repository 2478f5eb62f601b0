use serde_json::Value;

use herald_common::error::{ValidationError, json_kind};
use herald_common::types::PollResponse;

/// Check the top-level shape of a raw poll response.
///
/// Individual homework records are not inspected here; they are handed on in
/// server order. A `current_date` that is not an integer is treated as absent.
pub fn validate_response(raw: Value) -> Result<PollResponse, ValidationError> {
    let mut body = match raw {
        Value::Object(body) => body,
        other => {
            return Err(ValidationError::Shape {
                found: json_kind(&other),
            });
        }
    };

    let homeworks = match body.remove("homeworks") {
        None => return Err(ValidationError::MissingHomeworks),
        Some(Value::Array(items)) => items,
        Some(other) => {
            return Err(ValidationError::HomeworksNotList {
                found: json_kind(&other),
            });
        }
    };

    let current_date = body.get("current_date").and_then(Value::as_i64);

    Ok(PollResponse {
        homeworks,
        current_date,
    })
}
