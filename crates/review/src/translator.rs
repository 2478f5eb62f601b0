use serde_json::Value;

use herald_common::error::{RecordError, json_kind};
use herald_common::types::WorkItemRecord;

use crate::catalog::StatusCatalog;

const NAME_FIELD: &str = "homework_name";
const STATUS_FIELD: &str = "status";

/// Extract the name and status of one homework record.
///
/// Fields are checked in order (name first). Absent, non-string and blank
/// values all count as missing.
pub fn parse_record(item: &Value) -> Result<WorkItemRecord, RecordError> {
    let Value::Object(fields) = item else {
        return Err(RecordError::NotAnObject {
            found: json_kind(item),
        });
    };

    let required = |field: &'static str| {
        fields
            .get(field)
            .and_then(Value::as_str)
            .filter(|v| !v.trim().is_empty())
            .map(str::to_string)
            .ok_or(RecordError::MissingField { field })
    };

    Ok(WorkItemRecord {
        name: required(NAME_FIELD)?,
        status: required(STATUS_FIELD)?,
    })
}

/// Render the chat message for a status change.
pub fn translate(record: &WorkItemRecord) -> String {
    let change = StatusCatalog::lookup(&record.status);
    format!(
        "Изменился статус проверки работы \"{}\". {}",
        record.name,
        StatusCatalog::describe(&change)
    )
}

/// Parse and render one raw record.
pub fn translate_value(item: &Value) -> Result<String, RecordError> {
    let record = parse_record(item)?;
    let message = translate(&record);
    tracing::debug!(homework = %record.name, status = %record.status, "Translated status change");
    Ok(message)
}
