//! Track listing field rules.
//!
//! Structural checks (presence, ranges, URL shape) happen on the request
//! schemas; these helpers cover what a schema cannot express, such as
//! whitespace-only text.

use crate::error::CoreError;

/// Trim a free-text field and reject it if nothing is left.
pub fn require_text(field: &str, value: &str) -> Result<String, CoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(format!("{field} must not be blank")));
    }
    Ok(trimmed.to_string())
}

/// Trim an optional free-text field, rejecting a supplied-but-blank value.
pub fn optional_text(field: &str, value: Option<&str>) -> Result<Option<String>, CoreError> {
    value.map(|v| require_text(field, v)).transpose()
}

/// Build the validation error for a set of missing or invalid fields.
///
/// Field names are sorted so the message is stable.
pub fn invalid_fields(mut fields: Vec<String>) -> CoreError {
    fields.sort();
    fields.dedup();
    CoreError::Validation(format!("Missing or invalid fields: {}", fields.join(", ")))
}
