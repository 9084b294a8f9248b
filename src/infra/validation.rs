//! Utilities for validating inbound payloads.
//!
//! Payloads are checked structurally, field by field, before any database
//! interaction. Violations are reported per field so clients can see the
//! offending path, the kind of violation, and a readable message.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

/// A single schema violation in a request payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldError {
    /// The path to the offending field, rooted at `body`.
    loc: Vec<String>,
    /// The violation kind, e.g. `missing` or `string_type`.
    #[serde(rename = "type")]
    kind: String,
    /// A human-readable message.
    msg: String,
}

impl FieldError {
    /// A required field was absent.
    pub fn missing(field: &str) -> Self {
        Self {
            loc: vec!["body".to_string(), field.to_string()],
            kind: "missing".to_string(),
            msg: "Field required".to_string(),
        }
    }

    /// A field held something other than a string.
    pub fn string_type(field: &str) -> Self {
        Self {
            loc: vec!["body".to_string(), field.to_string()],
            kind: "string_type".to_string(),
            msg: "Input should be a valid string".to_string(),
        }
    }

    /// The body was valid JSON but not an object.
    pub fn model_type() -> Self {
        Self {
            loc: vec!["body".to_string()],
            kind: "model_type".to_string(),
            msg: "Input should be a valid object".to_string(),
        }
    }

    /// The body could not be parsed as JSON.
    pub fn json_invalid(msg: String) -> Self {
        Self {
            loc: vec!["body".to_string()],
            kind: "json_invalid".to_string(),
            msg,
        }
    }

    /// The path to the offending field.
    pub fn loc(&self) -> &[String] {
        &self.loc
    }

    /// The violation kind.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// The human-readable message.
    pub fn msg(&self) -> &str {
        &self.msg
    }
}

/// A type that can be decoded from a JSON value with structured,
/// field-level error reporting.
pub trait FromJsonValue: Sized {
    /// Decodes the value, collecting one [`FieldError`] per violation.
    fn from_value(value: &Value) -> Result<Self, Vec<FieldError>>;
}

/// Decodes a required string field.
pub fn require_string(object: &Map<String, Value>, field: &str) -> Result<String, FieldError> {
    match object.get(field) {
        None => Err(FieldError::missing(field)),
        Some(Value::String(value)) => Ok(value.clone()),
        Some(_) => Err(FieldError::string_type(field)),
    }
}

/// Decodes an optional string-or-null field.
pub fn optional_string(
    object: &Map<String, Value>,
    field: &str,
) -> Result<Option<String>, FieldError> {
    match object.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(value)) => Ok(Some(value.clone())),
        Some(_) => Err(FieldError::string_type(field)),
    }
}
