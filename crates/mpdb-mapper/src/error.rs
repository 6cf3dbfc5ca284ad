use thiserror::Error;

/// Per-record mapping failure. Raised only for structurally unusable
/// entries; field-level problems degrade to defaults instead.
#[derive(Debug, Error)]
pub enum MapError {
    #[error("order entry {index} is not an object (found {found})")]
    NotAnObject { index: usize, found: &'static str },
}

/// Human-readable JSON type name for diagnostics.
#[must_use]
pub fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
