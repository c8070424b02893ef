//! Error types for xerror's own fallible operations
//!
//! Conversion and classification never fail. Only the helpers that move
//! typed values in and out of error data can, and they report through the
//! [`Error`] enum here.

use serde_json::Value;
use thiserror::Error;

/// Result type alias for fallible xerror operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by xerror helpers.
#[derive(Debug, Error)]
pub enum Error {
    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Error data must be a JSON object.
    #[error("Error data must be a JSON object, got {0}")]
    DataNotObject(&'static str),
}

/// Name of a JSON value's type, for error messages.
pub(crate) fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
