//! The error data transfer object
//!
//! [`ErrorDto`] is the flat, JSON-safe projection of any error. It is what
//! gets logged or sent over the wire; the live error value is discarded at
//! the boundary where the DTO is produced.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Structured context attached to an error.
///
/// Keys keep their insertion order, which matters when the data is rendered
/// into a message as `k1=v1, k2=v2`.
pub type ErrorData = serde_json::Map<String, Value>;

/// Serializable record describing an error and its cause chain.
///
/// Optional fields are omitted from JSON output when absent. `time` is
/// written as RFC 3339 text and `stack` as one string per line, so log
/// processors can index individual frames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorDto {
    /// Occurrence id; empty when the source error carried none.
    #[serde(default)]
    pub id: String,

    /// When the error occurred, or when it was converted if unknown.
    pub time: DateTime<Utc>,

    /// Record for the error that caused this one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cause: Option<Box<ErrorDto>>,

    /// Machine-readable error code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// Error name.
    #[serde(default)]
    pub name: String,

    /// Human-readable message.
    #[serde(default)]
    pub message: String,

    /// Stack trace, one entry per line.
    #[serde(default)]
    pub stack: Vec<String>,

    /// Structured context data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<ErrorData>,

    /// Whether retrying the failed operation might succeed.
    #[serde(default = "default_transient")]
    pub transient: bool,
}

fn default_transient() -> bool {
    true
}

impl ErrorDto {
    /// Create a record with the given name and message.
    ///
    /// The id is empty, the time is now, and the record is transient.
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            time: Utc::now(),
            cause: None,
            code: None,
            name: name.into(),
            message: message.into(),
            stack: Vec::new(),
            data: None,
            transient: true,
        }
    }

    /// Set the occurrence id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Set the occurrence time.
    pub fn with_time(mut self, time: DateTime<Utc>) -> Self {
        self.time = time;
        self
    }

    /// Attach a cause record.
    pub fn with_cause(mut self, cause: ErrorDto) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    /// Set the error code.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Replace the stack lines.
    pub fn with_stack(mut self, stack: Vec<String>) -> Self {
        self.stack = stack;
        self
    }

    /// Replace the context data.
    pub fn with_data(mut self, data: ErrorData) -> Self {
        self.data = Some(data);
        self
    }

    /// Set the transient flag.
    pub fn with_transient(mut self, transient: bool) -> Self {
        self.transient = transient;
        self
    }

    /// Iterate over this record followed by each record in its cause chain.
    pub fn chain(&self) -> impl Iterator<Item = &ErrorDto> {
        std::iter::successors(Some(self), |dto| dto.cause.as_deref())
    }

    /// The innermost record of the cause chain (possibly `self`).
    pub fn root_cause(&self) -> &ErrorDto {
        self.chain().last().unwrap_or(self)
    }

    /// Number of records in the chain, including this one.
    pub fn depth(&self) -> usize {
        self.chain().count()
    }

    /// Serialize to a JSON value.
    pub fn to_json_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    /// Serialize to a compact JSON string.
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to a pretty-printed JSON string.
    pub fn to_json_string_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse a record from JSON text.
    pub fn from_json_str(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    /// Parse a record from a JSON value.
    pub fn from_json_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }
}

/// Build an [`ErrorData`] map from a JSON value.
///
/// Objects are used as-is; `null` gives an empty map; any other value is
/// stored under the key `"value"`.
///
/// ```
/// use serde_json::json;
/// use xerror_protocol::error_data;
///
/// let data = error_data(json!({"user": "ada", "attempt": 2}));
/// assert_eq!(data.len(), 2);
/// assert_eq!(error_data(json!(7))["value"], 7);
/// ```
pub fn error_data(value: Value) -> ErrorData {
    match value {
        Value::Object(map) => map,
        Value::Null => ErrorData::new(),
        other => {
            let mut map = ErrorData::new();
            map.insert("value".to_string(), other);
            map
        }
    }
}
