//! Quick error construction and message formatting.
//!
//! Both [`errorf`] and [`message_format`] render data as `k=v` pairs in
//! insertion order, joined by `", "`. String values are written raw,
//! arrays and objects as compact JSON, everything else as its JSON text.

use serde_json::Value;

use crate::plain::PlainError;
use xerror_protocol::ErrorData;

/// The reason and/or data passed to [`errorf`].
#[derive(Debug, Clone, PartialEq)]
pub enum Details {
    /// A reason only.
    Reason(String),
    /// Data only.
    Data(ErrorData),
    /// A reason followed by data.
    ReasonAndData(String, ErrorData),
}

impl Details {
    fn into_parts(self) -> (Option<String>, Option<ErrorData>) {
        match self {
            Details::Reason(reason) => (Some(reason), None),
            Details::Data(data) => (None, Some(data)),
            Details::ReasonAndData(reason, data) => (Some(reason), Some(data)),
        }
    }
}

impl From<&str> for Details {
    fn from(reason: &str) -> Self {
        Details::Reason(reason.to_string())
    }
}

impl From<String> for Details {
    fn from(reason: String) -> Self {
        Details::Reason(reason)
    }
}

impl From<ErrorData> for Details {
    fn from(data: ErrorData) -> Self {
        Details::Data(data)
    }
}

impl<S: Into<String>> From<(S, ErrorData)> for Details {
    fn from((reason, data): (S, ErrorData)) -> Self {
        Details::ReasonAndData(reason.into(), data)
    }
}

/// Create a named [`PlainError`] with a formatted message.
///
/// The message is `"<name>: "` followed by the reason, the data fields, or
/// `"<reason>. <fields>"` when both are given. Without a name the prefix is
/// dropped. The data is also attached as the error's properties.
///
/// ```
/// use serde_json::json;
/// use xerror::{error_data, errorf};
///
/// let data = error_data(json!({"foo": "bar"}));
///
/// assert_eq!(errorf("foo", data.clone()).message(), "foo: foo=bar");
/// assert_eq!(errorf("foo", "invalid").message(), "foo: invalid");
/// assert_eq!(errorf("foo", ("invalid", data)).message(), "foo: invalid. foo=bar");
/// ```
pub fn errorf(name: &str, details: impl Into<Details>) -> PlainError {
    let (reason, data) = details.into().into_parts();

    let mut parts = Vec::with_capacity(2);
    if let Some(reason) = reason.filter(|reason| !reason.is_empty()) {
        parts.push(reason);
    }
    if let Some(data) = data.as_ref().filter(|data| !data.is_empty()) {
        parts.push(format_fields(data));
    }
    let body = parts.join(". ");

    let message = match (name.is_empty(), body.is_empty()) {
        (true, _) => body,
        (false, true) => name.to_string(),
        (false, false) => format!("{name}: {body}"),
    };

    let error = PlainError::named(name, message);
    match data {
        Some(data) => error.with_properties(data),
        None => error,
    }
}

/// Text that can be joined into a message by [`message_format`].
///
/// Implemented for a single string and for sequences of strings.
pub trait MessageParts {
    /// Join the parts with single spaces.
    fn join_parts(&self) -> String;
}

impl MessageParts for str {
    fn join_parts(&self) -> String {
        self.to_string()
    }
}

impl MessageParts for String {
    fn join_parts(&self) -> String {
        self.clone()
    }
}

impl<S: AsRef<str>> MessageParts for [S] {
    fn join_parts(&self) -> String {
        self.iter().map(AsRef::as_ref).collect::<Vec<&str>>().join(" ")
    }
}

impl<S: AsRef<str>, const N: usize> MessageParts for [S; N] {
    fn join_parts(&self) -> String {
        self.as_slice().join_parts()
    }
}

impl<S: AsRef<str>> MessageParts for Vec<S> {
    fn join_parts(&self) -> String {
        self.as_slice().join_parts()
    }
}

/// Join message parts and append data fields.
///
/// ```
/// use serde_json::json;
/// use xerror::{error_data, message_format};
///
/// let data = error_data(json!({"x": 1}));
/// assert_eq!(message_format(&["a", "b"], Some(&data)), "a b. x=1");
/// assert_eq!(message_format("single", None), "single");
/// ```
///
/// Empty data adds nothing.
pub fn message_format<P: MessageParts + ?Sized>(parts: &P, data: Option<&ErrorData>) -> String {
    let text = parts.join_parts();
    match data.filter(|data| !data.is_empty()) {
        Some(data) => format!("{text}. {}", format_fields(data)),
        None => text,
    }
}

fn format_fields(data: &ErrorData) -> String {
    data.iter()
        .map(|(key, value)| format!("{key}={}", render_value(value)))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Render a value the way it appears in `k=v` fields.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
