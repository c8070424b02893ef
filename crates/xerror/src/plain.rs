//! Unstructured errors.
//!
//! A [`PlainError`] is a name, a message and a bag of free-form properties,
//! with an optional cause. It is what [`errorf`](crate::errorf) returns and
//! what foreign errors become when snapshotted with
//! [`PlainError::from_std`] or [`PlainError::from_anyhow`].

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::convert;
use crate::entity::XError;
use crate::like::ErrorLike;
use crate::stack::{self, Stack};
use xerror_protocol::{ErrorData, ErrorDto};

/// Source chains longer than this are cut when snapshotting foreign errors.
const MAX_SOURCE_DEPTH: usize = 64;

/// Unstructured error: name, message and free-form properties.
///
/// Properties are reported as the error's data by
/// [`extract_data`](crate::extract_data). A boolean `transient` property and
/// a string `code` property are honoured by classification and conversion.
///
/// # Example
///
/// ```
/// use xerror::{PlainError, extract_data, is_transient};
///
/// let err = PlainError::named("ConnectError", "refused")
///     .with_property("port", 5432)
///     .with_property("transient", false);
///
/// assert_eq!(err.to_string(), "ConnectError: refused");
/// assert!(!is_transient(Some(&err)));
/// assert_eq!(extract_data(Some(&err)).unwrap()["port"], 5432);
/// ```
#[derive(Debug, Clone)]
pub struct PlainError {
    name: String,
    message: String,
    properties: ErrorData,
    cause: Option<Arc<dyn ErrorLike>>,
    stack: Stack,
}

impl PlainError {
    /// Create an error named `"Error"`.
    pub fn new(message: impl Into<String>) -> Self {
        Self::named("Error", message)
    }

    /// Create an error with a custom name.
    pub fn named(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            properties: ErrorData::new(),
            cause: None,
            stack: Stack::capture(),
        }
    }

    /// Snapshot any standard error, following its `source` chain.
    ///
    /// The name is the error's type name without its module path. Sources
    /// are reached through trait objects, so they are named `"Error"` unless
    /// they are themselves [`XError`] or [`PlainError`] values, which are
    /// kept as they are.
    pub fn from_std<E: std::error::Error + ?Sized>(error: &E) -> Self {
        let mut plain = Self::named(short_type_name::<E>(), error.to_string());
        plain.cause = error.source().and_then(|source| snapshot(source, 1));
        plain
    }

    /// Snapshot a standard error trait object.
    ///
    /// A [`PlainError`] is cloned. An [`XError`] keeps its name, message,
    /// data and cause, with its `transient` flag and `code` carried as
    /// properties so classification does not change.
    pub fn from_dyn(error: &(dyn std::error::Error + 'static)) -> Self {
        if let Some(plain) = error.downcast_ref::<PlainError>() {
            return plain.clone();
        }
        if let Some(xerror) = error.downcast_ref::<XError>() {
            return Self::from_xerror(xerror);
        }
        let mut plain = Self::new(error.to_string());
        plain.cause = error.source().and_then(|source| snapshot(source, 1));
        plain
    }

    fn from_xerror(error: &XError) -> Self {
        let mut plain = Self::named(error.name(), error.message());
        if let Some(data) = error.data() {
            plain.properties.extend(data.clone());
        }
        plain
            .properties
            .insert("transient".to_string(), Value::Bool(error.transient()));
        if let Some(code) = error.code() {
            plain
                .properties
                .insert("code".to_string(), Value::String(code.to_string()));
        }
        plain.cause = error.shared_cause().cloned();
        plain
    }

    /// Snapshot an [`anyhow::Error`], turning each context layer into a cause.
    pub fn from_anyhow(error: &anyhow::Error) -> Self {
        let root: &(dyn std::error::Error + 'static) = error.as_ref();
        Self::from_dyn(root)
    }

    /// Replace the name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Add or replace a property.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Add or replace several properties, keeping their order.
    pub fn with_properties(mut self, properties: ErrorData) -> Self {
        self.properties.extend(properties);
        self
    }

    /// Attach a cause, taking ownership of it.
    pub fn with_cause<E: ErrorLike>(self, cause: E) -> Self {
        self.with_shared_cause(Arc::new(cause))
    }

    /// Attach a cause that is shared with other errors.
    pub fn with_shared_cause(mut self, cause: Arc<dyn ErrorLike>) -> Self {
        self.cause = Some(cause);
        self
    }

    /// Error name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Error message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// All properties, including any that shadow reserved keys.
    pub fn properties(&self) -> &ErrorData {
        &self.properties
    }

    /// Convert to the serializable record.
    pub fn to_dto(&self) -> ErrorDto {
        convert::to_dto(Some(self))
    }
}

impl fmt::Display for PlainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&stack::header(&self.name, &self.message))
    }
}

impl std::error::Error for PlainError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause
            .as_deref()
            .map(|cause| cause as &(dyn std::error::Error + 'static))
    }
}

impl ErrorLike for PlainError {
    fn name(&self) -> Cow<'_, str> {
        self.name.as_str().into()
    }

    fn message(&self) -> Cow<'_, str> {
        self.message.as_str().into()
    }

    fn stack(&self) -> Vec<String> {
        self.stack.lines(&self.name, &self.message)
    }

    fn properties(&self) -> Option<&ErrorData> {
        Some(&self.properties)
    }

    fn error_cause(&self) -> Option<&dyn ErrorLike> {
        self.cause.as_deref()
    }
}

impl Serialize for PlainError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_dto().serialize(serializer)
    }
}

impl From<anyhow::Error> for PlainError {
    fn from(error: anyhow::Error) -> Self {
        Self::from_anyhow(&error)
    }
}

impl From<std::io::Error> for PlainError {
    fn from(error: std::io::Error) -> Self {
        Self::from_std(&error).with_name("IoError")
    }
}

fn snapshot(error: &(dyn std::error::Error + 'static), depth: usize) -> Option<Arc<dyn ErrorLike>> {
    if depth > MAX_SOURCE_DEPTH {
        tracing::debug!(depth, "Source chain truncated while snapshotting");
        return None;
    }
    if let Some(xerror) = error.downcast_ref::<XError>() {
        return Some(Arc::new(xerror.clone()));
    }
    if let Some(plain) = error.downcast_ref::<PlainError>() {
        return Some(Arc::new(plain.clone()));
    }
    let mut plain = PlainError::new(error.to_string());
    plain.cause = error.source().and_then(|source| snapshot(source, depth + 1));
    Some(Arc::new(plain))
}

fn short_type_name<E: ?Sized>() -> &'static str {
    let full = std::any::type_name::<E>();
    if full.starts_with("dyn ") {
        return "Error";
    }
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
