//! The structured error type.
//!
//! An [`XError`] is created once at the failure site through
//! [`XErrorBuilder`], which resolves every field exactly once: explicit
//! option first, then the defaults declared on the error's
//! [`ErrorKind`], then the built-in fallback. After that, fields change only
//! through the explicit `set_*` methods.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Serialize, Serializer};
use serde_json::Value;
use tracing::trace;
use uuid::Uuid;

use crate::convert;
use crate::error::{Error, Result, json_type};
use crate::kind::{ErrorKind, XERROR};
use crate::like::ErrorLike;
use crate::stack::Stack;
use xerror_protocol::{ErrorData, ErrorDto};

/// Structured error with identity, context data, cause and transience.
///
/// Serializing an `XError` with serde produces exactly its [`ErrorDto`], so
/// it can be embedded in any JSON body without special handling.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use xerror::{error_data, error_kind, XError};
///
/// error_kind! {
///     pub static NOT_FOUND: "NotFoundError" {
///         message: "resource not found",
///         transient: false,
///     }
/// }
///
/// let err = XError::builder(&NOT_FOUND)
///     .data(error_data(json!({"user_id": 42})))
///     .build();
///
/// assert_eq!(err.to_string(), "NotFoundError: resource not found");
/// assert!(!err.transient());
///
/// let body = serde_json::to_value(&err)?;
/// assert_eq!(body["data"]["user_id"], 42);
/// assert_eq!(body["id"], err.id());
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Clone)]
pub struct XError {
    kind: &'static ErrorKind,
    name: String,
    message: String,
    data: Option<ErrorData>,
    cause: Option<Arc<dyn ErrorLike>>,
    code: Option<String>,
    id: String,
    time: DateTime<Utc>,
    transient: bool,
    stack: Stack,
}

/// Construction options for [`XError`].
///
/// Unset options fall back to the kind's defaults when [`build`](Self::build)
/// runs.
#[derive(Debug, Clone)]
pub struct XErrorBuilder {
    kind: &'static ErrorKind,
    name: Option<String>,
    message: Option<String>,
    data: Option<ErrorData>,
    cause: Option<Arc<dyn ErrorLike>>,
    code: Option<String>,
    id: Option<String>,
    time: Option<DateTime<Utc>>,
    transient: Option<bool>,
}

impl XErrorBuilder {
    /// Start building an error of the given kind.
    pub fn new(kind: &'static ErrorKind) -> Self {
        Self {
            kind,
            name: None,
            message: None,
            data: None,
            cause: None,
            code: None,
            id: None,
            time: None,
            transient: None,
        }
    }

    /// Override the name (defaults to the kind's name).
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the message (defaults to the kind's message, else empty).
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Attach context data.
    pub fn data(mut self, data: ErrorData) -> Self {
        self.data = Some(data);
        self
    }

    /// Attach a cause, taking ownership of it.
    pub fn cause<E: ErrorLike>(self, cause: E) -> Self {
        self.shared_cause(Arc::new(cause))
    }

    /// Attach a cause that is shared with other errors.
    pub fn shared_cause(mut self, cause: Arc<dyn ErrorLike>) -> Self {
        self.cause = Some(cause);
        self
    }

    /// Set the error code.
    pub fn code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Use this id instead of generating one.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Use this time instead of the construction instant.
    pub fn time(mut self, time: DateTime<Utc>) -> Self {
        self.time = Some(time);
        self
    }

    /// Set the transient flag (defaults to the kind's flag, else `true`).
    pub fn transient(mut self, transient: bool) -> Self {
        self.transient = Some(transient);
        self
    }

    /// Resolve all fields and capture the stack.
    pub fn build(self) -> XError {
        let kind = self.kind;
        let error = XError {
            kind,
            name: self.name.unwrap_or_else(|| kind.name().to_string()),
            message: self
                .message
                .or_else(|| kind.default_message().map(str::to_string))
                .unwrap_or_default(),
            data: self.data,
            cause: self.cause,
            code: self.code,
            id: self.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            time: self.time.unwrap_or_else(Utc::now),
            transient: self
                .transient
                .or_else(|| kind.default_transient())
                .unwrap_or(true),
            stack: Stack::capture(),
        };

        trace!(
            kind = %kind,
            name = %error.name,
            id = %error.id,
            transient = error.transient,
            has_cause = error.cause.is_some(),
            "Built error"
        );

        error
    }
}

impl XError {
    /// Start building an error of the given kind.
    pub fn builder(kind: &'static ErrorKind) -> XErrorBuilder {
        XErrorBuilder::new(kind)
    }

    /// Create an error of the given kind with all defaults.
    pub fn new(kind: &'static ErrorKind) -> Self {
        XErrorBuilder::new(kind).build()
    }

    /// Create an error of the given kind with a message.
    pub fn with_message(kind: &'static ErrorKind, message: impl Into<String>) -> Self {
        XErrorBuilder::new(kind).message(message).build()
    }

    /// Nominal kind.
    pub fn kind(&self) -> &'static ErrorKind {
        self.kind
    }

    /// Error name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Error message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Context data.
    pub fn data(&self) -> Option<&ErrorData> {
        self.data.as_ref()
    }

    /// Deserialize the context data into a typed value.
    ///
    /// Returns `Ok(None)` when no data is attached.
    pub fn data_as<T: DeserializeOwned>(&self) -> Result<Option<T>> {
        let Some(data) = &self.data else {
            return Ok(None);
        };
        Ok(Some(serde_json::from_value(Value::Object(data.clone()))?))
    }

    /// The error that caused this one.
    pub fn cause(&self) -> Option<&dyn ErrorLike> {
        self.cause.as_deref()
    }

    /// The cause as a shared handle, for attaching it to other errors.
    pub fn shared_cause(&self) -> Option<&Arc<dyn ErrorLike>> {
        self.cause.as_ref()
    }

    /// Error code.
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    /// Occurrence id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Occurrence time.
    pub fn time(&self) -> DateTime<Utc> {
        self.time
    }

    /// Whether retrying might succeed.
    pub fn transient(&self) -> bool {
        self.transient
    }

    /// Stack lines, `name: message` first.
    pub fn stack(&self) -> Vec<String> {
        self.stack.lines(&self.name, &self.message)
    }

    /// The backtrace captured at construction.
    pub fn backtrace(&self) -> &std::backtrace::Backtrace {
        self.stack.backtrace()
    }

    /// Set the message.
    pub fn set_message(&mut self, message: impl Into<String>) -> &mut Self {
        self.message = message.into();
        self
    }

    /// Replace the id.
    pub fn set_id(&mut self, id: impl Into<String>) -> &mut Self {
        self.id = id.into();
        self
    }

    /// Set the error code.
    pub fn set_code(&mut self, code: impl Into<String>) -> &mut Self {
        self.code = Some(code.into());
        self
    }

    /// Replace the time.
    pub fn set_time(&mut self, time: DateTime<Utc>) -> &mut Self {
        self.time = time;
        self
    }

    /// Set the cause, taking ownership of it.
    pub fn set_cause<E: ErrorLike>(&mut self, cause: E) -> &mut Self {
        self.set_shared_cause(Arc::new(cause))
    }

    /// Set a cause that is shared with other errors.
    pub fn set_shared_cause(&mut self, cause: Arc<dyn ErrorLike>) -> &mut Self {
        self.cause = Some(cause);
        self
    }

    /// Replace the context data.
    pub fn set_data(&mut self, data: ErrorData) -> &mut Self {
        self.data = Some(data);
        self
    }

    /// Replace the context data with a serialized value.
    ///
    /// # Errors
    ///
    /// Fails if `value` does not serialize to a JSON object; the existing
    /// data is left untouched in that case.
    pub fn set_data_from<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<&mut Self> {
        match serde_json::to_value(value)? {
            Value::Object(data) => Ok(self.set_data(data)),
            other => Err(Error::DataNotObject(json_type(&other))),
        }
    }

    /// Set the transient flag.
    pub fn set_transient(&mut self, transient: bool) -> &mut Self {
        self.transient = transient;
        self
    }

    /// Whether this error is of `kind` or a refinement of it.
    pub fn is_type(&self, kind: &ErrorKind) -> bool {
        convert::is_of_type(Some(self), kind)
    }

    /// Convert to the serializable record.
    pub fn to_dto(&self) -> ErrorDto {
        convert::to_dto(Some(self))
    }
}

impl Default for XError {
    fn default() -> Self {
        Self::new(&XERROR)
    }
}

impl fmt::Debug for XError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("XError")
            .field("kind", &self.kind.name())
            .field("name", &self.name)
            .field("message", &self.message)
            .field("data", &self.data)
            .field("cause", &self.cause)
            .field("code", &self.code)
            .field("id", &self.id)
            .field("time", &self.time)
            .field("transient", &self.transient)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for XError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::stack::header(&self.name, &self.message))
    }
}

impl std::error::Error for XError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause
            .as_deref()
            .map(|cause| cause as &(dyn std::error::Error + 'static))
    }
}

impl ErrorLike for XError {
    fn kind(&self) -> &'static ErrorKind {
        self.kind
    }

    fn name(&self) -> std::borrow::Cow<'_, str> {
        self.name.as_str().into()
    }

    fn message(&self) -> std::borrow::Cow<'_, str> {
        self.message.as_str().into()
    }

    fn stack(&self) -> Vec<String> {
        XError::stack(self)
    }

    fn error_cause(&self) -> Option<&dyn ErrorLike> {
        self.cause.as_deref()
    }

    fn id(&self) -> Option<&str> {
        Some(&self.id)
    }

    fn time(&self) -> Option<DateTime<Utc>> {
        Some(self.time)
    }

    fn transient(&self) -> Option<bool> {
        Some(self.transient)
    }

    fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    fn as_xerror(&self) -> Option<&XError> {
        Some(self)
    }
}

impl Serialize for XError {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_dto().serialize(serializer)
    }
}
