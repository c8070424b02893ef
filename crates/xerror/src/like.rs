//! The error-like accessor trait.
//!
//! Conversion and classification work on anything implementing
//! [`ErrorLike`]. Only the name and message are expected of every
//! implementation; every other accessor has a conservative default so that
//! minimal errors convert without special handling.

use std::any::TypeId;
use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::entity::XError;
use crate::kind::{ERROR, ErrorKind};
use xerror_protocol::ErrorData;

/// An error value that can be inspected by the conversion functions.
///
/// [`XError`] and [`PlainError`](crate::PlainError) implement this trait.
/// Other error types can implement it directly; the defaults describe an
/// error of kind [`ERROR`] whose message is its `Display` output.
///
/// # Example
///
/// ```
/// use std::fmt;
/// use xerror::{ErrorLike, is_transient, to_dto};
///
/// #[derive(Debug)]
/// struct Busy;
///
/// impl fmt::Display for Busy {
///     fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
///         f.write_str("resource busy")
///     }
/// }
///
/// impl std::error::Error for Busy {}
///
/// impl ErrorLike for Busy {
///     fn name(&self) -> std::borrow::Cow<'_, str> {
///         "BusyError".into()
///     }
/// }
///
/// let dto = to_dto(Some(&Busy));
/// assert_eq!(dto.name, "BusyError");
/// assert_eq!(dto.message, "resource busy");
/// assert!(is_transient(Some(&Busy)));
/// ```
pub trait ErrorLike: std::error::Error + Send + Sync + 'static {
    /// Nominal kind used for type checks.
    fn kind(&self) -> &'static ErrorKind {
        &ERROR
    }

    /// Error name.
    fn name(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.kind().name())
    }

    /// Human-readable message.
    fn message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    /// Stack trace lines; empty when none was captured.
    fn stack(&self) -> Vec<String> {
        Vec::new()
    }

    /// Free-form properties carried by an unstructured error.
    fn properties(&self) -> Option<&ErrorData> {
        None
    }

    /// The error that caused this one.
    ///
    /// Named apart from the deprecated [`std::error::Error::cause`] so calls
    /// on `dyn ErrorLike` resolve without qualification.
    fn error_cause(&self) -> Option<&dyn ErrorLike> {
        None
    }

    /// Occurrence id.
    fn id(&self) -> Option<&str> {
        None
    }

    /// Occurrence time.
    fn time(&self) -> Option<DateTime<Utc>> {
        None
    }

    /// Declared transient flag.
    ///
    /// Defaults to a boolean `transient` property, if there is one.
    fn transient(&self) -> Option<bool> {
        self.properties()
            .and_then(|properties| properties.get("transient"))
            .and_then(Value::as_bool)
    }

    /// Declared error code.
    ///
    /// Defaults to a string `code` property, if there is one.
    fn code(&self) -> Option<&str> {
        self.properties()
            .and_then(|properties| properties.get("code"))
            .and_then(Value::as_str)
    }

    /// Downcast to the structured error type.
    fn as_xerror(&self) -> Option<&XError> {
        None
    }

    /// Concrete type of the error.
    ///
    /// Together with the value's address this identifies an error within a
    /// cause chain. Implementations should keep the default.
    fn error_type_id(&self) -> TypeId {
        TypeId::of::<Self>()
    }
}
