//! Conversion and classification of error-like values.
//!
//! Every function here accepts an `Option<&E>` so that "no error" is a
//! value it handles, and none of them fail or mutate their input. They
//! work the same for [`XError`](crate::XError), [`PlainError`](crate::PlainError)
//! and any other [`ErrorLike`] implementation.

use std::any::TypeId;
use std::borrow::Cow;

use chrono::Utc;
use tracing::debug;

use crate::config::DtoConfig;
use crate::kind::ErrorKind;
use crate::like::ErrorLike;
use xerror_protocol::{ErrorData, ErrorDto};

/// Name of the record emitted in place of a cause that loops back into
/// its own chain.
pub const CIRCULAR_CAUSE: &str = "CircularCause";

/// Property keys that are never reported as data.
const RESERVED_KEYS: [&str; 3] = ["name", "message", "stack"];

/// Get the structured data of an error.
///
/// - `None` gives `None`.
/// - An [`XError`](crate::XError) gives its own data, borrowed.
/// - Anything else gives a fresh map of its properties without `name`,
///   `message` and `stack`, or `None` when no property remains.
///
/// ```
/// use xerror::{PlainError, XError, extract_data};
///
/// assert!(extract_data::<XError>(None).is_none());
///
/// let err = PlainError::named("foo", "").with_property("foo", "bar");
/// assert_eq!(extract_data(Some(&err)).unwrap()["foo"], "bar");
/// ```
pub fn extract_data<'a, E: ErrorLike + ?Sized>(error: Option<&'a E>) -> Option<Cow<'a, ErrorData>> {
    let error = error?;
    if let Some(xerror) = error.as_xerror() {
        return xerror.data().map(Cow::Borrowed);
    }

    let data: ErrorData = error
        .properties()?
        .iter()
        .filter(|(key, _)| !RESERVED_KEYS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    (!data.is_empty()).then_some(Cow::Owned(data))
}

/// Convert an error and its cause chain into a serializable record.
///
/// Absent values fall back as follows: name and message to empty strings,
/// stack to no lines, id to an empty string, time to now, transient to
/// `true`. `None` itself converts to such an empty record.
///
/// A cause that points back into the chain being converted is replaced by
/// a record named [`CIRCULAR_CAUSE`] instead of being followed.
///
/// ```
/// use xerror::{PlainError, to_dto};
///
/// let err = PlainError::new("outer").with_cause(PlainError::new("inner"));
/// let dto = to_dto(Some(&err));
///
/// assert_eq!(dto.name, "Error");
/// assert_eq!(dto.message, "outer");
/// assert_eq!(dto.id, "");
/// assert!(dto.transient);
/// assert_eq!(dto.cause.unwrap().message, "inner");
/// ```
pub fn to_dto<E: ErrorLike + ?Sized>(error: Option<&E>) -> ErrorDto {
    to_dto_with(error, &DtoConfig::default())
}

/// [`to_dto`] with explicit conversion options.
pub fn to_dto_with<E: ErrorLike + ?Sized>(error: Option<&E>, config: &DtoConfig) -> ErrorDto {
    match error {
        Some(error) => {
            let mut trail = Vec::new();
            convert(error, config, &mut trail)
        }
        None => ErrorDto::new("", ""),
    }
}

/// Check whether an error is of `kind` or a refinement of it.
///
/// `None` is never of any kind.
///
/// ```
/// use xerror::{ERROR, XERROR, PlainError, XError, is_of_type};
///
/// let plain = PlainError::new("x");
/// assert!(is_of_type(Some(&plain), &ERROR));
/// assert!(!is_of_type(Some(&plain), &XERROR));
/// assert!(!is_of_type::<XError>(None, &ERROR));
/// ```
pub fn is_of_type<E: ErrorLike + ?Sized>(error: Option<&E>, kind: &ErrorKind) -> bool {
    error.is_some_and(|error| error.kind().is_a(kind))
}

/// Check whether retrying the operation behind an error might succeed.
///
/// `None` is not transient. Otherwise the error's declared flag is used,
/// and errors that declare nothing are transient.
///
/// ```
/// use xerror::{PlainError, XError, is_transient};
///
/// assert!(!is_transient::<XError>(None));
/// assert!(is_transient(Some(&PlainError::new("x"))));
/// ```
pub fn is_transient<E: ErrorLike + ?Sized>(error: Option<&E>) -> bool {
    error.is_some_and(|error| error.transient().unwrap_or(true))
}

fn convert<E: ErrorLike + ?Sized>(
    error: &E,
    config: &DtoConfig,
    trail: &mut Vec<Identity>,
) -> ErrorDto {
    trail.push(identity(error));

    let cause = match error.error_cause() {
        None => None,
        Some(cause) if trail.contains(&identity(cause)) => {
            debug!(name = %cause.name(), depth = trail.len(), "Circular cause chain truncated");
            Some(circular(cause))
        }
        Some(_) if config.max_cause_depth.is_some_and(|max| trail.len() > max) => {
            debug!(depth = trail.len(), "Cause chain truncated at configured depth");
            None
        }
        Some(cause) => Some(convert(cause, config, trail)),
    };

    ErrorDto {
        id: error.id().unwrap_or_default().to_string(),
        time: error.time().unwrap_or_else(Utc::now),
        cause: cause.map(Box::new),
        code: error.code().map(str::to_string),
        name: error.name().into_owned(),
        message: error.message().into_owned(),
        stack: if config.include_stack {
            error.stack()
        } else {
            Vec::new()
        },
        data: extract_data(Some(error)).map(Cow::into_owned),
        transient: error.transient().unwrap_or(true),
    }
}

fn circular(error: &dyn ErrorLike) -> ErrorDto {
    let mut dto = ErrorDto::new(
        CIRCULAR_CAUSE,
        format!("cause chain loops back to {}", error.name()),
    )
    .with_id(error.id().unwrap_or_default())
    .with_transient(error.transient().unwrap_or(true));
    if let Some(time) = error.time() {
        dto.time = time;
    }
    dto
}

/// Address plus concrete type. A wrapper and the field it holds at offset
/// zero share an address, as do zero-sized errors, but never a type.
type Identity = (*const (), TypeId);

fn identity<E: ErrorLike + ?Sized>(error: &E) -> Identity {
    (std::ptr::from_ref(error).cast::<()>(), error.error_type_id())
}
