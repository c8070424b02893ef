//! Structured errors with identity, context data, cause chains and
//! retryability.
//!
//! This crate provides:
//!
//! - **A structured error type** via [`XError`]: a name, message, optional
//!   context data, optional cause, a unique id, a timestamp and a transient
//!   flag, built once through [`XErrorBuilder`]
//! - **Nominal error kinds** via [`ErrorKind`] and [`error_kind!`], carrying
//!   per-kind default messages and transient flags
//! - **Uniform serialization** via [`to_dto`], which turns any error into an
//!   [`ErrorDto`] and follows the cause chain
//! - **Classification** via [`is_of_type`] and [`is_transient`]
//! - **Quick errors** via [`errorf`] and [`message_format`]
//!
//! Retrying and logging are left to the caller: this crate only produces the
//! transient flag and the serializable record those systems consume.
//!
//! # Examples
//!
//! ```rust
//! use serde_json::json;
//! use xerror::prelude::*;
//!
//! error_kind! {
//!     pub static UPSTREAM: "UpstreamError" {
//!         message: "upstream request failed",
//!     }
//! }
//!
//! let cause = errorf("ConnectError", ("refused", error_data(json!({"port": 443}))));
//! let err = XError::builder(&UPSTREAM)
//!     .data(error_data(json!({"service": "billing"})))
//!     .cause(cause)
//!     .build();
//!
//! assert!(err.is_type(&UPSTREAM));
//! assert!(is_transient(Some(&err)));
//!
//! let dto = to_dto(Some(&err));
//! assert_eq!(dto.name, "UpstreamError");
//! assert_eq!(dto.cause.as_ref().unwrap().message, "ConnectError: refused. port=443");
//!
//! let body = serde_json::to_string(&err)?;
//! assert!(body.contains("\"service\":\"billing\""));
//! # Ok::<(), serde_json::Error>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod convert;
pub mod entity;
pub mod error;
pub mod format;
pub mod kind;
pub mod like;
pub mod plain;
mod property_tests;
mod stack;

pub use config::DtoConfig;
pub use convert::{CIRCULAR_CAUSE, extract_data, is_of_type, is_transient, to_dto, to_dto_with};
pub use entity::{XError, XErrorBuilder};
pub use error::{Error, Result};
pub use format::{Details, MessageParts, errorf, message_format, render_value};
pub use kind::{ERROR, ErrorKind, XERROR};
pub use like::ErrorLike;
pub use plain::PlainError;
pub use xerror_protocol::{ErrorData, ErrorDto, error_data};

/// Convenient re-exports of commonly used items.
///
/// Import everything needed to build, classify and convert errors with:
///
/// ```rust
/// use xerror::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error_kind;
    pub use crate::{
        DtoConfig, ERROR, ErrorData, ErrorDto, ErrorKind, ErrorLike, PlainError, XERROR, XError,
        error_data, errorf, extract_data, is_of_type, is_transient, message_format, to_dto,
        to_dto_with,
    };
}
