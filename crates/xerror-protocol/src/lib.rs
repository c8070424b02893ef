//! Serializable error record shared by xerror producers and consumers
//!
//! This crate holds the wire-level shape of an error: the [`ErrorDto`]
//! record that loggers, HTTP responders and message queues receive, and the
//! [`ErrorData`] mapping used for structured context. It has no knowledge of
//! how errors are built or classified; that lives in the `xerror` crate.
//!
//! # Design Principles
//!
//! - **Zero I/O**: All types are pure data structures
//! - **Acyclic**: A DTO owns its cause by value, so it can always be serialized
//! - **No circular dependencies**: xerror-protocol depends only on serde/chrono
//!
//! # Usage
//!
//! ```
//! use xerror_protocol::ErrorDto;
//!
//! let dto = ErrorDto::new("TimeoutError", "upstream did not answer");
//! let text = dto.to_json_string()?;
//! let parsed = ErrorDto::from_json_str(&text)?;
//!
//! assert_eq!(parsed.name, "TimeoutError");
//! assert!(parsed.transient);
//! # Ok::<(), serde_json::Error>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod dto;

pub use dto::{ErrorData, ErrorDto, error_data};
