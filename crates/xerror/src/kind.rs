//! Error kind descriptors.
//!
//! Every error carries a `&'static ErrorKind` naming its variant. Kinds form
//! a tree through their `parent` link, and a kind may declare the default
//! message and transient flag that errors of that kind start with. Defaults
//! are inherited: a kind without its own message uses its parent's.
//!
//! Identity is the address of the `static` holding the kind, so two kinds
//! that happen to share a display name are still different kinds. Always
//! declare kinds as `static` items (or with [`error_kind!`](crate::error_kind)),
//! never as `const`, since a `const` is copied into every use site.
//!
//! # Example
//!
//! ```
//! use xerror::{error_kind, ErrorKind, XERROR};
//!
//! error_kind! {
//!     /// Upstream service did not answer in time.
//!     pub static TIMEOUT: "TimeoutError" {
//!         message: "operation timed out",
//!     }
//! }
//!
//! static VALIDATION: ErrorKind = ErrorKind::new("ValidationError")
//!     .with_message("invalid input")
//!     .with_transient(false)
//!     .extends(&XERROR);
//!
//! assert!(TIMEOUT.is_a(&XERROR));
//! assert!(!TIMEOUT.is_a(&VALIDATION));
//! assert_eq!(VALIDATION.default_transient(), Some(false));
//! ```

use std::fmt;
use std::ptr;

/// Descriptor for one error variant.
#[derive(Debug)]
pub struct ErrorKind {
    name: &'static str,
    message: Option<&'static str>,
    transient: Option<bool>,
    parent: Option<&'static ErrorKind>,
}

/// Root of every kind hierarchy. Plain errors have this kind.
pub static ERROR: ErrorKind = ErrorKind::new("Error");

/// Base kind for structured errors.
pub static XERROR: ErrorKind = ErrorKind::new("XError").extends(&ERROR);

impl ErrorKind {
    /// Create a root kind with no defaults.
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            message: None,
            transient: None,
            parent: None,
        }
    }

    /// Declare the default message for errors of this kind.
    pub const fn with_message(self, message: &'static str) -> Self {
        Self {
            message: Some(message),
            ..self
        }
    }

    /// Declare the default transient flag for errors of this kind.
    pub const fn with_transient(self, transient: bool) -> Self {
        Self {
            transient: Some(transient),
            ..self
        }
    }

    /// Make this kind a refinement of `parent`.
    pub const fn extends(self, parent: &'static ErrorKind) -> Self {
        Self {
            parent: Some(parent),
            ..self
        }
    }

    /// Display name; used as the default error name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Direct parent kind.
    pub fn parent(&self) -> Option<&'static ErrorKind> {
        self.parent
    }

    /// This kind followed by each of its ancestors up to the root.
    pub fn ancestors(&self) -> impl Iterator<Item = &ErrorKind> {
        std::iter::successors(Some(self), |kind| kind.parent)
    }

    /// Default message declared on this kind or the nearest ancestor.
    pub fn default_message(&self) -> Option<&'static str> {
        self.ancestors().find_map(|kind| kind.message)
    }

    /// Default transient flag declared on this kind or the nearest ancestor.
    pub fn default_transient(&self) -> Option<bool> {
        self.ancestors().find_map(|kind| kind.transient)
    }

    /// Whether this kind is `other` or a refinement of it.
    pub fn is_a(&self, other: &ErrorKind) -> bool {
        self.ancestors().any(|kind| ptr::eq(kind, other))
    }
}

impl PartialEq for ErrorKind {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self, other)
    }
}

impl Eq for ErrorKind {}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Declare a `static` [`ErrorKind`].
///
/// Kinds extend [`XERROR`] unless an `extends` clause names another kind.
/// The optional body sets `message` and `transient` defaults.
///
/// # Syntax
///
/// ```ignore
/// error_kind!(pub static NAME: "DisplayName";);
/// error_kind!(pub static NAME: "DisplayName" extends PARENT;);
/// error_kind! {
///     pub static NAME: "DisplayName" extends PARENT {
///         message: "default message",
///         transient: false,
///     }
/// }
/// ```
///
/// # Example
///
/// ```
/// use xerror::{error_kind, XError};
///
/// error_kind! {
///     pub static STORAGE: "StorageError" {
///         transient: true,
///     }
/// }
///
/// error_kind! {
///     pub static CORRUPTION: "CorruptionError" extends STORAGE {
///         message: "stored data is corrupt",
///         transient: false,
///     }
/// }
///
/// let err = XError::new(&CORRUPTION);
/// assert_eq!(err.name(), "CorruptionError");
/// assert_eq!(err.message(), "stored data is corrupt");
/// assert!(err.is_type(&STORAGE));
/// assert!(!err.transient());
/// ```
#[macro_export]
macro_rules! error_kind {
    (@base $name:literal) => {
        $crate::ErrorKind::new($name).extends(&$crate::XERROR)
    };
    (@base $name:literal, $parent:path) => {
        $crate::ErrorKind::new($name).extends(&$parent)
    };
    (@fields $kind:expr;) => {
        $kind
    };
    (@fields $kind:expr; message: $value:expr $(, $($rest:tt)*)?) => {
        $crate::error_kind!(@fields $kind.with_message($value); $($($rest)*)?)
    };
    (@fields $kind:expr; transient: $value:expr $(, $($rest:tt)*)?) => {
        $crate::error_kind!(@fields $kind.with_transient($value); $($($rest)*)?)
    };
    (
        $(#[$meta:meta])*
        $vis:vis static $ident:ident : $name:literal $(extends $parent:path)? { $($body:tt)* }
    ) => {
        $(#[$meta])*
        $vis static $ident: $crate::ErrorKind =
            $crate::error_kind!(@fields $crate::error_kind!(@base $name $(, $parent)?); $($body)*);
    };
    (
        $(#[$meta:meta])*
        $vis:vis static $ident:ident : $name:literal $(extends $parent:path)? ;
    ) => {
        $(#[$meta])*
        $vis static $ident: $crate::ErrorKind = $crate::error_kind!(@base $name $(, $parent)?);
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    static NETWORK: ErrorKind = ErrorKind::new("NetworkError")
        .with_message("network failure")
        .extends(&XERROR);
    static DNS: ErrorKind = ErrorKind::new("DnsError").extends(&NETWORK);
    static PERMANENT_DNS: ErrorKind = ErrorKind::new("PermanentDnsError")
        .with_transient(false)
        .extends(&DNS);

    // Same display name as NETWORK, unrelated kind.
    static OTHER_NETWORK: ErrorKind = ErrorKind::new("NetworkError").extends(&XERROR);

    crate::error_kind!(static MACRO_PLAIN: "MacroPlain";);
    crate::error_kind! {
        static MACRO_FULL: "MacroFull" extends NETWORK {
            message: "from macro",
            transient: false,
        }
    }

    #[test]
    fn test_identity_is_by_address() {
        assert_eq!(NETWORK, NETWORK);
        assert_ne!(NETWORK, OTHER_NETWORK);
        assert_eq!(NETWORK.name(), OTHER_NETWORK.name());
    }

    #[test]
    fn test_is_a_walks_parents() {
        assert!(PERMANENT_DNS.is_a(&PERMANENT_DNS));
        assert!(PERMANENT_DNS.is_a(&DNS));
        assert!(PERMANENT_DNS.is_a(&NETWORK));
        assert!(PERMANENT_DNS.is_a(&XERROR));
        assert!(PERMANENT_DNS.is_a(&ERROR));
        assert!(!NETWORK.is_a(&DNS));
        assert!(!DNS.is_a(&OTHER_NETWORK));
    }

    #[test]
    fn test_defaults_are_inherited() {
        assert_eq!(DNS.default_message(), Some("network failure"));
        assert_eq!(PERMANENT_DNS.default_message(), Some("network failure"));
        assert_eq!(DNS.default_transient(), None);
        assert_eq!(PERMANENT_DNS.default_transient(), Some(false));
        assert_eq!(XERROR.default_message(), None);
    }

    #[test]
    fn test_ancestors_order() {
        let names: Vec<_> = PERMANENT_DNS.ancestors().map(ErrorKind::name).collect();
        assert_eq!(
            names,
            vec!["PermanentDnsError", "DnsError", "NetworkError", "XError", "Error"]
        );
    }

    #[test]
    fn test_macro_declared_kinds() {
        assert_eq!(MACRO_PLAIN.name(), "MacroPlain");
        assert_eq!(MACRO_PLAIN.parent(), Some(&XERROR));

        assert_eq!(MACRO_FULL.default_message(), Some("from macro"));
        assert_eq!(MACRO_FULL.default_transient(), Some(false));
        assert!(MACRO_FULL.is_a(&NETWORK));
    }

    #[test]
    fn test_display_is_name() {
        assert_eq!(DNS.to_string(), "DnsError");
    }
}
