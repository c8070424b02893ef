//! Configuration for DTO conversion

use tracing::warn;

/// Options for [`to_dto_with`](crate::to_dto_with).
///
/// The default matches [`to_dto`](crate::to_dto): stacks are included and
/// cause chains are followed to the end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DtoConfig {
    /// Include stack lines in each record
    pub include_stack: bool,

    /// Number of cause levels to follow below the top error; `None` is unbounded
    pub max_cause_depth: Option<usize>,
}

impl Default for DtoConfig {
    fn default() -> Self {
        Self {
            include_stack: true,
            max_cause_depth: None,
        }
    }
}

impl DtoConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Include or omit stack lines.
    pub fn with_include_stack(mut self, include_stack: bool) -> Self {
        self.include_stack = include_stack;
        self
    }

    /// Limit how many cause levels are converted.
    pub fn with_max_cause_depth(mut self, max_cause_depth: usize) -> Self {
        self.max_cause_depth = Some(max_cause_depth);
        self
    }

    /// Load configuration from environment variables.
    ///
    /// This will look for:
    /// - `XERROR_INCLUDE_STACK` (`true`/`false`/`1`/`0`)
    /// - `XERROR_MAX_CAUSE_DEPTH` (non-negative integer)
    ///
    /// Unset variables keep their defaults; unparsable values are logged and
    /// ignored.
    pub fn from_env() -> Self {
        use std::env;

        let mut config = Self::default();

        if let Ok(value) = env::var("XERROR_INCLUDE_STACK") {
            match parse_flag(&value) {
                Some(include_stack) => config.include_stack = include_stack,
                None => warn!(value = %value, "Ignoring invalid XERROR_INCLUDE_STACK"),
            }
        }

        if let Ok(value) = env::var("XERROR_MAX_CAUSE_DEPTH") {
            match value.trim().parse::<usize>() {
                Ok(depth) => config.max_cause_depth = Some(depth),
                Err(_) => warn!(value = %value, "Ignoring invalid XERROR_MAX_CAUSE_DEPTH"),
            }
        }

        config
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
