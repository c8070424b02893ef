//! Stack capture for errors.
//!
//! Capture goes through [`Backtrace::capture`], so frames are only recorded
//! when `RUST_BACKTRACE` or `RUST_LIB_BACKTRACE` enables them. Without
//! frames the rendered stack is just the `name: message` header line.

use std::backtrace::{Backtrace, BacktraceStatus};
use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;

static FRAME_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*\d+:\s+(?P<symbol>\S.*)$").expect("Invalid regex pattern")
});

/// Symbol prefixes of frames that belong to capture itself. Only a leading
/// run of these is dropped.
const INTERNAL_FRAMES: &[&str] = &[
    "std::backtrace",
    "xerror::stack::",
    "xerror::entity::",
    "xerror::plain::",
    "<xerror::",
];

/// A backtrace shared between clones of the error that captured it.
#[derive(Clone)]
pub(crate) struct Stack(Arc<Backtrace>);

impl Stack {
    pub(crate) fn capture() -> Self {
        Self(Arc::new(Backtrace::capture()))
    }

    pub(crate) fn backtrace(&self) -> &Backtrace {
        &self.0
    }

    /// Render as lines: the header first, then one line per frame or
    /// source location.
    pub(crate) fn lines(&self, name: &str, message: &str) -> Vec<String> {
        let mut lines = vec![header(name, message)];
        if self.0.status() != BacktraceStatus::Captured {
            return lines;
        }

        let rendered = self.0.to_string();
        let mut leading = true;
        for line in rendered.lines() {
            if leading && let Some(captures) = FRAME_HEADER.captures(line) {
                leading = is_internal(&captures["symbol"]);
            }
            if !leading {
                lines.push(line.trim().to_string());
            }
        }
        lines
    }
}

impl fmt::Debug for Stack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Stack").field(&self.0.status()).finish()
    }
}

pub(crate) fn header(name: &str, message: &str) -> String {
    if message.is_empty() {
        name.to_string()
    } else {
        format!("{name}: {message}")
    }
}

fn is_internal(symbol: &str) -> bool {
    INTERNAL_FRAMES.iter().any(|prefix| symbol.starts_with(prefix))
}
