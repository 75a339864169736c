//! Request-scoped modifications of a pipeline's middleware list.
//!
//! A modification never touches the pipeline itself. Each request resolves
//! its own list from the base list plus the modifications it was created
//! with (see [`resolve`]).

mod resolver;

pub use resolver::resolve;

use crate::middleware::MiddlewareEntry;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a relative modification places its middleware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    /// Immediately before the target.
    Before,
    /// Immediately after the target.
    After,
    /// In place of the target's handler; the target keeps its name.
    Replace,
}

impl Position {
    /// Returns the lowercase name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Before => "before",
            Self::After => "after",
            Self::Replace => "replace",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single request-scoped change to the middleware list.
#[derive(Debug, Clone)]
pub enum Modification {
    /// Append a middleware after every middleware of the base list.
    Append(MiddlewareEntry),
    /// Place a middleware relative to a named middleware.
    Relative {
        /// The middleware being placed.
        middleware: MiddlewareEntry,
        /// Where to place it.
        position: Position,
        /// Name of the reference middleware.
        target: String,
    },
    /// Drop a named middleware for this request.
    Skip {
        /// Name of the middleware to drop.
        target: String,
    },
}

impl Modification {
    /// Appends a middleware.
    #[must_use]
    pub fn append(middleware: impl Into<MiddlewareEntry>) -> Self {
        Self::Append(middleware.into())
    }

    /// Inserts a middleware before `target`.
    #[must_use]
    pub fn before(middleware: impl Into<MiddlewareEntry>, target: impl Into<String>) -> Self {
        Self::relative(middleware, Position::Before, target)
    }

    /// Inserts a middleware after `target`.
    #[must_use]
    pub fn after(middleware: impl Into<MiddlewareEntry>, target: impl Into<String>) -> Self {
        Self::relative(middleware, Position::After, target)
    }

    /// Replaces the handler of `target`.
    #[must_use]
    pub fn replace(middleware: impl Into<MiddlewareEntry>, target: impl Into<String>) -> Self {
        Self::relative(middleware, Position::Replace, target)
    }

    /// Skips `target` for this request.
    #[must_use]
    pub fn skip(target: impl Into<String>) -> Self {
        Self::Skip {
            target: target.into(),
        }
    }

    /// Builds a relative modification.
    #[must_use]
    pub fn relative(
        middleware: impl Into<MiddlewareEntry>,
        position: Position,
        target: impl Into<String>,
    ) -> Self {
        Self::Relative {
            middleware: middleware.into(),
            position,
            target: target.into(),
        }
    }

    /// Name of the middleware this modification brings in, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Append(middleware) | Self::Relative { middleware, .. } => middleware.name(),
            Self::Skip { .. } => None,
        }
    }

    /// Name of the middleware this modification refers to, if any.
    #[must_use]
    pub fn target(&self) -> Option<&str> {
        match self {
            Self::Append(_) => None,
            Self::Relative { target, .. } | Self::Skip { target } => Some(target),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::{Next, MiddlewareEntry};
    use crate::snapshot::Frozen;

    fn entry(name: &str) -> MiddlewareEntry {
        MiddlewareEntry::named_fn(name, |input: Frozen, next: Next| async move {
            next.call(input.to_value())
        })
    }

    #[test]
    fn test_names_and_targets() {
        let append = Modification::append(entry("a"));
        assert_eq!(append.name(), Some("a"));
        assert_eq!(append.target(), None);

        let before = Modification::before(entry("b"), "a");
        assert_eq!(before.name(), Some("b"));
        assert_eq!(before.target(), Some("a"));

        let skip = Modification::skip("a");
        assert_eq!(skip.name(), None);
        assert_eq!(skip.target(), Some("a"));
    }

    #[test]
    fn test_position_serialization() {
        assert_eq!(serde_json::to_string(&Position::Replace).unwrap(), "\"replace\"");
        assert_eq!(Position::Before.to_string(), "before");
    }
}
