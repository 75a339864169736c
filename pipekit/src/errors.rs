//! Error types for pipekit.
//!
//! Three families of failure exist: resolution errors (a modification names
//! a middleware that is not in the working list), handler failures (a
//! middleware or plugin returned an error) and immutability violations (a
//! write attempt against a frozen value).

use std::collections::HashMap;
use thiserror::Error;

/// The main error type for pipeline operations.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A modification referenced a middleware name that was not found.
    #[error("could not find middleware named: \"{name}\"")]
    MiddlewareNotFound {
        /// The missing middleware name.
        name: String,
    },

    /// A middleware handler failed.
    ///
    /// The originating error is kept as-is; callers can downcast it.
    #[error(transparent)]
    Handler(#[from] anyhow::Error),

    /// A write was attempted against a frozen value.
    #[error("cannot write to frozen value at '{path}'")]
    Immutable {
        /// JSON pointer of the rejected write.
        path: String,
    },

    /// A write attempt named a JSON pointer with no slot in the value.
    #[error("no value at '{path}'")]
    PathNotFound {
        /// The JSON pointer that was not found.
        path: String,
    },

    /// The `next` continuation was called more than once in one invocation.
    #[error("next() called more than once within a single invocation of request {request_id}")]
    NextCalledTwice {
        /// The request the continuation belongs to.
        request_id: String,
    },

    /// A plugin callback failed.
    #[error("plugin '{plugin}' failed: {source}")]
    Plugin {
        /// The plugin name.
        plugin: String,
        /// The underlying failure.
        #[source]
        source: Box<PipelineError>,
    },
}

impl PipelineError {
    /// Creates a middleware not found error.
    #[must_use]
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::MiddlewareNotFound { name: name.into() }
    }

    /// Creates an immutability violation for a JSON pointer.
    #[must_use]
    pub fn immutable(path: impl Into<String>) -> Self {
        let path = path.into();
        Self::Immutable {
            path: if path.is_empty() { "/".to_string() } else { path },
        }
    }

    /// Creates a missing path error for a JSON pointer.
    #[must_use]
    pub fn path_not_found(path: impl Into<String>) -> Self {
        Self::PathNotFound { path: path.into() }
    }

    /// Wraps an error raised inside a plugin callback.
    #[must_use]
    pub fn plugin(plugin: impl Into<String>, source: Self) -> Self {
        Self::Plugin {
            plugin: plugin.into(),
            source: Box::new(source),
        }
    }

    /// Returns true if this error was raised while resolving modifications.
    #[must_use]
    pub const fn is_resolution(&self) -> bool {
        matches!(self, Self::MiddlewareNotFound { .. })
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();

        match self {
            Self::MiddlewareNotFound { name } => {
                map.insert("type".to_string(), serde_json::json!("MiddlewareNotFound"));
                map.insert("name".to_string(), serde_json::json!(name));
            }
            Self::Handler(_) => {
                map.insert("type".to_string(), serde_json::json!("HandlerFailure"));
            }
            Self::Immutable { path } => {
                map.insert("type".to_string(), serde_json::json!("ImmutabilityViolation"));
                map.insert("path".to_string(), serde_json::json!(path));
            }
            Self::PathNotFound { path } => {
                map.insert("type".to_string(), serde_json::json!("PathNotFound"));
                map.insert("path".to_string(), serde_json::json!(path));
            }
            Self::NextCalledTwice { request_id } => {
                map.insert("type".to_string(), serde_json::json!("NextCalledTwice"));
                map.insert("request_id".to_string(), serde_json::json!(request_id));
            }
            Self::Plugin { plugin, .. } => {
                map.insert("type".to_string(), serde_json::json!("PluginFailure"));
                map.insert("plugin".to_string(), serde_json::json!(plugin));
            }
        }

        map.insert("message".to_string(), serde_json::json!(self.to_string()));
        map
    }
}
