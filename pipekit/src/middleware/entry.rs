//! Named and anonymous middleware entries.

use super::{middleware_fn, Middleware, Next};
use crate::errors::PipelineError;
use crate::snapshot::Frozen;
use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// One slot of a middleware list.
///
/// Only named entries can be targeted by modifications, and only named
/// entries produce invocation events.
#[derive(Clone)]
pub struct MiddlewareEntry {
    name: Option<String>,
    handler: Arc<dyn Middleware>,
}

impl MiddlewareEntry {
    /// Creates a named entry.
    #[must_use]
    pub fn named(name: impl Into<String>, handler: Arc<dyn Middleware>) -> Self {
        Self {
            name: Some(name.into()),
            handler,
        }
    }

    /// Creates an anonymous entry.
    #[must_use]
    pub fn anonymous(handler: Arc<dyn Middleware>) -> Self {
        Self {
            name: None,
            handler,
        }
    }

    /// Creates a named entry from an async closure.
    pub fn named_fn<F, Fut>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(Frozen, Next) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, PipelineError>> + Send + 'static,
    {
        Self::named(name, middleware_fn(f))
    }

    /// Creates an anonymous entry from an async closure.
    pub fn anonymous_fn<F, Fut>(f: F) -> Self
    where
        F: Fn(Frozen, Next) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, PipelineError>> + Send + 'static,
    {
        Self::anonymous(middleware_fn(f))
    }

    /// The entry's name, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns true if the entry carries `name`.
    #[must_use]
    pub fn is_named(&self, name: &str) -> bool {
        self.name.as_deref() == Some(name)
    }

    /// The middleware bound to this entry.
    #[must_use]
    pub fn handler(&self) -> &Arc<dyn Middleware> {
        &self.handler
    }

    /// Rebinds the handler, keeping the name.
    pub(crate) fn set_handler(&mut self, handler: Arc<dyn Middleware>) {
        self.handler = handler;
    }
}

impl From<Arc<dyn Middleware>> for MiddlewareEntry {
    fn from(handler: Arc<dyn Middleware>) -> Self {
        Self::anonymous(handler)
    }
}

impl<S: Into<String>> From<(S, Arc<dyn Middleware>)> for MiddlewareEntry {
    fn from((name, handler): (S, Arc<dyn Middleware>)) -> Self {
        Self::named(name, handler)
    }
}

impl fmt::Debug for MiddlewareEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MiddlewareEntry")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
