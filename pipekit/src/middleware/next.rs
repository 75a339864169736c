//! The `next` continuation handed to every middleware invocation.

use crate::errors::PipelineError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Correlation ids of the request a continuation belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestContext {
    /// The request id (`rid`).
    pub request_id: String,
    /// The parent request id (`prid`), set when reached through a linked pipeline.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_request_id: Option<String>,
}

impl RequestContext {
    /// Creates a context for a request.
    #[must_use]
    pub fn new(request_id: impl Into<String>, parent_request_id: Option<String>) -> Self {
        Self {
            request_id: request_id.into(),
            parent_request_id,
        }
    }
}

/// Continuation for a single middleware invocation.
///
/// Calling it does not run the rest of the chain. It only records that the
/// chain may proceed; the engine loop runs the following middleware once the
/// current one returns. A middleware that has called `next` is therefore
/// never on the stack when a later middleware fails.
#[derive(Debug, Clone)]
pub struct Next {
    context: Arc<RequestContext>,
    calls: Arc<AtomicUsize>,
}

impl Next {
    pub(crate) fn new(context: Arc<RequestContext>) -> Self {
        Self {
            context,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Lets the chain proceed and passes `value` through.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::NextCalledTwice`] on a second call within the
    /// same invocation.
    pub fn call(&self, value: impl Into<Value>) -> Result<Value, PipelineError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) > 0 {
            return Err(PipelineError::NextCalledTwice {
                request_id: self.context.request_id.clone(),
            });
        }
        Ok(value.into())
    }

    /// Returns true once the continuation has been called.
    #[must_use]
    pub fn was_called(&self) -> bool {
        self.call_count() > 0
    }

    /// Number of times the continuation has been called.
    pub(crate) fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Correlation ids of the owning request.
    #[must_use]
    pub fn context(&self) -> &RequestContext {
        &self.context
    }

    /// The owning request id.
    #[must_use]
    pub fn request_id(&self) -> &str {
        &self.context.request_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn next() -> Next {
        Next::new(Arc::new(RequestContext::new("rid-1", None)))
    }

    #[test]
    fn test_call_passes_value_through() {
        let next = next();
        assert!(!next.was_called());
        assert_eq!(next.call(json!({"a": 1})).unwrap(), json!({"a": 1}));
        assert!(next.was_called());
    }

    #[test]
    fn test_second_call_fails() {
        let next = next();
        next.call("once").unwrap();

        let err = next.call("twice").unwrap_err();
        assert_eq!(next.call_count(), 2);
        assert!(matches!(err, PipelineError::NextCalledTwice { ref request_id } if request_id == "rid-1"));
    }

    #[test]
    fn test_clones_share_state() {
        let next = next();
        let linked = next.clone();
        linked.call(1).unwrap();
        assert!(next.was_called());
    }

    #[test]
    fn test_context_serialization() {
        let ctx = RequestContext::new("r", Some("p".to_string()));
        let json = serde_json::to_value(&ctx).unwrap();
        assert_eq!(json, json!({"request_id": "r", "parent_request_id": "p"}));
    }
}
