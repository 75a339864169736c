//! The synthetic middleware that hands control back to a parent chain.

use crate::errors::PipelineError;
use crate::middleware::{Middleware, MiddlewareEntry, Next};
use crate::snapshot::Frozen;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Calls the parent's continuation with the child's current value.
struct LinkMiddleware {
    continuation: Next,
}

#[async_trait]
impl Middleware for LinkMiddleware {
    async fn handle(&self, input: Frozen, next: Next) -> Result<Value, PipelineError> {
        let value = self.continuation.call(input.into_value())?;
        // Keep going so request-scoped appends after the link still run.
        next.call(value)
    }
}

pub(super) fn link_entry(continuation: Next) -> MiddlewareEntry {
    MiddlewareEntry::anonymous(Arc::new(LinkMiddleware { continuation }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::RequestContext;
    use serde_json::json;

    #[tokio::test]
    async fn test_link_calls_continuation() {
        let parent = Next::new(Arc::new(RequestContext::new("parent", None)));
        let child = Next::new(Arc::new(RequestContext::new("child", Some("parent".to_string()))));
        let entry = link_entry(parent.clone());

        let out = entry
            .handler()
            .handle(Frozen::new(json!({"v": 1})), child.clone())
            .await
            .unwrap();

        assert_eq!(out, json!({"v": 1}));
        assert!(parent.was_called());
        assert!(child.was_called());
        assert!(entry.name().is_none());
    }

    #[tokio::test]
    async fn test_link_is_single_use() {
        let parent = Next::new(Arc::new(RequestContext::new("parent", None)));
        let entry = link_entry(parent);

        let first = Next::new(Arc::new(RequestContext::new("c1", None)));
        entry.handler().handle(Frozen::new(json!(1)), first).await.unwrap();

        let second = Next::new(Arc::new(RequestContext::new("c2", None)));
        let err = entry.handler().handle(Frozen::new(json!(1)), second).await.unwrap_err();
        assert!(matches!(err, PipelineError::NextCalledTwice { .. }));
    }
}
