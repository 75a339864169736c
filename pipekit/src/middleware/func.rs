//! Closure-backed middlewares.

use super::{Middleware, Next};
use crate::errors::PipelineError;
use crate::snapshot::Frozen;
use async_trait::async_trait;
use futures::future::BoxFuture;
use futures::FutureExt;
use serde_json::Value;
use std::fmt::{self, Debug};
use std::future::Future;
use std::sync::Arc;

type BoxedHandler =
    dyn Fn(Frozen, Next) -> BoxFuture<'static, Result<Value, PipelineError>> + Send + Sync;

/// A middleware backed by an async closure.
pub struct FnMiddleware {
    func: Box<BoxedHandler>,
}

impl FnMiddleware {
    /// Wraps an async closure.
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn(Frozen, Next) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, PipelineError>> + Send + 'static,
    {
        Self {
            func: Box::new(move |input, next| f(input, next).boxed()),
        }
    }
}

impl Debug for FnMiddleware {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnMiddleware").finish_non_exhaustive()
    }
}

#[async_trait]
impl Middleware for FnMiddleware {
    async fn handle(&self, input: Frozen, next: Next) -> Result<Value, PipelineError> {
        (self.func)(input, next).await
    }
}

/// Wraps an async closure as a shareable middleware.
pub fn middleware_fn<F, Fut>(f: F) -> Arc<dyn Middleware>
where
    F: Fn(Frozen, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value, PipelineError>> + Send + 'static,
{
    Arc::new(FnMiddleware::new(f))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::RequestContext;
    use serde_json::json;

    #[tokio::test]
    async fn test_fn_middleware() {
        let mw = middleware_fn(|input: Frozen, next: Next| async move {
            let n = input.as_i64().unwrap_or_default();
            next.call(n + 1)
        });

        let next = Next::new(Arc::new(RequestContext::new("r", None)));
        let out = mw.handle(Frozen::new(json!(1)), next.clone()).await.unwrap();

        assert_eq!(out, json!(2));
        assert!(next.was_called());
    }

    #[tokio::test]
    async fn test_fn_middleware_without_next() {
        let mw = middleware_fn(|_input: Frozen, _next: Next| async move { Ok(json!("stop")) });

        let next = Next::new(Arc::new(RequestContext::new("r", None)));
        let out = mw.handle(Frozen::new(json!(null)), next.clone()).await.unwrap();

        assert_eq!(out, json!("stop"));
        assert!(!next.was_called());
    }
}
