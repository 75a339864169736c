//! Middleware trait, entries and the `next` continuation.
//!
//! A middleware receives the frozen output of the previous step together
//! with a [`Next`] continuation. Calling [`Next::call`] hands the returned
//! value on to the following middleware; returning without calling it ends
//! the chain with that value as the final output.

mod entry;
mod func;
mod next;

pub use entry::MiddlewareEntry;
pub use func::{middleware_fn, FnMiddleware};
pub use next::{Next, RequestContext};

use crate::errors::PipelineError;
use crate::snapshot::Frozen;
use async_trait::async_trait;
use serde_json::Value;

/// Trait for pipeline middlewares.
#[async_trait]
pub trait Middleware: Send + Sync {
    /// Handles one invocation.
    ///
    /// # Arguments
    ///
    /// * `input` - The frozen output of the previous middleware (or the request input)
    /// * `next` - Continuation; call it to let the chain proceed
    ///
    /// # Returns
    ///
    /// The output of this step. It is frozen before anyone else sees it.
    async fn handle(&self, input: Frozen, next: Next) -> Result<Value, PipelineError>;
}
