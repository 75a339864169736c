//! Mock middlewares for testing.

use anyhow::anyhow;
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use crate::errors::PipelineError;
use crate::middleware::{Middleware, Next};
use crate::snapshot::Frozen;

/// Appends a suffix to a string input and continues the chain.
#[derive(Debug, Clone)]
pub struct AppendMiddleware {
    suffix: String,
}

impl AppendMiddleware {
    /// Creates a middleware appending `suffix`.
    #[must_use]
    pub fn new(suffix: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
        }
    }
}

#[async_trait]
impl Middleware for AppendMiddleware {
    async fn handle(&self, input: Frozen, next: Next) -> Result<Value, PipelineError> {
        let current = input
            .as_str()
            .ok_or_else(|| anyhow!("expected a string input, got {}", *input))?;
        next.call(format!("{current}{}", self.suffix))
    }
}

/// A middleware that always fails.
#[derive(Debug, Clone)]
pub struct FailingMiddleware {
    error: String,
}

impl FailingMiddleware {
    /// Creates a failing middleware with an error message.
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[async_trait]
impl Middleware for FailingMiddleware {
    async fn handle(&self, _input: Frozen, _next: Next) -> Result<Value, PipelineError> {
        Err(anyhow!("{}", self.error).into())
    }
}

/// Passes input through and records every call.
#[derive(Debug, Default)]
pub struct CountingMiddleware {
    inputs: Mutex<Vec<Value>>,
}

impl CountingMiddleware {
    /// Creates a new counting middleware.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of times the middleware was called.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.inputs.lock().len()
    }

    /// Returns the inputs seen so far.
    #[must_use]
    pub fn recorded_inputs(&self) -> Vec<Value> {
        self.inputs.lock().clone()
    }

    /// Resets call tracking.
    pub fn reset(&self) {
        self.inputs.lock().clear();
    }
}

#[async_trait]
impl Middleware for CountingMiddleware {
    async fn handle(&self, input: Frozen, next: Next) -> Result<Value, PipelineError> {
        self.inputs.lock().push(input.to_value());
        next.call(input.into_value())
    }
}

/// Returns a fixed value without calling `next`, ending the chain.
#[derive(Debug, Clone)]
pub struct ShortCircuitMiddleware {
    value: Value,
}

impl ShortCircuitMiddleware {
    /// Creates a middleware that answers with `value`.
    #[must_use]
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

#[async_trait]
impl Middleware for ShortCircuitMiddleware {
    async fn handle(&self, _input: Frozen, _next: Next) -> Result<Value, PipelineError> {
        Ok(self.value.clone())
    }
}
