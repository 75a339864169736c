//! Testing utilities for pipekit pipelines.
//!
//! This module provides:
//! - Mock middlewares
//! - A tracing plugin that records executed middleware names in the output
//! - Assertions for outputs, events and resolved chains

mod assertions;
mod mocks;
mod trace;

pub use assertions::{
    assert_chain_order, assert_event_kinds, assert_frozen_eq, assert_immutable,
};
pub use mocks::{AppendMiddleware, CountingMiddleware, FailingMiddleware, ShortCircuitMiddleware};
pub use trace::TracePlugin;
