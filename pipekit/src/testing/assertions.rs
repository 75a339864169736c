//! Test assertions for pipeline outputs, events and resolved chains.

use crate::errors::PipelineError;
use crate::events::{EventKind, LifecycleEvent};
use crate::middleware::MiddlewareEntry;
use crate::snapshot::Frozen;
use serde_json::Value;
use std::fmt::Debug;

/// Asserts that a frozen output equals `expected`.
pub fn assert_frozen_eq(actual: &Frozen, expected: &Value) {
    assert_eq!(
        actual.value(),
        expected,
        "Expected output {expected}, got {actual}"
    );
}

/// Asserts that a write attempt was rejected as an immutability violation.
pub fn assert_immutable<T: Debug>(result: Result<T, PipelineError>) {
    match result {
        Err(PipelineError::Immutable { .. }) => {}
        other => panic!("Expected an immutability violation, got {other:?}"),
    }
}

/// Asserts that `events` have exactly the given kinds, in order.
pub fn assert_event_kinds(events: &[LifecycleEvent], expected: &[EventKind]) {
    let actual: Vec<EventKind> = events.iter().map(|e| e.kind).collect();
    assert_eq!(actual, expected, "Unexpected event sequence");
}

/// Asserts that a resolved chain has the given names, in order.
///
/// Anonymous entries are written as `None`.
pub fn assert_chain_order(chain: &[MiddlewareEntry], expected: &[Option<&str>]) {
    let actual: Vec<Option<&str>> = chain.iter().map(MiddlewareEntry::name).collect();
    assert_eq!(actual, expected, "Unexpected middleware order");
}
