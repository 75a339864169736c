//! Lifecycle events emitted while a request runs.
//!
//! Four event kinds exist: `request-begin`, `request-end`,
//! `invocation-begin` and `invocation-end`. Invocation events are only
//! emitted for named middlewares.

mod lifecycle;

pub use lifecycle::{EventKind, EventStatus, LifecycleEvent};
