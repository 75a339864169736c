//! Lifecycle event record.

use crate::errors::PipelineError;
use crate::middleware::RequestContext;
use crate::snapshot::Frozen;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// The kind of lifecycle transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventKind {
    /// A request started.
    RequestBegin,
    /// A request finished.
    RequestEnd,
    /// A named middleware is about to run.
    InvocationBegin,
    /// A named middleware finished.
    InvocationEnd,
}

impl EventKind {
    /// Returns the wire name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::RequestBegin => "request-begin",
            Self::RequestEnd => "request-end",
            Self::InvocationBegin => "invocation-begin",
            Self::InvocationEnd => "invocation-end",
        }
    }

    /// Returns true for end events.
    #[must_use]
    pub const fn is_end(&self) -> bool {
        matches!(self, Self::RequestEnd | Self::InvocationEnd)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome carried by end events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    /// The step produced an output.
    Success,
    /// The step failed.
    Failure,
}

/// An immutable record of one lifecycle transition.
///
/// Plugins receive events by shared reference; the payloads inside are
/// [`Frozen`] snapshots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LifecycleEvent {
    /// The event kind.
    #[serde(rename = "type")]
    pub kind: EventKind,

    /// Request id.
    pub rid: String,

    /// Parent request id, when reached through a linked pipeline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prid: Option<String>,

    /// Invocation id, for invocation events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iid: Option<String>,

    /// Name of the owning pipeline.
    pub pipeline: String,

    /// Name of the middleware, for invocation events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub middleware: Option<String>,

    /// Input of the request or invocation.
    pub input: Frozen,

    /// Outcome, for end events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<EventStatus>,

    /// Output, for successful end events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<Frozen>,

    /// Error message, for failed end events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// When the event was created (ISO 8601).
    pub timestamp: String,

    /// Duration of the request or invocation, for end events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<f64>,
}

impl LifecycleEvent {
    fn new(kind: EventKind, ctx: &RequestContext, pipeline: &str, input: Frozen) -> Self {
        Self {
            kind,
            rid: ctx.request_id.clone(),
            prid: ctx.parent_request_id.clone(),
            iid: None,
            pipeline: pipeline.to_string(),
            middleware: None,
            input,
            status: None,
            output: None,
            error: None,
            timestamp: crate::utils::iso_timestamp(),
            duration_ms: None,
        }
    }

    /// Creates a `request-begin` event.
    #[must_use]
    pub fn request_begin(ctx: &RequestContext, pipeline: &str, input: Frozen) -> Self {
        Self::new(EventKind::RequestBegin, ctx, pipeline, input)
    }

    /// Creates an `invocation-begin` event.
    #[must_use]
    pub fn invocation_begin(
        ctx: &RequestContext,
        pipeline: &str,
        middleware: &str,
        iid: &str,
        input: Frozen,
    ) -> Self {
        let mut event = Self::new(EventKind::InvocationBegin, ctx, pipeline, input);
        event.middleware = Some(middleware.to_string());
        event.iid = Some(iid.to_string());
        event
    }

    /// Turns a begin event into the matching end event.
    #[must_use]
    pub fn to_end(&self) -> Self {
        let kind = match self.kind {
            EventKind::RequestBegin | EventKind::RequestEnd => EventKind::RequestEnd,
            EventKind::InvocationBegin | EventKind::InvocationEnd => EventKind::InvocationEnd,
        };
        Self {
            kind,
            timestamp: crate::utils::iso_timestamp(),
            ..self.clone()
        }
    }

    /// Marks the event successful with `output`.
    #[must_use]
    pub fn succeeded(mut self, output: Frozen, duration_ms: f64) -> Self {
        self.status = Some(EventStatus::Success);
        self.output = Some(output);
        self.error = None;
        self.duration_ms = Some(duration_ms);
        self
    }

    /// Marks the event failed with `error`.
    #[must_use]
    pub fn failed(mut self, error: &PipelineError, duration_ms: f64) -> Self {
        self.status = Some(EventStatus::Failure);
        self.output = None;
        self.error = Some(error.to_string());
        self.duration_ms = Some(duration_ms);
        self
    }

    /// Returns a copy carrying a different output.
    #[must_use]
    pub fn with_output(&self, output: Frozen) -> Self {
        Self {
            output: Some(output),
            ..self.clone()
        }
    }

    /// Returns true for successful end events, the only ones whose output
    /// plugins may replace.
    #[must_use]
    pub fn carries_output(&self) -> bool {
        self.kind.is_end() && self.status == Some(EventStatus::Success)
    }

    /// Converts the event to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(map)) => map.into_iter().collect(),
            _ => HashMap::new(),
        }
    }
}
