//! A plugin that records executed middleware names inside the payload.

use crate::errors::PipelineError;
use crate::events::{EventKind, LifecycleEvent};
use crate::plugins::{Plugin, Toolkit};
use crate::snapshot::Frozen;
use async_trait::async_trait;
use serde_json::Value;

/// Appends the middleware name to a `traces` array after every successful
/// named invocation whose output is a JSON object.
#[derive(Debug, Clone)]
pub struct TracePlugin {
    field: String,
}

impl TracePlugin {
    /// Creates a plugin writing to the `traces` field.
    #[must_use]
    pub fn new() -> Self {
        Self::with_field("traces")
    }

    /// Creates a plugin writing to a custom field.
    #[must_use]
    pub fn with_field(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }
}

impl Default for TracePlugin {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Plugin for TracePlugin {
    fn name(&self) -> &str {
        "trace"
    }

    async fn intercept(
        &self,
        event: &LifecycleEvent,
        toolkit: &Toolkit,
    ) -> Result<Option<Frozen>, PipelineError> {
        if event.kind != EventKind::InvocationEnd || !event.carries_output() {
            return Ok(None);
        }
        let (Some(output), Some(name)) = (&event.output, &event.middleware) else {
            return Ok(None);
        };
        if !output.is_object() {
            return Ok(None);
        }

        let replaced = toolkit.produce(output, |draft| {
            let traces = draft
                .as_object_mut()
                .map(|map| map.entry(self.field.clone()).or_insert_with(|| Value::Array(Vec::new())));
            if let Some(Value::Array(items)) = traces {
                items.push(Value::String(name.clone()));
            }
        });
        Ok(Some(replaced))
    }
}
