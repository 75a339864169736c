//! A plugin that logs lifecycle events through `tracing`.

use super::{Plugin, Toolkit};
use crate::errors::PipelineError;
use crate::events::{EventStatus, LifecycleEvent};
use crate::snapshot::Frozen;
use async_trait::async_trait;
use tracing::{debug, info, trace, warn, Level};

/// Logs every lifecycle event. Never replaces outputs.
///
/// Failed end events are always logged at `WARN`.
#[derive(Debug, Clone)]
pub struct LoggingPlugin {
    level: Level,
    include_payloads: bool,
}

impl Default for LoggingPlugin {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            include_payloads: false,
        }
    }
}

impl LoggingPlugin {
    /// Creates a logging plugin with the specified level.
    #[must_use]
    pub fn new(level: Level) -> Self {
        Self {
            level,
            ..Self::default()
        }
    }

    /// Creates a debug-level logging plugin.
    #[must_use]
    pub fn debug() -> Self {
        Self::new(Level::DEBUG)
    }

    /// Creates an info-level logging plugin.
    #[must_use]
    pub fn info() -> Self {
        Self::new(Level::INFO)
    }

    /// Also logs the event's input and output values.
    #[must_use]
    pub fn with_payloads(mut self) -> Self {
        self.include_payloads = true;
        self
    }

    fn log_event(&self, event: &LifecycleEvent) {
        let payload = self
            .include_payloads
            .then(|| (event.input.to_string(), event.output.as_ref().map(ToString::to_string)));

        if event.status == Some(EventStatus::Failure) {
            warn!(
                event_type = %event.kind,
                pipeline = %event.pipeline,
                rid = %event.rid,
                prid = ?event.prid,
                iid = ?event.iid,
                middleware = ?event.middleware,
                error = ?event.error,
                "Event: {}", event.kind
            );
            return;
        }

        match self.level {
            Level::TRACE => {
                trace!(
                    event_type = %event.kind,
                    pipeline = %event.pipeline,
                    rid = %event.rid,
                    prid = ?event.prid,
                    iid = ?event.iid,
                    middleware = ?event.middleware,
                    payload = ?payload,
                    "Event: {}", event.kind
                );
            }
            Level::DEBUG => {
                debug!(
                    event_type = %event.kind,
                    pipeline = %event.pipeline,
                    rid = %event.rid,
                    prid = ?event.prid,
                    iid = ?event.iid,
                    middleware = ?event.middleware,
                    payload = ?payload,
                    "Event: {}", event.kind
                );
            }
            _ => {
                info!(
                    event_type = %event.kind,
                    pipeline = %event.pipeline,
                    rid = %event.rid,
                    prid = ?event.prid,
                    iid = ?event.iid,
                    middleware = ?event.middleware,
                    payload = ?payload,
                    "Event: {}", event.kind
                );
            }
        }
    }
}

#[async_trait]
impl Plugin for LoggingPlugin {
    fn name(&self) -> &str {
        "logging"
    }

    async fn intercept(
        &self,
        event: &LifecycleEvent,
        _toolkit: &Toolkit,
    ) -> Result<Option<Frozen>, PipelineError> {
        self.log_event(event);
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::RequestContext;
    use serde_json::json;
    use tracing_subscriber::EnvFilter;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new("debug"))
            .with_test_writer()
            .try_init();
    }

    #[tokio::test]
    async fn test_logging_plugin_never_replaces() {
        init_tracing();
        let plugin = LoggingPlugin::debug().with_payloads();
        let ctx = RequestContext::new("rid", None);
        let event = LifecycleEvent::request_begin(&ctx, "test", Frozen::new(json!({"k": 1})))
            .to_end()
            .succeeded(Frozen::new(json!({"k": 2})), 1.0);

        let result = plugin.intercept(&event, &Toolkit).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_logging_plugin_failure_event() {
        init_tracing();
        let plugin = LoggingPlugin::default();
        let ctx = RequestContext::new("rid", None);
        let event = LifecycleEvent::request_begin(&ctx, "test", Frozen::new(json!(null)))
            .to_end()
            .failed(&PipelineError::not_found("x"), 1.0);

        assert!(plugin.intercept(&event, &Toolkit).await.unwrap().is_none());
        assert_eq!(plugin.name(), "logging");
    }
}
