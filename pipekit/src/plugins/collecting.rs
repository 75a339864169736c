//! A plugin that records events for later inspection.

use super::{Plugin, Toolkit};
use crate::errors::PipelineError;
use crate::events::{EventKind, LifecycleEvent};
use crate::snapshot::Frozen;
use async_trait::async_trait;
use parking_lot::RwLock;

/// Records every event it sees. Never replaces outputs.
#[derive(Debug, Default)]
pub struct CollectingPlugin {
    events: RwLock<Vec<LifecycleEvent>>,
}

impl CollectingPlugin {
    /// Creates a new collecting plugin.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all collected events.
    #[must_use]
    pub fn events(&self) -> Vec<LifecycleEvent> {
        self.events.read().clone()
    }

    /// Returns the collected events of one kind.
    #[must_use]
    pub fn events_of_kind(&self, kind: EventKind) -> Vec<LifecycleEvent> {
        self.events
            .read()
            .iter()
            .filter(|e| e.kind == kind)
            .cloned()
            .collect()
    }

    /// Returns the collected events of one request.
    #[must_use]
    pub fn events_of_request(&self, rid: &str) -> Vec<LifecycleEvent> {
        self.events
            .read()
            .iter()
            .filter(|e| e.rid == rid)
            .cloned()
            .collect()
    }

    /// Returns the number of collected events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    /// Returns true if no events have been collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }

    /// Clears all collected events.
    pub fn clear(&self) {
        self.events.write().clear();
    }
}

#[async_trait]
impl Plugin for CollectingPlugin {
    fn name(&self) -> &str {
        "collecting"
    }

    async fn intercept(
        &self,
        event: &LifecycleEvent,
        _toolkit: &Toolkit,
    ) -> Result<Option<Frozen>, PipelineError> {
        self.events.write().push(event.clone());
        Ok(None)
    }
}
