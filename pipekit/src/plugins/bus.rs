//! Fan-out of lifecycle events to registered plugins.

use super::{Plugin, Toolkit};
use crate::errors::PipelineError;
use crate::events::LifecycleEvent;
use crate::snapshot::Frozen;
use std::fmt;
use std::sync::Arc;
use tracing::warn;

/// An ordered list of plugins.
#[derive(Clone, Default)]
pub struct PluginBus {
    plugins: Vec<Arc<dyn Plugin>>,
    toolkit: Toolkit,
}

impl PluginBus {
    /// Creates an empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a bus from plugins, keeping their order.
    #[must_use]
    pub fn with_plugins(plugins: Vec<Arc<dyn Plugin>>) -> Self {
        Self {
            plugins,
            toolkit: Toolkit,
        }
    }

    /// Registers a plugin after the existing ones.
    pub fn add(&mut self, plugin: Arc<dyn Plugin>) {
        self.plugins.push(plugin);
    }

    /// Delivers an event whose return values are ignored.
    ///
    /// # Errors
    ///
    /// Returns the first plugin failure, wrapped in [`PipelineError::Plugin`].
    pub async fn notify(&self, event: &LifecycleEvent) -> Result<(), PipelineError> {
        for plugin in &self.plugins {
            plugin
                .intercept(event, &self.toolkit)
                .await
                .map_err(|e| PipelineError::plugin(plugin.name(), e))?;
        }
        Ok(())
    }

    /// Delivers an event and drops plugin failures after logging them.
    ///
    /// Used for failure notifications, where the request already has an
    /// error to report.
    pub async fn notify_best_effort(&self, event: &LifecycleEvent) {
        for plugin in &self.plugins {
            if let Err(e) = plugin.intercept(event, &self.toolkit).await {
                warn!(
                    plugin = plugin.name(),
                    event_type = %event.kind,
                    rid = %event.rid,
                    error = %e,
                    "Plugin failed while handling a failure event"
                );
            }
        }
    }

    /// Delivers a successful end event, threading output replacements.
    ///
    /// Each plugin sees the output left by the previous one. Returns the
    /// final output.
    ///
    /// # Errors
    ///
    /// Returns the first plugin failure, wrapped in [`PipelineError::Plugin`].
    pub async fn intercept_output(
        &self,
        event: LifecycleEvent,
        output: Frozen,
    ) -> Result<Frozen, PipelineError> {
        let mut event = event.with_output(output.clone());
        let mut output = output;

        for plugin in &self.plugins {
            let replacement = plugin
                .intercept(&event, &self.toolkit)
                .await
                .map_err(|e| PipelineError::plugin(plugin.name(), e))?;

            if let Some(replacement) = replacement {
                event = event.with_output(replacement.clone());
                output = replacement;
            }
        }

        Ok(output)
    }

    /// Returns the number of plugins.
    #[must_use]
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    /// Returns true if no plugin is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

impl fmt::Debug for PluginBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginBus")
            .field("plugins", &self.plugins.iter().map(|p| p.name()).collect::<Vec<_>>())
            .finish()
    }
}
