//! Observer plugins for lifecycle events.
//!
//! Plugins see every lifecycle event in registration order. For successful
//! end events they may return a replacement output, built through the
//! copy-on-write [`Toolkit`]; the replacement is what the next plugin and
//! the rest of the pipeline see.

mod bus;
mod collecting;
mod logging;

pub use bus::PluginBus;
pub use collecting::CollectingPlugin;
pub use logging::LoggingPlugin;

use crate::errors::PipelineError;
use crate::events::LifecycleEvent;
use crate::snapshot::{self, Draft, Frozen};
use async_trait::async_trait;
use serde_json::Value;

/// Trait for lifecycle observers.
#[async_trait]
pub trait Plugin: Send + Sync {
    /// Name used when reporting plugin failures.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Called for every lifecycle event.
    ///
    /// Return `Some(output)` to replace the output of a successful end event.
    /// The return value is ignored for every other event.
    async fn intercept(
        &self,
        event: &LifecycleEvent,
        toolkit: &Toolkit,
    ) -> Result<Option<Frozen>, PipelineError>;
}

/// Copy-on-write helpers handed to plugins.
#[derive(Debug, Clone, Copy, Default)]
pub struct Toolkit;

impl Toolkit {
    /// Produces a new snapshot by editing a draft of `base`.
    #[must_use]
    pub fn produce<F>(&self, base: &Frozen, recipe: F) -> Frozen
    where
        F: FnOnce(&mut Value),
    {
        snapshot::produce(base, recipe)
    }

    /// Starts a draft of `base`.
    #[must_use]
    pub fn draft(&self, base: &Frozen) -> Draft {
        base.draft()
    }

    /// Freezes a fresh value.
    #[must_use]
    pub fn freeze(&self, value: Value) -> Frozen {
        snapshot::freeze(value)
    }
}
