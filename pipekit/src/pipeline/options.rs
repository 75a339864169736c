//! Pipeline options and factory.

use super::Pipeline;
use crate::middleware::MiddlewareEntry;
use crate::plugins::Plugin;
use crate::utils::{IdGenerator, UuidGenerator};
use std::fmt;
use std::sync::Arc;

/// Options shared by every pipeline a factory builds.
#[derive(Clone)]
pub struct PipelineOptions {
    /// Lifecycle observers, in notification order.
    pub plugins: Vec<Arc<dyn Plugin>>,
    /// Source of request and invocation ids.
    pub id_generator: Arc<dyn IdGenerator>,
    /// Parent request id stamped on every event as `prid`.
    pub parent: Option<String>,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            plugins: Vec::new(),
            id_generator: Arc::new(UuidGenerator),
            parent: None,
        }
    }
}

impl PipelineOptions {
    /// Creates default options: no plugins, UUID ids, no parent.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a plugin after the existing ones.
    #[must_use]
    pub fn with_plugin(mut self, plugin: Arc<dyn Plugin>) -> Self {
        self.plugins.push(plugin);
        self
    }

    /// Adds several plugins, keeping their order.
    #[must_use]
    pub fn with_plugins(mut self, plugins: impl IntoIterator<Item = Arc<dyn Plugin>>) -> Self {
        self.plugins.extend(plugins);
        self
    }

    /// Sets the id generator.
    #[must_use]
    pub fn with_id_generator(mut self, id_generator: Arc<dyn IdGenerator>) -> Self {
        self.id_generator = id_generator;
        self
    }

    /// Sets the parent request id.
    #[must_use]
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Turns the options into a pipeline factory.
    #[must_use]
    pub fn into_factory(self) -> PipelineFactory {
        PipelineFactory::new(self)
    }
}

impl fmt::Debug for PipelineOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineOptions")
            .field("plugins", &self.plugins.iter().map(|p| p.name()).collect::<Vec<_>>())
            .field("id_generator", &self.id_generator)
            .field("parent", &self.parent)
            .finish()
    }
}

/// Builds pipelines that share one set of options.
#[derive(Debug, Clone, Default)]
pub struct PipelineFactory {
    options: PipelineOptions,
}

impl PipelineFactory {
    /// Creates a factory.
    #[must_use]
    pub fn new(options: PipelineOptions) -> Self {
        Self { options }
    }

    /// Builds a pipeline from a name and a base middleware list.
    #[must_use]
    pub fn build(
        &self,
        name: impl Into<String>,
        middlewares: impl IntoIterator<Item = MiddlewareEntry>,
    ) -> Pipeline {
        Pipeline::new(name, middlewares.into_iter().collect(), self.options.clone())
    }

    /// The options this factory applies.
    #[must_use]
    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }
}
