//! Fluent pipeline builder.

use super::{Pipeline, PipelineOptions};
use crate::errors::PipelineError;
use crate::middleware::{Middleware, MiddlewareEntry, Next};
use crate::plugins::Plugin;
use crate::snapshot::Frozen;
use crate::utils::IdGenerator;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;

/// Builder for pipelines.
#[derive(Debug, Clone)]
pub struct PipelineBuilder {
    /// The pipeline name.
    name: String,
    /// The base middleware list.
    middlewares: Vec<MiddlewareEntry>,
    /// Plugins, id generator and parent.
    options: PipelineOptions,
}

impl PipelineBuilder {
    /// Creates a new pipeline builder.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            middlewares: Vec::new(),
            options: PipelineOptions::default(),
        }
    }

    /// Starts from existing options.
    #[must_use]
    pub fn with_options(mut self, options: PipelineOptions) -> Self {
        self.options = options;
        self
    }

    /// Appends an entry to the base list.
    #[must_use]
    pub fn middleware(mut self, entry: impl Into<MiddlewareEntry>) -> Self {
        self.middlewares.push(entry.into());
        self
    }

    /// Appends a named middleware.
    #[must_use]
    pub fn named(self, name: impl Into<String>, handler: Arc<dyn Middleware>) -> Self {
        self.middleware(MiddlewareEntry::named(name, handler))
    }

    /// Appends a named async closure.
    #[must_use]
    pub fn named_fn<F, Fut>(self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(Frozen, Next) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, PipelineError>> + Send + 'static,
    {
        self.middleware(MiddlewareEntry::named_fn(name, f))
    }

    /// Appends an anonymous async closure.
    #[must_use]
    pub fn anonymous_fn<F, Fut>(self, f: F) -> Self
    where
        F: Fn(Frozen, Next) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, PipelineError>> + Send + 'static,
    {
        self.middleware(MiddlewareEntry::anonymous_fn(f))
    }

    /// Registers a plugin.
    #[must_use]
    pub fn plugin(mut self, plugin: Arc<dyn Plugin>) -> Self {
        self.options = self.options.with_plugin(plugin);
        self
    }

    /// Sets the id generator.
    #[must_use]
    pub fn id_generator(mut self, id_generator: Arc<dyn IdGenerator>) -> Self {
        self.options = self.options.with_id_generator(id_generator);
        self
    }

    /// Sets the parent request id.
    #[must_use]
    pub fn parent(mut self, parent: impl Into<String>) -> Self {
        self.options = self.options.with_parent(parent);
        self
    }

    /// Composes this builder with another.
    ///
    /// The other builder's middlewares run after this one's; its plugins are
    /// appended. Id generator and parent stay those of `self`.
    #[must_use]
    pub fn compose(mut self, other: Self) -> Self {
        self.name = format!("{}+{}", self.name, other.name);
        self.middlewares.extend(other.middlewares);
        self.options = self.options.with_plugins(other.options.plugins);
        self
    }

    /// Builds the pipeline.
    #[must_use]
    pub fn build(self) -> Pipeline {
        Pipeline::new(self.name, self.middlewares, self.options)
    }

    /// Returns the pipeline name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the number of middlewares.
    #[must_use]
    pub fn middleware_count(&self) -> usize {
        self.middlewares.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::CollectingPlugin;

    async fn passthrough(input: Frozen, next: Next) -> Result<Value, PipelineError> {
        next.call(input.to_value())
    }

    #[test]
    fn test_builder_creation() {
        let builder = PipelineBuilder::new("test");
        assert_eq!(builder.name(), "test");
        assert_eq!(builder.middleware_count(), 0);
    }

    #[test]
    fn test_builder_add_middlewares() {
        let pipeline = PipelineBuilder::new("test")
            .named_fn("first", passthrough)
            .anonymous_fn(passthrough)
            .plugin(Arc::new(CollectingPlugin::new()))
            .build();

        assert_eq!(pipeline.len(), 2);
        assert_eq!(pipeline.middleware_names(), vec![Some("first"), None]);
    }

    #[test]
    fn test_builder_compose() {
        let a = PipelineBuilder::new("a").named_fn("one", passthrough);
        let b = PipelineBuilder::new("b")
            .named_fn("two", passthrough)
            .plugin(Arc::new(CollectingPlugin::new()));

        let composed = a.compose(b);
        assert_eq!(composed.name(), "a+b");
        assert_eq!(composed.middleware_count(), 2);

        let pipeline = composed.build();
        assert_eq!(pipeline.middleware_names(), vec![Some("one"), Some("two")]);
    }

    #[test]
    fn test_builder_parent() {
        let pipeline = PipelineBuilder::new("child").parent("rid-9").build();
        assert_eq!(pipeline.parent(), Some("rid-9"));
    }
}
