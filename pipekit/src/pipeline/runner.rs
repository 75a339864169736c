//! Pipelines and their per-request handlers.

use super::{engine, link, PipelineOptions};
use crate::errors::PipelineError;
use crate::middleware::{MiddlewareEntry, Next};
use crate::modifications::{self, Modification};
use crate::plugins::PluginBus;
use crate::snapshot::Frozen;
use crate::utils::IdGenerator;
use std::fmt;
use std::sync::Arc;

/// An immutable pipeline configuration.
///
/// A pipeline is built once and serves any number of requests, including
/// concurrent ones: every request resolves its own middleware list, and the
/// base list is never modified.
#[derive(Clone)]
pub struct Pipeline {
    name: Arc<str>,
    middlewares: Arc<[MiddlewareEntry]>,
    plugins: Arc<PluginBus>,
    id_generator: Arc<dyn IdGenerator>,
    parent: Option<String>,
}

impl Pipeline {
    pub(crate) fn new(
        name: impl Into<String>,
        middlewares: Vec<MiddlewareEntry>,
        options: PipelineOptions,
    ) -> Self {
        Self {
            name: Arc::from(name.into()),
            middlewares: middlewares.into(),
            plugins: Arc::new(PluginBus::with_plugins(options.plugins)),
            id_generator: options.id_generator,
            parent: options.parent,
        }
    }

    /// Returns the pipeline name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the base middleware list.
    #[must_use]
    pub fn middlewares(&self) -> &[MiddlewareEntry] {
        &self.middlewares
    }

    /// Returns the names of the base middlewares, `None` for anonymous ones.
    #[must_use]
    pub fn middleware_names(&self) -> Vec<Option<&str>> {
        self.middlewares.iter().map(MiddlewareEntry::name).collect()
    }

    /// Returns the number of base middlewares.
    #[must_use]
    pub fn len(&self) -> usize {
        self.middlewares.len()
    }

    /// Returns true if the base list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.middlewares.is_empty()
    }

    /// Returns the parent request id, if this pipeline is linked.
    #[must_use]
    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    pub(crate) fn plugins(&self) -> &PluginBus {
        &self.plugins
    }

    pub(crate) fn id_generator(&self) -> &dyn IdGenerator {
        self.id_generator.as_ref()
    }

    /// Resolves the middleware list a request with `modifications` would run.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::MiddlewareNotFound`] if a modification refers
    /// to an unknown name.
    pub fn resolve(
        &self,
        modifications: &[Modification],
    ) -> Result<Vec<MiddlewareEntry>, PipelineError> {
        modifications::resolve(&self.middlewares, modifications)
    }

    /// Creates a request handler applying `modifications`.
    #[must_use]
    pub fn request(&self, modifications: Vec<Modification>) -> RequestHandler {
        RequestHandler {
            pipeline: self.clone(),
            modifications: modifications.into(),
        }
    }

    /// Runs the base list against `input`.
    ///
    /// # Errors
    ///
    /// Returns the first middleware or plugin failure.
    pub async fn run(&self, input: impl Into<Frozen> + Send) -> Result<Frozen, PipelineError> {
        self.request(Vec::new()).call(input).await
    }

    /// Links this pipeline into the chain that owns `continuation`.
    ///
    /// The returned pipeline ends with a middleware that calls
    /// `continuation`, so the caller's chain resumes where it paused, and all
    /// of its events carry the caller's request id as `prid`.
    #[must_use]
    pub fn connect(&self, continuation: &Next) -> Self {
        let mut middlewares = self.middlewares.to_vec();
        middlewares.push(link::link_entry(continuation.clone()));

        Self {
            middlewares: middlewares.into(),
            parent: Some(continuation.request_id().to_string()),
            ..self.clone()
        }
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("name", &self.name)
            .field("middlewares", &self.middleware_names())
            .field("plugins", &self.plugins)
            .field("parent", &self.parent)
            .finish_non_exhaustive()
    }
}

/// Runs one pipeline with a fixed set of modifications.
#[derive(Debug, Clone)]
pub struct RequestHandler {
    pipeline: Pipeline,
    modifications: Arc<[Modification]>,
}

impl RequestHandler {
    /// Runs a request.
    ///
    /// Modifications are resolved first; a resolution failure is returned
    /// before any event is emitted or any middleware runs.
    ///
    /// # Errors
    ///
    /// Returns the resolution error, or the first middleware or plugin
    /// failure. Middleware errors are returned unchanged.
    pub async fn call(&self, input: impl Into<Frozen> + Send) -> Result<Frozen, PipelineError> {
        let input = input.into();
        let chain = self.pipeline.resolve(&self.modifications)?;
        engine::execute(&self.pipeline, &chain, input).await
    }

    /// The pipeline this handler runs.
    #[must_use]
    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// The modifications applied to every call.
    #[must_use]
    pub fn modifications(&self) -> &[Modification] {
        &self.modifications
    }
}
