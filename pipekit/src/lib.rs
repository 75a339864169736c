//! # Pipekit
//!
//! Request-processing middleware pipelines with per-request reconfiguration.
//!
//! Pipekit provides:
//!
//! - **Middleware chains**: async middlewares run in order, each deciding
//!   whether the chain continues by calling `next`
//! - **Per-request modifications**: insert, replace, skip or append
//!   middlewares for a single request without touching the pipeline
//! - **Immutable payloads**: values crossing middleware boundaries are frozen
//!   snapshots; edits go through copy-on-write drafts
//! - **Lifecycle plugins**: observers of request and invocation events that
//!   may replace outputs
//! - **Linked pipelines**: a pipeline can hand control back to the chain that
//!   started it, with parent/child request ids on every event
//!
//! ## Quick Start
//!
//! ```rust
//! use pipekit::prelude::*;
//! use serde_json::json;
//!
//! # tokio_test::block_on(async {
//! let pipeline = PipelineBuilder::new("greet")
//!     .named_fn("hello", |input: Frozen, next: Next| async move {
//!         next.call(format!("{} hello", input.as_str().unwrap_or_default()))
//!     })
//!     .build();
//!
//! let output = pipeline
//!     .request(vec![Modification::append(MiddlewareEntry::named_fn(
//!         "world",
//!         |input: Frozen, next: Next| async move {
//!             next.call(format!("{} world", input.as_str().unwrap_or_default()))
//!         },
//!     ))])
//!     .call(json!(">"))
//!     .await
//!     .unwrap();
//!
//! assert_eq!(output, json!("> hello world"));
//! # });
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod errors;
pub mod events;
pub mod middleware;
pub mod modifications;
pub mod pipeline;
pub mod plugins;
pub mod snapshot;
pub mod testing;
pub mod utils;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::errors::PipelineError;
    pub use crate::events::{EventKind, EventStatus, LifecycleEvent};
    pub use crate::middleware::{middleware_fn, Middleware, MiddlewareEntry, Next, RequestContext};
    pub use crate::modifications::{resolve, Modification, Position};
    pub use crate::pipeline::{
        Pipeline, PipelineBuilder, PipelineFactory, PipelineOptions, RequestHandler,
    };
    pub use crate::plugins::{CollectingPlugin, LoggingPlugin, Plugin, PluginBus, Toolkit};
    pub use crate::snapshot::{freeze, produce, Draft, Frozen};
    pub use crate::utils::{
        generate_uuid, iso_timestamp, IdGenerator, SequentialIdGenerator, UuidGenerator,
    };
}
