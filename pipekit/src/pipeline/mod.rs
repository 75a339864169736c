//! Pipeline construction and execution.
//!
//! This module provides:
//! - Pipeline options and the factory built from them
//! - A fluent pipeline builder
//! - Request handlers that resolve modifications and drive the invocation engine
//! - Linkage of one pipeline's chain into another (`connect`)

mod builder;
mod engine;
mod link;
mod options;
mod runner;

pub use builder::PipelineBuilder;
pub use options::{PipelineFactory, PipelineOptions};
pub use runner::{Pipeline, RequestHandler};
