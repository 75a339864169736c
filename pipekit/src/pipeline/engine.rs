//! The invocation engine.
//!
//! Middlewares run one at a time from a loop. Each receives a fresh [`Next`];
//! calling it only records that the chain may proceed, so control always
//! comes back here and the stack depth does not grow with the chain length.

use super::Pipeline;
use crate::errors::PipelineError;
use crate::events::LifecycleEvent;
use crate::middleware::{MiddlewareEntry, Next, RequestContext};
use crate::snapshot::Frozen;
use crate::utils::elapsed_ms;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Runs `chain` against `input` as one request of `pipeline`.
pub(super) async fn execute(
    pipeline: &Pipeline,
    chain: &[MiddlewareEntry],
    input: Frozen,
) -> Result<Frozen, PipelineError> {
    let started = Instant::now();
    let ctx = Arc::new(RequestContext::new(
        pipeline.id_generator().generate(),
        pipeline.parent().map(str::to_string),
    ));

    debug!(
        pipeline = pipeline.name(),
        rid = %ctx.request_id,
        prid = ?ctx.parent_request_id,
        middlewares = chain.len(),
        "Request started"
    );

    let begin = LifecycleEvent::request_begin(&ctx, pipeline.name(), input.clone());
    if let Err(e) = pipeline.plugins().notify(&begin).await {
        fail_request(pipeline, &begin, &e, started).await;
        return Err(e);
    }

    if chain.is_empty() {
        let end = begin.to_end().succeeded(input.clone(), elapsed_ms(started));
        if let Err(e) = pipeline.plugins().notify(&end).await {
            warn!(pipeline = pipeline.name(), rid = %ctx.request_id, error = %e, "Request failed");
            return Err(e);
        }
        return Ok(input);
    }

    let mut current = input;
    for entry in chain {
        let next = Next::new(Arc::clone(&ctx));
        match invoke(pipeline, &ctx, entry, current.clone(), next.clone()).await {
            Ok(output) => current = output,
            Err(e) => {
                fail_request(pipeline, &begin, &e, started).await;
                return Err(e);
            }
        }

        if !next.was_called() {
            debug!(
                pipeline = pipeline.name(),
                rid = %ctx.request_id,
                middleware = entry.name(),
                "Chain stopped early"
            );
            break;
        }
    }

    let duration = elapsed_ms(started);
    let end = begin.to_end().succeeded(current.clone(), duration);
    match pipeline.plugins().intercept_output(end, current).await {
        Ok(output) => {
            debug!(
                pipeline = pipeline.name(),
                rid = %ctx.request_id,
                duration_ms = duration,
                "Request completed"
            );
            Ok(output)
        }
        Err(e) => {
            warn!(pipeline = pipeline.name(), rid = %ctx.request_id, error = %e, "Request failed");
            Err(e)
        }
    }
}

/// Runs one middleware, wrapping named ones in invocation events.
async fn invoke(
    pipeline: &Pipeline,
    ctx: &RequestContext,
    entry: &MiddlewareEntry,
    input: Frozen,
    next: Next,
) -> Result<Frozen, PipelineError> {
    let Some(name) = entry.name() else {
        return run_handler(entry, input, next).await.map(Frozen::new);
    };

    let started = Instant::now();
    let iid = pipeline.id_generator().generate();
    let begin = LifecycleEvent::invocation_begin(ctx, pipeline.name(), name, &iid, input.clone());

    debug!(
        pipeline = pipeline.name(),
        rid = %ctx.request_id,
        iid = %iid,
        middleware = name,
        "Invocation started"
    );
    pipeline.plugins().notify(&begin).await?;

    match run_handler(entry, input, next).await {
        Ok(value) => {
            let output = Frozen::new(value);
            let end = begin.to_end().succeeded(output.clone(), elapsed_ms(started));
            pipeline.plugins().intercept_output(end, output).await
        }
        Err(e) => {
            let end = begin.to_end().failed(&e, elapsed_ms(started));
            pipeline.plugins().notify_best_effort(&end).await;
            Err(e)
        }
    }
}

async fn run_handler(
    entry: &MiddlewareEntry,
    input: Frozen,
    next: Next,
) -> Result<serde_json::Value, PipelineError> {
    let value = entry.handler().handle(input, next.clone()).await?;
    if next.call_count() > 1 {
        return Err(PipelineError::NextCalledTwice {
            request_id: next.request_id().to_string(),
        });
    }
    Ok(value)
}

async fn fail_request(pipeline: &Pipeline, begin: &LifecycleEvent, error: &PipelineError, started: Instant) {
    warn!(
        pipeline = pipeline.name(),
        rid = %begin.rid,
        prid = ?begin.prid,
        error = %error,
        "Request failed"
    );
    let end = begin.to_end().failed(error, elapsed_ms(started));
    pipeline.plugins().notify_best_effort(&end).await;
}
