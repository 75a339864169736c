//! Immutable snapshots of in-flight payloads.
//!
//! Every value that crosses a middleware boundary is held as a [`Frozen`]
//! snapshot. A snapshot is read-only at every depth: there is no way to get
//! a mutable reference into it, and the explicit write helpers
//! ([`Frozen::try_set`], [`Frozen::try_push`], [`Frozen::try_remove`]) fail
//! with [`PipelineError::Immutable`](crate::errors::PipelineError) for every
//! path that exists in the value.
//!
//! Changes are made copy-on-write: [`produce`] (or [`Frozen::draft`]) hands a
//! [`Draft`] to a recipe and freezes the result as a new snapshot, leaving
//! the base untouched.

mod frozen;

pub use frozen::{Draft, Frozen};

use serde_json::Value;

/// Freezes a value into a read-only snapshot.
#[must_use]
pub fn freeze(value: impl Into<Frozen>) -> Frozen {
    value.into()
}

/// Produces a new snapshot by applying `recipe` to a draft copy of `base`.
///
/// # Examples
///
/// ```
/// use pipekit::snapshot::{freeze, produce};
/// use serde_json::json;
///
/// let base = freeze(json!({"traces": []}));
/// let next = produce(&base, |draft| {
///     draft["traces"].as_array_mut().unwrap().push(json!("auth"));
/// });
///
/// assert_eq!(base.get("traces"), Some(&json!([])));
/// assert_eq!(next.get("traces"), Some(&json!(["auth"])));
/// ```
#[must_use]
pub fn produce<F>(base: &Frozen, recipe: F) -> Frozen
where
    F: FnOnce(&mut Value),
{
    let mut draft = base.draft();
    recipe(&mut draft);
    draft.finish()
}
