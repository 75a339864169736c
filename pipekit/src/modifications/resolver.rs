//! Resolution of a base list plus modifications into one linear order.
//!
//! Relative modifications may refer to middlewares that other modifications
//! of the same request bring in. Before anything is spliced, modifications
//! are ordered by weight: the number of modifications that (transitively)
//! refer to the middleware a modification brings in. Heavier ones are
//! applied first, ties keep the caller's order.

use super::{Modification, Position};
use crate::errors::PipelineError;
use crate::middleware::MiddlewareEntry;
use std::collections::{HashMap, HashSet};
use tracing::trace;

/// Resolves the final middleware list for one request.
///
/// `base` is never modified; the result holds clones of its entries, so a
/// `replace` only rebinds the handler of the request's own copy.
///
/// # Errors
///
/// Returns [`PipelineError::MiddlewareNotFound`] when a relative or skip
/// modification refers to a name absent from the working list.
pub fn resolve(
    base: &[MiddlewareEntry],
    modifications: &[Modification],
) -> Result<Vec<MiddlewareEntry>, PipelineError> {
    let mut working = base.to_vec();
    // Insertion point for appends: after the base entries and earlier appends.
    let mut tail = base.len();

    for modification in order_by_weight(modifications) {
        match modification {
            Modification::Append(middleware) => {
                working.insert(tail, middleware.clone());
                tail += 1;
            }
            Modification::Relative {
                middleware,
                position,
                target,
            } => {
                let index = locate(&working, target)?;
                match position {
                    Position::Before => {
                        working.insert(index, middleware.clone());
                        if index < tail {
                            tail += 1;
                        }
                    }
                    Position::After => {
                        working.insert(index + 1, middleware.clone());
                        if index + 1 < tail {
                            tail += 1;
                        }
                    }
                    Position::Replace => {
                        working[index].set_handler(middleware.handler().clone());
                    }
                }
            }
            Modification::Skip { target } => {
                let index = locate(&working, target)?;
                working.remove(index);
                if index < tail {
                    tail -= 1;
                }
            }
        }
    }

    trace!(
        order = ?working.iter().map(MiddlewareEntry::name).collect::<Vec<_>>(),
        "Resolved middleware order"
    );

    Ok(working)
}

fn locate(working: &[MiddlewareEntry], name: &str) -> Result<usize, PipelineError> {
    working
        .iter()
        .position(|entry| entry.is_named(name))
        .ok_or_else(|| PipelineError::not_found(name))
}

/// Stable-sorts modifications by descending weight.
fn order_by_weight(modifications: &[Modification]) -> Vec<&Modification> {
    // target name -> names brought in by modifications referring to it
    let mut dependents: HashMap<&str, Vec<Option<&str>>> = HashMap::new();
    for modification in modifications {
        if let Some(target) = modification.target() {
            dependents
                .entry(target)
                .or_default()
                .push(modification.name());
        }
    }

    let mut weights: HashMap<&str, usize> = HashMap::new();
    let mut in_progress = HashSet::new();

    let mut ordered: Vec<(usize, &Modification)> = modifications
        .iter()
        .map(|modification| {
            let weight = modification.name().map_or(0, |name| {
                weight_of(name, &dependents, &mut weights, &mut in_progress)
            });
            (weight, modification)
        })
        .collect();

    ordered.sort_by(|a, b| b.0.cmp(&a.0));
    ordered.into_iter().map(|(_, modification)| modification).collect()
}

/// One pending node of the weight traversal.
struct Frame<'a> {
    name: &'a str,
    cursor: usize,
    weight: usize,
}

/// Weight of `name`: each modification referring to it counts 1, plus the
/// weight of whatever that modification brings in.
///
/// Traverses with an explicit stack so long relative chains do not grow the
/// call stack.
fn weight_of<'a>(
    name: &'a str,
    dependents: &HashMap<&'a str, Vec<Option<&'a str>>>,
    weights: &mut HashMap<&'a str, usize>,
    in_progress: &mut HashSet<&'a str>,
) -> usize {
    if let Some(&weight) = weights.get(name) {
        return weight;
    }
    if !in_progress.insert(name) {
        return 0;
    }

    let mut stack = vec![Frame {
        name,
        cursor: 0,
        weight: 0,
    }];

    loop {
        let Some(frame) = stack.last_mut() else {
            return 0;
        };
        let deps = dependents.get(frame.name).map_or(&[][..], Vec::as_slice);

        if let Some(&dep) = deps.get(frame.cursor) {
            frame.cursor += 1;
            frame.weight += 1;

            let Some(dep) = dep else { continue };
            if let Some(&weight) = weights.get(dep) {
                frame.weight += weight;
            } else if in_progress.insert(dep) {
                stack.push(Frame {
                    name: dep,
                    cursor: 0,
                    weight: 0,
                });
            }
            // Otherwise `dep` is already on the stack (a cycle) and adds nothing more.
            continue;
        }

        let Frame { name, weight, .. } = *frame;
        stack.pop();
        in_progress.remove(name);
        weights.insert(name, weight);

        match stack.last_mut() {
            Some(parent) => parent.weight += weight,
            None => return weight,
        }
    }
}
