//! Frozen snapshots and copy-on-write drafts.

use crate::errors::PipelineError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

/// A deeply read-only JSON value.
///
/// Cloning a snapshot is cheap and shares the underlying value.
#[derive(Clone, PartialEq)]
pub struct Frozen(Arc<Value>);

impl Frozen {
    /// Freezes a value.
    #[must_use]
    pub fn new(value: Value) -> Self {
        Self(Arc::new(value))
    }

    /// Returns the frozen value.
    #[must_use]
    pub fn value(&self) -> &Value {
        &self.0
    }

    /// Returns true if both snapshots share the same allocation.
    #[must_use]
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }

    /// Returns an owned copy of the value.
    #[must_use]
    pub fn to_value(&self) -> Value {
        (*self.0).clone()
    }

    /// Unwraps the value, copying only if the snapshot is still shared.
    #[must_use]
    pub fn into_value(self) -> Value {
        Arc::try_unwrap(self.0).unwrap_or_else(|shared| (*shared).clone())
    }

    /// Starts a copy-on-write draft of this snapshot.
    #[must_use]
    pub fn draft(&self) -> Draft {
        Draft {
            value: self.to_value(),
        }
    }

    /// Attempts to write `value` at the JSON pointer `path`.
    ///
    /// Snapshots reject writes at every depth. A write counts as an attempt
    /// on the snapshot when the container it would land in exists.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Immutable`] naming `path`, or
    /// [`PipelineError::PathNotFound`] if no container exists there.
    pub fn try_set(&self, path: &str, _value: Value) -> Result<(), PipelineError> {
        if path.is_empty() || self.has_slot(path) {
            return Err(PipelineError::immutable(path));
        }
        Err(PipelineError::path_not_found(path))
    }

    /// Attempts to push onto the array at the JSON pointer `path`.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Immutable`] if `path` is an array,
    /// [`PipelineError::PathNotFound`] otherwise.
    pub fn try_push(&self, path: &str, _value: Value) -> Result<(), PipelineError> {
        match self.0.pointer(path) {
            Some(Value::Array(_)) => Err(PipelineError::immutable(path)),
            _ => Err(PipelineError::path_not_found(path)),
        }
    }

    /// Attempts to remove the entry at the JSON pointer `path`.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Immutable`] if the entry exists,
    /// [`PipelineError::PathNotFound`] otherwise.
    pub fn try_remove(&self, path: &str) -> Result<Value, PipelineError> {
        if !path.is_empty() && self.0.pointer(path).is_some() {
            return Err(PipelineError::immutable(path));
        }
        Err(PipelineError::path_not_found(path))
    }

    /// True if `path` names a key of an existing object, or an index (or `-`)
    /// within the bounds of an existing array.
    fn has_slot(&self, path: &str) -> bool {
        let Some((parent, last)) = path.rsplit_once('/') else {
            return false;
        };
        match self.0.pointer(parent) {
            Some(Value::Object(_)) => true,
            Some(Value::Array(items)) => {
                last == "-" || last.parse::<usize>().is_ok_and(|i| i <= items.len())
            }
            _ => false,
        }
    }
}

impl Deref for Frozen {
    type Target = Value;

    fn deref(&self) -> &Value {
        &self.0
    }
}

impl AsRef<Value> for Frozen {
    fn as_ref(&self) -> &Value {
        &self.0
    }
}

impl From<Value> for Frozen {
    fn from(value: Value) -> Self {
        Self::new(value)
    }
}

impl From<Draft> for Frozen {
    fn from(draft: Draft) -> Self {
        draft.finish()
    }
}

impl PartialEq<Value> for Frozen {
    fn eq(&self, other: &Value) -> bool {
        *self.0 == *other
    }
}

impl fmt::Debug for Frozen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Frozen").field(&*self.0).finish()
    }
}

impl fmt::Display for Frozen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.0, f)
    }
}

impl Serialize for Frozen {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Frozen {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::new)
    }
}

/// A mutable working copy of a snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Draft {
    value: Value,
}

impl Draft {
    /// Freezes the draft into a new snapshot.
    #[must_use]
    pub fn finish(self) -> Frozen {
        Frozen::new(self.value)
    }
}

impl Deref for Draft {
    type Target = Value;

    fn deref(&self) -> &Value {
        &self.value
    }
}

impl DerefMut for Draft {
    fn deref_mut(&mut self) -> &mut Value {
        &mut self.value
    }
}
