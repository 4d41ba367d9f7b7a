//! Per-request context visible to legacy handlers.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Shared, type-erased context value.
pub type ContextValue = Arc<dyn Any + Send + Sync>;

/// Key/value carrier attached to a `LegacyRequest`.
///
/// Values are looked up by key and downcast to the type the handler expects.
#[derive(Clone, Default)]
pub struct Context {
    values: HashMap<String, ContextValue>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Typed lookup. `None` if the key is absent or holds another type.
    pub fn value<T: Any + Send + Sync>(&self, key: &str) -> Option<&T> {
        self.values.get(key).and_then(|v| v.downcast_ref::<T>())
    }

    /// Untyped lookup.
    pub fn raw_value(&self, key: &str) -> Option<&ContextValue> {
        self.values.get(key)
    }

    /// Derive a context carrying one more value.
    pub fn with_value<T: Any + Send + Sync>(mut self, key: impl Into<String>, value: T) -> Self {
        self.values.insert(key.into(), Arc::new(value));
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, ContextValue)> for Context {
    fn from_iter<I: IntoIterator<Item = (K, ContextValue)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("keys", &self.values.keys().collect::<Vec<_>>())
            .finish()
    }
}
