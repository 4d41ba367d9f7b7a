//! Per-request user values on the host side.
//!
//! Middleware running before the adapter stores values here; the adapter
//! carries them into the legacy request's `Context`.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use axum::http::Request;

use crate::legacy::{Context, ContextValue};

/// Mutable key/value store attached to an inbound request.
#[derive(Clone, Default)]
pub struct UserValues {
    values: HashMap<String, ContextValue>,
}

impl UserValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set<T: Any + Send + Sync>(&mut self, key: impl Into<String>, value: T) {
        self.values.insert(key.into(), Arc::new(value));
    }

    pub fn get<T: Any + Send + Sync>(&self, key: &str) -> Option<&T> {
        self.values.get(key).and_then(|v| v.downcast_ref::<T>())
    }

    pub fn remove(&mut self, key: &str) -> bool {
        self.values.remove(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Build a legacy `Context` holding the same values under the same keys.
    pub fn to_context(&self) -> Context {
        self.values
            .iter()
            .map(|(k, v)| (k.clone(), Arc::clone(v)))
            .collect()
    }
}

impl fmt::Debug for UserValues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserValues")
            .field("keys", &self.values.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Extension trait for setting user values on a request before it reaches
/// the adapter.
pub trait UserValueExt {
    fn set_user_value<T: Any + Send + Sync>(&mut self, key: impl Into<String>, value: T);

    fn user_value<T: Any + Send + Sync>(&self, key: &str) -> Option<&T>;
}

impl<B> UserValueExt for Request<B> {
    fn set_user_value<T: Any + Send + Sync>(&mut self, key: impl Into<String>, value: T) {
        let extensions = self.extensions_mut();
        if let Some(values) = extensions.get_mut::<UserValues>() {
            values.set(key, value);
        } else {
            let mut values = UserValues::new();
            values.set(key, value);
            extensions.insert(values);
        }
    }

    fn user_value<T: Any + Send + Sync>(&self, key: &str) -> Option<&T> {
        self.extensions()
            .get::<UserValues>()
            .and_then(|values| values.get::<T>(key))
    }
}
