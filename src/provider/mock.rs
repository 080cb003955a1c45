//! Mock provider set for testing
//!
//! Returns descriptive handles without touching any backend.
//! Records every call so tests can assert which keys were looked up.

use std::fmt;
use std::sync::Arc;

use anyhow::Result;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use thiserror::Error;

use super::ProviderSet;
use crate::binding::BindingKind;

/// Handle returned by [`MockProviders`] for every backend kind
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MockHandle {
    pub kind: BindingKind,
    pub key: String,
}

impl MockHandle {
    pub fn new(kind: BindingKind, key: impl Into<String>) -> Self {
        Self {
            kind,
            key: key.into(),
        }
    }
}

impl fmt::Display for MockHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.kind, self.key)
    }
}

/// Simulated backend failure
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{kind} backend unavailable for '{key}': {message}")]
pub struct MockProviderError {
    pub kind: BindingKind,
    pub key: String,
    pub message: String,
}

/// Provider set that hands out [`MockHandle`]s
#[derive(Clone, Default)]
pub struct MockProviders {
    /// Every (kind, key) lookup, in call order
    calls: Arc<Mutex<Vec<(BindingKind, String)>>>,
    /// Kinds configured to fail
    failures: FxHashMap<BindingKind, String>,
}

impl MockProviders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every lookup of `kind` fail with `message`
    pub fn with_failure(mut self, kind: BindingKind, message: impl Into<String>) -> Self {
        self.failures.insert(kind, message.into());
        self
    }

    /// Get all recorded lookups
    pub fn calls(&self) -> Vec<(BindingKind, String)> {
        self.calls.lock().clone()
    }

    /// Number of recorded lookups
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Clear all recorded lookups
    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    fn lookup(&self, kind: BindingKind, key: &str) -> Result<MockHandle> {
        self.calls.lock().push((kind, key.to_string()));

        if let Some(message) = self.failures.get(&kind) {
            return Err(MockProviderError {
                kind,
                key: key.to_string(),
                message: message.clone(),
            }
            .into());
        }
        Ok(MockHandle::new(kind, key))
    }
}

impl ProviderSet for MockProviders {
    type KvNamespace = MockHandle;
    type DoNamespace = MockHandle;
    type R2Bucket = MockHandle;
    type AnalyticsEngine = MockHandle;
    type D1Database = MockHandle;

    fn kv_namespace(&self, name: &str) -> Result<MockHandle> {
        self.lookup(BindingKind::KvNamespace, name)
    }

    fn do_namespace(&self, name: &str) -> Result<MockHandle> {
        self.lookup(BindingKind::DoNamespace, name)
    }

    fn r2_bucket(&self, bucket_name: &str) -> Result<MockHandle> {
        self.lookup(BindingKind::R2Bucket, bucket_name)
    }

    fn analytics_engine(&self, dataset: &str) -> Result<MockHandle> {
        self.lookup(BindingKind::AnalyticsEngine, dataset)
    }

    fn d1_database(&self, uuid: &str) -> Result<MockHandle> {
        self.lookup(BindingKind::D1Database, uuid)
    }
}
