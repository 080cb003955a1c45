//! Binding resolution - declaration → script-visible value
//!
//! Literal kinds return their embedded string. Backend kinds call the matching
//! provider exactly once with the binding's key and forward the handle unchanged.
//! Nothing is cached here; callers that want memoization wrap the provider set.

use std::fmt;

use rustc_hash::FxHashMap;
use serde_json::Value;
use tracing::{debug, trace};

use super::model::{Binding, BindingKind, BindingsMap};
use crate::error::EnvError;
use crate::provider::ProviderSet;

/// A resolved binding: literal string or provider handle
#[derive(Clone, PartialEq, Eq)]
pub enum BindingValue<K, D, R, A, Q> {
    Text(String),
    Secret(String),
    KvNamespace(K),
    DoNamespace(D),
    R2Bucket(R),
    AnalyticsEngine(A),
    D1Database(Q),
}

/// [`BindingValue`] with the handle types of provider set `P`
pub type ResolvedValue<P> = BindingValue<
    <P as ProviderSet>::KvNamespace,
    <P as ProviderSet>::DoNamespace,
    <P as ProviderSet>::R2Bucket,
    <P as ProviderSet>::AnalyticsEngine,
    <P as ProviderSet>::D1Database,
>;

impl<K, D, R, A, Q> BindingValue<K, D, R, A, Q> {
    pub fn kind(&self) -> BindingKind {
        match self {
            Self::Text(_) => BindingKind::Text,
            Self::Secret(_) => BindingKind::Secret,
            Self::KvNamespace(_) => BindingKind::KvNamespace,
            Self::DoNamespace(_) => BindingKind::DoNamespace,
            Self::R2Bucket(_) => BindingKind::R2Bucket,
            Self::AnalyticsEngine(_) => BindingKind::AnalyticsEngine,
            Self::D1Database(_) => BindingKind::D1Database,
        }
    }

    /// Literal content for text and secret bindings
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) | Self::Secret(s) => Some(s),
            _ => None,
        }
    }
}

/// Secrets are redacted
impl<K, D, R, A, Q> fmt::Debug for BindingValue<K, D, R, A, Q>
where
    K: fmt::Debug,
    D: fmt::Debug,
    R: fmt::Debug,
    A: fmt::Debug,
    Q: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.debug_tuple("Text").field(s).finish(),
            Self::Secret(_) => f.debug_tuple("Secret").field(&"<redacted>").finish(),
            Self::KvNamespace(h) => f.debug_tuple("KvNamespace").field(h).finish(),
            Self::DoNamespace(h) => f.debug_tuple("DoNamespace").field(h).finish(),
            Self::R2Bucket(h) => f.debug_tuple("R2Bucket").field(h).finish(),
            Self::AnalyticsEngine(h) => f.debug_tuple("AnalyticsEngine").field(h).finish(),
            Self::D1Database(h) => f.debug_tuple("D1Database").field(h).finish(),
        }
    }
}

/// Resolve one binding against a provider set
///
/// Provider errors come back as [`EnvError::Provider`] holding the provider's own error.
pub fn resolve<P: ProviderSet>(binding: &Binding, providers: &P) -> Result<ResolvedValue<P>, EnvError> {
    if let Some(key) = binding.key() {
        trace!(kind = %binding.kind(), key, "calling provider");
    }

    let value = match binding {
        Binding::Text { value } => BindingValue::Text(value.clone()),
        Binding::Secret { secret } => BindingValue::Secret(secret.clone()),
        Binding::KvNamespace { name } => BindingValue::KvNamespace(providers.kv_namespace(name)?),
        Binding::DoNamespace { name } => BindingValue::DoNamespace(providers.do_namespace(name)?),
        Binding::R2Bucket { bucket_name } => BindingValue::R2Bucket(providers.r2_bucket(bucket_name)?),
        Binding::AnalyticsEngine { dataset } => {
            BindingValue::AnalyticsEngine(providers.analytics_engine(dataset)?)
        }
        Binding::D1Database { uuid } => BindingValue::D1Database(providers.d1_database(uuid)?),
    };

    Ok(value)
}

/// Resolve a binding straight from its config form
///
/// Shapes that match none of the seven kinds fail with
/// [`EnvError::UnsupportedBindingKind`] before any provider is called.
pub fn resolve_raw<P: ProviderSet>(raw: &Value, providers: &P) -> Result<ResolvedValue<P>, EnvError> {
    let binding = Binding::from_value(raw)?;
    resolve(&binding, providers)
}

/// The `env` object handed to a module worker: binding name → resolved value
pub struct WorkerEnv<P: ProviderSet> {
    values: FxHashMap<String, ResolvedValue<P>>,
}

impl<P: ProviderSet> WorkerEnv<P> {
    /// Resolve every binding; the first failure aborts
    pub fn resolve(bindings: &BindingsMap, providers: &P) -> Result<Self, EnvError> {
        let mut values = FxHashMap::default();
        values.reserve(bindings.len());

        for (name, binding) in bindings {
            let value = resolve(binding, providers)?;
            debug!(name = %name, kind = %binding.kind(), "resolved binding");
            values.insert(name.clone(), value);
        }

        Ok(Self { values })
    }

    pub fn get(&self, name: &str) -> Option<&ResolvedValue<P>> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ResolvedValue<P>)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Binding names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.values.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn into_inner(self) -> FxHashMap<String, ResolvedValue<P>> {
        self.values
    }
}

impl<P: ProviderSet> Default for WorkerEnv<P> {
    fn default() -> Self {
        Self {
            values: FxHashMap::default(),
        }
    }
}

/// Lists names and kinds only
impl<P: ProviderSet> fmt::Debug for WorkerEnv<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for name in self.names() {
            if let Some(value) = self.values.get(name) {
                map.entry(&name, &value.kind());
            }
        }
        map.finish()
    }
}
