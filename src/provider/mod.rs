//! # Provider Abstraction Layer
//!
//! Host-supplied backends that turn binding keys into live handles.
//!
//! ## Overview
//!
//! - [`ProviderSet`] - one method per backend binding kind
//! - [`CachesProvider`] - supplies the global cache registry
//! - [`WebSocketPairProvider`] - supplies linked client/server socket endpoints
//! - [`MockProviders`] - recording provider set for tests and the CLI
//! - [`LocalWebSocketPairProvider`] - channel-backed in-process socket pairs
//!
//! Handles are opaque to this crate: they are forwarded to the script environment as
//! returned and never cached, compared or dropped early by the resolver.
//!
//! ## Closures as providers
//!
//! Cache registry and socket pair providers are usually plain closures:
//!
//! ```rust
//! use workerenv::provider::{CachesProvider, SocketPair, WebSocketPairProvider};
//!
//! let caches = || "default-cache-registry";
//! assert_eq!(caches.caches(), "default-cache-registry");
//!
//! let pairs = || -> anyhow::Result<_> { Ok(SocketPair { client: 1u32, server: 2u32 }) };
//! let pair = pairs.pair().unwrap();
//! assert_eq!((pair.client, pair.server), (1, 2));
//! ```

mod local;
mod mock;

pub use local::{LocalSocket, LocalWebSocketPairProvider, PeerClosed, SocketMessage};
pub use mock::{MockHandle, MockProviderError, MockProviders};

use anyhow::Result;

// ============================================================================
// BINDING PROVIDERS
// ============================================================================

/// Backends for the five provider-resolved binding kinds
///
/// Each method receives the binding's key (namespace name, bucket name, dataset or
/// database uuid) and returns the handle the script sees under the binding's name.
/// Errors are forwarded to the caller of the resolver unchanged.
pub trait ProviderSet {
    type KvNamespace;
    type DoNamespace;
    type R2Bucket;
    type AnalyticsEngine;
    type D1Database;

    fn kv_namespace(&self, name: &str) -> Result<Self::KvNamespace>;

    fn do_namespace(&self, name: &str) -> Result<Self::DoNamespace>;

    fn r2_bucket(&self, bucket_name: &str) -> Result<Self::R2Bucket>;

    fn analytics_engine(&self, dataset: &str) -> Result<Self::AnalyticsEngine>;

    fn d1_database(&self, uuid: &str) -> Result<Self::D1Database>;
}

impl<P: ProviderSet + ?Sized> ProviderSet for &P {
    type KvNamespace = P::KvNamespace;
    type DoNamespace = P::DoNamespace;
    type R2Bucket = P::R2Bucket;
    type AnalyticsEngine = P::AnalyticsEngine;
    type D1Database = P::D1Database;

    fn kv_namespace(&self, name: &str) -> Result<Self::KvNamespace> {
        (**self).kv_namespace(name)
    }

    fn do_namespace(&self, name: &str) -> Result<Self::DoNamespace> {
        (**self).do_namespace(name)
    }

    fn r2_bucket(&self, bucket_name: &str) -> Result<Self::R2Bucket> {
        (**self).r2_bucket(bucket_name)
    }

    fn analytics_engine(&self, dataset: &str) -> Result<Self::AnalyticsEngine> {
        (**self).analytics_engine(dataset)
    }

    fn d1_database(&self, uuid: &str) -> Result<Self::D1Database> {
        (**self).d1_database(uuid)
    }
}

// ============================================================================
// GLOBAL PROVIDERS
// ============================================================================

/// Supplies the registry installed as the script's global `caches`
pub trait CachesProvider {
    type Caches;

    fn caches(&self) -> Self::Caches;
}

impl<F, C> CachesProvider for F
where
    F: Fn() -> C,
{
    type Caches = C;

    fn caches(&self) -> C {
        self()
    }
}

/// Two linked socket endpoints
///
/// `client` goes back to the script (typically into a 101 response), `server` stays with
/// the host to read and write script-side messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocketPair<S> {
    pub client: S,
    pub server: S,
}

/// Supplies linked endpoints for every `WebSocketPair` the script constructs
pub trait WebSocketPairProvider<S>: Send + Sync {
    fn pair(&self) -> Result<SocketPair<S>>;
}

impl<F, S> WebSocketPairProvider<S> for F
where
    F: Fn() -> Result<SocketPair<S>> + Send + Sync,
{
    fn pair(&self) -> Result<SocketPair<S>> {
        self()
    }
}
