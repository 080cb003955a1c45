//! # Global Environment
//!
//! The platform-specific globals a worker script expects, held on an explicit context
//! object instead of the host's real global scope so several environments can coexist
//! (one per isolate, one per test).
//!
//! | Global | Substitute |
//! |--------|------------|
//! | `caches` | registry from the installed [`CachesProvider`] |
//! | `Response` | [`WorkerResponse`] with upgrade support |
//! | `WebSocketPair` | [`WebSocketPair`] backed by the installed provider |
//! | `Request.prototype.clone` | [`clone_preserving_cf`] |
//!
//! ## Lifecycle
//!
//! ```text
//! WorkerGlobals::new()          nothing installed, standard behaviour
//!         ↓
//! install(caches, pairs)        every symbol replaced (repeatable, last call wins)
//!         ↓
//! request handling              &self only
//!         ↓
//! reset()                       back to new()
//! ```
//!
//! Install before any script code runs. References a script captured earlier (a cached
//! `caches` handle, say) keep pointing at what was installed when they were taken.

mod request;
mod response;
mod socket;

pub use request::{clone_preserving_cf, structured_clone, WorkerRequest};
pub use response::{ResponseConstructor, ResponseInit, WorkerResponse};
pub use socket::WebSocketPair;

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::binding::{BindingsMap, WorkerEnv};
use crate::error::EnvError;
use crate::provider::{CachesProvider, ProviderSet, WebSocketPairProvider};

/// Globals the environment replaces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GlobalSymbol {
    Caches,
    Response,
    WebSocketPair,
    Request,
}

impl GlobalSymbol {
    pub const ALL: [GlobalSymbol; 4] = [
        GlobalSymbol::Caches,
        GlobalSymbol::Response,
        GlobalSymbol::WebSocketPair,
        GlobalSymbol::Request,
    ];

    /// Name as seen by script code
    pub fn name(self) -> &'static str {
        match self {
            Self::Caches => "caches",
            Self::Response => "Response",
            Self::WebSocketPair => "WebSocketPair",
            Self::Request => "Request",
        }
    }
}

impl fmt::Display for GlobalSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How `Request.clone()` treats the `cf` attachment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestClone {
    /// Host behaviour: `cf` is dropped
    #[default]
    Standard,
    /// `cf` is structurally cloned onto the copy
    PreserveCf,
}

/// Environment context: cache registry `C`, socket endpoints `S`
pub struct WorkerGlobals<C, S> {
    caches: Option<C>,
    websocket_pair: Option<Arc<dyn WebSocketPairProvider<S>>>,
    response: ResponseConstructor,
    request_clone: RequestClone,
    install_count: u64,
}

impl<C, S> WorkerGlobals<C, S> {
    pub fn new() -> Self {
        Self {
            caches: None,
            websocket_pair: None,
            response: ResponseConstructor::Standard,
            request_clone: RequestClone::Standard,
            install_count: 0,
        }
    }

    /// Install the module-worker globals
    ///
    /// Replaces the cache registry, the socket pair provider, the `Response`
    /// constructor and request cloning. Calling it again swaps every substitute for
    /// the new one; nothing accumulates.
    pub fn install<CP, WP>(&mut self, caches: CP, websocket_pair: WP)
    where
        CP: CachesProvider<Caches = C>,
        WP: WebSocketPairProvider<S> + 'static,
    {
        self.install_caches(&caches);
        self.websocket_pair = Some(Arc::new(websocket_pair));
        self.install_shared();
        debug!(install_count = self.install_count, "installed module globals");
    }

    /// Install the script-worker globals and resolve its bindings
    ///
    /// Script workers get no `WebSocketPair`; their bindings become top-level globals,
    /// which is what the returned env holds. Bindings are resolved first: if one
    /// fails, nothing is installed.
    pub fn install_script<CP, P>(
        &mut self,
        bindings: &BindingsMap,
        caches: CP,
        providers: &P,
    ) -> Result<WorkerEnv<P>, EnvError>
    where
        CP: CachesProvider<Caches = C>,
        P: ProviderSet,
    {
        let env = WorkerEnv::resolve(bindings, providers)?;
        self.install_caches(&caches);
        self.install_shared();
        debug!(
            install_count = self.install_count,
            bindings = env.len(),
            "installed script globals"
        );
        Ok(env)
    }

    fn install_caches<CP>(&mut self, caches: &CP)
    where
        CP: CachesProvider<Caches = C>,
    {
        if self.caches.take().is_some() {
            debug!("removed previously installed cache registry");
        }
        self.caches = Some(caches.caches());
    }

    fn install_shared(&mut self) {
        self.response = ResponseConstructor::Worker;
        self.request_clone = RequestClone::PreserveCf;
        self.install_count += 1;
    }

    /// Drop every substitute
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// The script's `caches`
    pub fn caches(&self) -> Option<&C> {
        self.caches.as_ref()
    }

    /// What the script's `Response` refers to
    pub fn response_constructor(&self) -> ResponseConstructor {
        self.response
    }

    pub fn request_clone(&self) -> RequestClone {
        self.request_clone
    }

    pub fn is_installed(&self, symbol: GlobalSymbol) -> bool {
        match symbol {
            GlobalSymbol::Caches => self.caches.is_some(),
            GlobalSymbol::Response => self.response == ResponseConstructor::Worker,
            GlobalSymbol::WebSocketPair => self.websocket_pair.is_some(),
            GlobalSymbol::Request => self.request_clone == RequestClone::PreserveCf,
        }
    }

    /// Currently replaced globals, each listed once
    pub fn installed(&self) -> Vec<GlobalSymbol> {
        GlobalSymbol::ALL
            .into_iter()
            .filter(|symbol| self.is_installed(*symbol))
            .collect()
    }

    /// Number of install calls since creation or the last reset
    pub fn install_count(&self) -> u64 {
        self.install_count
    }

    pub(crate) fn websocket_pair_provider(&self) -> Option<&dyn WebSocketPairProvider<S>> {
        self.websocket_pair.as_deref()
    }

    /// `new WebSocketPair()`
    pub fn websocket_pair(&self) -> Result<WebSocketPair<S>, EnvError> {
        WebSocketPair::new(self)
    }

    /// `new Response(body, init)` with whichever constructor is installed
    pub fn new_response(
        &self,
        body: Option<Vec<u8>>,
        init: ResponseInit<S>,
    ) -> Result<WorkerResponse<S>, EnvError> {
        WorkerResponse::construct(self.response, body, init)
    }

    /// `request.clone()` with whichever clone behaviour is installed
    pub fn clone_request<M>(&self, request: &WorkerRequest<M>) -> Result<WorkerRequest<M>, EnvError>
    where
        M: Serialize + DeserializeOwned,
    {
        match self.request_clone {
            RequestClone::Standard => Ok(request.duplicate()),
            RequestClone::PreserveCf => clone_preserving_cf(request),
        }
    }
}

impl<C, S> Default for WorkerGlobals<C, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C, S> fmt::Debug for WorkerGlobals<C, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkerGlobals")
            .field("installed", &self.installed())
            .field("install_count", &self.install_count)
            .finish()
    }
}
