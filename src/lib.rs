//! workerenv - local runtime environment for edge worker scripts
//!
//! Resolves a worker's declared bindings into provider-backed handles and installs the
//! platform globals (`caches`, `Response`, `WebSocketPair`, `Request.clone`) on an
//! explicit [`WorkerGlobals`] context.
//!
//! ```rust
//! use workerenv::binding::{Binding, BindingKind, BindingsMap, WorkerEnv};
//! use workerenv::provider::{LocalWebSocketPairProvider, MockProviders};
//! use workerenv::WorkerGlobals;
//!
//! let mut globals = WorkerGlobals::new();
//! globals.install(|| "local-caches", LocalWebSocketPairProvider);
//!
//! let mut bindings = BindingsMap::default();
//! bindings.insert("SESSIONS".into(), Binding::KvNamespace { name: "SESSIONS".into() });
//!
//! let providers = MockProviders::new();
//! let env = WorkerEnv::resolve(&bindings, &providers).unwrap();
//! assert_eq!(env.get("SESSIONS").map(|v| v.kind()), Some(BindingKind::KvNamespace));
//!
//! let pair = globals.websocket_pair().unwrap();
//! let (_client, _server) = pair.into_parts();
//! ```

pub mod binding;
pub mod config;
pub mod error;
pub mod globals;
pub mod provider;

pub use binding::{Binding, BindingKind, BindingValue, BindingsMap, WorkerEnv};
pub use config::WorkerConfig;
pub use error::{EnvError, FixSuggestion};
pub use globals::{GlobalSymbol, WebSocketPair, WorkerGlobals, WorkerRequest, WorkerResponse};
