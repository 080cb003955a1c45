//! `WebSocketPair` emulation
//!
//! Linking the endpoints is the provider's job. The pair only guarantees shape:
//! index 0 is the client handed back to the script, index 1 the server kept by the host.

use super::WorkerGlobals;
use crate::error::EnvError;
use crate::provider::SocketPair;

#[derive(Debug)]
pub struct WebSocketPair<S> {
    client: S,
    server: S,
}

impl<S> WebSocketPair<S> {
    /// Construct a pair from the provider installed on `globals`
    ///
    /// Fails with `ProviderNotConfigured` before [`WorkerGlobals::install`] has run.
    /// Otherwise the provider is called exactly once.
    pub fn new<C>(globals: &WorkerGlobals<C, S>) -> Result<Self, EnvError> {
        let provider = globals
            .websocket_pair_provider()
            .ok_or(EnvError::ProviderNotConfigured {
                provider: "websocket-pair",
            })?;

        let SocketPair { client, server } = provider.pair()?;
        Ok(Self { client, server })
    }

    /// Index 0: returned to the script
    pub fn client(&self) -> &S {
        &self.client
    }

    /// Index 1: accept(), send() and close() from the host side
    pub fn server(&self) -> &S {
        &self.server
    }

    pub fn server_mut(&mut self) -> &mut S {
        &mut self.server
    }

    /// `(client, server)`, i.e. `(pair[0], pair[1])`
    pub fn into_parts(self) -> (S, S) {
        (self.client, self.server)
    }
}
