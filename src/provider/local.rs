//! In-process socket pairs
//!
//! Two [`LocalSocket`] endpoints cross-wired with unbounded tokio channels: whatever one
//! side sends, the other side receives. Close frames are delivered like any other message.

use anyhow::Result;
use thiserror::Error;
use tokio::sync::mpsc;

use super::{SocketPair, WebSocketPairProvider};

/// A single websocket frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SocketMessage {
    Text(String),
    Binary(Vec<u8>),
    Close { code: u16, reason: String },
}

/// The other endpoint has been dropped
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("peer socket closed")]
pub struct PeerClosed;

/// One end of a linked pair
#[derive(Debug)]
pub struct LocalSocket {
    outgoing: mpsc::UnboundedSender<SocketMessage>,
    incoming: mpsc::UnboundedReceiver<SocketMessage>,
}

impl LocalSocket {
    /// Create two endpoints linked to each other
    pub fn linked() -> SocketPair<LocalSocket> {
        let (client_tx, server_rx) = mpsc::unbounded_channel();
        let (server_tx, client_rx) = mpsc::unbounded_channel();

        SocketPair {
            client: LocalSocket {
                outgoing: client_tx,
                incoming: client_rx,
            },
            server: LocalSocket {
                outgoing: server_tx,
                incoming: server_rx,
            },
        }
    }

    pub fn send(&self, message: SocketMessage) -> Result<(), PeerClosed> {
        self.outgoing.send(message).map_err(|_| PeerClosed)
    }

    pub fn send_text(&self, text: impl Into<String>) -> Result<(), PeerClosed> {
        self.send(SocketMessage::Text(text.into()))
    }

    pub fn close(&self, code: u16, reason: impl Into<String>) -> Result<(), PeerClosed> {
        self.send(SocketMessage::Close {
            code,
            reason: reason.into(),
        })
    }

    /// Next message from the peer, `None` once the peer is gone and drained
    pub async fn recv(&mut self) -> Option<SocketMessage> {
        self.incoming.recv().await
    }

    /// Non-blocking variant of [`LocalSocket::recv`]
    pub fn try_recv(&mut self) -> Option<SocketMessage> {
        self.incoming.try_recv().ok()
    }
}

/// Hands out a fresh [`LocalSocket`] pair per call
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalWebSocketPairProvider;

impl WebSocketPairProvider<LocalSocket> for LocalWebSocketPairProvider {
    fn pair(&self) -> Result<SocketPair<LocalSocket>> {
        Ok(LocalSocket::linked())
    }
}
