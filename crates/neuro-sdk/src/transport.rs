//! Transport abstractions
//!
//! The session drives any [`Transport`]; [`crate::ws::WsConnector`] provides the
//! WebSocket one. Other implementations (in-process channels for tests, proxies) plug in
//! through [`Connector`].

use async_trait::async_trait;
use neuro_sdk_core::Result;

/// Something observed on the connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// A complete text frame
    Text(String),
    /// A complete binary frame
    Binary(Vec<u8>),
    /// Peer closed the connection, or the stream ended
    Closed,
    /// Connection failed; no further events follow
    Error(String),
}

/// An open, bidirectional frame transport
#[async_trait]
pub trait Transport: Send {
    /// Wait for the next event
    ///
    /// Must be cancel safe: the session races it against its outbound queue.
    async fn next_event(&mut self) -> TransportEvent;

    /// Write one text frame
    async fn send_text(&mut self, text: &str) -> Result<()>;

    /// Close the connection
    async fn close(&mut self) -> Result<()>;
}

/// Opens transports
///
/// A returned transport is already open.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self, url: &str) -> Result<Box<dyn Transport>>;
}
