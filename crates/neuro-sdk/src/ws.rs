//! WebSocket transport over `tokio-tungstenite`
//!
//! Plain `ws://` only. Ping/pong is answered by tungstenite while reading.

use crate::transport::{Connector, Transport, TransportEvent};
use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use neuro_sdk_core::{NeuroError, Result};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::debug;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Opens [`WsTransport`]s
#[derive(Debug, Clone, Copy, Default)]
pub struct WsConnector;

#[async_trait]
impl Connector for WsConnector {
    async fn connect(&self, url: &str) -> Result<Box<dyn Transport>> {
        let (ws, response) = connect_async(url).await.map_err(|e| {
            debug!("WebSocket connect to {} failed: {}", url, e);
            NeuroError::ConnectionError
        })?;
        debug!("WebSocket open to {} (status {})", url, response.status());
        Ok(Box::new(WsTransport { ws }))
    }
}

/// An open WebSocket connection
pub struct WsTransport {
    ws: WsStream,
}

#[async_trait]
impl Transport for WsTransport {
    async fn next_event(&mut self) -> TransportEvent {
        loop {
            match self.ws.next().await {
                Some(Ok(WsMessage::Text(text))) => {
                    return TransportEvent::Text(text.as_str().to_string());
                }
                Some(Ok(WsMessage::Binary(data))) => return TransportEvent::Binary(data.to_vec()),
                Some(Ok(WsMessage::Close(_))) | None => return TransportEvent::Closed,
                Some(Ok(WsMessage::Ping(_) | WsMessage::Pong(_) | WsMessage::Frame(_))) => {
                    continue;
                }
                Some(Err(e)) => return TransportEvent::Error(e.to_string()),
            }
        }
    }

    async fn send_text(&mut self, text: &str) -> Result<()> {
        self.ws
            .send(WsMessage::Text(text.to_string().into()))
            .await
            .map_err(|e| {
                debug!("WebSocket write failed: {}", e);
                NeuroError::SendFailed
            })
    }

    async fn close(&mut self) -> Result<()> {
        self.ws.close(None).await.map_err(|e| {
            debug!("WebSocket close failed: {}", e);
            NeuroError::ConnectionError
        })
    }
}
