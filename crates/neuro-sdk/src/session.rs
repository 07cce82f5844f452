//! Session: one connection from a game to the Neuro agent
//!
//! A session is driven by repeatedly calling [`Session::poll`] from one task. Frames can be
//! queued from anywhere through [`Session::send`] or a cloned [`OutboundSender`]; queued
//! frames wake a pending poll, which writes them to the transport.

use crate::adapter::TransportAdapter;
use crate::config::SessionConfig;
use crate::log::{LogSink, Logger};
use crate::queue::{self, InboundQueue, OutboundDrain, OutboundQueue};
use crate::transport::{Connector, Transport};
use crate::ws::WsConnector;
use neuro_sdk_core::{ActionRequest, Encoder, Message, NeuroError, Result};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info};

/// Live connection to the agent
///
/// Consumed by [`Session::destroy`]. There is no reconnect: once disconnected, create a
/// new session.
pub struct Session {
    adapter: TransportAdapter,
    outbound: OutboundDrain,
    sender: OutboundSender,
    poll_interval: Duration,
    shutdown_timeout: Duration,
}

/// Cloneable, thread-safe handle for queueing outbound messages
#[derive(Debug, Clone)]
pub struct OutboundSender {
    encoder: Arc<Encoder>,
    queue: OutboundQueue,
    connected: Arc<AtomicBool>,
    logger: Logger,
}

/// Everything one poll produced
///
/// Messages are always handed over, even when the iteration also hit an error.
#[derive(Debug, Default)]
pub struct PollBatch {
    /// Messages received since the previous poll, in arrival order
    pub messages: Vec<Message>,
    /// First error observed during the iteration
    pub error: Option<NeuroError>,
}

impl PollBatch {
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Inbound action requests in this batch
    pub fn actions(&self) -> impl Iterator<Item = &ActionRequest> {
        self.messages.iter().filter_map(Message::as_action)
    }

    /// Split into messages and the iteration's outcome
    pub fn into_parts(self) -> (Vec<Message>, Result<()>) {
        let outcome = match self.error {
            Some(e) => Err(e),
            None => Ok(()),
        };
        (self.messages, outcome)
    }
}

impl IntoIterator for PollBatch {
    type Item = Message;
    type IntoIter = std::vec::IntoIter<Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.into_iter()
    }
}

impl Session {
    /// Connect over WebSocket with the default log sink
    ///
    /// The default sink logs through the global `tracing` subscriber, or straight to
    /// stdout when none is installed.
    pub async fn create(config: SessionConfig) -> Result<Self> {
        Self::create_with(config, &WsConnector, None).await
    }

    /// Connect over WebSocket, logging to `sink`
    pub async fn create_with_sink(config: SessionConfig, sink: Arc<dyn LogSink>) -> Result<Self> {
        Self::create_with(config, &WsConnector, Some(sink)).await
    }

    /// Connect through an arbitrary transport
    ///
    /// Tries `connect_attempts` times, each bounded by `connect_timeout`, so creation
    /// never takes much longer than their product.
    pub async fn create_with(
        config: SessionConfig,
        connector: &dyn Connector,
        sink: Option<Arc<dyn LogSink>>,
    ) -> Result<Self> {
        let encoder = Encoder::new(&config.game_name)?;
        let url = config.resolve_url()?;
        let logger = Logger::new(config.flags, sink);

        let transport = connect_with_retry(connector, &url, &config, &logger).await?;
        info!("Connected to {} as {}", url, config.game_name);

        let connected = Arc::new(AtomicBool::new(true));
        let (queue, outbound) = queue::outbound(config.queue_capacity);
        let inbound = InboundQueue::new(config.queue_capacity.max(1));

        let sender = OutboundSender {
            encoder: Arc::new(encoder),
            queue,
            connected: connected.clone(),
            logger: logger.clone(),
        };
        let adapter = TransportAdapter::new(transport, inbound, connected, logger);

        Ok(Self {
            adapter,
            outbound,
            sender,
            poll_interval: config.poll_interval,
            shutdown_timeout: config.shutdown_timeout,
        })
    }

    /// Whether the transport is still open
    pub fn connected(&self) -> bool {
        self.adapter.connected()
    }

    /// Handle for sending from other tasks or threads
    pub fn sender(&self) -> OutboundSender {
        self.sender.clone()
    }

    /// Validate, encode and queue a message
    ///
    /// Returns once the frame is queued; it is written by the next (or current) poll.
    pub fn send(&self, msg: &Message) -> Result<()> {
        self.sender.send(msg)
    }

    /// Run one event-loop iteration with the configured poll interval
    pub async fn poll(&mut self) -> PollBatch {
        self.poll_for(self.poll_interval).await
    }

    /// Run one event-loop iteration waiting at most `timeout`, then hand over every
    /// queued inbound message
    pub async fn poll_for(&mut self, timeout: Duration) -> PollBatch {
        let error = self.adapter.pump(&mut self.outbound, timeout).await;
        PollBatch {
            messages: self.adapter.take_inbound(),
            error,
        }
    }

    /// Flush queued frames, close the connection and release both queues
    ///
    /// Flushing and closing together take at most `shutdown_timeout`. Messages never
    /// retrieved by `poll` are dropped. Senders cloned from this session fail with
    /// `Uninitialized` afterwards.
    pub async fn destroy(mut self) -> Result<()> {
        debug!("Destroying session");
        let timeout = self.shutdown_timeout;
        match self.adapter.shutdown(&mut self.outbound, timeout).await {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.outbound.close();
        self.sender.connected.store(false, Ordering::Release);
    }
}

impl OutboundSender {
    /// Validate, encode and queue a message
    ///
    /// Never blocks. Fails with `OutOfMemory` when the outbound queue is full,
    /// `ConnectionError` once disconnected and `Uninitialized` after the session is gone.
    pub fn send(&self, msg: &Message) -> Result<()> {
        if self.queue.is_closed() {
            return Err(NeuroError::Uninitialized);
        }
        if !self.connected() {
            return Err(NeuroError::ConnectionError);
        }
        if let Message::ActionsUnregister(names) = msg {
            if names.is_empty() {
                self.logger
                    .warn(format_args!("Unregistering an empty list of actions"));
            }
        }
        if let Message::ActionsRegister(actions) = msg {
            if actions.is_empty() {
                self.logger
                    .warn(format_args!("Registering an empty list of actions"));
            }
        }

        let frame = self.encoder.encode(msg).inspect_err(|e| {
            self.logger
                .error(format_args!("Cannot send {} message: {}", msg.kind(), e));
        })?;

        self.queue.push(frame).inspect_err(|e| {
            self.logger
                .error(format_args!("Cannot queue {} message: {}", msg.kind(), e));
        })
    }

    /// Whether the session's transport is still open
    pub fn connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }
}

async fn connect_with_retry(
    connector: &dyn Connector,
    url: &str,
    config: &SessionConfig,
    logger: &Logger,
) -> Result<Box<dyn Transport>> {
    let attempts = config.connect_attempts.max(1);
    for attempt in 1..=attempts {
        let deadline = Instant::now() + config.connect_timeout;
        match tokio::time::timeout_at(deadline, connector.connect(url)).await {
            Ok(Ok(transport)) => return Ok(transport),
            Ok(Err(e)) => {
                logger.warn(format_args!(
                    "Connection attempt {}/{} to {} failed: {}",
                    attempt, attempts, url, e
                ));
                // Spend the rest of this attempt's window before trying again.
                tokio::time::sleep_until(deadline).await;
            }
            Err(_) => {
                logger.warn(format_args!(
                    "Connection attempt {}/{} to {} timed out",
                    attempt, attempts, url
                ));
            }
        }
    }
    logger.error(format_args!(
        "Giving up on {} after {} attempts",
        url, attempts
    ));
    Err(NeuroError::ConnectionError)
}
