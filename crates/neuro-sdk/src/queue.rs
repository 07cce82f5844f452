//! Bounded message queues between callers and the event loop
//!
//! - [`OutboundQueue`] / [`OutboundDrain`]: multi-producer, single-consumer channel of
//!   encoded frames. Producers may live on any thread; pushing never blocks.
//! - [`InboundQueue`]: decoded messages waiting for the next `poll`.
//!
//! Both reject new entries when full instead of overwriting old ones.

use neuro_sdk_core::{Message, NeuroError, Result};
use tokio::sync::mpsc::{self, error::TryRecvError, error::TrySendError};

/// Create a bounded outbound queue
///
/// A capacity of zero is raised to one.
pub fn outbound(capacity: usize) -> (OutboundQueue, OutboundDrain) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (OutboundQueue { tx }, OutboundDrain { rx })
}

/// Producer side of the outbound queue
#[derive(Debug, Clone)]
pub struct OutboundQueue {
    tx: mpsc::Sender<String>,
}

impl OutboundQueue {
    /// Append an encoded frame and wake the event loop
    ///
    /// Fails with `OutOfMemory` when the queue is full and `Uninitialized` once the
    /// consuming session is gone.
    pub fn push(&self, frame: String) -> Result<()> {
        self.tx.try_send(frame).map_err(|e| match e {
            TrySendError::Full(_) => NeuroError::OutOfMemory,
            TrySendError::Closed(_) => NeuroError::Uninitialized,
        })
    }

    /// Whether the consuming side has been dropped
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Consumer side of the outbound queue, owned by the event loop
#[derive(Debug)]
pub struct OutboundDrain {
    rx: mpsc::Receiver<String>,
}

impl OutboundDrain {
    /// Wait for the next frame; `None` only once every producer is gone
    ///
    /// Cancel safe, so it can sit in a `select!` next to the socket.
    pub async fn recv(&mut self) -> Option<String> {
        self.rx.recv().await
    }

    /// Take the next frame if one is ready
    pub fn try_pop(&mut self) -> Option<String> {
        match self.rx.try_recv() {
            Ok(frame) => Some(frame),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Take every frame that is ready, in FIFO order
    pub fn drain(&mut self) -> Vec<String> {
        let mut frames = Vec::new();
        while let Some(frame) = self.try_pop() {
            frames.push(frame);
        }
        frames
    }

    /// Stop accepting frames; already queued ones can still be drained
    pub fn close(&mut self) {
        self.rx.close();
    }
}

/// Decoded messages waiting to be handed to the caller
#[derive(Debug)]
pub struct InboundQueue {
    entries: Vec<Message>,
    capacity: usize,
}

impl InboundQueue {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a message, or hand it back with `MessageQueueFull`
    pub fn push(&mut self, msg: Message) -> std::result::Result<(), (NeuroError, Message)> {
        if self.entries.len() >= self.capacity {
            return Err((NeuroError::MessageQueueFull, msg));
        }
        self.entries.push(msg);
        Ok(())
    }

    /// Hand over every queued message and leave the queue empty
    pub fn take(&mut self) -> Vec<Message> {
        std::mem::replace(&mut self.entries, Vec::with_capacity(self.capacity))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
