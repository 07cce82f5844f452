//! Transport adapter: one event-loop iteration at a time
//!
//! Turns transport events into inbound-queue entries and connection state, and writes
//! queued outbound frames to the transport. All of this runs inside `Session::poll`.

use crate::log::Logger;
use crate::queue::{InboundQueue, OutboundDrain};
use crate::transport::{Transport, TransportEvent};
use futures::FutureExt;
use neuro_sdk_core::{Message, NeuroError, decode};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

pub(crate) struct TransportAdapter {
    transport: Box<dyn Transport>,
    inbound: InboundQueue,
    connected: Arc<AtomicBool>,
    logger: Logger,
}

impl TransportAdapter {
    pub(crate) fn new(
        transport: Box<dyn Transport>,
        inbound: InboundQueue,
        connected: Arc<AtomicBool>,
        logger: Logger,
    ) -> Self {
        Self {
            transport,
            inbound,
            connected,
            logger,
        }
    }

    pub(crate) fn connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    /// Hand the inbound queue's contents to the caller
    pub(crate) fn take_inbound(&mut self) -> Vec<Message> {
        self.inbound.take()
    }

    /// Run one iteration of the event loop
    ///
    /// Flushes queued frames, then waits until `timeout` elapses for either a new outbound
    /// frame or a transport event, then handles whatever else is already ready. Every
    /// write shares the same deadline, so the iteration never outlives `timeout` by more
    /// than one write that was already ready. Returns the first error seen.
    pub(crate) async fn pump(
        &mut self,
        outbound: &mut OutboundDrain,
        timeout: Duration,
    ) -> Option<NeuroError> {
        if !self.connected() {
            return Some(NeuroError::ConnectionError);
        }
        let deadline = Instant::now() + timeout;

        let mut outcome = self.flush(outbound, deadline).await;

        tokio::select! {
            frame = outbound.recv() => {
                if let Some(frame) = frame {
                    record(&mut outcome, self.write(frame, deadline).await);
                }
            }
            event = self.transport.next_event() => {
                record(&mut outcome, self.handle_event(event));
            }
            _ = tokio::time::sleep_until(deadline) => {}
        }

        // Drain events that are already ready without waiting again. The bound keeps a
        // flooding peer from pinning the loop.
        for _ in 0..=self.inbound.capacity() {
            if !self.connected() {
                break;
            }
            match self.transport.next_event().now_or_never() {
                Some(event) => record(&mut outcome, self.handle_event(event)),
                None => break,
            }
        }

        record(&mut outcome, self.flush(outbound, deadline).await);
        outcome
    }

    /// Write queued frames in FIFO order until the queue is empty or `deadline` passes
    ///
    /// A frame that fails to write is dropped. Once a write fails past the deadline the
    /// rest stay queued for the next iteration.
    pub(crate) async fn flush(
        &mut self,
        outbound: &mut OutboundDrain,
        deadline: Instant,
    ) -> Option<NeuroError> {
        let mut outcome = None;
        while self.connected() {
            let Some(frame) = outbound.try_pop() else {
                break;
            };
            let failed = self.write(frame, deadline).await;
            if failed.is_some() && Instant::now() >= deadline {
                record(&mut outcome, failed);
                break;
            }
            record(&mut outcome, failed);
        }
        outcome
    }

    /// Flush what is queued, then close the transport, all within `timeout`
    pub(crate) async fn shutdown(
        &mut self,
        outbound: &mut OutboundDrain,
        timeout: Duration,
    ) -> Option<NeuroError> {
        let deadline = Instant::now() + timeout;
        outbound.close();
        let mut outcome = self.flush(outbound, deadline).await;

        // The transport is closed even after the peer hung up; only a close on a live
        // connection reports its failure.
        let was_connected = self.connected.swap(false, Ordering::AcqRel);
        let closed = match tokio::time::timeout_at(deadline, self.transport.close()).await {
            Ok(result) => result,
            Err(_) => {
                self.logger
                    .error(format_args!("Timed out closing the connection"));
                Err(NeuroError::ConnectionError)
            }
        };
        if was_connected {
            record(&mut outcome, closed.err());
        }

        let dropped = outbound.drain().len() + self.inbound.take().len();
        if dropped > 0 {
            debug!("Released {} undelivered messages on shutdown", dropped);
        }
        outcome
    }

    async fn write(&mut self, frame: String, deadline: Instant) -> Option<NeuroError> {
        match tokio::time::timeout_at(deadline, self.transport.send_text(&frame)).await {
            Ok(Ok(())) => {
                self.logger.trace(format_args!("[Game→Neuro] {}", frame));
                None
            }
            Ok(Err(e)) => {
                self.logger
                    .error(format_args!("Failed to send frame ({}): {}", e, frame));
                Some(NeuroError::SendFailed)
            }
            Err(_) => {
                self.logger
                    .error(format_args!("Timed out sending frame: {}", frame));
                Some(NeuroError::SendFailed)
            }
        }
    }

    fn handle_event(&mut self, event: TransportEvent) -> Option<NeuroError> {
        match event {
            TransportEvent::Text(text) => {
                self.logger.trace(format_args!("[Neuro→Game] {}", text));
                match decode(text.as_bytes()) {
                    Ok(msg) => match self.inbound.push(msg) {
                        Ok(()) => None,
                        Err((e, dropped)) => {
                            self.logger.error(format_args!(
                                "Inbound queue full ({} entries), dropping {:?}",
                                self.inbound.capacity(),
                                dropped
                            ));
                            Some(e)
                        }
                    },
                    Err(e) => {
                        self.logger
                            .error(format_args!("Rejected inbound frame: {}", e));
                        Some(e)
                    }
                }
            }
            TransportEvent::Binary(data) => {
                self.logger.error(format_args!(
                    "Rejected binary frame of {} bytes",
                    data.len()
                ));
                Some(NeuroError::ReceivedBinary)
            }
            TransportEvent::Closed => {
                self.connected.store(false, Ordering::Release);
                self.logger.info(format_args!("Connection closed by peer"));
                Some(NeuroError::ConnectionError)
            }
            TransportEvent::Error(reason) => {
                self.connected.store(false, Ordering::Release);
                self.logger
                    .error(format_args!("Connection error: {}", reason));
                Some(NeuroError::ConnectionError)
            }
        }
    }
}

/// Keep the first error of an iteration
fn record(outcome: &mut Option<NeuroError>, err: Option<NeuroError>) {
    if outcome.is_none() {
        *outcome = err;
    }
}
