//! # neuro-sdk
//!
//! Connects a game to a Neuro agent over a persistent WebSocket.
//!
//! The game registers actions the agent may invoke, pushes context, can force an
//! immediate choice, and reports action results; the agent answers with action requests.
//!
//! This crate provides:
//! - [`Session`]: connection lifecycle, `poll`-driven event loop and `send`
//! - Bounded inbound/outbound queues bridging any thread to the event loop
//! - A pluggable [`Transport`] with a `tokio-tungstenite` implementation
//! - A flag-gated logger bridge with a `tracing` default sink
//!
//! ```no_run
//! use neuro_sdk::{ActionDefinition, Message, Session, SessionConfig};
//!
//! # async fn run() -> neuro_sdk::Result<()> {
//! let mut session = Session::create(SessionConfig::new("MyGame").with_url("ws://localhost:8000")).await?;
//! session.send(&Message::Startup)?;
//! session.send(&Message::ActionsRegister(vec![ActionDefinition::new("jump")]))?;
//! while session.connected() {
//!     for action in session.poll().await.actions() {
//!         println!("agent wants {}", action.name);
//!     }
//! }
//! session.destroy().await
//! # }
//! ```

mod adapter;
pub mod config;
pub mod log;
pub mod queue;
pub mod session;
pub mod transport;
pub mod ws;

pub use config::{CreateFlags, ENV_URL, MESSAGE_QUEUE_SIZE, SessionConfig};
pub use log::{LogSink, Logger, Severity, TracingSink};
pub use session::{OutboundSender, PollBatch, Session};
pub use transport::{Connector, Transport, TransportEvent};
pub use ws::{WsConnector, WsTransport};

pub use neuro_sdk_core::{
    ActionDefinition, ActionRequest, ActionResult, ActionsForce, ContextUpdate, Encoder, Message,
    MessageKind, NeuroError, Priority, Result, decode, error_codes, escape,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Git revision the library was built from, if the build provided one
pub fn git_hash() -> &'static str {
    option_env!("NEURO_SDK_GIT_HASH").unwrap_or("unknown")
}
