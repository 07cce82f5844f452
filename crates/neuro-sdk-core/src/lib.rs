//! # neuro-sdk-core
//!
//! Core types and codecs for the Neuro game SDK protocol.
//!
//! This crate is runtime-free and provides:
//! - The error taxonomy shared by every SDK operation
//! - Message types for each protocol command
//! - The outbound encoder (game -> agent) with the protocol's string escaping
//! - The inbound decoder (agent -> game)

pub mod decode;
pub mod encode;
pub mod error;
pub mod escape;
pub mod message;

pub use decode::decode;
pub use encode::Encoder;
pub use error::{NeuroError, Result, error_codes};
pub use escape::escape;
pub use message::{
    ActionDefinition, ActionRequest, ActionResult, ActionsForce, ContextUpdate, Message,
    MessageKind, Priority,
};
