//! Inbound codec: agent-to-game frames to [`Message`]

use crate::error::{NeuroError, Result};
use crate::message::{ActionRequest, Message};
use serde::Deserialize;
use serde_json::{Map, Value};

/// Decode one complete text frame
///
/// Frames containing anything other than printable ASCII or whitespace are rejected
/// before parsing. Strings are copied out of the parsed tree, so the returned message
/// owns all of its data.
pub fn decode(frame: &[u8]) -> Result<Message> {
    if !is_text(frame) {
        return Err(NeuroError::ReceivedBinary);
    }

    let root: Value = serde_json::from_slice(frame)?;
    let root = root.as_object().ok_or(NeuroError::InvalidJSON)?;

    let command = root
        .get("command")
        .and_then(Value::as_str)
        .ok_or(NeuroError::InvalidJSON)?;

    match command {
        "action" => decode_action(root).map(Message::Action),
        _ => Err(NeuroError::UnknownCommand),
    }
}

/// Printable ASCII or ASCII whitespace (including vertical tab) only
pub fn is_text(frame: &[u8]) -> bool {
    frame
        .iter()
        .all(|b| b.is_ascii_graphic() || b.is_ascii_whitespace() || *b == 0x0B)
}

fn decode_action(root: &Map<String, Value>) -> Result<ActionRequest> {
    let data = root
        .get("data")
        .filter(|data| data.is_object())
        .ok_or(NeuroError::InvalidJSON)?;

    Ok(ActionRequest::deserialize(data)?)
}
