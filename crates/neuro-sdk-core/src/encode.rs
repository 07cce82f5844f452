//! Outbound codec: game-to-agent messages to wire text
//!
//! Frames are assembled by hand rather than through `serde_json` because embedded text
//! uses the protocol's own escaping (see [`crate::escape`]) and action schemas are spliced
//! in verbatim. Every builder writes into a fresh `String`, so a validation failure never
//! leaves partial output behind.

use crate::error::{NeuroError, Result};
use crate::escape::escape_into;
use crate::message::{ActionDefinition, ActionResult, ActionsForce, ContextUpdate, Message};

/// Schema sent for actions that take no arguments
pub const EMPTY_SCHEMA: &str = "{}";

/// Encodes messages on behalf of one game
///
/// The game name is escaped once at construction and reused for every frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoder {
    game: String,
}

impl Encoder {
    /// Create an encoder, rejecting an empty game name
    pub fn new(game_name: &str) -> Result<Self> {
        if game_name.is_empty() {
            return Err(NeuroError::NoGameName);
        }
        let mut game = String::with_capacity(game_name.len());
        escape_into(&mut game, game_name);
        Ok(Self { game })
    }

    /// Escaped game name as it appears on the wire
    pub fn game(&self) -> &str {
        &self.game
    }

    /// Validate and encode a message into one text frame
    pub fn encode(&self, msg: &Message) -> Result<String> {
        match msg {
            Message::Startup => Ok(self.header("startup", false)),
            Message::Context(context) => self.context(context),
            Message::ActionsRegister(actions) => self.actions_register(actions),
            Message::ActionsUnregister(names) => Ok(self.actions_unregister(names)),
            Message::ActionsForce(force) => self.actions_force(force),
            Message::ActionResult(result) => self.action_result(result),
            Message::Action(_) => Err(NeuroError::CommandNotAvailable),
        }
    }

    /// `{"command":"<command>","game":"<game>"` plus `,"data":` when a payload follows,
    /// or the closing brace when it does not
    fn header(&self, command: &str, with_data: bool) -> String {
        let mut out = String::with_capacity(64 + self.game.len());
        out.push_str("{\"command\":\"");
        out.push_str(command);
        out.push_str("\",\"game\":\"");
        out.push_str(&self.game);
        if with_data {
            out.push_str("\",\"data\":");
        } else {
            out.push_str("\"}");
        }
        out
    }

    fn context(&self, context: &ContextUpdate) -> Result<String> {
        let mut out = self.header("context", true);
        out.push_str("{\"message\":");
        push_string(&mut out, &context.message);
        out.push_str(",\"silent\":");
        push_bool(&mut out, context.silent);
        out.push_str("}}");
        Ok(out)
    }

    fn actions_register(&self, actions: &[ActionDefinition]) -> Result<String> {
        if actions.iter().any(|action| action.name.is_empty()) {
            return Err(NeuroError::InvalidMessage);
        }

        let mut out = self.header("actions/register", true);
        out.push_str("{\"actions\":[");
        for (i, action) in actions.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            out.push_str("{\"name\":");
            push_string(&mut out, &action.name);
            out.push_str(",\"description\":");
            push_string(&mut out, action.description.as_deref().unwrap_or(""));
            out.push_str(",\"schema\":");
            out.push_str(action.schema.as_deref().unwrap_or(EMPTY_SCHEMA));
            out.push('}');
        }
        out.push_str("]}}");
        Ok(out)
    }

    fn actions_unregister(&self, names: &[String]) -> String {
        let mut out = self.header("actions/unregister", true);
        out.push_str("{\"action_names\":");
        push_string_array(&mut out, names);
        out.push_str("}}");
        out
    }

    fn actions_force(&self, force: &ActionsForce) -> Result<String> {
        if force.action_names.is_empty() {
            return Err(NeuroError::InvalidMessage);
        }

        let mut out = self.header("actions/force", true);
        out.push_str("{\"state\":");
        push_optional_string(&mut out, force.state.as_deref());
        out.push_str(",\"query\":");
        push_string(&mut out, &force.query);
        out.push_str(",\"ephemeral_context\":");
        match force.ephemeral_context {
            Some(ephemeral) => push_bool(&mut out, ephemeral),
            None => out.push_str("null"),
        }
        out.push_str(",\"action_names\":");
        push_string_array(&mut out, &force.action_names);
        out.push_str(",\"priority\":\"");
        out.push_str(force.priority.as_str());
        out.push_str("\"}}");
        Ok(out)
    }

    fn action_result(&self, result: &ActionResult) -> Result<String> {
        if result.id.is_empty() {
            return Err(NeuroError::InvalidMessage);
        }

        let mut out = self.header("action:result", true);
        out.push_str("{\"id\":");
        push_string(&mut out, &result.id);
        out.push_str(",\"success\":");
        push_bool(&mut out, result.success);
        out.push_str(",\"message\":");
        push_optional_string(&mut out, result.message.as_deref());
        out.push_str("}}");
        Ok(out)
    }
}

fn push_string(out: &mut String, value: &str) {
    out.push('"');
    escape_into(out, value);
    out.push('"');
}

fn push_optional_string(out: &mut String, value: Option<&str>) {
    match value {
        Some(value) => push_string(out, value),
        None => out.push_str("null"),
    }
}

fn push_bool(out: &mut String, value: bool) {
    out.push_str(if value { "true" } else { "false" });
}

fn push_string_array(out: &mut String, values: &[String]) {
    out.push('[');
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        push_string(out, value);
    }
    out.push(']');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{ActionRequest, Priority};

    fn bot() -> Encoder {
        Encoder::new("Bot").unwrap()
    }

    #[test]
    fn test_empty_game_name_rejected() {
        assert_eq!(Encoder::new(""), Err(NeuroError::NoGameName));
    }

    #[test]
    fn test_game_name_escaped_once() {
        let encoder = Encoder::new("Tom's \"Game\"").unwrap();
        assert_eq!(encoder.game(), "Tom\\'s \\\"Game\\\"");
        assert_eq!(
            encoder.encode(&Message::Startup).unwrap(),
            r#"{"command":"startup","game":"Tom\'s \"Game\""}"#
        );
    }

    #[test]
    fn test_startup() {
        assert_eq!(
            bot().encode(&Message::Startup).unwrap(),
            r#"{"command":"startup","game":"Bot"}"#
        );
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let msg = Message::ActionsForce(
            ActionsForce::new("Pick", ["a", "b"]).with_state("board: x"),
        );
        let encoder = bot();
        let first = encoder.encode(&msg).unwrap();
        for _ in 0..5 {
            assert_eq!(encoder.encode(&msg).unwrap(), first);
        }
    }

    #[test]
    fn test_context() {
        let msg = Message::Context(ContextUpdate::new("Player moved\nto 4"));
        assert_eq!(
            bot().encode(&msg).unwrap(),
            r#"{"command":"context","game":"Bot","data":{"message":"Player moved\nto 4","silent":false}}"#
        );

        let msg = Message::Context(ContextUpdate::silent("quiet"));
        assert!(bot().encode(&msg).unwrap().ends_with(r#""silent":true}}"#));
    }

    #[test]
    fn test_register_defaults() {
        let msg = Message::ActionsRegister(vec![
            ActionDefinition::new("move").with_description("desc"),
        ]);
        assert_eq!(
            bot().encode(&msg).unwrap(),
            r#"{"command":"actions/register","game":"Bot","data":{"actions":[{"name":"move","description":"desc","schema":{}}]}}"#
        );
    }

    #[test]
    fn test_register_schema_passed_through() {
        let msg = Message::ActionsRegister(vec![
            ActionDefinition::new("move")
                .with_schema(r#"{"type": "integer", "minimum": 0, "maximum": 8}"#),
            ActionDefinition::new("wait"),
        ]);
        assert_eq!(
            bot().encode(&msg).unwrap(),
            r#"{"command":"actions/register","game":"Bot","data":{"actions":[{"name":"move","description":"","schema":{"type": "integer", "minimum": 0, "maximum": 8}},{"name":"wait","description":"","schema":{}}]}}"#
        );
    }

    #[test]
    fn test_register_requires_names() {
        let msg = Message::ActionsRegister(vec![
            ActionDefinition::new("move"),
            ActionDefinition::new(""),
        ]);
        assert_eq!(bot().encode(&msg), Err(NeuroError::InvalidMessage));
    }

    #[test]
    fn test_unregister() {
        let msg = Message::ActionsUnregister(vec!["move".into(), "wait".into()]);
        assert_eq!(
            bot().encode(&msg).unwrap(),
            r#"{"command":"actions/unregister","game":"Bot","data":{"action_names":["move","wait"]}}"#
        );

        let empty = Message::ActionsUnregister(vec![]);
        assert_eq!(
            bot().encode(&empty).unwrap(),
            r#"{"command":"actions/unregister","game":"Bot","data":{"action_names":[]}}"#
        );
    }

    #[test]
    fn test_force_defaults_to_nulls_and_low() {
        let msg = Message::ActionsForce(ActionsForce::new("Your move", ["move"]));
        assert_eq!(
            bot().encode(&msg).unwrap(),
            r#"{"command":"actions/force","game":"Bot","data":{"state":null,"query":"Your move","ephemeral_context":null,"action_names":["move"],"priority":"low"}}"#
        );
    }

    #[test]
    fn test_force_full() {
        let msg = Message::ActionsForce(
            ActionsForce::new("Pick", ["a", "b"])
                .with_state("it's on")
                .with_ephemeral_context(true)
                .with_priority(Priority::Critical),
        );
        assert_eq!(
            bot().encode(&msg).unwrap(),
            r#"{"command":"actions/force","game":"Bot","data":{"state":"it\'s on","query":"Pick","ephemeral_context":true,"action_names":["a","b"],"priority":"critical"}}"#
        );
    }

    #[test]
    fn test_force_requires_action_names() {
        let msg = Message::ActionsForce(ActionsForce::new("Pick", Vec::<String>::new()));
        assert_eq!(bot().encode(&msg), Err(NeuroError::InvalidMessage));
    }

    #[test]
    fn test_action_result() {
        let msg = Message::ActionResult(ActionResult::success("42"));
        assert_eq!(
            bot().encode(&msg).unwrap(),
            r#"{"command":"action:result","game":"Bot","data":{"id":"42","success":true,"message":null}}"#
        );

        let msg = Message::ActionResult(ActionResult::failure("42", "Cell taken"));
        assert_eq!(
            bot().encode(&msg).unwrap(),
            r#"{"command":"action:result","game":"Bot","data":{"id":"42","success":false,"message":"Cell taken"}}"#
        );
    }

    #[test]
    fn test_action_result_requires_id() {
        let msg = Message::ActionResult(ActionResult::success(""));
        assert_eq!(bot().encode(&msg), Err(NeuroError::InvalidMessage));
    }

    #[test]
    fn test_inbound_kind_not_sendable() {
        let msg = Message::Action(ActionRequest {
            id: "1".into(),
            name: "move".into(),
            data: None,
        });
        assert_eq!(bot().encode(&msg), Err(NeuroError::CommandNotAvailable));
    }

    #[test]
    fn test_frames_without_quotes_parse_as_json() {
        let encoder = bot();
        let frames = [
            encoder.encode(&Message::Startup).unwrap(),
            encoder
                .encode(&Message::Context(ContextUpdate::new("hello")))
                .unwrap(),
            encoder
                .encode(&Message::ActionsForce(ActionsForce::new("q", ["a"])))
                .unwrap(),
            encoder
                .encode(&Message::ActionResult(ActionResult::success("1")))
                .unwrap(),
        ];
        for frame in frames {
            let value: serde_json::Value = serde_json::from_str(&frame).unwrap();
            assert_eq!(value["game"], "Bot");
            assert!(value["command"].is_string());
        }
    }
}
