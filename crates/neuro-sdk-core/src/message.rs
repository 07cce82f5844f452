//! Protocol message types
//!
//! One variant per command. Client-to-server kinds are encoded by [`crate::encode`];
//! the single server-to-client kind, [`Message::Action`], is produced by [`crate::decode`].

use serde::Deserialize;
use std::fmt;

/// Urgency of a forced action
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Priority {
    #[default]
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    /// Wire literal for this priority
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Critical => "critical",
        }
    }
}

/// An action the game exposes to the agent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionDefinition {
    /// Action name, must be non-empty
    pub name: String,
    /// Human readable description (sent as `""` when absent)
    pub description: Option<String>,
    /// JSON schema of the action's argument, passed through verbatim (`{}` when absent)
    pub schema: Option<String>,
}

impl ActionDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            schema: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }
}

/// Context text pushed to the agent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextUpdate {
    pub message: String,
    /// Silent context is recorded without prompting a reaction
    pub silent: bool,
}

impl ContextUpdate {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            silent: false,
        }
    }

    pub fn silent(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            silent: true,
        }
    }
}

/// Request compelling the agent to choose one of `action_names` now
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionsForce {
    /// Optional description of the current game state
    pub state: Option<String>,
    pub query: String,
    /// `None` is sent as JSON `null`, leaving the choice to the agent
    pub ephemeral_context: Option<bool>,
    /// Must name at least one registered action
    pub action_names: Vec<String>,
    pub priority: Priority,
}

impl ActionsForce {
    pub fn new<I, S>(query: impl Into<String>, action_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            state: None,
            query: query.into(),
            ephemeral_context: None,
            action_names: action_names.into_iter().map(Into::into).collect(),
            priority: Priority::default(),
        }
    }

    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    pub fn with_ephemeral_context(mut self, ephemeral: bool) -> Self {
        self.ephemeral_context = Some(ephemeral);
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }
}

/// Outcome of an action the agent invoked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResult {
    /// Id of the [`ActionRequest`] being answered
    pub id: String,
    pub success: bool,
    pub message: Option<String>,
}

impl ActionResult {
    pub fn success(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            success: true,
            message: None,
        }
    }

    pub fn failure(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            success: false,
            message: Some(message.into()),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// The agent asking the game to run an action
///
/// Deserialized straight from the `data` object of an inbound `action` frame.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ActionRequest {
    pub id: String,
    pub name: String,
    /// Raw argument text, if the agent sent any
    #[serde(default)]
    pub data: Option<String>,
}

/// A protocol message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // === Game -> Agent ===
    Startup,
    Context(ContextUpdate),
    ActionsRegister(Vec<ActionDefinition>),
    ActionsUnregister(Vec<String>),
    ActionsForce(ActionsForce),
    ActionResult(ActionResult),

    // === Agent -> Game ===
    Action(ActionRequest),
}

impl Message {
    pub fn kind(&self) -> MessageKind {
        match self {
            Message::Startup => MessageKind::Startup,
            Message::Context(_) => MessageKind::Context,
            Message::ActionsRegister(_) => MessageKind::ActionsRegister,
            Message::ActionsUnregister(_) => MessageKind::ActionsUnregister,
            Message::ActionsForce(_) => MessageKind::ActionsForce,
            Message::ActionResult(_) => MessageKind::ActionResult,
            Message::Action(_) => MessageKind::Action,
        }
    }

    /// Borrow the payload if this is an inbound action request
    pub fn as_action(&self) -> Option<&ActionRequest> {
        match self {
            Message::Action(action) => Some(action),
            _ => None,
        }
    }

    /// Take the payload if this is an inbound action request
    pub fn into_action(self) -> Option<ActionRequest> {
        match self {
            Message::Action(action) => Some(action),
            _ => None,
        }
    }
}

/// Payload-free discriminant of [`Message`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    Startup,
    Context,
    ActionsRegister,
    ActionsUnregister,
    ActionsForce,
    ActionResult,
    Action,
}

impl MessageKind {
    /// Wire value of the `command` field
    pub fn command(&self) -> &'static str {
        match self {
            MessageKind::Startup => "startup",
            MessageKind::Context => "context",
            MessageKind::ActionsRegister => "actions/register",
            MessageKind::ActionsUnregister => "actions/unregister",
            MessageKind::ActionsForce => "actions/force",
            MessageKind::ActionResult => "action:result",
            MessageKind::Action => "action",
        }
    }

    /// Whether the game is allowed to send this kind
    pub fn is_outbound(&self) -> bool {
        !matches!(self, MessageKind::Action)
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.command())
    }
}

impl From<ActionRequest> for Message {
    fn from(action: ActionRequest) -> Self {
        Message::Action(action)
    }
}
