//! Error types for the Neuro SDK

use thiserror::Error;

/// Result type for Neuro SDK operations
pub type Result<T> = std::result::Result<T, NeuroError>;

/// Neuro SDK error kinds
///
/// The set is closed and carries no payload. Variants keep the numeric codes of the
/// original C ABI (see [`error_codes`]) so they can be reported across FFI or logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum NeuroError {
    /// Unexpected internal failure
    #[error("Internal error")]
    Internal,

    /// Session handle is missing or already destroyed
    #[error("Context is not initialized")]
    Uninitialized,

    /// Game name missing or empty at session creation
    #[error("No game name was provided")]
    NoGameName,

    /// Allocation failure or outbound queue exhaustion
    #[error("Out of memory")]
    OutOfMemory,

    /// No URL given and the environment fallback is unset
    #[error("No URL was provided and NEURO_SDK_WS_URL is not set")]
    NoURL,

    /// Transport could not be opened, or was closed
    #[error("Connection error")]
    ConnectionError,

    /// Inbound queue overflowed; the overflowing frame was dropped
    #[error("Message queue is full")]
    MessageQueueFull,

    /// Inbound frame contained non-text bytes
    #[error("Received binary data")]
    ReceivedBinary,

    /// Inbound frame was not a well-formed message
    #[error("Invalid JSON")]
    InvalidJSON,

    /// Command name is not known to this side of the protocol
    #[error("Unknown command")]
    UnknownCommand,

    /// Outbound message failed validation
    #[error("Invalid message")]
    InvalidMessage,

    /// Message kind cannot be sent by the game (server-to-client only)
    #[error("Command not available")]
    CommandNotAvailable,

    /// Transport rejected an outbound frame
    #[error("Failed to send message")]
    SendFailed,
}

impl NeuroError {
    /// Stable numeric code (0 is reserved for "no error")
    pub fn code(&self) -> i32 {
        match self {
            NeuroError::Internal => error_codes::INTERNAL,
            NeuroError::Uninitialized => error_codes::UNINITIALIZED,
            NeuroError::NoGameName => error_codes::NO_GAME_NAME,
            NeuroError::OutOfMemory => error_codes::OUT_OF_MEMORY,
            NeuroError::NoURL => error_codes::NO_URL,
            NeuroError::ConnectionError => error_codes::CONNECTION_ERROR,
            NeuroError::MessageQueueFull => error_codes::MESSAGE_QUEUE_FULL,
            NeuroError::ReceivedBinary => error_codes::RECEIVED_BINARY,
            NeuroError::InvalidJSON => error_codes::INVALID_JSON,
            NeuroError::UnknownCommand => error_codes::UNKNOWN_COMMAND,
            NeuroError::InvalidMessage => error_codes::INVALID_MESSAGE,
            NeuroError::CommandNotAvailable => error_codes::COMMAND_NOT_AVAILABLE,
            NeuroError::SendFailed => error_codes::SEND_FAILED,
        }
    }
}

impl From<serde_json::Error> for NeuroError {
    fn from(_: serde_json::Error) -> Self {
        NeuroError::InvalidJSON
    }
}

/// Numeric error codes, matching the C SDK's `neurosdk_error_e`
pub mod error_codes {
    pub const NONE: i32 = 0;
    pub const INTERNAL: i32 = 1;
    pub const UNINITIALIZED: i32 = 2;
    pub const NO_GAME_NAME: i32 = 3;
    pub const OUT_OF_MEMORY: i32 = 4;
    pub const NO_URL: i32 = 5;
    pub const CONNECTION_ERROR: i32 = 6;
    pub const MESSAGE_QUEUE_FULL: i32 = 7;
    pub const RECEIVED_BINARY: i32 = 8;
    pub const INVALID_JSON: i32 = 9;
    pub const UNKNOWN_COMMAND: i32 = 10;
    pub const INVALID_MESSAGE: i32 = 11;
    pub const COMMAND_NOT_AVAILABLE: i32 = 12;
    pub const SEND_FAILED: i32 = 13;
}
