//! Session configuration

use neuro_sdk_core::{NeuroError, Result};
use std::time::Duration;

/// Environment variable consulted when no URL is configured
pub const ENV_URL: &str = "NEURO_SDK_WS_URL";

/// Default capacity of both the outbound and inbound queues
pub const MESSAGE_QUEUE_SIZE: usize = 10;

/// Logging switches, see [`crate::log::Logger`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CreateFlags {
    /// Trace every frame sent and received
    pub debug_prints: bool,
    /// Report protocol warnings and errors
    pub validation_layers: bool,
}

impl CreateFlags {
    pub const NONE: CreateFlags = CreateFlags {
        debug_prints: false,
        validation_layers: false,
    };

    pub const DEBUG: CreateFlags = CreateFlags {
        debug_prints: true,
        validation_layers: true,
    };
}

/// Configuration for a [`crate::Session`]
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// WebSocket URL; falls back to `NEURO_SDK_WS_URL` when unset
    pub url: Option<String>,
    /// Name of the game, sent with every frame
    pub game_name: String,
    /// Timeout of one `poll` iteration (default: 100ms)
    pub poll_interval: Duration,
    pub flags: CreateFlags,
    /// Capacity of each message queue (default: 10)
    pub queue_capacity: usize,
    /// Connection attempts before giving up (default: 10)
    pub connect_attempts: u32,
    /// Timeout of each connection attempt (default: 300ms)
    pub connect_timeout: Duration,
    /// Bound on the final flush and close in `destroy` (default: 1s)
    pub shutdown_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            url: None,
            game_name: String::new(),
            poll_interval: Duration::from_millis(100),
            flags: CreateFlags::NONE,
            queue_capacity: MESSAGE_QUEUE_SIZE,
            connect_attempts: 10,
            connect_timeout: Duration::from_millis(300),
            shutdown_timeout: Duration::from_secs(1),
        }
    }
}

impl SessionConfig {
    pub fn new(game_name: impl Into<String>) -> Self {
        Self {
            game_name: game_name.into(),
            ..Default::default()
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_flags(mut self, flags: CreateFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    pub fn with_connect_policy(mut self, attempts: u32, timeout: Duration) -> Self {
        self.connect_attempts = attempts;
        self.connect_timeout = timeout;
        self
    }

    pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    /// Resolve the URL against the process environment
    pub fn resolve_url(&self) -> Result<String> {
        resolve_url(self.url.as_deref(), std::env::var(ENV_URL).ok())
    }
}

/// Pick the explicit URL, else the environment value, else fail with `NoURL`
///
/// An empty value counts as unset at either level.
pub fn resolve_url(explicit: Option<&str>, env: Option<String>) -> Result<String> {
    explicit
        .filter(|url| !url.is_empty())
        .map(str::to_string)
        .or_else(|| env.filter(|url| !url.is_empty()))
        .ok_or(NeuroError::NoURL)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SessionConfig::new("TicTacToe");
        assert_eq!(config.game_name, "TicTacToe");
        assert_eq!(config.queue_capacity, 10);
        assert_eq!(config.connect_attempts, 10);
        assert_eq!(config.connect_timeout, Duration::from_millis(300));
        assert_eq!(config.shutdown_timeout, Duration::from_secs(1));
        assert_eq!(config.flags, CreateFlags::NONE);
    }

    #[test]
    fn test_explicit_url_wins() {
        let url = resolve_url(Some("ws://a:1"), Some("ws://b:2".into())).unwrap();
        assert_eq!(url, "ws://a:1");
    }

    #[test]
    fn test_env_fallback() {
        let url = resolve_url(None, Some("ws://localhost:8000".into())).unwrap();
        assert_eq!(url, "ws://localhost:8000");
    }

    #[test]
    fn test_empty_explicit_url_falls_back_to_env() {
        let url = resolve_url(Some(""), Some("ws://localhost:8000".into())).unwrap();
        assert_eq!(url, "ws://localhost:8000");
    }

    #[test]
    fn test_no_url() {
        assert_eq!(resolve_url(None, None), Err(NeuroError::NoURL));
        assert_eq!(resolve_url(Some(""), None), Err(NeuroError::NoURL));
        assert_eq!(resolve_url(Some(""), Some(String::new())), Err(NeuroError::NoURL));
    }
}
