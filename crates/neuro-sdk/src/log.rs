//! Logger bridge
//!
//! Routes SDK diagnostics to a caller-supplied sink, or to `tracing` when none is given
//! (printing to stdout itself if the process never installed a subscriber).
//! Two independent flags gate output: `debug_prints` for per-frame traces and
//! `validation_layers` for protocol warnings and errors.

use crate::config::CreateFlags;
use std::fmt::{self, Write};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use tracing::{Dispatch, Level};

/// Log severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Debug,
    Info,
    Warn,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
        })
    }
}

/// Destination for SDK log records
///
/// Implemented for any `Fn(Severity, &str) + Send + Sync`, so a closure can be used.
pub trait LogSink: Send + Sync {
    fn log(&self, severity: Severity, message: &str);
}

impl<F> LogSink for F
where
    F: Fn(Severity, &str) + Send + Sync,
{
    fn log(&self, severity: Severity, message: &str) {
        self(severity, message)
    }
}

/// Default sink: forwards to the `tracing` macro of the same level
///
/// When the process has installed a global subscriber, records go through it. Otherwise
/// the sink carries its own fmt subscriber writing severity-colored lines to stdout, so
/// the default configuration is never silent.
#[derive(Debug, Clone)]
pub struct TracingSink {
    fallback: Option<Dispatch>,
}

impl TracingSink {
    pub fn new() -> Self {
        let fallback = (!tracing::dispatcher::has_been_set()).then(|| {
            Dispatch::new(
                tracing_subscriber::fmt()
                    .with_max_level(Level::DEBUG)
                    .with_writer(std::io::stdout)
                    .finish(),
            )
        });
        Self { fallback }
    }

    /// Whether records bypass the global subscriber
    pub fn has_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    fn forward(severity: Severity, message: &str) {
        match severity {
            Severity::Debug => tracing::debug!(target: "neuro_sdk", "{}", message),
            Severity::Info => tracing::info!(target: "neuro_sdk", "{}", message),
            Severity::Warn => tracing::warn!(target: "neuro_sdk", "{}", message),
            Severity::Error => tracing::error!(target: "neuro_sdk", "{}", message),
        }
    }
}

impl Default for TracingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl LogSink for TracingSink {
    fn log(&self, severity: Severity, message: &str) {
        match &self.fallback {
            Some(dispatch) => {
                tracing::dispatcher::with_default(dispatch, || Self::forward(severity, message))
            }
            None => Self::forward(severity, message),
        }
    }
}

/// Flag-gated handle to a [`LogSink`], cheap to clone across threads
#[derive(Clone)]
pub struct Logger {
    sink: Arc<dyn LogSink>,
    flags: CreateFlags,
}

impl Logger {
    /// Log to `sink`, or to a [`TracingSink`] when none is given
    pub fn new(flags: CreateFlags, sink: Option<Arc<dyn LogSink>>) -> Self {
        Self {
            sink: sink.unwrap_or_else(|| Arc::new(TracingSink::new())),
            flags,
        }
    }

    pub fn flags(&self) -> CreateFlags {
        self.flags
    }

    /// Per-frame trace, emitted only with `debug_prints`
    pub fn trace(&self, args: fmt::Arguments<'_>) {
        if self.flags.debug_prints {
            self.emit(Severity::Debug, args);
        }
    }

    /// Lifecycle notice, emitted only with `debug_prints`
    pub fn info(&self, args: fmt::Arguments<'_>) {
        if self.flags.debug_prints {
            self.emit(Severity::Info, args);
        }
    }

    /// Protocol warning, emitted only with `validation_layers`
    pub fn warn(&self, args: fmt::Arguments<'_>) {
        if self.flags.validation_layers {
            self.emit(Severity::Warn, args);
        }
    }

    /// Protocol error, emitted only with `validation_layers`
    pub fn error(&self, args: fmt::Arguments<'_>) {
        if self.flags.validation_layers {
            self.emit(Severity::Error, args);
        }
    }

    fn emit(&self, severity: Severity, args: fmt::Arguments<'_>) {
        let mut text = String::new();
        if text.write_fmt(args).is_err() {
            return;
        }
        // A misbehaving sink must not take the event loop down with it.
        let _ = catch_unwind(AssertUnwindSafe(|| self.sink.log(severity, &text)));
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger").field("flags", &self.flags).finish()
    }
}
