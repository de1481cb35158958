//! Application error types with rich context

use std::path::PathBuf;
use thiserror::Error;

use crate::types::{ActionKind, SetupState};

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Application error types organized by layer/domain
#[derive(Debug, Error)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────
    // Common/Infrastructure Errors
    // ─────────────────────────────────────────────────────────────
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ─────────────────────────────────────────────────────────────
    // ADB/Process Errors
    // ─────────────────────────────────────────────────────────────
    #[error("adb not found. Install the Android SDK platform-tools or set its location.")]
    AdbNotFound,

    #[error("adb binary not usable at: {path}")]
    AdbNotUsable { path: PathBuf },

    #[error("adb process error: {message}")]
    Process { message: String },

    #[error("Failed to spawn adb process: {reason}")]
    ProcessSpawn { reason: String },

    // ─────────────────────────────────────────────────────────────
    // Setup Flow Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Action '{action}' is not available in state '{state}'")]
    ActionNotAvailable {
        action: ActionKind,
        state: SetupState,
    },

    #[error("Device '{id}' is not among the discovered devices")]
    UnknownDevice { id: String },

    // ─────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ─────────────────────────────────────────────────────────────
    // Channel/Communication Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Channel send error: {message}")]
    ChannelSend { message: String },

    #[error("Channel closed unexpectedly")]
    ChannelClosed,
}

// ─────────────────────────────────────────────────────────────────
// Convenience Constructors
// ─────────────────────────────────────────────────────────────────

impl Error {
    pub fn process(message: impl Into<String>) -> Self {
        Self::Process {
            message: message.into(),
        }
    }

    pub fn process_spawn(reason: impl Into<String>) -> Self {
        Self::ProcessSpawn {
            reason: reason.into(),
        }
    }

    pub fn adb_not_usable(path: impl Into<PathBuf>) -> Self {
        Self::AdbNotUsable { path: path.into() }
    }

    pub fn action_not_available(action: ActionKind, state: SetupState) -> Self {
        Self::ActionNotAvailable { action, state }
    }

    pub fn unknown_device(id: impl Into<String>) -> Self {
        Self::UnknownDevice { id: id.into() }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn channel_send(message: impl Into<String>) -> Self {
        Self::ChannelSend {
            message: message.into(),
        }
    }

    /// Check if this error should trigger application exit
    ///
    /// Channel errors mean the setup engine is gone; nothing the user types
    /// can be applied any more.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::ChannelSend { .. } | Error::ChannelClosed)
    }
}

// ─────────────────────────────────────────────────────────────────
// Error Context Extensions
// ─────────────────────────────────────────────────────────────────

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let err = e.into();
            tracing::error!("{}: {:?}", context.into(), err);
            err
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let err = e.into();
            tracing::error!("{}: {:?}", f(), err);
            err
        })
    }
}
