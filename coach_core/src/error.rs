//! Error types for the coach engine.

use std::time::Duration;
use thiserror::Error;

/// Rejected conversation log operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversationError {
    /// The utterance was empty after trimming.
    #[error("utterance is blank")]
    BlankUtterance,

    /// `seed` was called on a log that already has turns.
    #[error("conversation has already been seeded")]
    AlreadySeeded,
}

/// Failure to obtain a reply from a reply source.
#[derive(Debug, Error)]
pub enum ReplyError {
    /// The remote proxy answered with a non-success HTTP status.
    #[error("Proxy error: {status}")]
    Remote { status: u16 },

    /// The request never produced a response.
    #[error("Request failed: {0}")]
    Transport(String),

    /// The response body was not a usable reply.
    #[error("Malformed reply: {0}")]
    Malformed(String),

    /// The reply did not arrive within the configured session or request timeout.
    #[error("Reply timed out after {}ms", .0.as_millis())]
    Timeout(Duration),
}

impl ReplyError {
    /// HTTP status for remote failures.
    pub fn status(&self) -> Option<u16> {
        match self {
            ReplyError::Remote { status } => Some(*status),
            _ => None,
        }
    }
}

/// Failure to build a runnable configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for {name}: {value}")]
    InvalidEnv { name: &'static str, value: String },

    #[error(transparent)]
    Playbook(#[from] coach_playbook::PlaybookError),

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}
