//! Errors raised while loading or validating a playbook.

use thiserror::Error;

/// Failure to produce a usable playbook.
#[derive(Debug, Error)]
pub enum PlaybookError {
    #[error("failed to read playbook: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse playbook: {0}")]
    Parse(#[from] toml::de::Error),

    /// The playbook parsed but breaks a content rule.
    #[error("invalid playbook: {0}")]
    Invalid(String),
}

pub type PlaybookResult<T> = Result<T, PlaybookError>;
