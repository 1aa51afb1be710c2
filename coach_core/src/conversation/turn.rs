//! Turn definitions - single messages in a conversation.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TurnId(pub Uuid);

impl TurnId {
    /// Create a new random turn ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TurnId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TurnId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Who a turn is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Short name shown next to the message.
    pub fn avatar_label(&self) -> &'static str {
        match self {
            Role::User => "You",
            Role::Assistant => "Coach",
        }
    }

    /// Verb shown in the message metadata line.
    pub fn meta_verb(&self) -> &'static str {
        match self {
            Role::User => "Sent",
            Role::Assistant => "Suggested",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// One message in the conversation. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    id: TurnId,
    role: Role,
    /// Display text, may span multiple lines.
    text: String,
    created_at: DateTime<Local>,
}

impl Turn {
    /// Create a turn stamped with the current local time.
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            id: TurnId::new(),
            role,
            text: text.into(),
            created_at: Local::now(),
        }
    }

    /// Override the creation timestamp.
    pub fn with_timestamp(mut self, created_at: DateTime<Local>) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn id(&self) -> TurnId {
        self.id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn created_at(&self) -> DateTime<Local> {
        self.created_at
    }

    /// Local hour:minute, e.g. `09:41`.
    pub fn display_time(&self) -> String {
        self.created_at.format("%H:%M").to_string()
    }

    /// Metadata line rendered under the message, e.g. `Sent • 09:41`.
    pub fn meta_label(&self) -> String {
        format!("{} • {}", self.role.meta_verb(), self.display_time())
    }
}
