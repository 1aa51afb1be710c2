//! Conversation module - the append-only turn history of a session.
//!
//! The log starts empty, is seeded with one assistant welcome turn, then grows
//! by one user turn per accepted submission and one assistant turn per reply.
//! Turns are never reordered, edited or removed.

mod turn;

pub use turn::*;

use serde::Serialize;

use crate::error::ConversationError;

/// Ordered, append-only sequence of turns.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConversationLog {
    turns: Vec<Turn>,
}

impl ConversationLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a log already seeded with the welcome turn.
    pub fn with_welcome(welcome_text: impl Into<String>) -> Self {
        let mut log = Self::new();
        log.push(Turn::new(Role::Assistant, welcome_text));
        log
    }

    /// Append the opening assistant turn. Only valid on an empty log.
    pub fn seed(&mut self, welcome_text: impl Into<String>) -> Result<&Turn, ConversationError> {
        if !self.turns.is_empty() {
            return Err(ConversationError::AlreadySeeded);
        }
        Ok(self.push(Turn::new(Role::Assistant, welcome_text)))
    }

    /// Append a user turn holding the trimmed text.
    ///
    /// Blank or whitespace-only text is rejected and nothing is appended.
    pub fn append_user(&mut self, text: &str) -> Result<&Turn, ConversationError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ConversationError::BlankUtterance);
        }
        Ok(self.push(Turn::new(Role::User, trimmed)))
    }

    /// Append an assistant turn.
    pub fn append_assistant(&mut self, text: impl Into<String>) -> &Turn {
        self.push(Turn::new(Role::Assistant, text))
    }

    /// All turns in chronological order.
    pub fn snapshot(&self) -> &[Turn] {
        &self.turns
    }

    /// Most recent turn.
    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    fn push(&mut self, turn: Turn) -> &Turn {
        self.turns.push(turn);
        &self.turns[self.turns.len() - 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_appends_assistant_turn() {
        let mut log = ConversationLog::new();
        let turn = log.seed("Welcome").unwrap();

        assert_eq!(turn.role(), Role::Assistant);
        assert_eq!(turn.text(), "Welcome");
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_seed_only_once() {
        let mut log = ConversationLog::new();
        log.seed("Welcome").unwrap();

        assert!(matches!(
            log.seed("Again"),
            Err(ConversationError::AlreadySeeded)
        ));
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_with_welcome_is_seeded() {
        let mut log = ConversationLog::with_welcome("Hi");
        assert_eq!(log.len(), 1);
        assert_eq!(log.last().unwrap().role(), Role::Assistant);
        assert!(log.seed("Hi again").is_err());
    }

    #[test]
    fn test_append_user_trims() {
        let mut log = ConversationLog::new();
        let turn = log.append_user("  pilot shopper \n").unwrap();

        assert_eq!(turn.text(), "pilot shopper");
        assert_eq!(turn.role(), Role::User);
    }

    #[test]
    fn test_append_user_rejects_blank() {
        let mut log = ConversationLog::new();
        log.seed("Welcome").unwrap();

        for blank in ["", "   ", "\n\t "] {
            assert!(matches!(
                log.append_user(blank),
                Err(ConversationError::BlankUtterance)
            ));
        }
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_snapshot_preserves_order() {
        let mut log = ConversationLog::new();
        log.seed("Welcome").unwrap();
        log.append_user("first").unwrap();
        log.append_assistant("reply one");
        log.append_user("second").unwrap();
        log.append_assistant("reply two");

        let texts: Vec<_> = log.snapshot().iter().map(|t| t.text()).collect();
        assert_eq!(
            texts,
            vec!["Welcome", "first", "reply one", "second", "reply two"]
        );
        assert_eq!(log.last().unwrap().text(), "reply two");
    }

    #[test]
    fn test_empty_log() {
        let log = ConversationLog::new();
        assert!(log.is_empty());
        assert!(log.last().is_none());
        assert!(log.snapshot().is_empty());
    }
}
