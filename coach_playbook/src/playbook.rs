//! Playbook - the full content bundle a coaching session is built from.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{PlaybookError, PlaybookResult};
use crate::knowledge_base::KnowledgeBase;

/// A predetermined utterance offered to the user as a one-click chip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickPrompt {
    /// Short text shown on the chip.
    pub label: String,
    /// Utterance submitted when the chip is selected.
    pub prompt: String,
}

impl QuickPrompt {
    pub fn new(label: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            prompt: prompt.into(),
        }
    }
}

/// Everything a session needs besides the reply logic itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playbook {
    /// Product the coach positions, sent as context to remote reply sources.
    pub brand: String,

    /// First assistant turn of every conversation.
    pub welcome_message: String,

    #[serde(default)]
    pub knowledge: KnowledgeBase,

    #[serde(default)]
    pub quick_prompts: Vec<QuickPrompt>,
}

impl Playbook {
    /// The playbook the coach ships with.
    pub fn builtin() -> Self {
        Self {
            brand: "Volkswagen Atlas".to_string(),
            welcome_message: concat!(
                "Hi — I’m your Volkswagen Atlas Performance Coach (vision demo).\n\n",
                "Ask for:\n",
                "• competitor talk tracks\n",
                "• objection handling\n",
                "• qualifying questions\n",
                "• side-by-side comparison structure\n\n",
                "Tip: try the quick buttons below."
            )
            .to_string(),
            knowledge: KnowledgeBase::builtin(),
            quick_prompts: vec![
                QuickPrompt::new("Palisade talk track", "Give me a talk track vs Palisade"),
                QuickPrompt::new(
                    "Pilot qualifying",
                    "What should I ask a Pilot shopper?",
                ),
                QuickPrompt::new(
                    "Value objection",
                    "Customer says Grand Highlander is better value",
                ),
                QuickPrompt::new(
                    "Comparison outline",
                    "Build me a side-by-side comparison outline",
                ),
            ],
        }
    }

    /// Parse a playbook from TOML text and validate it.
    pub fn from_toml_str(text: &str) -> PlaybookResult<Self> {
        let mut playbook: Playbook = toml::from_str(text)?;
        playbook.knowledge.normalize();
        playbook.validate()?;
        Ok(playbook)
    }

    /// Load a playbook from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> PlaybookResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let playbook = Self::from_toml_str(&text)?;

        tracing::info!(
            path = %path.display(),
            principles = playbook.knowledge.positioning_principles.len(),
            competitors = playbook.knowledge.competitor_notes.len(),
            quick_prompts = playbook.quick_prompts.len(),
            "Loaded playbook"
        );

        Ok(playbook)
    }

    /// Check the content rules templates rely on.
    pub fn validate(&self) -> PlaybookResult<()> {
        if self.welcome_message.trim().is_empty() {
            return Err(PlaybookError::Invalid(
                "welcome message is blank".to_string(),
            ));
        }

        if self.knowledge.positioning_principles.is_empty() {
            return Err(PlaybookError::Invalid(
                "at least one positioning principle is required".to_string(),
            ));
        }

        if let Some(i) = self
            .knowledge
            .positioning_principles
            .iter()
            .position(|p| p.trim().is_empty())
        {
            return Err(PlaybookError::Invalid(format!(
                "positioning principle {} is blank",
                i + 1
            )));
        }

        if let Some(chip) = self
            .quick_prompts
            .iter()
            .find(|c| c.prompt.trim().is_empty())
        {
            return Err(PlaybookError::Invalid(format!(
                "quick prompt '{}' has no text",
                chip.label
            )));
        }

        Ok(())
    }

    /// Quick prompt by zero-based position.
    pub fn prompt(&self, index: usize) -> Option<&QuickPrompt> {
        self.quick_prompts.get(index)
    }
}

impl Default for Playbook {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
brand = "Test Wagon"
welcome_message = "Hello, coach here."

[knowledge]
positioning_principles = ["Listen first.", "Sell outcomes."]

[knowledge.competitor_notes]
"Rival One" = ["Price angle"]

[[quick_prompts]]
label = "Rival"
prompt = "talk track vs rival"
"#;

    #[test]
    fn test_builtin_is_valid() {
        let playbook = Playbook::builtin();
        assert!(playbook.validate().is_ok());
        assert_eq!(playbook.quick_prompts.len(), 4);
        assert!(playbook.welcome_message.contains("Ask for:"));
    }

    #[test]
    fn test_parse_toml() {
        let playbook = Playbook::from_toml_str(SAMPLE).unwrap();

        assert_eq!(playbook.brand, "Test Wagon");
        assert_eq!(playbook.knowledge.principles().len(), 2);
        assert_eq!(
            playbook.knowledge.notes_for("rival one").unwrap(),
            &["Price angle".to_string()]
        );
        assert_eq!(playbook.prompt(0).unwrap().prompt, "talk track vs rival");
        assert!(playbook.prompt(1).is_none());
    }

    #[test]
    fn test_example_file_matches_builtin() {
        let playbook =
            Playbook::from_toml_str(include_str!("../playbook.example.toml")).unwrap();
        assert_eq!(playbook, Playbook::builtin());
    }

    #[test]
    fn test_rejects_missing_principles() {
        let text = r#"
brand = "X"
welcome_message = "Hi"
"#;
        let err = Playbook::from_toml_str(text).unwrap_err();
        assert!(matches!(err, PlaybookError::Invalid(_)));
    }

    #[test]
    fn test_rejects_blank_welcome() {
        let mut playbook = Playbook::builtin();
        playbook.welcome_message = "   ".to_string();
        assert!(matches!(
            playbook.validate(),
            Err(PlaybookError::Invalid(msg)) if msg.contains("welcome")
        ));
    }

    #[test]
    fn test_rejects_blank_quick_prompt() {
        let mut playbook = Playbook::builtin();
        playbook.quick_prompts.push(QuickPrompt::new("Empty", " "));
        assert!(playbook.validate().is_err());
    }

    #[test]
    fn test_parse_error() {
        let err = Playbook::from_toml_str("brand = ").unwrap_err();
        assert!(matches!(err, PlaybookError::Parse(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Playbook::load("/nonexistent/playbook.toml").unwrap_err();
        assert!(matches!(err, PlaybookError::Io(_)));
    }
}
