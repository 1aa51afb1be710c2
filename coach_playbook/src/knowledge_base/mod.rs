//! Knowledge Base - the static coaching content referenced by reply templates.
//!
//! The knowledge base consists of:
//! - **Positioning principles**: ordered advice, rendered as a bullet list
//! - **Competitor notes**: short strategy lines keyed by competitor name

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Prefix placed before each principle when rendered for display.
pub const BULLET: &str = "• ";

/// Static coaching content, immutable once loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeBase {
    /// Advice lines. Rendering order is meaningful.
    #[serde(default)]
    pub positioning_principles: Vec<String>,

    /// Competitor key (lowercase) -> strategy lines.
    #[serde(default)]
    pub competitor_notes: BTreeMap<String, Vec<String>>,
}

impl KnowledgeBase {
    /// Create an empty knowledge base.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a positioning principle.
    pub fn with_principle(mut self, principle: impl Into<String>) -> Self {
        self.positioning_principles.push(principle.into());
        self
    }

    /// Set the strategy notes for a competitor, replacing any existing ones.
    pub fn with_competitor_notes<I, S>(mut self, competitor: &str, notes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.competitor_notes.insert(
            normalize_key(competitor),
            notes.into_iter().map(Into::into).collect(),
        );
        self
    }

    /// The content the coach ships with.
    pub fn builtin() -> Self {
        Self::new()
            .with_principle(
                "Lead with needs: seating, cargo, towing, tech, safety, ownership experience.",
            )
            .with_principle(
                "Translate specs into outcomes: 'more room for hockey bags' > 'X cu ft'.",
            )
            .with_principle(
                "Ask a discovery question before comparing: 'What matters most: space, price, or features?'",
            )
            .with_principle(
                "Use 'agree + reframe + proof': validate, reposition, then anchor on benefits.",
            )
            .with_competitor_notes(
                "palisade",
                [
                    "Family comfort angle",
                    "Tech/trim confusion → simplify into outcomes",
                ],
            )
            .with_competitor_notes(
                "pilot",
                [
                    "Reliability perception",
                    "Emphasize daily usability + packaging clarity",
                ],
            )
            .with_competitor_notes(
                "grand highlander",
                [
                    "Value narrative",
                    "Hybrid curiosity → pivot to total-fit & availability",
                ],
            )
    }

    /// Ordered positioning principles.
    pub fn principles(&self) -> &[String] {
        &self.positioning_principles
    }

    /// Render the principles as a bullet list, one per line.
    pub fn render_principles(&self) -> String {
        self.positioning_principles
            .iter()
            .map(|p| format!("{BULLET}{p}"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Strategy notes for a competitor, looked up case-insensitively.
    pub fn notes_for(&self, competitor: &str) -> Option<&[String]> {
        self.competitor_notes
            .get(&normalize_key(competitor))
            .map(Vec::as_slice)
    }

    /// Known competitor keys in sorted order.
    pub fn competitors(&self) -> impl Iterator<Item = &str> {
        self.competitor_notes.keys().map(String::as_str)
    }

    /// Lowercase and trim all competitor keys. Later duplicates win.
    pub fn normalize(&mut self) {
        let notes = std::mem::take(&mut self.competitor_notes);
        self.competitor_notes = notes
            .into_iter()
            .map(|(key, lines)| (normalize_key(&key), lines))
            .collect();
    }
}

fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase()
}
