//! Response Dispatcher - maps free text to exactly one scripted reply.
//!
//! Dispatch works as follows:
//! 1. **Normalize**: Lowercase the utterance once
//! 2. **Match**: Walk the ordered rule list; a rule fires if any of its
//!    trigger keywords occurs as a substring
//! 3. **Render**: The first rule that fires builds the reply; if none fires,
//!    the fallback template does
//!
//! Rule order is the precedence: "palisade value" is a Palisade question, not
//! a value objection.

mod chooser;
pub mod templates;

pub use chooser::*;

use coach_playbook::KnowledgeBase;
use serde::{Deserialize, Serialize};

use templates::TemplateContext;

/// Builds a reply from the knowledge base and chooser.
pub type TemplateBuilder = fn(&TemplateContext<'_>) -> String;

/// Which scripted reply a rule produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReplyKind {
    PalisadeTalkTrack,
    PilotQualifying,
    ValueObjection,
    ComparisonOutline,
    /// No trigger matched.
    GeneralCoaching,
}

/// Keyword predicate of a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trigger {
    keywords: Vec<String>,
}

impl Trigger {
    /// Fires when any keyword is a substring of the input, ignoring case.
    pub fn any_of<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().to_lowercase())
                .collect(),
        }
    }

    /// `lowered` must already be lowercase.
    fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|k| lowered.contains(k.as_str()))
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }
}

/// One `(predicate, template)` entry of the dispatch table.
#[derive(Clone)]
pub struct ReplyRule {
    pub kind: ReplyKind,
    pub trigger: Trigger,
    pub build: TemplateBuilder,
}

impl ReplyRule {
    pub fn new(kind: ReplyKind, trigger: Trigger, build: TemplateBuilder) -> Self {
        Self {
            kind,
            trigger,
            build,
        }
    }
}

impl std::fmt::Debug for ReplyRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReplyRule")
            .field("kind", &self.kind)
            .field("trigger", &self.trigger)
            .finish_non_exhaustive()
    }
}

/// Ordered rule table plus the fallback reply.
#[derive(Clone)]
pub struct ResponseDispatcher {
    rules: Vec<ReplyRule>,
    fallback: TemplateBuilder,
}

impl ResponseDispatcher {
    /// Create a dispatcher from an explicit rule table.
    pub fn new(rules: Vec<ReplyRule>, fallback: TemplateBuilder) -> Self {
        Self { rules, fallback }
    }

    /// The coaching rule table.
    pub fn with_defaults() -> Self {
        Self::new(
            vec![
                ReplyRule::new(
                    ReplyKind::PalisadeTalkTrack,
                    Trigger::any_of(["palisade"]),
                    templates::palisade_talk_track,
                ),
                ReplyRule::new(
                    ReplyKind::PilotQualifying,
                    Trigger::any_of(["pilot"]),
                    templates::pilot_qualifying,
                ),
                ReplyRule::new(
                    ReplyKind::ValueObjection,
                    Trigger::any_of(["grand highlander", "highlander", "value"]),
                    templates::value_objection,
                ),
                ReplyRule::new(
                    ReplyKind::ComparisonOutline,
                    Trigger::any_of(["outline", "side-by-side", "comparison"]),
                    templates::comparison_outline,
                ),
            ],
            templates::general_coaching,
        )
    }

    /// Rules in precedence order.
    pub fn rules(&self) -> &[ReplyRule] {
        &self.rules
    }

    /// First rule whose trigger fires, if any.
    pub fn select(&self, utterance: &str) -> Option<&ReplyRule> {
        let lowered = utterance.to_lowercase();
        self.rules.iter().find(|rule| rule.trigger.matches(&lowered))
    }

    /// Which reply an utterance would get.
    pub fn classify(&self, utterance: &str) -> ReplyKind {
        self.select(utterance)
            .map(|rule| rule.kind)
            .unwrap_or(ReplyKind::GeneralCoaching)
    }

    /// Produce the scripted reply for an utterance.
    ///
    /// Total over all inputs; blank input gets the fallback reply.
    pub fn reply(&self, utterance: &str, knowledge: &KnowledgeBase, chooser: &dyn Chooser) -> String {
        let ctx = TemplateContext { knowledge, chooser };
        let build = self
            .select(utterance)
            .map(|rule| rule.build)
            .unwrap_or(self.fallback);
        build(&ctx)
    }
}

impl std::fmt::Debug for ResponseDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseDispatcher")
            .field("rules", &self.rules)
            .finish_non_exhaustive()
    }
}

impl Default for ResponseDispatcher {
    fn default() -> Self {
        Self::with_defaults()
    }
}
