//! Scripted reply templates.

use coach_playbook::KnowledgeBase;

use super::chooser::{pick, Chooser};

/// Discovery questions mixed into replies for variety.
pub const DISCOVERY_QUESTIONS: [&str; 2] = [
    "Quick check: what’s the shopper’s #1 priority—space, features, price, or driving feel?",
    "Before we compare: are they replacing a vehicle, and what do they love/hate about it?",
];

/// Inputs available to a template builder.
pub struct TemplateContext<'a> {
    pub knowledge: &'a KnowledgeBase,
    pub chooser: &'a dyn Chooser,
}

impl TemplateContext<'_> {
    fn discovery_question(&self) -> &'static str {
        pick(self.chooser, &DISCOVERY_QUESTIONS)
            .copied()
            .unwrap_or(DISCOVERY_QUESTIONS[0])
    }
}

pub fn palisade_talk_track(ctx: &TemplateContext<'_>) -> String {
    format!(
        concat!(
            "Here’s a 20-second talk track vs Palisade (demo):\n\n",
            "1) Align: “If comfort and family usability matter most, great.”\n",
            "2) Reframe: “Let’s match what you *do* every week—car seats, cargo, road trips.”\n",
            "3) Anchor Atlas outcome: “Atlas is built around easy daily use: clear packaging, strong space story, and a confident highway feel.”\n",
            "4) Close with a question: “Which matters more—3rd-row comfort or cargo behind the 3rd row?”\n\n",
            "Coach principles:\n{}"
        ),
        ctx.knowledge.render_principles()
    )
}

pub fn pilot_qualifying(ctx: &TemplateContext<'_>) -> String {
    format!(
        concat!(
            "For a Pilot shopper, qualify fast (demo):\n\n",
            "Ask these 5:\n",
            "• “How often is the 3rd row used—kids daily or occasional adults?”\n",
            "• “Any must-have tech: CarPlay, driver assist, camera views?”\n",
            "• “Road-trip frequency? What annoys you on long drives?”\n",
            "• “Cargo: strollers/sports gear? What’s the ‘big item’?”\n",
            "• “Timing: are you shopping availability or waiting for a specific trim?”\n\n",
            "{}"
        ),
        ctx.discovery_question()
    )
}

pub fn value_objection(_ctx: &TemplateContext<'_>) -> String {
    concat!(
        "Handling “Grand Highlander is better value” (demo):\n\n",
        "1) Agree: “Totally fair—value matters.”\n",
        "2) Define value: “Is value lowest payment, best features, or best fit for your family?”\n",
        "3) Reframe: “If the vehicle fits your life better—space, comfort, day-to-day ease—that’s the best value.”\n",
        "4) Proof step: “Let’s do a 3-minute ‘real-life test’: 3rd row access + cargo behind 3rd row + driver visibility.”\n",
        "5) Close: “If Atlas wins 2 of those 3, would it be worth a closer look?”"
    )
    .to_string()
}

pub fn comparison_outline(_ctx: &TemplateContext<'_>) -> String {
    concat!(
        "Side-by-side comparison outline (demo):\n\n",
        "A) Customer priorities (rank 1–3)\n",
        "B) Space & usability (3rd row access, cargo, kid-friendliness)\n",
        "C) Driving & comfort (road noise, ride, visibility)\n",
        "D) Tech & safety (must-have features → show outcomes)\n",
        "E) Ownership story (warranty/service/availability—whatever applies)\n",
        "F) Decision close (2-option summary + next step)\n\n",
        "Want this tailored to a “family of 5 + sports gear” scenario?"
    )
    .to_string()
}

pub fn general_coaching(ctx: &TemplateContext<'_>) -> String {
    format!(
        concat!(
            "Got it. Here’s a coaching approach (demo):\n\n",
            "{}\n\n",
            "Then use:\n{}\n\n",
            "If you tell me which competitor came up (Palisade, Pilot, or Grand Highlander), ",
            "I’ll generate a talk track + 2 objection handlers."
        ),
        ctx.discovery_question(),
        ctx.knowledge.render_principles()
    )
}
