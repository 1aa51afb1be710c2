//! Session - one conversation and the pipeline that processes each utterance.
//!
//! For every submission:
//! 1. Blank input is dropped without touching the log
//! 2. The user turn is appended
//! 3. The session goes pending while the reply source works
//! 4. The reply (or an apology carrying the failure) is appended
//!
//! Pending is always cleared before the assistant turn lands, and no reply
//! failure escapes `submit`.

use coach_playbook::{KnowledgeBase, Playbook};
use std::sync::Arc;
use std::time::Duration;

use crate::conversation::{ConversationLog, Turn};
use crate::error::ReplyError;
use crate::reply_source::{ReplyService, ReplySource};

/// First line of the assistant turn written when a reply fails.
pub const APOLOGY_PREFIX: &str = "Sorry — I hit a snag (demo).";

/// Timing knobs for the turn pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Pause before asking for the reply, so the typing indicator is visible.
    pub reply_delay: Duration,

    /// Upper bound on the reply source call. `None` waits indefinitely.
    pub reply_timeout: Option<Duration>,
}

impl SessionConfig {
    /// No delay and no timeout.
    pub fn immediate() -> Self {
        Self {
            reply_delay: Duration::ZERO,
            reply_timeout: None,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            reply_delay: Duration::from_millis(450),
            reply_timeout: None,
        }
    }
}

/// Rendering hooks. Both default to doing nothing.
pub trait SessionObserver: Send + Sync {
    /// A turn was appended to the log.
    fn on_turn(&self, _turn: &Turn) {}

    /// The session entered or left the pending state.
    fn on_pending(&self, _pending: bool) {}
}

/// Observer that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl SessionObserver for NoopObserver {}

impl<T: SessionObserver + ?Sized> SessionObserver for Arc<T> {
    fn on_turn(&self, turn: &Turn) {
        (**self).on_turn(turn)
    }

    fn on_pending(&self, pending: bool) {
        (**self).on_pending(pending)
    }
}

/// What happened to a submission.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// Blank input; nothing was appended.
    Ignored,
    /// User turn and reply appended.
    Replied,
    /// User turn and apology appended.
    Failed(ReplyError),
}

impl SubmitOutcome {
    pub fn is_ignored(&self) -> bool {
        matches!(self, SubmitOutcome::Ignored)
    }
}

/// A single coaching conversation.
pub struct Session<R: ReplyService = ReplySource> {
    playbook: Arc<Playbook>,
    log: ConversationLog,
    source: R,
    config: SessionConfig,
    pending: bool,
    observer: Box<dyn SessionObserver>,
}

impl<R: ReplyService> Session<R> {
    /// Start a conversation seeded with the playbook's welcome message.
    pub fn new(playbook: Arc<Playbook>, source: R, config: SessionConfig) -> Self {
        let log = ConversationLog::with_welcome(playbook.welcome_message.clone());

        tracing::info!(source = source.name(), "Session started");

        Self {
            playbook,
            log,
            source,
            config,
            pending: false,
            observer: Box::new(NoopObserver),
        }
    }

    /// Attach a rendering observer.
    pub fn with_observer(mut self, observer: Box<dyn SessionObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn log(&self) -> &ConversationLog {
        &self.log
    }

    pub fn playbook(&self) -> &Playbook {
        &self.playbook
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.playbook.knowledge
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Process one raw utterance from the input box.
    pub async fn submit(&mut self, raw: &str) -> SubmitOutcome {
        let utterance = match self.log.append_user(raw) {
            Ok(turn) => {
                self.observer.on_turn(turn);
                turn.text().to_string()
            }
            Err(err) => {
                tracing::debug!(%err, "Ignoring submission");
                return SubmitOutcome::Ignored;
            }
        };

        tracing::info!(
            source = self.source.name(),
            chars = utterance.chars().count(),
            "Processing utterance"
        );

        self.set_pending(true);
        let result = self.fetch_reply(&utterance).await;
        self.set_pending(false);

        let (text, outcome) = match result {
            Ok(reply) => (reply, SubmitOutcome::Replied),
            Err(err) => {
                tracing::warn!(source = self.source.name(), error = %err, "Reply failed");
                (format!("{APOLOGY_PREFIX}\n\n{err}"), SubmitOutcome::Failed(err))
            }
        };

        let turn = self.log.append_assistant(text);
        self.observer.on_turn(turn);
        outcome
    }

    /// Submit the quick prompt at `index`. Unknown chips are ignored.
    pub async fn select_prompt(&mut self, index: usize) -> SubmitOutcome {
        let Some(prompt) = self.playbook.prompt(index).map(|c| c.prompt.clone()) else {
            tracing::debug!(index, "No quick prompt at index");
            return SubmitOutcome::Ignored;
        };
        self.submit(&prompt).await
    }

    async fn fetch_reply(&self, utterance: &str) -> Result<String, ReplyError> {
        if !self.config.reply_delay.is_zero() {
            tokio::time::sleep(self.config.reply_delay).await;
        }

        match self.config.reply_timeout {
            Some(limit) => tokio::time::timeout(limit, self.source.reply(utterance))
                .await
                .map_err(|_| ReplyError::Timeout(limit))?,
            None => self.source.reply(utterance).await,
        }
    }

    fn set_pending(&mut self, pending: bool) {
        self.pending = pending;
        self.observer.on_pending(pending);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::Role;
    use crate::dispatcher::FixedChooser;
    use crate::reply_source::ScriptedReplies;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        Turn(Role),
        Pending(bool),
    }

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<Event>>,
    }

    impl SessionObserver for Recorder {
        fn on_turn(&self, turn: &Turn) {
            self.events.lock().unwrap().push(Event::Turn(turn.role()));
        }

        fn on_pending(&self, pending: bool) {
            self.events.lock().unwrap().push(Event::Pending(pending));
        }
    }

    struct FailingSource;

    #[async_trait]
    impl ReplyService for FailingSource {
        async fn reply(&self, _utterance: &str) -> Result<String, ReplyError> {
            Err(ReplyError::Remote { status: 502 })
        }

        fn name(&self) -> &'static str {
            "failing"
        }
    }

    struct SlowSource;

    #[async_trait]
    impl ReplyService for SlowSource {
        async fn reply(&self, _utterance: &str) -> Result<String, ReplyError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok("too late".to_string())
        }

        fn name(&self) -> &'static str {
            "slow"
        }
    }

    fn scripted_session() -> Session {
        let playbook = Arc::new(Playbook::builtin());
        let source = ReplySource::Scripted(
            ScriptedReplies::new(Arc::new(playbook.knowledge.clone()))
                .with_chooser(Arc::new(FixedChooser(0))),
        );
        Session::new(playbook, source, SessionConfig::immediate())
    }

    #[tokio::test]
    async fn test_session_starts_with_welcome() {
        let session = scripted_session();
        let turns = session.log().snapshot();

        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0].role(), Role::Assistant);
        assert_eq!(turns[0].text(), Playbook::builtin().welcome_message);
        assert!(!session.is_pending());
    }

    #[tokio::test]
    async fn test_turns_alternate() {
        let mut session = scripted_session();
        let inputs = ["palisade", "pilot", "value", "outline", "hello there"];

        for input in inputs {
            assert!(matches!(session.submit(input).await, SubmitOutcome::Replied));
        }

        let turns = session.log().snapshot();
        assert_eq!(turns.len(), 1 + 2 * inputs.len());
        assert_eq!(turns[0].role(), Role::Assistant);
        for pair in turns[1..].chunks(2) {
            assert_eq!(pair[0].role(), Role::User);
            assert_eq!(pair[1].role(), Role::Assistant);
            assert!(!pair[1].text().is_empty());
        }
    }

    #[tokio::test]
    async fn test_blank_submission_is_ignored() {
        let mut session = scripted_session();

        for blank in ["", "   ", "\n\t"] {
            assert!(session.submit(blank).await.is_ignored());
        }
        assert_eq!(session.log().len(), 1);
    }

    #[tokio::test]
    async fn test_user_text_is_trimmed() {
        let mut session = scripted_session();
        session.submit("   tell me about pilot  ").await;

        let user = &session.log().snapshot()[1];
        assert_eq!(user.text(), "tell me about pilot");
        assert!(session
            .log()
            .last()
            .unwrap()
            .text()
            .starts_with("For a Pilot shopper"));
    }

    #[tokio::test]
    async fn test_failing_source_appends_apology() {
        let playbook = Arc::new(Playbook::builtin());
        let mut session = Session::new(playbook, FailingSource, SessionConfig::immediate());

        let outcome = session.submit("palisade").await;

        assert!(matches!(outcome, SubmitOutcome::Failed(ReplyError::Remote { status: 502 })));
        assert!(!session.is_pending());
        assert_eq!(session.log().len(), 3);

        let last = session.log().last().unwrap();
        assert_eq!(last.role(), Role::Assistant);
        assert!(last.text().starts_with(APOLOGY_PREFIX));
        assert!(last.text().ends_with("Proxy error: 502"));
    }

    #[tokio::test]
    async fn test_timeout_is_a_failure() {
        let playbook = Arc::new(Playbook::builtin());
        let config = SessionConfig {
            reply_delay: Duration::ZERO,
            reply_timeout: Some(Duration::from_millis(20)),
        };
        let mut session = Session::new(playbook, SlowSource, config);

        let outcome = session.submit("hello").await;

        assert!(matches!(outcome, SubmitOutcome::Failed(ReplyError::Timeout(_))));
        assert!(!session.is_pending());
        assert!(session.log().last().unwrap().text().starts_with(APOLOGY_PREFIX));
    }

    #[tokio::test]
    async fn test_observer_sees_pipeline_order() {
        let recorder = Arc::new(Recorder::default());
        let mut session = scripted_session().with_observer(Box::new(recorder.clone()));

        session.submit("comparison").await;
        session.submit("  ").await;

        let events = recorder.events.lock().unwrap().clone();
        assert_eq!(
            events,
            vec![
                Event::Turn(Role::User),
                Event::Pending(true),
                Event::Pending(false),
                Event::Turn(Role::Assistant),
            ]
        );
    }

    #[tokio::test]
    async fn test_failure_clears_pending_for_observer() {
        let recorder = Arc::new(Recorder::default());
        let mut session = Session::new(
            Arc::new(Playbook::builtin()),
            FailingSource,
            SessionConfig::immediate(),
        )
        .with_observer(Box::new(recorder.clone()));

        session.submit("pilot").await;

        let events = recorder.events.lock().unwrap().clone();
        assert_eq!(events[2], Event::Pending(false));
        assert_eq!(events.len(), 4);
    }

    #[tokio::test]
    async fn test_select_prompt() {
        let mut session = scripted_session();

        assert!(matches!(session.select_prompt(0).await, SubmitOutcome::Replied));
        assert_eq!(
            session.log().snapshot()[1].text(),
            session.playbook().quick_prompts[0].prompt
        );
        assert!(session.select_prompt(99).await.is_ignored());
        assert_eq!(session.log().len(), 3);
    }

    #[tokio::test]
    async fn test_reply_delay_is_applied() {
        let playbook = Arc::new(Playbook::builtin());
        let source = ReplySource::scripted(Arc::new(playbook.knowledge.clone()));
        let config = SessionConfig {
            reply_delay: Duration::from_millis(30),
            reply_timeout: None,
        };
        let mut session = Session::new(playbook, source, config);

        let started = std::time::Instant::now();
        session.submit("hi").await;
        assert!(started.elapsed() >= Duration::from_millis(30));
    }
}
