//! Reply sources - where an assistant reply comes from.
//!
//! A session is built with exactly one source: the scripted dispatcher, or a
//! remote proxy that honours the same `utterance -> reply` contract.

mod remote;

pub use remote::*;

use async_trait::async_trait;
use coach_playbook::KnowledgeBase;
use std::sync::Arc;

use crate::dispatcher::{Chooser, RandomChooser, ResponseDispatcher};
use crate::error::ReplyError;

/// Produces one reply for one utterance.
#[async_trait]
pub trait ReplyService: Send + Sync {
    async fn reply(&self, utterance: &str) -> Result<String, ReplyError>;

    /// Short name used in logs.
    fn name(&self) -> &'static str;
}

/// Canned replies from the keyword dispatcher. Never fails.
#[derive(Clone)]
pub struct ScriptedReplies {
    knowledge: Arc<KnowledgeBase>,
    dispatcher: ResponseDispatcher,
    chooser: Arc<dyn Chooser>,
}

impl ScriptedReplies {
    /// Default rule table with random discovery questions.
    pub fn new(knowledge: Arc<KnowledgeBase>) -> Self {
        Self::with_parts(knowledge, ResponseDispatcher::with_defaults(), Arc::new(RandomChooser))
    }

    pub fn with_parts(
        knowledge: Arc<KnowledgeBase>,
        dispatcher: ResponseDispatcher,
        chooser: Arc<dyn Chooser>,
    ) -> Self {
        Self {
            knowledge,
            dispatcher,
            chooser,
        }
    }

    /// Replace the chooser, e.g. with a fixed one for deterministic output.
    pub fn with_chooser(mut self, chooser: Arc<dyn Chooser>) -> Self {
        self.chooser = chooser;
        self
    }

    pub fn dispatcher(&self) -> &ResponseDispatcher {
        &self.dispatcher
    }

    /// Synchronous form of the scripted reply.
    pub fn reply_now(&self, utterance: &str) -> String {
        self.dispatcher
            .reply(utterance, &self.knowledge, self.chooser.as_ref())
    }
}

impl std::fmt::Debug for ScriptedReplies {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptedReplies")
            .field("dispatcher", &self.dispatcher)
            .finish_non_exhaustive()
    }
}

/// The reply source a session is constructed with.
#[derive(Debug, Clone)]
pub enum ReplySource {
    Scripted(ScriptedReplies),
    Remote(RemoteReplySource),
}

impl ReplySource {
    pub fn scripted(knowledge: Arc<KnowledgeBase>) -> Self {
        ReplySource::Scripted(ScriptedReplies::new(knowledge))
    }
}

#[async_trait]
impl ReplyService for ReplySource {
    async fn reply(&self, utterance: &str) -> Result<String, ReplyError> {
        match self {
            ReplySource::Scripted(scripted) => Ok(scripted.reply_now(utterance)),
            ReplySource::Remote(remote) => remote.request_reply(utterance).await,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            ReplySource::Scripted(_) => "scripted",
            ReplySource::Remote(_) => "remote",
        }
    }
}
