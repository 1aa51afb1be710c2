//! # Coach Core
//!
//! The engine of the sales coach. This crate takes the content from
//! `coach_playbook`, answers utterances with scripted replies and keeps the
//! conversation history.
//!
//! ## Core Components
//!
//! - **dispatcher**: Ordered keyword rules that pick one reply template
//! - **conversation**: Append-only log of user and assistant turns
//! - **reply_source**: Scripted or remote origin of assistant replies
//! - **session**: The per-utterance pipeline tying the above together
//! - **config**: File and environment configuration
//!
//! ## Design Philosophy
//!
//! - **Deterministic**: The only randomness is an injected `Chooser`
//! - **Append-only**: Turns are never edited or removed once logged
//! - **Total**: Every non-blank utterance gets exactly one assistant turn, even
//!   when the reply source fails

pub mod config;
pub mod conversation;
pub mod dispatcher;
pub mod error;
pub mod reply_source;
pub mod session;

pub use config::*;
pub use conversation::*;
pub use dispatcher::*;
pub use error::*;
pub use reply_source::*;
pub use session::*;
