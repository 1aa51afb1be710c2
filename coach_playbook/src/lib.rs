//! # Coach Playbook
//!
//! The content crate for the sales coach - positioning principles, competitor
//! notes, the welcome message and the quick prompts offered to the user.
//! This crate holds data only; reply selection lives in `coach_core`.

pub mod error;
pub mod knowledge_base;
pub mod playbook;

pub use error::*;
pub use knowledge_base::*;
pub use playbook::*;
