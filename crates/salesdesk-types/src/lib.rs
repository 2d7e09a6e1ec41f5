//! Shared domain types for salesdesk.
//!
//! Sessions and turn records, inquiry input, chat-completion shapes,
//! configuration, and the error taxonomy used across the workspace.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod config;
pub mod error;
pub mod inquiry;
pub mod llm;
pub mod session;
