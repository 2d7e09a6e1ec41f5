//! Business logic and port traits for salesdesk.
//!
//! This crate defines the "ports" (store, provider, and tool traits) that the
//! infrastructure layer implements, plus the turn controller and the sales
//! response pipeline. It depends only on `salesdesk-types` -- never on
//! `salesdesk-infra` or any file/network crate.

pub mod generator;
pub mod llm;
pub mod session;
pub mod tool;
pub mod turn;
