//! Infrastructure layer for salesdesk.
//!
//! Contains implementations of the port traits defined in `salesdesk-core`:
//! the whole-file JSON session store, the OpenAI-compatible LLM client, the
//! website and web-search reference tools, plus data directory and
//! `config.toml` resolution.

pub mod config;
pub mod filesystem;
pub mod llm;
pub mod store;
pub mod tool;
