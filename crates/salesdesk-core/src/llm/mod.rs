//! LLM provider abstraction.
//!
//! [`provider::LlmProvider`] is the RPITIT trait concrete clients implement;
//! [`box_provider::BoxLlmProvider`] erases it for runtime selection.

pub mod box_provider;
pub mod provider;
