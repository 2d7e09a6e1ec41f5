//! Reference tools the sales pipeline may consult.
//!
//! A tool turns a free-text query into plain reference text (a scraped page,
//! a list of search hits). Tools are best-effort: the pipeline logs a failure
//! and carries on without the reference.

use futures_util::future::BoxFuture;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("unexpected response: {0}")]
    Response(String),
}

/// Source of reference text for a pipeline stage.
///
/// Object-safe (boxed future) so the pipeline can hold heterogeneous tools.
pub trait ReferenceTool: Send + Sync {
    /// Short identifier used in logs and prompt headings.
    fn name(&self) -> &str;

    fn lookup<'a>(&'a self, query: &'a str) -> BoxFuture<'a, Result<String, ToolError>>;
}
