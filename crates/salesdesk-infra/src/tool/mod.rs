//! Reference tool implementations for the sales pipeline.

pub mod search;
pub mod website;

pub use search::SerperSearch;
pub use website::WebsiteReader;

use std::time::Duration;

/// Timeout applied to every reference tool HTTP call.
pub const TOOL_HTTP_TIMEOUT: Duration = Duration::from_secs(20);

/// Shared HTTP client for reference tools.
pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(TOOL_HTTP_TIMEOUT)
        .user_agent(concat!("salesdesk/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_default()
}
