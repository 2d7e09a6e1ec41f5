//! Company website reader.
//!
//! Fetches one configured page and reduces it to readable text. The query is
//! ignored: the page is the reference.

use futures_util::future::BoxFuture;
use scraper::{Html, Selector};

use salesdesk_core::tool::{ReferenceTool, ToolError};

/// Longest reference text handed to a prompt, in characters.
pub const DEFAULT_MAX_CHARS: usize = 6_000;

const TEXT_ELEMENTS: &str = "title, h1, h2, h3, h4, p, li, td, blockquote";

pub struct WebsiteReader {
    client: reqwest::Client,
    url: String,
    max_chars: usize,
}

impl WebsiteReader {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
            max_chars: DEFAULT_MAX_CHARS,
        }
    }

    pub fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = max_chars;
        self
    }

    async fn fetch(&self) -> Result<String, ToolError> {
        let body = self
            .client
            .get(&self.url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| ToolError::Request(e.to_string()))?
            .text()
            .await
            .map_err(|e| ToolError::Response(e.to_string()))?;

        let text = extract_text(&body, self.max_chars)?;
        tracing::debug!(url = %self.url, chars = text.len(), "Website reference fetched");
        Ok(text)
    }
}

impl ReferenceTool for WebsiteReader {
    fn name(&self) -> &str {
        "website"
    }

    fn lookup<'a>(&'a self, _query: &'a str) -> BoxFuture<'a, Result<String, ToolError>> {
        Box::pin(self.fetch())
    }
}

/// Visible text of the content elements in `html`, one element per line,
/// whitespace collapsed, capped at `max_chars` characters.
pub fn extract_text(html: &str, max_chars: usize) -> Result<String, ToolError> {
    let selector =
        Selector::parse(TEXT_ELEMENTS).map_err(|e| ToolError::Response(e.to_string()))?;
    let document = Html::parse_document(html);

    let mut out = String::new();
    let mut used = 0usize;
    for element in document.select(&selector) {
        let raw: String = element.text().collect();
        let line = raw.split_whitespace().collect::<Vec<_>>().join(" ");
        if line.is_empty() {
            continue;
        }
        let remaining = max_chars.saturating_sub(used);
        if remaining == 0 {
            break;
        }
        if !out.is_empty() {
            out.push('\n');
        }
        let taken: String = line.chars().take(remaining).collect();
        used += taken.chars().count();
        out.push_str(&taken);
    }

    if out.is_empty() {
        return Err(ToolError::Response("page has no readable text".to_string()));
    }
    Ok(out)
}
