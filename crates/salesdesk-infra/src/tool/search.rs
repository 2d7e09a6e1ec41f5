//! Web search via the Serper API.

use futures_util::future::BoxFuture;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use salesdesk_core::tool::{ReferenceTool, ToolError};
use salesdesk_types::config::SearchConfig;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default, rename = "answerBox")]
    answer_box: Option<AnswerBox>,
    #[serde(default)]
    organic: Vec<OrganicResult>,
}

#[derive(Debug, Deserialize)]
struct AnswerBox {
    #[serde(default)]
    answer: Option<String>,
    #[serde(default)]
    snippet: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OrganicResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    snippet: String,
}

/// Google search through `google.serper.dev`.
///
/// Does not derive Debug (holds the API key).
pub struct SerperSearch {
    client: reqwest::Client,
    endpoint: String,
    api_key: SecretString,
    max_results: usize,
}

impl SerperSearch {
    pub fn new(client: reqwest::Client, config: &SearchConfig, api_key: SecretString) -> Self {
        Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key,
            max_results: config.max_results.max(1),
        }
    }

    async fn search(&self, query: &str) -> Result<String, ToolError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("X-API-KEY", self.api_key.expose_secret())
            .json(&serde_json::json!({ "q": query, "num": self.max_results }))
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| ToolError::Request(e.to_string()))?;

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| ToolError::Response(e.to_string()))?;

        let text = format_results(&body, self.max_results);
        if text.is_empty() {
            return Err(ToolError::Response(format!("no results for {query:?}")));
        }
        Ok(text)
    }
}

impl ReferenceTool for SerperSearch {
    fn name(&self) -> &str {
        "search"
    }

    fn lookup<'a>(&'a self, query: &'a str) -> BoxFuture<'a, Result<String, ToolError>> {
        Box::pin(self.search(query))
    }
}

fn format_results(body: &SearchResponse, max_results: usize) -> String {
    let mut blocks = Vec::new();

    if let Some(answer) = body
        .answer_box
        .as_ref()
        .and_then(|a| a.answer.as_ref().or(a.snippet.as_ref()))
    {
        blocks.push(format!("Answer: {}", answer.trim()));
    }

    for hit in body.organic.iter().take(max_results) {
        if hit.title.is_empty() && hit.snippet.is_empty() {
            continue;
        }
        blocks.push(format!("{}\n{}\n{}", hit.title.trim(), hit.link.trim(), hit.snippet.trim()));
    }

    blocks.join("\n\n")
}
