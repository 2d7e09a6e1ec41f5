//! SalesPipeline -- the shipped [`ResponseGenerator`].
//!
//! Runs the five [`SalesStage`]s in order against one LLM provider. Every
//! stage sees the inquiry, the recent conversation, and the notes written by
//! the stages before it. The review stage's output is the answer.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use salesdesk_types::config::AssistantConfig;
use salesdesk_types::error::GenerationError;
use salesdesk_types::inquiry::GenerationRequest;
use salesdesk_types::llm::{CompletionRequest, Message, Usage};

use super::stage::{Reference, SalesStage, StagePromptBuilder};
use super::ResponseGenerator;
use crate::llm::box_provider::BoxLlmProvider;
use crate::tool::ReferenceTool;

/// Text substituted when a reference tool fails.
const REFERENCE_UNAVAILABLE: &str = "(reference unavailable for this request)";

/// Model parameters applied to every stage call.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub max_tokens: u32,
    pub temperature: Option<f64>,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            max_tokens: 1024,
            temperature: None,
        }
    }
}

/// Five-stage sales response generator.
pub struct SalesPipeline {
    provider: BoxLlmProvider,
    profile: AssistantConfig,
    settings: PipelineSettings,
    website: Option<Arc<dyn ReferenceTool>>,
    search: Option<Arc<dyn ReferenceTool>>,
}

impl SalesPipeline {
    pub fn new(
        provider: BoxLlmProvider,
        profile: AssistantConfig,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            provider,
            profile,
            settings,
            website: None,
            search: None,
        }
    }

    /// Attach the company website reader used by the early stages.
    pub fn with_website_tool(mut self, tool: Arc<dyn ReferenceTool>) -> Self {
        self.website = Some(tool);
        self
    }

    /// Attach the web search used by the trust & source stage.
    pub fn with_search_tool(mut self, tool: Arc<dyn ReferenceTool>) -> Self {
        self.search = Some(tool);
        self
    }

    /// Best-effort lookup; failures degrade to a placeholder.
    async fn consult(tool: &dyn ReferenceTool, query: &str) -> Reference {
        let text = match tool.lookup(query).await {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => REFERENCE_UNAVAILABLE.to_string(),
            Err(e) => {
                warn!(tool = tool.name(), error = %e, "Reference lookup failed");
                REFERENCE_UNAVAILABLE.to_string()
            }
        };
        Reference {
            source: tool.name().to_string(),
            text,
        }
    }

    async fn run_stage(
        &self,
        stage: SalesStage,
        request: &GenerationRequest,
        earlier: &[(SalesStage, String)],
        references: &[Reference],
    ) -> Result<(String, Usage), GenerationError> {
        let completion = CompletionRequest {
            model: String::new(),
            messages: vec![Message::user(StagePromptBuilder::task(
                stage,
                &self.profile,
                request,
                earlier,
                references,
            ))],
            system: Some(StagePromptBuilder::system(stage, &self.profile)),
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
        };

        let response = self
            .provider
            .complete(&completion)
            .await
            .map_err(|e| GenerationError::Stage {
                stage: stage.slug().to_string(),
                message: e.to_string(),
            })?;

        Ok((response.content, response.usage))
    }
}

impl ResponseGenerator for SalesPipeline {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        let started = Instant::now();
        let mut earlier: Vec<(SalesStage, String)> = Vec::with_capacity(SalesStage::ALL.len());
        let mut usage = Usage::default();

        // The website is read once per request and shared by every stage that wants it.
        let mut website_ref: Option<Reference> = None;

        for stage in SalesStage::ALL {
            let mut references = Vec::new();

            if stage.uses_website() {
                if let Some(tool) = &self.website {
                    if website_ref.is_none() {
                        website_ref = Some(Self::consult(tool.as_ref(), &request.inquiry).await);
                    }
                    if let Some(reference) = &website_ref {
                        references.push(reference.clone());
                    }
                }
            }

            if stage.uses_search() {
                if let Some(tool) = &self.search {
                    let query = format!("{} {}", self.profile.company_name, request.inquiry);
                    references.push(Self::consult(tool.as_ref(), &query).await);
                }
            }

            let stage_started = Instant::now();
            let (output, stage_usage) =
                self.run_stage(stage, request, &earlier, &references).await?;
            usage += stage_usage;

            debug!(
                stage = stage.slug(),
                elapsed_ms = stage_started.elapsed().as_millis() as u64,
                output_chars = output.len(),
                "Pipeline stage complete"
            );
            earlier.push((stage, output));
        }

        let answer = earlier
            .pop()
            .map(|(_, text)| text.trim().to_string())
            .unwrap_or_default();
        if answer.is_empty() {
            return Err(GenerationError::EmptyResponse);
        }

        info!(
            provider = self.provider.name(),
            input_tokens = usage.input_tokens,
            output_tokens = usage.output_tokens,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Sales pipeline finished"
        );

        Ok(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use futures_util::future::BoxFuture;

    use salesdesk_types::llm::{CompletionResponse, FinishReason, LlmError};

    use crate::llm::provider::LlmProvider;
    use crate::tool::ToolError;

    /// Records every request and answers "<stage n>" or fails on a chosen call.
    struct ScriptedProvider {
        calls: Arc<Mutex<Vec<CompletionRequest>>>,
        fail_on_call: Option<usize>,
        last_answer: String,
    }

    impl LlmProvider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        fn default_model(&self) -> &str {
            "scripted-1"
        }

        async fn complete(
            &self,
            request: &CompletionRequest,
        ) -> Result<CompletionResponse, LlmError> {
            let n = {
                let mut calls = self.calls.lock().unwrap();
                calls.push(request.clone());
                calls.len()
            };
            if self.fail_on_call == Some(n) {
                return Err(LlmError::Provider {
                    message: "upstream quota".to_string(),
                });
            }
            let content = if n == SalesStage::ALL.len() {
                self.last_answer.clone()
            } else {
                format!("stage {n} notes")
            };
            Ok(CompletionResponse {
                id: format!("r{n}"),
                content,
                model: "scripted-1".to_string(),
                finish_reason: FinishReason::Stop,
                usage: Usage {
                    input_tokens: 10,
                    output_tokens: 5,
                },
            })
        }
    }

    struct CountingTool {
        name: &'static str,
        calls: Arc<AtomicUsize>,
        fail: bool,
    }

    impl ReferenceTool for CountingTool {
        fn name(&self) -> &str {
            self.name
        }

        fn lookup<'a>(&'a self, _query: &'a str) -> BoxFuture<'a, Result<String, ToolError>> {
            Box::pin(async move {
                self.calls.fetch_add(1, Ordering::SeqCst);
                if self.fail {
                    Err(ToolError::Request("connection refused".to_string()))
                } else {
                    Ok(format!("{} says hello", self.name))
                }
            })
        }
    }

    fn pipeline(
        fail_on_call: Option<usize>,
        last_answer: &str,
    ) -> (SalesPipeline, Arc<Mutex<Vec<CompletionRequest>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let provider = ScriptedProvider {
            calls: calls.clone(),
            fail_on_call,
            last_answer: last_answer.to_string(),
        };
        let pipeline = SalesPipeline::new(
            BoxLlmProvider::new(provider),
            AssistantConfig::default(),
            PipelineSettings::default(),
        );
        (pipeline, calls)
    }

    fn request() -> GenerationRequest {
        GenerationRequest {
            company: "Acme".to_string(),
            inquiry: "pricing?".to_string(),
            history: vec![],
        }
    }

    #[tokio::test]
    async fn test_runs_all_stages_in_order_and_returns_review_output() {
        let (pipeline, calls) = pipeline(None, "  Our plans start at $10.  ");

        let answer = pipeline.generate(&request()).await.unwrap();
        assert_eq!(answer, "Our plans start at $10.");

        let calls = calls.lock().unwrap();
        assert_eq!(calls.len(), 5);
        for (call, stage) in calls.iter().zip(SalesStage::ALL) {
            assert!(call.system.as_deref().unwrap().contains(stage.role()));
        }
        // Each stage sees the notes of every earlier stage.
        assert!(!calls[0].messages[0].content.contains("<earlier_notes>"));
        assert!(calls[4].messages[0].content.contains("stage 1 notes"));
        assert!(calls[4].messages[0].content.contains("stage 4 notes"));
    }

    #[tokio::test]
    async fn test_stage_failure_fails_generation() {
        let (pipeline, calls) = pipeline(Some(3), "unused");

        let err = pipeline.generate(&request()).await.unwrap_err();
        match err {
            GenerationError::Stage { stage, message } => {
                assert_eq!(stage, "engagement");
                assert!(message.contains("upstream quota"));
            }
            other => panic!("expected stage error, got {other:?}"),
        }
        assert_eq!(calls.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_blank_review_output_is_empty_response() {
        let (pipeline, _) = pipeline(None, "   ");
        let err = pipeline.generate(&request()).await.unwrap_err();
        assert!(matches!(err, GenerationError::EmptyResponse));
    }

    #[tokio::test]
    async fn test_website_read_once_and_search_only_in_trust_stage() {
        let (pipeline, calls) = pipeline(None, "done");
        let website_calls = Arc::new(AtomicUsize::new(0));
        let search_calls = Arc::new(AtomicUsize::new(0));
        let pipeline = pipeline
            .with_website_tool(Arc::new(CountingTool {
                name: "website",
                calls: website_calls.clone(),
                fail: false,
            }))
            .with_search_tool(Arc::new(CountingTool {
                name: "search",
                calls: search_calls.clone(),
                fail: false,
            }));

        pipeline.generate(&request()).await.unwrap();

        assert_eq!(website_calls.load(Ordering::SeqCst), 1);
        assert_eq!(search_calls.load(Ordering::SeqCst), 1);

        let calls = calls.lock().unwrap();
        assert!(calls[0].messages[0].content.contains("website says hello"));
        assert!(!calls[0].messages[0].content.contains("search says hello"));
        assert!(calls[1].messages[0].content.contains("website says hello"));
        assert!(calls[1].messages[0].content.contains("search says hello"));
        assert!(!calls[2].messages[0].content.contains("<reference"));
    }

    #[tokio::test]
    async fn test_tool_failure_degrades_to_placeholder() {
        let (pipeline, calls) = pipeline(None, "still answered");
        let pipeline = pipeline.with_website_tool(Arc::new(CountingTool {
            name: "website",
            calls: Arc::new(AtomicUsize::new(0)),
            fail: true,
        }));

        let answer = pipeline.generate(&request()).await.unwrap();
        assert_eq!(answer, "still answered");
        assert!(calls.lock().unwrap()[0].messages[0]
            .content
            .contains(REFERENCE_UNAVAILABLE));
    }
}
