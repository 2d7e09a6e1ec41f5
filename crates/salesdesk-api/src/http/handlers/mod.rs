//! HTTP request handlers for the REST API.

pub mod inquiry;
pub mod session;

#[cfg(test)]
pub(crate) mod test_support {
    use std::path::Path;

    use salesdesk_core::generator::pipeline::{PipelineSettings, SalesPipeline};
    use salesdesk_core::llm::box_provider::BoxLlmProvider;
    use salesdesk_core::llm::provider::LlmProvider;
    use salesdesk_core::turn::TurnController;
    use salesdesk_infra::config::turn_settings;
    use salesdesk_infra::store::JsonFileSessionStore;
    use salesdesk_types::config::{AssistantConfig, GlobalConfig};
    use salesdesk_types::llm::{
        CompletionRequest, CompletionResponse, FinishReason, LlmError, Usage,
    };

    use crate::state::AppState;

    /// Answers every stage with the same text.
    pub struct CannedProvider(pub &'static str);

    impl LlmProvider for CannedProvider {
        fn name(&self) -> &str {
            "canned"
        }

        fn default_model(&self) -> &str {
            "canned-1"
        }

        async fn complete(
            &self,
            _request: &CompletionRequest,
        ) -> Result<CompletionResponse, LlmError> {
            Ok(CompletionResponse {
                id: "c1".to_string(),
                content: self.0.to_string(),
                model: "canned-1".to_string(),
                finish_reason: FinishReason::Stop,
                usage: Usage::default(),
            })
        }
    }

    /// AppState over a temp store, no reference tools.
    pub fn state(dir: &Path, answer: &'static str) -> AppState {
        let config = GlobalConfig::default();
        let pipeline = SalesPipeline::new(
            BoxLlmProvider::new(CannedProvider(answer)),
            AssistantConfig::default(),
            PipelineSettings::default(),
        );
        let controller = TurnController::new(
            JsonFileSessionStore::new(dir.join("chat_sessions.json")),
            pipeline,
            turn_settings(&config),
        );
        AppState::from_parts(controller, config, dir.to_path_buf())
    }
}
