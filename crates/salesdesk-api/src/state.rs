//! Application state wiring the store, pipeline, and turn controller.
//!
//! The turn controller is generic over store and generator traits; AppState
//! pins it to the concrete infra implementations.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;

use salesdesk_core::generator::pipeline::{PipelineSettings, SalesPipeline};
use salesdesk_core::turn::TurnController;
use salesdesk_infra::config::{load_global_config, resolve_store_path, turn_settings};
use salesdesk_infra::filesystem::{ensure_data_dir, resolve_data_dir};
use salesdesk_infra::llm::{api_key_from_env, create_provider};
use salesdesk_infra::store::JsonFileSessionStore;
use salesdesk_infra::tool::{SerperSearch, WebsiteReader, http_client};
use salesdesk_types::config::GlobalConfig;

/// Concrete controller type pinned to infra implementations.
pub type ConcreteTurnController = TurnController<JsonFileSessionStore, SalesPipeline>;

/// Data directory, config, and store: everything that needs no API key.
pub struct Workspace {
    pub data_dir: PathBuf,
    pub config: GlobalConfig,
    pub store: JsonFileSessionStore,
}

impl Workspace {
    /// Resolve the data directory, load `config.toml`, and open the store.
    pub async fn open() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        ensure_data_dir(&data_dir).await?;

        let config = load_global_config(&data_dir).await;
        let store = JsonFileSessionStore::new(resolve_store_path(&data_dir, &config));
        tracing::debug!(
            data_dir = %data_dir.display(),
            store = %store.path().display(),
            "Workspace opened"
        );

        Ok(Self {
            data_dir,
            config,
            store,
        })
    }
}

/// Shared application state used by both CLI commands and REST handlers.
#[derive(Clone)]
pub struct AppState {
    pub controller: Arc<ConcreteTurnController>,
    pub config: Arc<GlobalConfig>,
    pub data_dir: PathBuf,
    /// Static page directory, if one should be served.
    pub web_dir: PathBuf,
}

impl AppState {
    /// Wire the LLM provider, reference tools, and controller.
    ///
    /// Fails when the provider API key is not set.
    pub async fn init(workspace: Workspace) -> anyhow::Result<Self> {
        let Workspace {
            data_dir,
            config,
            store,
        } = workspace;

        let api_key = api_key_from_env(&config.provider.api_key_env);
        let provider = create_provider(&config.provider, api_key).with_context(|| {
            format!(
                "no API key for provider '{}': set {}",
                config.provider.name, config.provider.api_key_env
            )
        })?;

        let client = http_client();
        let mut pipeline = SalesPipeline::new(
            provider,
            config.assistant.clone(),
            PipelineSettings {
                max_tokens: config.provider.max_tokens,
                temperature: config.provider.temperature,
            },
        )
        .with_website_tool(Arc::new(
            WebsiteReader::new(client.clone(), config.assistant.website.clone())
                .with_max_chars(config.assistant.website_max_chars),
        ));

        match api_key_from_env(&config.search.api_key_env) {
            Some(key) => {
                pipeline = pipeline
                    .with_search_tool(Arc::new(SerperSearch::new(client, &config.search, key)));
            }
            None => tracing::info!(
                env = %config.search.api_key_env,
                "Web search disabled: no API key"
            ),
        }

        let controller = TurnController::new(store, pipeline, turn_settings(&config));
        Ok(Self::from_parts(controller, config, data_dir))
    }

    pub fn from_parts(
        controller: ConcreteTurnController,
        config: GlobalConfig,
        data_dir: PathBuf,
    ) -> Self {
        let web_dir = std::env::var("SALESDESK_WEB_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(&config.web_dir));
        Self {
            controller: Arc::new(controller),
            config: Arc::new(config),
            data_dir,
            web_dir,
        }
    }
}
