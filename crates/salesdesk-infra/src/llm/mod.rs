//! LLM provider implementations.
//!
//! [`create_provider`] builds the configured OpenAI-compatible client as a
//! [`BoxLlmProvider`]; [`api_key_from_env`] resolves its key.

pub mod openai_compat;

use secrecy::SecretString;

use salesdesk_core::llm::box_provider::BoxLlmProvider;
use salesdesk_types::config::ProviderConfig;
use salesdesk_types::llm::LlmError;

use self::openai_compat::OpenAiCompatibleProvider;
use self::openai_compat::config::OpenAiCompatConfig;

/// Read an API key from the environment variable `var`.
///
/// Unset and blank values are both treated as missing.
pub fn api_key_from_env(var: &str) -> Option<SecretString> {
    api_key_from_value(std::env::var(var).ok())
}

fn api_key_from_value(value: Option<String>) -> Option<SecretString> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(SecretString::from)
}

/// Create a [`BoxLlmProvider`] from a [`ProviderConfig`].
///
/// # Errors
///
/// [`LlmError::AuthenticationFailed`] when no API key is available.
pub fn create_provider(
    config: &ProviderConfig,
    api_key: Option<SecretString>,
) -> Result<BoxLlmProvider, LlmError> {
    let key = api_key.ok_or(LlmError::AuthenticationFailed)?;
    let provider = OpenAiCompatibleProvider::new(OpenAiCompatConfig::for_provider(
        &config.name,
        config.base_url.as_deref(),
        key,
        &config.model,
    ));
    tracing::info!(
        provider = %config.name,
        model = %config.model,
        "LLM provider configured"
    );
    Ok(BoxLlmProvider::new(provider))
}
