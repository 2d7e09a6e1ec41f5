//! Connection settings and well-known endpoints for OpenAI-compatible APIs.

use secrecy::SecretString;

/// Configuration for an OpenAI-compatible chat-completion endpoint.
///
/// Used to construct an [`super::OpenAiCompatibleProvider`].
pub struct OpenAiCompatConfig {
    /// Human-readable provider name (e.g., "openai", "mistral").
    pub provider_name: String,
    /// Base URL for the API (e.g., "https://api.openai.com/v1").
    pub base_url: String,
    pub api_key: SecretString,
    /// Model used when a request does not name one.
    pub model: String,
}

/// Base URL for a well-known provider name. Unknown names get OpenAI's.
pub fn default_base_url(provider_name: &str) -> &'static str {
    match provider_name {
        "gemini" => "https://generativelanguage.googleapis.com/v1beta/openai",
        "mistral" => "https://api.mistral.ai/v1",
        "glm" => "https://api.z.ai/api/paas/v4",
        _ => "https://api.openai.com/v1",
    }
}

impl OpenAiCompatConfig {
    /// Settings for `provider_name`, using `base_url` when given and the
    /// provider's well-known endpoint otherwise.
    pub fn for_provider(
        provider_name: &str,
        base_url: Option<&str>,
        api_key: SecretString,
        model: &str,
    ) -> Self {
        Self {
            provider_name: provider_name.to_string(),
            base_url: base_url
                .unwrap_or_else(|| default_base_url(provider_name))
                .trim_end_matches('/')
                .to_string(),
            api_key,
            model: model.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_base_urls() {
        assert_eq!(default_base_url("openai"), "https://api.openai.com/v1");
        assert_eq!(default_base_url("mistral"), "https://api.mistral.ai/v1");
        assert_eq!(default_base_url("something-else"), "https://api.openai.com/v1");
    }

    #[test]
    fn test_explicit_base_url_wins() {
        let config = OpenAiCompatConfig::for_provider(
            "openai",
            Some("http://localhost:8080/v1/"),
            SecretString::from("sk-test".to_string()),
            "gpt-3.5-turbo",
        );
        assert_eq!(config.base_url, "http://localhost:8080/v1");
        assert_eq!(config.model, "gpt-3.5-turbo");
    }
}
