//! Global configuration types for salesdesk.
//!
//! `GlobalConfig` is the top-level `config.toml` in the data directory. Every
//! field has a default so an empty or missing file yields a working setup.

use serde::{Deserialize, Serialize};

use crate::session::TimestampStyle;

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Session store file name, relative to the data directory unless absolute.
    #[serde(default = "default_store_file")]
    pub store_file: String,

    /// Upper bound on one generation call.
    #[serde(default = "default_generation_timeout_secs")]
    pub generation_timeout_secs: u64,

    /// How many prior history lines the generator sees.
    #[serde(default = "default_history_window")]
    pub history_window: usize,

    /// Directory holding the static single page.
    #[serde(default = "default_web_dir")]
    pub web_dir: String,

    #[serde(default)]
    pub timestamp: TimestampStyle,

    #[serde(default)]
    pub assistant: AssistantConfig,

    #[serde(default)]
    pub provider: ProviderConfig,

    #[serde(default)]
    pub search: SearchConfig,
}

fn default_store_file() -> String {
    "chat_sessions.json".to_string()
}

fn default_generation_timeout_secs() -> u64 {
    120
}

fn default_history_window() -> usize {
    10
}

fn default_web_dir() -> String {
    "web".to_string()
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            store_file: default_store_file(),
            generation_timeout_secs: default_generation_timeout_secs(),
            history_window: default_history_window(),
            web_dir: default_web_dir(),
            timestamp: TimestampStyle::default(),
            assistant: AssistantConfig::default(),
            provider: ProviderConfig::default(),
            search: SearchConfig::default(),
        }
    }
}

/// Who the assistant speaks for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    /// Name shown on bot history lines.
    #[serde(default = "default_bot_name")]
    pub bot_name: String,
    /// The selling company.
    #[serde(default = "default_company_name")]
    pub company_name: String,
    /// Website the reference scraper reads.
    #[serde(default = "default_website")]
    pub website: String,
    /// Longest website excerpt handed to a prompt, in characters.
    #[serde(default = "default_website_max_chars")]
    pub website_max_chars: usize,
    #[serde(default = "default_contact_email")]
    pub contact_email: String,
    #[serde(default = "default_contact_phone")]
    pub contact_phone: String,
    /// Prefill for the company field on a fresh session.
    #[serde(default = "default_customer_company")]
    pub default_customer_company: String,
    /// Shown after every successful answer.
    #[serde(default = "default_follow_up")]
    pub follow_up: String,
}

fn default_bot_name() -> String {
    "Finkraft Bot".to_string()
}

fn default_company_name() -> String {
    "Finkraft".to_string()
}

fn default_website() -> String {
    "https://finkraft.ai/en".to_string()
}

fn default_website_max_chars() -> usize {
    6_000
}

fn default_contact_email() -> String {
    "contact@finkraft.ai".to_string()
}

fn default_contact_phone() -> String {
    "+91-9876543210".to_string()
}

fn default_customer_company() -> String {
    "Potential Customer Inc.".to_string()
}

fn default_follow_up() -> String {
    "Would you like to continue the conversation? Submit another inquiry or let us know how we can assist further!".to_string()
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            bot_name: default_bot_name(),
            company_name: default_company_name(),
            website: default_website(),
            website_max_chars: default_website_max_chars(),
            contact_email: default_contact_email(),
            contact_phone: default_contact_phone(),
            default_customer_company: default_customer_company(),
            follow_up: default_follow_up(),
        }
    }
}

/// OpenAI-compatible chat-completion provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default = "default_provider_name")]
    pub name: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Override for the API base URL.
    #[serde(default)]
    pub base_url: Option<String>,
    /// Environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default)]
    pub temperature: Option<f64>,
}

fn default_provider_name() -> String {
    "openai".to_string()
}

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_max_tokens() -> u32 {
    1024
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            name: default_provider_name(),
            model: default_model(),
            base_url: None,
            api_key_env: default_api_key_env(),
            max_tokens: default_max_tokens(),
            temperature: None,
        }
    }
}

/// Web search reference tool. Disabled when the key variable is unset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_search_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_search_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_search_max_results")]
    pub max_results: usize,
}

fn default_search_api_key_env() -> String {
    "SERPER_API_KEY".to_string()
}

fn default_search_endpoint() -> String {
    "https://google.serper.dev/search".to_string()
}

fn default_search_max_results() -> usize {
    5
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_search_api_key_env(),
            endpoint: default_search_endpoint(),
            max_results: default_search_max_results(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_config_default_values() {
        let config = GlobalConfig::default();
        assert_eq!(config.store_file, "chat_sessions.json");
        assert_eq!(config.generation_timeout_secs, 120);
        assert_eq!(config.provider.model, "gpt-3.5-turbo");
        assert_eq!(config.timestamp.label, "IST");
    }

    #[test]
    fn test_global_config_deserialize_empty() {
        let config: GlobalConfig = toml::from_str("").unwrap();
        assert_eq!(config.history_window, 10);
        assert_eq!(config.assistant.bot_name, "Finkraft Bot");
        assert_eq!(config.search.max_results, 5);
        assert_eq!(config.assistant.website_max_chars, 6_000);
    }

    #[test]
    fn test_global_config_deserialize_with_values() {
        let toml_str = r#"
store_file = "/var/lib/salesdesk/sessions.json"
generation_timeout_secs = 30

[timestamp]
label = "UTC"
utc_offset_minutes = 0

[assistant]
bot_name = "Acme Helper"
website_max_chars = 2000

[provider]
model = "gpt-4o-mini"
base_url = "http://localhost:8080/v1"
temperature = 0.2
"#;
        let config: GlobalConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.store_file, "/var/lib/salesdesk/sessions.json");
        assert_eq!(config.generation_timeout_secs, 30);
        assert_eq!(config.timestamp.utc_offset_minutes, 0);
        assert_eq!(config.assistant.bot_name, "Acme Helper");
        // Unset fields in a present section still default.
        assert_eq!(config.assistant.company_name, "Finkraft");
        assert_eq!(config.assistant.website_max_chars, 2000);
        assert_eq!(config.provider.base_url.as_deref(), Some("http://localhost:8080/v1"));
        assert_eq!(config.provider.api_key_env, "OPENAI_API_KEY");
    }
}
