//! Global configuration loader for salesdesk.
//!
//! Reads `config.toml` from the data directory (`~/.salesdesk/` in production)
//! and deserializes it into [`GlobalConfig`]. Falls back to defaults when the
//! file is missing or malformed.

use std::path::{Path, PathBuf};
use std::time::Duration;

use salesdesk_core::turn::TurnSettings;
use salesdesk_types::config::GlobalConfig;

use crate::filesystem::resolve_in_data_dir;

/// Shortest generation timeout accepted from config.
const MIN_GENERATION_TIMEOUT_SECS: u64 = 5;

/// Load global configuration from `{data_dir}/config.toml`.
///
/// - Missing file: [`GlobalConfig::default()`].
/// - Unreadable or unparsable file: logs a warning and returns the default.
pub async fn load_global_config(data_dir: &Path) -> GlobalConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return GlobalConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return GlobalConfig::default();
        }
    };

    match toml::from_str::<GlobalConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            GlobalConfig::default()
        }
    }
}

/// Absolute path of the session store file.
pub fn resolve_store_path(data_dir: &Path, config: &GlobalConfig) -> PathBuf {
    resolve_in_data_dir(data_dir, &config.store_file)
}

/// Turn controller settings derived from config.
///
/// A floor of five seconds is enforced on the generation timeout.
pub fn turn_settings(config: &GlobalConfig) -> TurnSettings {
    TurnSettings {
        bot_name: config.assistant.bot_name.clone(),
        follow_up: config.assistant.follow_up.clone(),
        default_company: config.assistant.default_customer_company.clone(),
        timestamp: config.timestamp.clone(),
        generation_timeout: Duration::from_secs(
            config.generation_timeout_secs.max(MIN_GENERATION_TIMEOUT_SECS),
        ),
        history_window: config.history_window,
    }
}
