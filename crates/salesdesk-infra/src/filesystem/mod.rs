//! Data directory layout for salesdesk.
//!
//! Everything salesdesk persists lives under one directory: `config.toml`,
//! the session store, and its lock file.

use std::path::{Path, PathBuf};

use anyhow::Context;

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `SALESDESK_DATA_DIR` environment variable, if not blank
/// 2. `~/.salesdesk`
/// 3. `.salesdesk` in the current directory
pub fn resolve_data_dir() -> PathBuf {
    data_dir_from(std::env::var("SALESDESK_DATA_DIR").ok())
}

fn data_dir_from(env_dir: Option<String>) -> PathBuf {
    if let Some(dir) = env_dir.filter(|d| !d.trim().is_empty()) {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".salesdesk");
    }

    PathBuf::from(".salesdesk")
}

/// Create the data directory if needed.
pub async fn ensure_data_dir(data_dir: &Path) -> anyhow::Result<()> {
    tokio::fs::create_dir_all(data_dir)
        .await
        .with_context(|| format!("failed to create data directory {}", data_dir.display()))
}

/// Join `name` onto `data_dir` unless it is already absolute.
pub fn resolve_in_data_dir(data_dir: &Path, name: &str) -> PathBuf {
    let path = Path::new(name);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        data_dir.join(path)
    }
}
