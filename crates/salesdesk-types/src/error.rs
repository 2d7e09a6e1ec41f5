use std::path::PathBuf;

use thiserror::Error;

/// Errors from the session store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store file exists but is not a valid session document.
    #[error("session store at '{path}' is corrupt: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    #[error("failed to read session store: {0}")]
    Read(String),

    /// The store could not be written. The previous file is left in place.
    #[error("failed to write session store: {0}")]
    Write(String),

    #[error("failed to lock session store: {0}")]
    Lock(String),

    #[error("failed to serialize session store: {0}")]
    Serialize(String),
}

impl StoreError {
    pub fn is_corrupt(&self) -> bool {
        matches!(self, StoreError::Corrupt { .. })
    }
}

/// Errors from a response generator.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("response generation timed out after {secs}s")]
    Timeout { secs: u64 },

    #[error("response generator returned an empty answer")]
    EmptyResponse,

    #[error("pipeline stage '{stage}' failed: {message}")]
    Stage { stage: String, message: String },
}

/// Terminal failure of one inquiry turn.
///
/// Every variant leaves the stored session untouched.
#[derive(Debug, Error)]
pub enum TurnError {
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
