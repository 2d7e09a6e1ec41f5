//! Whole-file JSON implementation of [`SessionStore`].
//!
//! The entire store is one JSON object mapping session id to session,
//! pretty-printed with a 4-space indent. Every save reads the whole file,
//! replaces one entry, and writes the whole file back:
//!
//! - **Atomicity**: the new content goes to a temp file in the same directory,
//!   is fsynced, then renamed over the store.
//! - **Isolation**: an advisory `fs2` lock on `<store>.lock` is held
//!   exclusively across read-modify-write and shared while reading, so
//!   concurrent writers (threads or processes) cannot lose each other's
//!   sessions.
//!
//! The lock is advisory only. Processes that bypass it can still race.

use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use fs2::FileExt;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tempfile::NamedTempFile;
use tokio::sync::Mutex;

use salesdesk_core::session::store::SessionStore;
use salesdesk_types::error::StoreError;
use salesdesk_types::session::{Session, SessionMap, SessionSummary};

/// Session store backed by a single JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileSessionStore {
    path: PathBuf,
    lock_path: PathBuf,
    /// Keeps in-process writers from parking blocking threads on the file lock.
    write_gate: Arc<Mutex<()>>,
}

impl JsonFileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut lock_name = path.file_name().unwrap_or_default().to_os_string();
        lock_name.push(".lock");
        let lock_path = path.with_file_name(lock_name);
        Self {
            path,
            lock_path,
            write_gate: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole store under a shared lock.
    async fn read_all(&self) -> Result<SessionMap, StoreError> {
        let path = self.path.clone();
        let lock_path = self.lock_path.clone();
        tokio::task::spawn_blocking(move || {
            let _lock = StoreLock::shared(&lock_path)?;
            read_map(&path)
        })
        .await
        .map_err(|e| StoreError::Read(format!("store task failed: {e}")))?
    }
}

impl SessionStore for JsonFileSessionStore {
    async fn load(&self, session_id: &str) -> Result<Session, StoreError> {
        let mut sessions = self.read_all().await?;
        Ok(sessions.remove(session_id).unwrap_or_default())
    }

    async fn save(&self, session_id: &str, session: &Session) -> Result<(), StoreError> {
        let _gate = self.write_gate.lock().await;

        let path = self.path.clone();
        let lock_path = self.lock_path.clone();
        let session_id = session_id.to_string();
        let session = session.clone();

        tokio::task::spawn_blocking(move || {
            let _lock = StoreLock::exclusive(&lock_path)?;
            let mut sessions = read_map(&path)?;
            sessions.insert(session_id.clone(), session);
            write_map(&path, &sessions)?;
            tracing::debug!(
                session_id = %session_id,
                sessions = sessions.len(),
                path = %path.display(),
                "Session store written"
            );
            Ok(())
        })
        .await
        .map_err(|e| StoreError::Write(format!("store task failed: {e}")))?
    }

    async fn list_sessions(&self) -> Result<Vec<SessionSummary>, StoreError> {
        let sessions = self.read_all().await?;
        Ok(sessions
            .iter()
            .map(|(id, session)| SessionSummary::from_session(id, session))
            .collect())
    }
}

/// Held advisory lock on the sidecar lock file; released on drop.
struct StoreLock {
    #[allow(dead_code)]
    file: File,
}

impl StoreLock {
    fn open(lock_path: &Path) -> Result<File, StoreError> {
        if let Some(parent) = non_empty_parent(lock_path) {
            std::fs::create_dir_all(parent)
                .map_err(|e| StoreError::Lock(format!("{}: {e}", parent.display())))?;
        }
        OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(lock_path)
            .map_err(|e| StoreError::Lock(format!("{}: {e}", lock_path.display())))
    }

    fn exclusive(lock_path: &Path) -> Result<Self, StoreError> {
        let file = Self::open(lock_path)?;
        FileExt::lock_exclusive(&file)
            .map_err(|e| StoreError::Lock(format!("exclusive lock failed: {e}")))?;
        Ok(Self { file })
    }

    fn shared(lock_path: &Path) -> Result<Self, StoreError> {
        let file = Self::open(lock_path)?;
        FileExt::lock_shared(&file)
            .map_err(|e| StoreError::Lock(format!("shared lock failed: {e}")))?;
        Ok(Self { file })
    }
}

fn non_empty_parent(path: &Path) -> Option<&Path> {
    path.parent().filter(|p| !p.as_os_str().is_empty())
}

/// Missing file is an empty store; anything unparsable is corrupt.
fn read_map(path: &Path) -> Result<SessionMap, StoreError> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(SessionMap::new()),
        Err(e) => return Err(StoreError::Read(format!("{}: {e}", path.display()))),
    };

    serde_json::from_slice(&bytes).map_err(|e| StoreError::Corrupt {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

fn write_map(path: &Path, sessions: &SessionMap) -> Result<(), StoreError> {
    let mut buf = Vec::new();
    let mut ser =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    sessions
        .serialize(&mut ser)
        .map_err(|e| StoreError::Serialize(e.to_string()))?;

    let dir = non_empty_parent(path).unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir).map_err(|e| StoreError::Write(format!("{}: {e}", dir.display())))?;

    let mut tmp =
        NamedTempFile::new_in(dir).map_err(|e| StoreError::Write(format!("temp file: {e}")))?;
    tmp.write_all(&buf)
        .map_err(|e| StoreError::Write(format!("temp file: {e}")))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| StoreError::Write(format!("fsync: {e}")))?;
    tmp.persist(path)
        .map_err(|e| StoreError::Write(format!("{}: {}", path.display(), e.error)))?;

    Ok(())
}
