//! SessionStore trait definition.

use salesdesk_types::error::StoreError;
use salesdesk_types::session::{Session, SessionSummary};

/// Durable mapping from session id to [`Session`].
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
/// Implementations own all disk I/O.
pub trait SessionStore: Send + Sync {
    /// Load a session.
    ///
    /// Unknown ids and a missing store both yield an empty session; absence
    /// is never an error. A store that exists but cannot be parsed is
    /// [`StoreError::Corrupt`].
    fn load(
        &self,
        session_id: &str,
    ) -> impl std::future::Future<Output = Result<Session, StoreError>> + Send;

    /// Merge one session into the store and persist the whole store.
    ///
    /// Every other stored session must survive unchanged, including ones
    /// saved concurrently by other callers.
    fn save(
        &self,
        session_id: &str,
        session: &Session,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// Summaries of every stored session, ordered by id.
    fn list_sessions(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<SessionSummary>, StoreError>> + Send;
}
