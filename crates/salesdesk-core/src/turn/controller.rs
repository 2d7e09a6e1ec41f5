//! TurnController -- one inquiry, start to finish.
//!
//! Validate -> Generate -> Commit. Each request ends in exactly one terminal
//! state; nothing is retried and nothing is half-committed. The store is only
//! written after the generator has answered, so a failed generation leaves
//! the persisted session byte-for-byte as it was.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{info, warn};

use salesdesk_types::error::{GenerationError, TurnError};
use salesdesk_types::inquiry::{GenerationRequest, Inquiry, TurnOutcome};
use salesdesk_types::session::{
    CONTEXT_COMPANY, CONTEXT_INQUIRY, Session, SessionId, SessionSummary, TimestampStyle,
    TurnRecord,
};

use crate::generator::ResponseGenerator;
use crate::session::store::SessionStore;

/// Presentation and limits applied to every turn.
#[derive(Debug, Clone)]
pub struct TurnSettings {
    /// Name on bot history lines.
    pub bot_name: String,
    /// Suggestion returned with every successful answer.
    pub follow_up: String,
    /// Company prefilled on a fresh session.
    pub default_company: String,
    pub timestamp: TimestampStyle,
    pub generation_timeout: Duration,
    /// Prior history lines passed to the generator.
    pub history_window: usize,
}

impl Default for TurnSettings {
    fn default() -> Self {
        Self {
            bot_name: "Finkraft Bot".to_string(),
            follow_up: String::new(),
            default_company: "Potential Customer Inc.".to_string(),
            timestamp: TimestampStyle::default(),
            generation_timeout: Duration::from_secs(120),
            history_window: 10,
        }
    }
}

/// Values to prefill the inquiry form with.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct FormDefaults {
    pub company: String,
    pub inquiry: String,
}

/// Orchestrates one request/response cycle per call.
///
/// Generic over the store and generator so the core never depends on
/// infrastructure. Requests for the same session id are serialized for
/// the whole load -> generate -> save cycle; different ids run in parallel.
pub struct TurnController<S: SessionStore, G: ResponseGenerator> {
    store: S,
    generator: G,
    settings: TurnSettings,
    session_locks: DashMap<String, Arc<Mutex<()>>>,
}

impl<S: SessionStore, G: ResponseGenerator> TurnController<S, G> {
    pub fn new(store: S, generator: G, settings: TurnSettings) -> Self {
        Self {
            store,
            generator,
            settings,
            session_locks: DashMap::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn settings(&self) -> &TurnSettings {
        &self.settings
    }

    fn parse_session_id(session_id: &str) -> Result<SessionId, TurnError> {
        session_id.parse::<SessionId>().map_err(TurnError::Validation)
    }

    fn session_lock(&self, session_id: &SessionId) -> Arc<Mutex<()>> {
        self.session_locks
            .entry(session_id.0.clone())
            .or_default()
            .clone()
    }

    /// Current state of a session (empty if unknown).
    pub async fn session(&self, session_id: &str) -> Result<Session, TurnError> {
        let id = Self::parse_session_id(session_id)?;
        Ok(self.store.load(id.as_str()).await?)
    }

    /// Form prefill: sticky context, or the configured default company.
    pub fn form_defaults(&self, session: &Session) -> FormDefaults {
        FormDefaults {
            company: session
                .context_value(CONTEXT_COMPANY)
                .unwrap_or(&self.settings.default_company)
                .to_string(),
            inquiry: session
                .context_value(CONTEXT_INQUIRY)
                .unwrap_or_default()
                .to_string(),
        }
    }

    pub async fn list_sessions(&self) -> Result<Vec<SessionSummary>, TurnError> {
        Ok(self.store.list_sessions().await?)
    }

    /// Run one inquiry through Validate -> Generate -> Commit.
    pub async fn handle_inquiry(
        &self,
        session_id: &str,
        inquiry: &Inquiry,
    ) -> Result<TurnOutcome, TurnError> {
        // Validate
        let id = Self::parse_session_id(session_id)?;
        let inquiry = inquiry.validated()?;

        let lock = self.session_lock(&id);
        let _guard = lock.lock().await;

        let mut session = self.store.load(id.as_str()).await?;

        // Generate
        let request = GenerationRequest {
            company: inquiry.company.clone(),
            inquiry: inquiry.inquiry.clone(),
            history: session
                .recent_history(self.settings.history_window)
                .to_vec(),
        };

        let started = Instant::now();
        let timeout = self.settings.generation_timeout;
        let response = match tokio::time::timeout(timeout, self.generator.generate(&request)).await
        {
            Ok(Ok(text)) if !text.trim().is_empty() => text,
            Ok(Ok(_)) => {
                warn!(session_id = %id, "Generator returned an empty answer");
                return Err(GenerationError::EmptyResponse.into());
            }
            Ok(Err(e)) => {
                warn!(session_id = %id, error = %e, "Response generation failed");
                return Err(e.into());
            }
            Err(_) => {
                warn!(session_id = %id, timeout_secs = timeout.as_secs(), "Response generation timed out");
                return Err(GenerationError::Timeout {
                    secs: timeout.as_secs(),
                }
                .into());
            }
        };

        // Commit
        let timestamp = self.settings.timestamp.format(Utc::now());
        let record = TurnRecord::render(
            &inquiry.company,
            &inquiry.inquiry,
            &self.settings.bot_name,
            &response,
            &timestamp,
        );
        session.append_turn(record.user_line, record.bot_line);
        session.set_context(CONTEXT_COMPANY, inquiry.company.as_str());
        session.set_context(CONTEXT_INQUIRY, inquiry.inquiry.as_str());

        self.store.save(id.as_str(), &session).await?;

        info!(
            session_id = %id,
            turns = session.turn_count(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Inquiry answered"
        );

        Ok(TurnOutcome {
            session_id: id.0,
            response,
            timestamp,
            session,
            follow_up: self.settings.follow_up.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use salesdesk_types::error::StoreError;
    use salesdesk_types::session::SessionMap;

    /// In-memory store that also counts writes.
    #[derive(Default)]
    struct MemoryStore {
        sessions: std::sync::Mutex<SessionMap>,
        saves: AtomicUsize,
        corrupt: bool,
    }

    impl SessionStore for MemoryStore {
        async fn load(&self, session_id: &str) -> Result<Session, StoreError> {
            if self.corrupt {
                return Err(StoreError::Corrupt {
                    path: "mem".into(),
                    reason: "bad json".to_string(),
                });
            }
            Ok(self
                .sessions
                .lock()
                .unwrap()
                .get(session_id)
                .cloned()
                .unwrap_or_default())
        }

        async fn save(&self, session_id: &str, session: &Session) -> Result<(), StoreError> {
            self.saves.fetch_add(1, Ordering::SeqCst);
            self.sessions
                .lock()
                .unwrap()
                .insert(session_id.to_string(), session.clone());
            Ok(())
        }

        async fn list_sessions(&self) -> Result<Vec<SessionSummary>, StoreError> {
            Ok(self
                .sessions
                .lock()
                .unwrap()
                .iter()
                .map(|(id, s)| SessionSummary::from_session(id, s))
                .collect())
        }
    }

    enum Behaviour {
        Answer(&'static str),
        Fail,
        Hang,
    }

    struct MockGenerator {
        behaviour: Behaviour,
        calls: AtomicUsize,
        seen_history: std::sync::Mutex<Vec<Vec<String>>>,
    }

    impl MockGenerator {
        fn new(behaviour: Behaviour) -> Self {
            Self {
                behaviour,
                calls: AtomicUsize::new(0),
                seen_history: std::sync::Mutex::new(Vec::new()),
            }
        }
    }

    impl ResponseGenerator for MockGenerator {
        async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen_history
                .lock()
                .unwrap()
                .push(request.history.clone());
            match self.behaviour {
                Behaviour::Answer(text) => Ok(text.to_string()),
                Behaviour::Fail => Err(GenerationError::Stage {
                    stage: "instant_clarity".to_string(),
                    message: "network down".to_string(),
                }),
                Behaviour::Hang => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Ok("too late".to_string())
                }
            }
        }
    }

    fn controller(behaviour: Behaviour) -> TurnController<MemoryStore, MockGenerator> {
        TurnController::new(
            MemoryStore::default(),
            MockGenerator::new(behaviour),
            TurnSettings {
                follow_up: "Anything else?".to_string(),
                ..TurnSettings::default()
            },
        )
    }

    #[tokio::test]
    async fn test_commit_appends_turn_and_sets_context() {
        let ctl = controller(Behaviour::Answer("Our plans start at $10."));

        let outcome = ctl
            .handle_inquiry("s1", &Inquiry::new("Acme", "pricing?"))
            .await
            .unwrap();

        let ts = &outcome.timestamp;
        assert_eq!(outcome.response, "Our plans start at $10.");
        assert_eq!(outcome.follow_up, "Anything else?");
        assert_eq!(
            outcome.session.history,
            vec![
                format!("Acme ({ts}): pricing?"),
                format!("Finkraft Bot ({ts}): Our plans start at $10."),
            ]
        );
        let expected: BTreeMap<String, String> = [
            ("company".to_string(), "Acme".to_string()),
            ("inquiry".to_string(), "pricing?".to_string()),
        ]
        .into();
        assert_eq!(outcome.session.context, expected);

        // What was persisted is what was returned.
        let stored = ctl.session("s1").await.unwrap();
        assert_eq!(stored, outcome.session);
        assert_eq!(ctl.store().saves.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_two_submissions_append_four_entries_in_order() {
        let ctl = controller(Behaviour::Answer("ok"));

        ctl.handle_inquiry("s1", &Inquiry::new("Acme", "first"))
            .await
            .unwrap();
        let outcome = ctl
            .handle_inquiry("s1", &Inquiry::new("Globex", "second"))
            .await
            .unwrap();

        let history = &outcome.session.history;
        assert_eq!(history.len(), 4);
        assert!(history[0].starts_with("Acme (") && history[0].ends_with("): first"));
        assert!(history[1].starts_with("Finkraft Bot ("));
        assert!(history[2].starts_with("Globex (") && history[2].ends_with("): second"));
        assert_eq!(outcome.session.context_value(CONTEXT_COMPANY), Some("Globex"));

        // The second call saw the first exchange as prior history.
        let seen = ctl.generator.seen_history.lock().unwrap();
        assert!(seen[0].is_empty());
        assert_eq!(seen[1].len(), 2);
    }

    #[tokio::test]
    async fn test_validation_never_calls_generator_or_saves() {
        let ctl = controller(Behaviour::Answer("unused"));

        for (sid, company, text) in [("s1", "", "pricing?"), ("s1", "Acme", "  "), ("", "Acme", "pricing?")] {
            let err = ctl
                .handle_inquiry(sid, &Inquiry::new(company, text))
                .await
                .unwrap_err();
            assert!(matches!(err, TurnError::Validation(_)), "got {err:?}");
        }

        assert_eq!(ctl.generator.calls.load(Ordering::SeqCst), 0);
        assert_eq!(ctl.store().saves.load(Ordering::SeqCst), 0);
        assert!(ctl.list_sessions().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_generation_failure_leaves_session_untouched() {
        let ctl = controller(Behaviour::Fail);

        let err = ctl
            .handle_inquiry("s1", &Inquiry::new("Acme", "pricing?"))
            .await
            .unwrap_err();

        assert!(matches!(err, TurnError::Generation(GenerationError::Stage { .. })));
        assert_eq!(ctl.store().saves.load(Ordering::SeqCst), 0);
        assert_eq!(ctl.session("s1").await.unwrap(), Session::new());
    }

    #[tokio::test]
    async fn test_empty_generator_output_is_generation_error() {
        let ctl = controller(Behaviour::Answer("   "));
        let err = ctl
            .handle_inquiry("s1", &Inquiry::new("Acme", "pricing?"))
            .await
            .unwrap_err();
        assert!(matches!(err, TurnError::Generation(GenerationError::EmptyResponse)));
        assert_eq!(ctl.store().saves.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_generation_timeout_is_generation_error() {
        let ctl = TurnController::new(
            MemoryStore::default(),
            MockGenerator::new(Behaviour::Hang),
            TurnSettings {
                generation_timeout: Duration::from_secs(5),
                ..TurnSettings::default()
            },
        );

        let err = ctl
            .handle_inquiry("s1", &Inquiry::new("Acme", "pricing?"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            TurnError::Generation(GenerationError::Timeout { secs: 5 })
        ));
        assert_eq!(ctl.store().saves.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_corrupt_store_surfaces_before_generation() {
        let ctl = TurnController::new(
            MemoryStore {
                corrupt: true,
                ..MemoryStore::default()
            },
            MockGenerator::new(Behaviour::Answer("unused")),
            TurnSettings::default(),
        );

        let err = ctl
            .handle_inquiry("s1", &Inquiry::new("Acme", "pricing?"))
            .await
            .unwrap_err();
        assert!(matches!(err, TurnError::Store(ref e) if e.is_corrupt()));
        assert_eq!(ctl.generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_history_window_limits_generator_context() {
        let ctl = TurnController::new(
            MemoryStore::default(),
            MockGenerator::new(Behaviour::Answer("ok")),
            TurnSettings {
                history_window: 2,
                ..TurnSettings::default()
            },
        );
        for i in 0..3 {
            ctl.handle_inquiry("s1", &Inquiry::new("Acme", format!("q{i}")))
                .await
                .unwrap();
        }
        let seen = ctl.generator.seen_history.lock().unwrap();
        assert_eq!(seen[2].len(), 2);
        assert!(seen[2][0].ends_with("): q1"));
    }

    #[tokio::test]
    async fn test_concurrent_inquiries_same_session_are_serialized() {
        let ctl = Arc::new(controller(Behaviour::Answer("ok")));

        let mut handles = Vec::new();
        for i in 0..8 {
            let ctl = ctl.clone();
            handles.push(tokio::spawn(async move {
                ctl.handle_inquiry("shared", &Inquiry::new("Acme", format!("q{i}")))
                    .await
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let session = ctl.session("shared").await.unwrap();
        assert_eq!(session.history.len(), 16);
    }

    #[tokio::test]
    async fn test_form_defaults() {
        let ctl = controller(Behaviour::Answer("ok"));
        let fresh = ctl.form_defaults(&Session::new());
        assert_eq!(fresh.company, "Potential Customer Inc.");
        assert_eq!(fresh.inquiry, "");

        let outcome = ctl
            .handle_inquiry("s1", &Inquiry::new("Acme", "pricing?"))
            .await
            .unwrap();
        let defaults = ctl.form_defaults(&outcome.session);
        assert_eq!(
            defaults,
            FormDefaults {
                company: "Acme".to_string(),
                inquiry: "pricing?".to_string()
            }
        );
    }
}
