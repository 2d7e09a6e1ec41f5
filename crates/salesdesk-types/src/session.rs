//! Conversation session types for salesdesk.
//!
//! A [`Session`] is one visitor's ongoing dialogue: an append-only list of
//! rendered history lines plus a small map of sticky form context. Sessions are
//! keyed by an opaque [`SessionId`] token that the client supplies on every
//! request.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Context key holding the last submitted company name.
pub const CONTEXT_COMPANY: &str = "company";

/// Context key holding the last submitted inquiry.
pub const CONTEXT_INQUIRY: &str = "inquiry";

/// Longest session token accepted from a client.
pub const MAX_SESSION_ID_LEN: usize = 128;

/// Opaque session token issued once per browser tab.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl SessionId {
    /// Issue a fresh random token.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SessionId {
    type Err = String;

    /// Accepts any non-blank token up to [`MAX_SESSION_ID_LEN`] bytes without
    /// whitespace or control characters.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err("session id must not be empty".to_string());
        }
        if s.len() > MAX_SESSION_ID_LEN {
            return Err(format!(
                "session id exceeds {MAX_SESSION_ID_LEN} bytes"
            ));
        }
        if s.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err("session id must not contain whitespace".to_string());
        }
        Ok(Self(s.to_string()))
    }
}

/// One visitor's conversation state.
///
/// `history` is chronological and append-only; `context` is last-write-wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub history: Vec<String>,
    #[serde(default)]
    pub context: BTreeMap<String, String>,
}

impl Session {
    /// An empty session, as returned for unknown ids.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one exchange: the user line followed by the bot line.
    ///
    /// Existing entries are never touched; history grows by exactly two.
    pub fn append_turn(&mut self, user_line: String, bot_line: String) {
        self.history.push(user_line);
        self.history.push(bot_line);
    }

    /// Overwrite a single context field.
    pub fn set_context(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.context.insert(key.into(), value.into());
    }

    pub fn context_value(&self, key: &str) -> Option<&str> {
        self.context.get(key).map(String::as_str)
    }

    /// Number of completed exchanges.
    pub fn turn_count(&self) -> usize {
        self.history.len() / 2
    }

    /// The last `limit` history lines, oldest first.
    pub fn recent_history(&self, limit: usize) -> &[String] {
        let start = self.history.len().saturating_sub(limit);
        &self.history[start..]
    }
}

/// The whole persisted store: session id to session.
pub type SessionMap = BTreeMap<String, Session>;

/// Lightweight listing row for a stored session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: String,
    pub history_len: usize,
    pub last_company: Option<String>,
}

impl SessionSummary {
    pub fn from_session(session_id: &str, session: &Session) -> Self {
        Self {
            session_id: session_id.to_string(),
            history_len: session.history.len(),
            last_company: session.context_value(CONTEXT_COMPANY).map(str::to_string),
        }
    }
}

/// How turn timestamps are rendered.
///
/// Display-only: `03:07 PM IST, January 05, 2026`. The label is printed
/// verbatim and the offset picks the wall clock it describes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimestampStyle {
    #[serde(default = "default_timezone_label")]
    pub label: String,
    #[serde(default = "default_utc_offset_minutes")]
    pub utc_offset_minutes: i32,
}

fn default_timezone_label() -> String {
    "IST".to_string()
}

fn default_utc_offset_minutes() -> i32 {
    330
}

impl Default for TimestampStyle {
    fn default() -> Self {
        Self {
            label: default_timezone_label(),
            utc_offset_minutes: default_utc_offset_minutes(),
        }
    }
}

impl TimestampStyle {
    /// Render `at` in this style.
    ///
    /// Offsets outside +/-24h fall back to UTC.
    pub fn format(&self, at: DateTime<Utc>) -> String {
        let offset =
            FixedOffset::east_opt(self.utc_offset_minutes * 60).unwrap_or_else(|| Utc.fix());
        let label = self.label.replace('%', "%%");
        at.with_timezone(&offset)
            .format(&format!("%I:%M %p {label}, %B %d, %Y"))
            .to_string()
    }
}

/// The two rendered lines of one exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRecord {
    pub user_line: String,
    pub bot_line: String,
}

impl TurnRecord {
    /// Render `"{company} ({ts}): {inquiry}"` and `"{bot_name} ({ts}): {response}"`.
    pub fn render(
        company: &str,
        inquiry: &str,
        bot_name: &str,
        response: &str,
        timestamp: &str,
    ) -> Self {
        Self {
            user_line: format!("{company} ({timestamp}): {inquiry}"),
            bot_line: format!("{bot_name} ({timestamp}): {response}"),
        }
    }
}
