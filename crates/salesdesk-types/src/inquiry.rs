//! Inquiry input and turn outcome types.

use serde::{Deserialize, Serialize};

use crate::error::TurnError;
use crate::session::Session;

/// The two form fields a visitor submits.
///
/// Absent fields deserialize as blank so they fail [`Inquiry::validated`]
/// with the usual message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inquiry {
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub inquiry: String,
}

impl Inquiry {
    pub fn new(company: impl Into<String>, inquiry: impl Into<String>) -> Self {
        Self {
            company: company.into(),
            inquiry: inquiry.into(),
        }
    }

    /// Both fields must be non-blank. Returns a trimmed copy.
    pub fn validated(&self) -> Result<Inquiry, TurnError> {
        let company = self.company.trim();
        let inquiry = self.inquiry.trim();
        match (company.is_empty(), inquiry.is_empty()) {
            (false, false) => Ok(Inquiry::new(company, inquiry)),
            _ => Err(TurnError::Validation(
                "Please provide both company name and inquiry.".to_string(),
            )),
        }
    }
}

/// What a response generator receives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub company: String,
    pub inquiry: String,
    /// Prior rendered history lines, oldest first.
    #[serde(default)]
    pub history: Vec<String>,
}

/// Result of a committed turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnOutcome {
    pub session_id: String,
    pub response: String,
    pub timestamp: String,
    pub session: Session,
    pub follow_up: String,
}
