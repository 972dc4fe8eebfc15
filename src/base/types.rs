//! Common types shared across the application.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Application error type.
pub type Err = anyhow::Error;
/// Application result type.
pub type Res<T> = Result<T, Err>;
/// Result carrying no value.
pub type Void = Res<()>;

/// The author of a question, as reported by the question source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOwner {
    /// Display name of the author.
    #[serde(default)]
    pub display_name: String,
}

/// A single question returned by the question source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Site-local question id.
    #[serde(default)]
    pub question_id: u64,
    /// Question title (HTML-encoded by the source).
    #[serde(default)]
    pub title: String,
    /// Creation time (unix seconds on the wire).
    #[serde(with = "chrono::serde::ts_seconds")]
    pub creation_date: DateTime<Utc>,
    /// The question author.
    #[serde(default)]
    pub owner: QuestionOwner,
    /// Canonical link to the question.
    pub link: String,
}

/// One page of questions, as returned by a single query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionPage {
    /// Questions, in the order the source returned them.
    #[serde(default)]
    pub items: Vec<Question>,
    /// Whether the source holds more results than this page.
    #[serde(default)]
    pub has_more: bool,
    /// Total number of matches, when the source reports it.
    #[serde(default)]
    pub total: Option<u64>,
    /// Remaining request quota, when the source reports it.
    #[serde(default)]
    pub quota_remaining: Option<u64>,
    /// Seconds the source asks clients to wait before the next request.
    #[serde(default)]
    pub backoff: Option<u64>,
}

/// Parameters of a "new questions" query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionQuery {
    /// Only questions created at or after this instant are returned.
    pub from_date: DateTime<Utc>,
    /// Tag filter, passed through verbatim (e.g., `rust;tokio`).
    pub tagged: String,
}

impl QuestionQuery {
    /// Create a query for questions created at or after `from_date`.
    pub fn new(from_date: DateTime<Utc>, tagged: impl Into<String>) -> Self {
        Self { from_date, tagged: tagged.into() }
    }
}
