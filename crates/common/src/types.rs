use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lower bound (Unix seconds) of the next poll window.
///
/// Only moves forward: advancing to an older timestamp is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeCursor(i64);

impl TimeCursor {
    pub fn new(unix_seconds: i64) -> Self {
        Self(unix_seconds)
    }

    /// Cursor positioned at the current wall-clock time.
    pub fn now() -> Self {
        Self(Utc::now().timestamp())
    }

    pub fn as_secs(&self) -> i64 {
        self.0
    }

    /// Move the cursor to `next` unless that would move it backwards.
    /// Returns `true` when the cursor changed.
    pub fn advance_to(&mut self, next: i64) -> bool {
        if next > self.0 {
            self.0 = next;
            true
        } else {
            false
        }
    }

    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.0, 0)
    }
}

impl std::fmt::Display for TimeCursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A poll response whose top-level shape has been checked.
///
/// Items are kept raw and in server order; each one is inspected separately
/// during translation so a single bad record cannot poison the batch.
#[derive(Debug, Clone, PartialEq)]
pub struct PollResponse {
    pub homeworks: Vec<serde_json::Value>,
    /// Server-reported cutoff to use as the next cursor.
    pub current_date: Option<i64>,
}

impl PollResponse {
    pub fn is_empty(&self) -> bool {
        self.homeworks.is_empty()
    }
}

/// One tracked work item with both required fields present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItemRecord {
    #[serde(rename = "homework_name")]
    pub name: String,
    pub status: String,
}

/// Closed set of review statuses reported by the remote API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Approved,
    Reviewing,
    Rejected,
}

impl Verdict {
    pub const ALL: [Verdict; 3] = [Verdict::Approved, Verdict::Reviewing, Verdict::Rejected];

    /// Parse a raw status code. Unlisted codes return `None`.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "approved" => Some(Verdict::Approved),
            "reviewing" => Some(Verdict::Reviewing),
            "rejected" => Some(Verdict::Rejected),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Verdict::Approved => "approved",
            Verdict::Reviewing => "reviewing",
            Verdict::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Result of resolving a raw status against the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusChange {
    Known(Verdict),
    /// Status code outside the closed set; carries the raw text.
    Unknown(String),
}

impl StatusChange {
    pub fn resolve(code: &str) -> Self {
        match Verdict::from_code(code) {
            Some(verdict) => StatusChange::Known(verdict),
            None => StatusChange::Unknown(code.to_string()),
        }
    }
}
