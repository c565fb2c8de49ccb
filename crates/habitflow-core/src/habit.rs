//! Habit aggregate and calendar-date normalization.
//!
//! A habit is a simple mutable aggregate: a name, an optional description,
//! and a set of completion dates. The completion set is kept strictly
//! ascending with unique values after every mutation; streak statistics are
//! derived from it on read and never stored.

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// The habit aggregate root.
///
/// Serialized with camelCase keys to match the JSON record layout
/// (`createdAt`, completion dates as `YYYY-MM-DD` strings).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    /// Opaque unique identifier, assigned at creation, immutable.
    pub id: String,
    /// Non-empty display name.
    pub name: String,
    /// Optional free-form description.
    pub description: Option<String>,
    /// Calendar dates on which the habit was completed, strictly ascending.
    #[serde(default)]
    pub completions: Vec<NaiveDate>,
    /// Creation timestamp, set once, immutable.
    pub created_at: DateTime<Utc>,
}

impl Habit {
    /// Create a new habit with an empty completion set.
    ///
    /// # Errors
    /// Returns a validation error if `name` is empty or whitespace-only.
    pub fn new(name: &str, description: Option<String>) -> Result<Self, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingField("name"));
        }
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            description,
            completions: Vec::new(),
            created_at: Utc::now(),
        })
    }

    /// Add a completion date, keeping the set sorted and unique.
    ///
    /// Returns `true` if the set changed, `false` if the date was already
    /// present (marking is idempotent).
    pub fn mark(&mut self, date: NaiveDate) -> bool {
        match self.completions.binary_search(&date) {
            Ok(_) => false,
            Err(pos) => {
                self.completions.insert(pos, date);
                true
            }
        }
    }

    /// Remove a completion date if present.
    ///
    /// Returns `true` if the set changed, `false` if the date was absent
    /// (unmarking is idempotent).
    pub fn unmark(&mut self, date: NaiveDate) -> bool {
        match self.completions.binary_search(&date) {
            Ok(pos) => {
                self.completions.remove(pos);
                true
            }
            Err(_) => false,
        }
    }

    /// Re-establish the ascending/unique invariant on data loaded from an
    /// external source.
    pub fn normalize_completions(&mut self) {
        self.completions.sort_unstable();
        self.completions.dedup();
    }
}

/// Today's local calendar date, the default anchor for mark/unmark and the
/// current-streak computation.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Normalize a user-supplied date value to a calendar date.
///
/// Accepts a bare ISO date (`YYYY-MM-DD`) or an RFC 3339 timestamp, which
/// is reduced to its local calendar date. Dates are always handled at day
/// granularity so comparisons stay timezone-stable.
///
/// # Errors
/// Returns a validation error if the input parses as neither form.
pub fn parse_date_input(raw: &str) -> Result<NaiveDate, ValidationError> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Local).date_naive());
    }
    Err(ValidationError::InvalidValue {
        field: "date",
        message: format!("expected YYYY-MM-DD or RFC 3339 timestamp, got '{raw}'"),
    })
}
