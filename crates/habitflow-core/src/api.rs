//! Operation surface for habit tracking.
//!
//! [`HabitService`] is the contract a transport shell (HTTP server, GUI,
//! CLI) binds to. Each method maps 1:1 to a route:
//!
//! - `list`   -> `GET    /api/habits`
//! - `create` -> `POST   /api/habits`
//! - `delete` -> `DELETE /api/habits/{id}`
//! - `mark`   -> `POST   /api/habits/{id}/mark`
//! - `unmark` -> `POST   /api/habits/{id}/unmark`
//!
//! Errors carry their status class via [`CoreError::http_status`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::habit::{self, Habit};
use crate::storage::HabitDb;
use crate::streak::{compute_streaks, StreakSummary};

/// Request body for creating a habit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateHabit {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Habit enriched with its derived streak statistics, the read-side shape
/// of the contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HabitWithStreaks {
    #[serde(flatten)]
    pub habit: Habit,
    #[serde(flatten)]
    pub streaks: StreakSummary,
}

/// Acknowledgement payload for delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteAck {
    pub success: bool,
}

/// Error payload shape for transport shells: `{"error": message}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl From<&CoreError> for ErrorBody {
    fn from(err: &CoreError) -> Self {
        Self {
            error: err.to_string(),
        }
    }
}

/// Habit operations over a [`HabitDb`].
///
/// Stateless aside from the store: every call is an independent request,
/// and correctness relies on SQLite's per-row atomicity. Two callers
/// mutating the same habit concurrently are last-writer-wins; there is no
/// optimistic concurrency control.
pub struct HabitService {
    db: HabitDb,
}

impl HabitService {
    pub fn new(db: HabitDb) -> Self {
        Self { db }
    }

    /// Direct access to the underlying store.
    pub fn db(&self) -> &HabitDb {
        &self.db
    }

    /// List all habits, newest-created first, with streaks anchored to
    /// today's local date.
    ///
    /// # Errors
    /// Returns an error if the store fails.
    pub fn list(&self) -> crate::Result<Vec<HabitWithStreaks>> {
        self.list_at(habit::today())
    }

    /// List with an explicit reference date anchoring the current streak.
    ///
    /// # Errors
    /// Returns an error if the store fails.
    pub fn list_at(&self, today: NaiveDate) -> crate::Result<Vec<HabitWithStreaks>> {
        let habits = self.db.list_habits()?;
        Ok(habits
            .into_iter()
            .map(|h| {
                let streaks = compute_streaks(&h.completions, today);
                HabitWithStreaks { habit: h, streaks }
            })
            .collect())
    }

    /// Create a habit with an empty completion set.
    ///
    /// # Errors
    /// Returns a validation error for a blank name before the store is
    /// touched, or a storage error if the insert fails.
    pub fn create(&self, req: CreateHabit) -> crate::Result<Habit> {
        let habit = Habit::new(&req.name, req.description)?;
        self.db.insert_habit(&habit)?;
        Ok(habit)
    }

    /// Delete a habit unconditionally. Unknown ids still acknowledge
    /// success (delete is idempotent).
    ///
    /// # Errors
    /// Returns an error if the store fails.
    pub fn delete(&self, id: &str) -> crate::Result<DeleteAck> {
        self.db.delete_habit(id)?;
        Ok(DeleteAck { success: true })
    }

    /// Add a completion date (default: today). Already-present dates are a
    /// no-op.
    ///
    /// # Errors
    /// Returns not-found for an unknown id, or a storage error.
    pub fn mark(&self, id: &str, date: Option<NaiveDate>) -> crate::Result<Habit> {
        self.mutate(id, date.unwrap_or_else(habit::today), true)
    }

    /// Remove a completion date (default: today). Absent dates are a no-op.
    ///
    /// # Errors
    /// Returns not-found for an unknown id, or a storage error.
    pub fn unmark(&self, id: &str, date: Option<NaiveDate>) -> crate::Result<Habit> {
        self.mutate(id, date.unwrap_or_else(habit::today), false)
    }

    // Single read-modify-write against one row. The write is skipped when
    // the completion set did not change.
    fn mutate(&self, id: &str, date: NaiveDate, add: bool) -> crate::Result<Habit> {
        let Some(mut habit) = self.db.get_habit(id)? else {
            return Err(CoreError::NotFound { id: id.to_string() });
        };
        let changed = if add {
            habit.mark(date)
        } else {
            habit.unmark(date)
        };
        if changed {
            self.db.update_completions(id, &habit.completions)?;
        }
        Ok(habit)
    }
}
