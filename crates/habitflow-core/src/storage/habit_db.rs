//! SQLite-backed habit collection.
//!
//! One row per habit; the completion set is held in a JSON text column as
//! an array of `YYYY-MM-DD` strings, stored sorted ascending with unique
//! values. Every mark/unmark is a single read-modify-write against one
//! row, so per-habit atomicity comes from SQLite itself. Concurrent
//! writers to the same habit are last-writer-wins.

use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::StorageError;
use crate::habit::Habit;

/// Parse a creation timestamp from its RFC 3339 column, falling back to
/// the current time on malformed data.
fn parse_datetime_fallback(dt_str: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(dt_str)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

/// Build a Habit from a database row.
fn row_to_habit(row: &rusqlite::Row) -> Result<Habit, rusqlite::Error> {
    let completions_json: String = row.get(3)?;
    let completions: Vec<NaiveDate> = serde_json::from_str(&completions_json).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
    })?;

    let created_at_str: String = row.get(4)?;

    let mut habit = Habit {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        completions,
        created_at: parse_datetime_fallback(&created_at_str),
    };
    // sorted/unique is a column invariant, but re-established on load so a
    // hand-edited database cannot poison streak computation
    habit.normalize_completions();
    Ok(habit)
}

fn completions_json(completions: &[NaiveDate]) -> Result<String, StorageError> {
    serde_json::to_string(completions).map_err(|e| StorageError::QueryFailed(e.to_string()))
}

/// SQLite database for habit storage.
pub struct HabitDb {
    conn: Connection,
}

impl HabitDb {
    /// Open the database at `~/.config/habitflow/habitflow.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> crate::Result<Self> {
        let dir = super::data_dir()?;
        Self::open_at(&dir)
    }

    /// Open the database inside an explicit data directory.
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created or the database
    /// cannot be opened or migrated.
    pub fn open_at(dir: &Path) -> crate::Result<Self> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join("habitflow.db");
        let conn = Connection::open(&path)
            .map_err(|source| StorageError::OpenFailed { path, source })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> crate::Result<Self> {
        let conn = Connection::open_in_memory().map_err(StorageError::from)?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), StorageError> {
        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS habits (
                    id          TEXT PRIMARY KEY,
                    name        TEXT NOT NULL,
                    description TEXT,
                    completions TEXT NOT NULL DEFAULT '[]',
                    created_at  TEXT NOT NULL
                );

                CREATE INDEX IF NOT EXISTS idx_habits_created_at ON habits(created_at);",
            )
            .map_err(|e| StorageError::MigrationFailed(e.to_string()))
    }

    /// Insert a new habit.
    ///
    /// # Errors
    /// Returns an error if the insert fails (including a duplicate id).
    pub fn insert_habit(&self, habit: &Habit) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO habits (id, name, description, completions, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                habit.id,
                habit.name,
                habit.description,
                completions_json(&habit.completions)?,
                habit.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// List all habits, newest-created first.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub fn list_habits(&self) -> Result<Vec<Habit>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, description, completions, created_at
             FROM habits
             ORDER BY created_at DESC, id DESC",
        )?;
        let rows = stmt.query_map([], row_to_habit)?;
        let mut habits = Vec::new();
        for row in rows {
            habits.push(row?);
        }
        Ok(habits)
    }

    /// Fetch one habit by id.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub fn get_habit(&self, id: &str) -> Result<Option<Habit>, StorageError> {
        let habit = self
            .conn
            .query_row(
                "SELECT id, name, description, completions, created_at
                 FROM habits WHERE id = ?1",
                params![id],
                row_to_habit,
            )
            .optional()?;
        Ok(habit)
    }

    /// Replace a habit's completion set. The single mutation the store
    /// supports; everything else about a habit is immutable after creation.
    ///
    /// Returns `true` if a row was updated.
    ///
    /// # Errors
    /// Returns an error if the update fails.
    pub fn update_completions(
        &self,
        id: &str,
        completions: &[NaiveDate],
    ) -> Result<bool, StorageError> {
        let affected = self.conn.execute(
            "UPDATE habits SET completions = ?1 WHERE id = ?2",
            params![completions_json(completions)?, id],
        )?;
        Ok(affected > 0)
    }

    /// Delete a habit unconditionally.
    ///
    /// Returns `true` if a row existed. Deleting an unknown id is not an
    /// error.
    ///
    /// # Errors
    /// Returns an error if the delete fails.
    pub fn delete_habit(&self, id: &str) -> Result<bool, StorageError> {
        let affected = self
            .conn
            .execute("DELETE FROM habits WHERE id = ?1", params![id])?;
        Ok(affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn habit_created_at(name: &str, created_at: DateTime<Utc>) -> Habit {
        let mut habit = Habit::new(name, None).unwrap();
        habit.created_at = created_at;
        habit
    }

    #[test]
    fn insert_and_get_round_trip() {
        let db = HabitDb::open_memory().unwrap();
        let mut habit = Habit::new("Read", Some("20 pages".into())).unwrap();
        habit.mark(d(2024, 3, 1));
        habit.mark(d(2024, 3, 2));
        db.insert_habit(&habit).unwrap();

        let loaded = db.get_habit(&habit.id).unwrap().unwrap();
        assert_eq!(loaded.name, "Read");
        assert_eq!(loaded.description.as_deref(), Some("20 pages"));
        assert_eq!(loaded.completions, vec![d(2024, 3, 1), d(2024, 3, 2)]);
    }

    #[test]
    fn get_unknown_id_is_none() {
        let db = HabitDb::open_memory().unwrap();
        assert!(db.get_habit("nope").unwrap().is_none());
    }

    #[test]
    fn list_orders_newest_first() {
        let db = HabitDb::open_memory().unwrap();
        let base = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let old = habit_created_at("Old", base);
        let new = habit_created_at("New", base + Duration::hours(1));
        db.insert_habit(&old).unwrap();
        db.insert_habit(&new).unwrap();

        let habits = db.list_habits().unwrap();
        assert_eq!(habits.len(), 2);
        assert_eq!(habits[0].name, "New");
        assert_eq!(habits[1].name, "Old");
    }

    #[test]
    fn update_completions_persists() {
        let db = HabitDb::open_memory().unwrap();
        let habit = Habit::new("Read", None).unwrap();
        db.insert_habit(&habit).unwrap();

        assert!(db
            .update_completions(&habit.id, &[d(2024, 3, 1)])
            .unwrap());
        let loaded = db.get_habit(&habit.id).unwrap().unwrap();
        assert_eq!(loaded.completions, vec![d(2024, 3, 1)]);
    }

    #[test]
    fn update_unknown_id_touches_nothing() {
        let db = HabitDb::open_memory().unwrap();
        assert!(!db.update_completions("nope", &[d(2024, 3, 1)]).unwrap());
    }

    #[test]
    fn delete_reports_existence_and_is_idempotent() {
        let db = HabitDb::open_memory().unwrap();
        let habit = Habit::new("Read", None).unwrap();
        db.insert_habit(&habit).unwrap();

        assert!(db.delete_habit(&habit.id).unwrap());
        assert!(!db.delete_habit(&habit.id).unwrap());
        assert!(db.get_habit(&habit.id).unwrap().is_none());
    }

    #[test]
    fn load_normalizes_hand_edited_completions() {
        let db = HabitDb::open_memory().unwrap();
        let habit = Habit::new("Read", None).unwrap();
        db.insert_habit(&habit).unwrap();

        // Bypass the API and store an unsorted, duplicated set.
        db.conn
            .execute(
                "UPDATE habits SET completions = ?1 WHERE id = ?2",
                params![r#"["2024-03-05","2024-03-01","2024-03-05"]"#, habit.id],
            )
            .unwrap();

        let loaded = db.get_habit(&habit.id).unwrap().unwrap();
        assert_eq!(loaded.completions, vec![d(2024, 3, 1), d(2024, 3, 5)]);
    }

    #[test]
    fn opens_on_disk_at_explicit_directory() {
        let dir = tempfile::tempdir().unwrap();
        let habit = Habit::new("Read", None).unwrap();
        {
            let db = HabitDb::open_at(dir.path()).unwrap();
            db.insert_habit(&habit).unwrap();
        }
        let db = HabitDb::open_at(dir.path()).unwrap();
        assert!(db.get_habit(&habit.id).unwrap().is_some());
    }
}
