//! # HabitFlow Core Library
//!
//! This library provides the core business logic for the HabitFlow habit
//! tracker. It implements a CLI-first philosophy where all operations are
//! available via a standalone CLI binary, with any GUI or HTTP shell being
//! a thin layer over the same core library.
//!
//! ## Architecture
//!
//! - **Streak Engine**: pure calendar-day computation over a habit's
//!   completion dates
//! - **Storage**: SQLite-based habit persistence and TOML-based
//!   configuration
//! - **API Contract**: typed operation surface mirroring the JSON routes a
//!   transport shell exposes
//!
//! ## Key Components
//!
//! - [`compute_streaks`]: current/longest streak computation
//! - [`HabitDb`]: habit persistence
//! - [`HabitService`]: list/create/delete/mark/unmark operations
//! - [`Config`]: application configuration management

pub mod api;
pub mod error;
pub mod habit;
pub mod storage;
pub mod streak;

pub use api::{CreateHabit, DeleteAck, ErrorBody, HabitService, HabitWithStreaks};
pub use error::{ConfigError, CoreError, Result, StorageError, ValidationError};
pub use habit::Habit;
pub use storage::{Config, HabitDb};
pub use streak::{compute_streaks, StreakSummary};
