//! Streak computation over completion dates.
//!
//! Pure calendar-day arithmetic: adjacency is decided by `NaiveDate`
//! subtraction, never elapsed-time division, so daylight-saving shifts
//! cannot skew the count. The reference date is an explicit parameter so
//! the function stays total and deterministic.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Derived streak statistics for one habit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakSummary {
    /// Consecutive completed days ending at the reference date. Zero when
    /// the reference date itself is not completed, even if an unbroken run
    /// ends the day before.
    pub current_streak: u32,
    /// Length of the longest run of consecutive calendar dates anywhere in
    /// the completion history.
    pub longest_streak: u32,
}

/// Compute current and longest streaks for a completion set.
///
/// `today` anchors the current streak: walk backward one calendar day at a
/// time and count until the first missing day. The longest streak scans the
/// ascending dates with a running counter that resets whenever adjacent
/// dates are more than one calendar day apart.
///
/// Duplicate or unsorted input is tolerated; the completion set is treated
/// as a set of days.
pub fn compute_streaks(completions: &[NaiveDate], today: NaiveDate) -> StreakSummary {
    let days: BTreeSet<NaiveDate> = completions.iter().copied().collect();

    let mut current_streak = 0u32;
    let mut cursor = today;
    while days.contains(&cursor) {
        current_streak += 1;
        match cursor.pred_opt() {
            Some(prev) => cursor = prev,
            None => break,
        }
    }

    let mut longest_streak = 0u32;
    let mut running = 0u32;
    let mut prev: Option<NaiveDate> = None;
    for &day in &days {
        running = match prev {
            Some(p) if (day - p).num_days() == 1 => running + 1,
            _ => 1,
        };
        longest_streak = longest_streak.max(running);
        prev = Some(day);
    }

    StreakSummary {
        current_streak,
        longest_streak,
    }
}
