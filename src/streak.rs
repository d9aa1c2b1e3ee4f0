//! Streak calculation over a single user's check-in history.
//!
//! Every function here is pure: the caller fetches the history, picks "today"
//! from its [`Clock`](crate::clock::Clock), and the results are derived from
//! those two inputs alone. The store uses the same functions to refresh the
//! cached totals, so the displayed and persisted numbers never diverge.

pub mod level;
pub mod rate;

use std::collections::HashMap;

use anyhow::Result;
use chrono::{Days, NaiveDate};
use itertools::Itertools;

use crate::models::{CheckinRecord, CheckinStatus, StreakReport, StreakTotals};

pub use level::{get_level_info, get_level_progress, get_user_level, LevelInfo};
pub use rate::calculate_success_rate;

/// How far back the current-streak walk looks before giving up.
pub const LOOKBACK_DAYS: u64 = 365;

/// Somewhere a user's full check-in history lives, and where recomputed
/// totals are written back to.
pub trait HistorySource {
    /// The complete history for `user_id`, ascending by date.
    fn history(&self, user_id: &str) -> Result<Vec<CheckinRecord>>;

    /// Persist freshly computed totals for every record of `user_id`.
    fn store_totals(&self, user_id: &str, totals: &StreakTotals) -> Result<()>;
}

/// Longest run of date-contiguous `success` records.
///
/// The history is expected ascending by date but is sorted here anyway. A gap
/// of more than one day breaks a run just like a `failed` record does.
pub fn calculate_max_streak(history: &[CheckinRecord]) -> u32 {
    let mut running = 0u32;
    let mut longest = 0u32;
    let mut previous: Option<NaiveDate> = None;

    for record in history.iter().sorted_by_key(|r| r.date) {
        running = match record.status {
            CheckinStatus::Failed => 0,
            CheckinStatus::Success => match previous {
                Some(prev) if (record.date - prev).num_days() == 1 => running + 1,
                _ => 1,
            },
        };

        longest = longest.max(running);
        previous = Some(record.date);
    }

    longest
}

pub fn calculate_total_success_days(history: &[CheckinRecord]) -> u32 {
    history.iter().filter(|r| r.status.is_success()).count() as u32
}

/// Consecutive `success` days ending today (or yesterday, if today has no
/// record yet).
///
/// Quirk: a missing record for *today* is skipped, but a missing record on any
/// earlier day ends the walk.
pub fn calculate_current_streak(history: &[CheckinRecord], today: NaiveDate) -> u32 {
    // Later records win if a date appears twice.
    let by_date: HashMap<NaiveDate, CheckinStatus> =
        history.iter().map(|r| (r.date, r.status)).collect();

    let mut streak = 0u32;
    for offset in 0..LOOKBACK_DAYS {
        let Some(date) = today.checked_sub_days(Days::new(offset)) else { break };

        match by_date.get(&date) {
            Some(CheckinStatus::Success) => streak += 1,
            Some(CheckinStatus::Failed) => break,
            None if offset == 0 => continue,
            None => break,
        }
    }

    streak
}

/// The cached totals stored on each record.
pub fn calculate_totals(history: &[CheckinRecord]) -> StreakTotals {
    StreakTotals {
        max_streak: calculate_max_streak(history),
        total_days: calculate_total_success_days(history),
    }
}

/// Every derived metric for one user.
pub fn report(user_id: &str, history: &[CheckinRecord], today: NaiveDate) -> StreakReport {
    let current_streak = calculate_current_streak(history, today);
    let totals = calculate_totals(history);

    StreakReport {
        user_id: user_id.to_string(),
        today,
        current_streak,
        max_streak: totals.max_streak,
        total_days: totals.total_days,
        success_rate: calculate_success_rate(current_streak),
        level: get_level_info(current_streak),
    }
}

/// Re-derives `user_id`'s totals from their full history and writes them back.
///
/// Always a full recomputation, so running it twice on an unchanged history
/// stores the same values.
pub fn recompute<S: HistorySource + ?Sized>(source: &S, user_id: &str) -> Result<StreakTotals> {
    let history = source.history(user_id)?;
    let totals = calculate_totals(&history);

    log::trace!(
        "[recompute] {user_id}: {} records, max_streak = {}, total_days = {}",
        history.len(),
        totals.max_streak,
        totals.total_days
    );

    source.store_totals(user_id, &totals)?;
    Ok(totals)
}
