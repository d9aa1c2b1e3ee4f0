use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::Connection;

use crate::{awdb::checkins, models::LeaderboardEntry, streak};

/// Users ranked by current streak, then max streak, then user id.
pub fn query_leaderboard(
    connection: &Connection,
    today: NaiveDate,
    limit: usize,
) -> Result<Vec<LeaderboardEntry>> {
    log::trace!("[query_leaderboard] Building leaderboard for {today} (top {limit})...");

    let mut entries = Vec::new();
    for user_id in checkins::query_checkin_user_ids(connection)? {
        let history = checkins::query_history(connection, &user_id)?;
        let current_streak = streak::calculate_current_streak(&history, today);

        entries.push(LeaderboardEntry {
            max_streak: streak::calculate_max_streak(&history),
            level: streak::get_user_level(current_streak),
            current_streak,
            user_id,
        });
    }

    entries.sort_by(|a, b| {
        b.current_streak
            .cmp(&a.current_streak)
            .then(b.max_streak.cmp(&a.max_streak))
            .then_with(|| a.user_id.cmp(&b.user_id))
    });
    entries.truncate(limit);

    Ok(entries)
}
