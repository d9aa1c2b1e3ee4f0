use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::{Connection, TransactionBehavior};

use crate::{
    awdb::{DBResult, users},
    models::{self, CheckinStatus, StreakTotals},
    streak::{self, HistorySource},
};

/////*============== CHECK-IN QUERIES ==============*/
impl ToSql for CheckinStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for CheckinStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse::<CheckinStatus>()
            .map_err(|err| FromSqlError::Other(err.into()))
    }
}

impl<'a> TryFrom<&'a rusqlite::Row<'a>> for models::CheckinRecord {
    type Error = rusqlite::Error;

    fn try_from(row: &rusqlite::Row) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            user_id: row.get("user_id")?,
            date: row.get("date")?,
            status: row.get("status")?,

            max_streak: row.get("max_streak")?,
            total_days: row.get("total_days")?,
        })
    }
}

/// Inserts a check-in, or overwrites the status of the one already recorded
/// for that (user, date). Cached totals are left for [`store_totals`].
pub fn upsert_checkin(connection: &Connection, record: &models::CheckinRecord) -> DBResult<()> {
    log::trace!(
        "[upsert_checkin] Recording {} for {} on {}...",
        record.status, record.user_id, record.date
    );

    let query_params = rusqlite::named_params! {
            ":user_id": record.user_id,
            ":date":    record.date,
            ":status":  record.status,
    };

    connection
        .prepare(
            "INSERT INTO Checkins ( user_id,  date,  status)
             VALUES               (:user_id, :date, :status)
             ON CONFLICT (user_id, date) DO UPDATE SET status = excluded.status",
        )?
        .execute(query_params)
        .inspect_err(|err| log::error!("[upsert_checkin] Could not record check-in: {err}"))?;

    Ok(())
}

/// The check-in `user_id` recorded on `date`, if any.
pub fn query_checkin(
    connection: &Connection,
    user_id: &str,
    date: NaiveDate,
) -> DBResult<Option<models::CheckinRecord>> {
    connection
        .prepare("SELECT * FROM Checkins WHERE user_id = :user_id AND date = :date")?
        .query(rusqlite::named_params! { ":user_id": user_id, ":date": date })?
        .next()?
        .map(|row| row.try_into())
        .transpose()
}

/// A user's full history, ascending by date.
pub fn query_history(connection: &Connection, user_id: &str) -> DBResult<Vec<models::CheckinRecord>> {
    log::trace!("[query_history] Querying history for {user_id}...");

    let mut stmt = connection.prepare(
        "SELECT * FROM Checkins
         WHERE user_id = :user_id
         ORDER BY date ASC",
    )?;

    let history = stmt
        .query_map(rusqlite::named_params! { ":user_id": user_id }, |row| {
            models::CheckinRecord::try_from(row)
        })?
        .collect::<DBResult<Vec<models::CheckinRecord>>>()?;

    Ok(history)
}

/// The `limit` most recent check-ins for a user, newest first.
pub fn query_recent_history(
    connection: &Connection,
    user_id: &str,
    limit: usize,
) -> DBResult<Vec<models::CheckinRecord>> {
    let mut stmt = connection.prepare(
        "SELECT * FROM Checkins
         WHERE user_id = :user_id
         ORDER BY date DESC
         LIMIT :limit",
    )?;

    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    let query_params = rusqlite::named_params! { ":user_id": user_id, ":limit": limit };
    let history = stmt
        .query_map(query_params, |row| models::CheckinRecord::try_from(row))?
        .collect::<DBResult<Vec<models::CheckinRecord>>>()?;

    Ok(history)
}

/// Every user id with at least one check-in.
pub fn query_checkin_user_ids(connection: &Connection) -> DBResult<Vec<String>> {
    let mut stmt = connection.prepare("SELECT DISTINCT user_id FROM Checkins ORDER BY user_id")?;
    let ids = stmt
        .query_map([], |row| row.get("user_id"))?
        .collect::<DBResult<Vec<String>>>()?;

    Ok(ids)
}

/// Overwrites the cached totals on every record of `user_id`.
/// Returns the number of records touched.
pub fn store_totals(connection: &Connection, user_id: &str, totals: &StreakTotals) -> DBResult<usize> {
    let query_params = rusqlite::named_params! {
            ":user_id":    user_id,
            ":max_streak": totals.max_streak,
            ":total_days": totals.total_days,
    };

    connection
        .prepare(
            "UPDATE Checkins
             SET max_streak = :max_streak, total_days = :total_days
             WHERE user_id = :user_id",
        )?
        .execute(query_params)
}

impl HistorySource for Connection {
    fn history(&self, user_id: &str) -> Result<Vec<models::CheckinRecord>> {
        query_history(self, user_id)
            .with_context(|| format!("Could not read check-in history for {user_id}"))
    }

    fn store_totals(&self, user_id: &str, totals: &StreakTotals) -> Result<()> {
        store_totals(self, user_id, totals)
            .with_context(|| format!("Could not store streak totals for {user_id}"))?;
        Ok(())
    }
}

/// Records a check-in and refreshes the user's cached totals.
///
/// The write and the recomputation share one immediate transaction, so the
/// recomputation sees exactly the history it just wrote and concurrent writers
/// for the same database wait their turn.
pub fn record_checkin(
    connection: &mut Connection,
    record: &models::CheckinRecord,
) -> Result<StreakTotals> {
    let tx = connection.transaction_with_behavior(TransactionBehavior::Immediate)?;

    if !users::user_exists(&tx, &record.user_id)? {
        log::trace!(
            "[record_checkin] User '{}' does not already exist, adding to database.",
            record.user_id
        );
        users::insert_user(&tx, &models::User::new(&record.user_id, None))?;
    }

    upsert_checkin(&tx, record)?;
    let totals = streak::recompute(&*tx, &record.user_id)?;
    tx.commit()?;

    log::info!(
        "Recorded {} for {} on {} (max streak {}, total days {}).",
        record.status, record.user_id, record.date, totals.max_streak, totals.total_days
    );

    Ok(totals)
}

/// Recomputes the cached totals for one user.
pub fn recompute_user(connection: &mut Connection, user_id: &str) -> Result<StreakTotals> {
    let tx = connection.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let totals = streak::recompute(&*tx, user_id)?;
    tx.commit()?;

    Ok(totals)
}

/// Recomputes the cached totals for every user with check-ins.
/// Returns how many users were refreshed.
pub fn recompute_all(connection: &mut Connection) -> Result<usize> {
    let tx = connection.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let user_ids = query_checkin_user_ids(&tx)?;

    for user_id in &user_ids {
        streak::recompute(&*tx, user_id)?;
    }
    tx.commit()?;

    log::info!("[recompute_all] Recomputed streak totals for {} users.", user_ids.len());
    Ok(user_ids.len())
}
