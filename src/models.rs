use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::streak::level::LevelInfo;

/// Outcome of a single daily check-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckinStatus {
    Success,
    Failed,
}

impl CheckinStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckinStatus::Success => "success",
            CheckinStatus::Failed => "failed",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, CheckinStatus::Success)
    }
}

impl std::str::FromStr for CheckinStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "success" => Ok(CheckinStatus::Success),
            "failed" | "fail" => Ok(CheckinStatus::Failed),
            other => Err(anyhow::anyhow!("Unknown check-in status: {other} (expected success|failed)")),
        }
    }
}

impl std::fmt::Display for CheckinStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One check-in for one user on one calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckinRecord {
    pub user_id: String,
    pub date: NaiveDate,
    pub status: CheckinStatus,

    pub max_streak: u32,
    pub total_days: u32,
}

impl CheckinRecord {
    /// A fresh record whose cached totals have not been computed yet.
    pub fn new(user_id: &str, date: NaiveDate, status: CheckinStatus) -> Self {
        Self {
            user_id: user_id.to_string(),
            date,
            status,
            max_streak: 0,
            total_days: 0,
        }
    }
}

impl std::fmt::Display for CheckinRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mark = if self.status.is_success() { "✅" } else { "❌" };
        write!(f, "{} {} {}", self.date.format("%Y-%m-%d"), mark, self.status)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub user_id: String,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(user_id: &str, email: Option<&str>) -> Self {
        Self {
            user_id: user_id.to_string(),
            email: email.map(String::from),
            created_at: Utc::now(),
        }
    }
}

/// Cached per-user totals persisted alongside every check-in record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakTotals {
    pub max_streak: u32,
    pub total_days: u32,
}

/// Everything the engine derives for one user at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakReport {
    pub user_id: String,
    pub today: NaiveDate,

    pub current_streak: u32,
    pub max_streak: u32,
    pub total_days: u32,
    pub success_rate: u32,

    pub level: LevelInfo,
}

impl std::fmt::Display for StreakReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "**Streak Stats for {}** (as of {}):\n\
             \tCurrent Streak: {}\n\
             \tMax Streak: {}\n\
             \tTotal Days: {}\n\
             \tSuccess Rate: {}%\n\
             \tLevel: {} ({}) {}%\n\
             \tDays To Next Level: {}",
            self.user_id,
            self.today.format("%Y-%m-%d"),
            self.current_streak,
            self.max_streak,
            self.total_days,
            self.success_rate,
            self.level.level,
            self.level.level_name,
            self.level.progress,
            self.level.days_to_next_level
        )
    }
}

/// A single leaderboard row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub user_id: String,
    pub current_streak: u32,
    pub max_streak: u32,
    pub level: u8,
}
