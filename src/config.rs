use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use chrono::FixedOffset;

pub const DEFAULT_DB_PATH: &str = "awaken.db";
pub const DEFAULT_UTC_OFFSET_HOURS: i32 = 8;
pub const DEFAULT_LEADERBOARD_SIZE: usize = 10;

#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: PathBuf,
    pub utc_offset: FixedOffset,
    pub leaderboard_size: usize,
}

impl Config {
    /// Reads the configuration from the environment, loading `.env` first.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let db_path = lookup("AWAKEN_DB")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH));

        let utc_offset = match lookup("AWAKEN_UTC_OFFSET") {
            Some(raw) => parse_utc_offset(&raw)?,
            None => offset_from_hours(DEFAULT_UTC_OFFSET_HOURS)?,
        };

        let leaderboard_size = match lookup("AWAKEN_LEADERBOARD_SIZE") {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .with_context(|| format!("AWAKEN_LEADERBOARD_SIZE is not a number: {raw}"))?,
            None => DEFAULT_LEADERBOARD_SIZE,
        };

        log::debug!(
            "[config] db_path = {}, utc_offset = {utc_offset}, leaderboard_size = {leaderboard_size}",
            db_path.display()
        );

        Ok(Self { db_path, utc_offset, leaderboard_size })
    }
}

/// Parses a whole number of hours east of UTC, e.g. `8`, `+8` or `-5`.
pub fn parse_utc_offset(raw: &str) -> Result<FixedOffset> {
    let hours = raw
        .trim()
        .parse::<i32>()
        .with_context(|| format!("AWAKEN_UTC_OFFSET must be whole hours, got: {raw}"))?;
    offset_from_hours(hours)
}

fn offset_from_hours(hours: i32) -> Result<FixedOffset> {
    if !(-12..=14).contains(&hours) {
        return Err(anyhow!("UTC offset out of range (-12..=14): {hours}"));
    }
    FixedOffset::east_opt(hours * 3600).context("Invalid UTC offset")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let env: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Config::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.db_path, PathBuf::from(DEFAULT_DB_PATH));
        assert_eq!(config.utc_offset.local_minus_utc(), 8 * 3600);
        assert_eq!(config.leaderboard_size, DEFAULT_LEADERBOARD_SIZE);
    }

    #[test]
    fn overrides() {
        let config = config_from(&[
            ("AWAKEN_DB", "/tmp/other.db"),
            ("AWAKEN_UTC_OFFSET", "-5"),
            ("AWAKEN_LEADERBOARD_SIZE", "3"),
        ])
        .unwrap();
        assert_eq!(config.db_path, PathBuf::from("/tmp/other.db"));
        assert_eq!(config.utc_offset.local_minus_utc(), -5 * 3600);
        assert_eq!(config.leaderboard_size, 3);
    }

    #[test]
    fn rejects_bad_offsets() {
        assert!(config_from(&[("AWAKEN_UTC_OFFSET", "25")]).is_err());
        assert!(config_from(&[("AWAKEN_UTC_OFFSET", "UTC+8")]).is_err());
        assert!(parse_utc_offset("+8").is_ok());
    }

    #[test]
    fn rejects_bad_leaderboard_size() {
        assert!(config_from(&[("AWAKEN_LEADERBOARD_SIZE", "many")]).is_err());
    }
}
