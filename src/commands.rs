use std::sync::LazyLock;

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use regex::Regex;
use rusqlite::Connection;

use crate::awdb;
use crate::clock::Clock;
use crate::models::{CheckinRecord, CheckinStatus, StreakReport, User};
use crate::streak;

const MAX_CMD_LENGTH: usize = 12;
const DEFAULT_HISTORY_DAYS: usize = 30;

static COMMAND_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_]*$").expect("command regex is valid"));
static USER_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_.@-]{1,64}$").expect("user id regex is valid"));

/// Everything a command needs, handed in explicitly.
pub struct AppContext {
    pub db: Connection,
    pub clock: Box<dyn Clock>,
    pub leaderboard_size: usize,
}

struct CommandInstance<'a> {
    app: &'a mut AppContext,
    parameters: &'a [&'a str],
}

pub struct Commands;
impl Commands {
    pub fn run_command(app: &mut AppContext, input: &str) -> Result<String> {
        // Split the input (on whitespace) into:
        // - The command (first token)
        // - Its parameters (all tokens afterwards)
        let split_tokens = input.split_whitespace().collect::<Vec<_>>();
        let Some((&command, parameters)) = split_tokens.split_first() else {
            return Err(anyhow!("No command given, see `help` for commands."));
        };

        let mut cmd = CommandInstance { app, parameters };

        let result: String = match command {
              "adduser" => cmd.adduser()?,
              "checkin" => cmd.checkin()?,
                "stats" => cmd.stats()?,
               "export" => cmd.export()?,
              "history" => cmd.history()?,
          "leaderboard" => cmd.leaderboard()?,
            "recompute" => cmd.recompute()?,
                 "help" => Self::get_help(),
            _ => {
                if Commands::is_valid_cmd(command) {
                    log::info!("User submitted unknown command: {}", command);
                    return Err(anyhow!(
                        "No such command found: {}, see `help` for commands.",
                        command
                    ));
                } else {
                    log::info!("User submitted invalid command: {}", command);
                    return Err(anyhow!("Invalid command syntax."));
                }
            }
        };

        Ok(result)
    }
}

impl<'a> CommandInstance<'a> {
    fn adduser(&mut self) -> Result<String> {
        let user_id = self.user_id_param("Expected usage: `adduser <user_id> [email]`")?;
        let email = self.parameters.get(1).copied();

        if let Some(email) = email {
            if !email.contains('@') {
                return Err(anyhow!("Not an email address: {email}"));
            }
        }

        let db = &self.app.db;
        if awdb::insert_user(db, &User::new(user_id, email))? {
            Ok(format!("Registered user {user_id}."))
        } else if let Some(email) = email {
            awdb::update_email(db, user_id, email)?;
            log::info!("Updated {user_id}'s email address.");
            Ok(format!("Updated email for {user_id}."))
        } else {
            Ok(format!("User {user_id} is already registered."))
        }
    }

    fn checkin(&mut self) -> Result<String> {
        let usage = "Expected usage: `checkin <user_id> <success|failed> [YYYY-MM-DD]`";
        let user_id = self.user_id_param(usage)?;

        let status = self.parameters
            .get(1)
            .with_context(|| format!("Expected check-in result (success | failed), got none.\n{usage}"))?
            .parse::<CheckinStatus>()?;

        let today = self.app.clock.today();
        let date = match self.parameters.get(2) {
            Some(raw) => parse_date(raw)?,
            None => today,
        };

        if date > today {
            return Err(anyhow!("Cannot check in for a future date: {date} (today is {today})"));
        }

        awdb::record_checkin(&mut self.app.db, &CheckinRecord::new(user_id, date, status))?;

        let report = self.report(user_id)?;
        Ok(format!("Recorded {status} for {user_id} on {date}.\n{report}"))
    }

    fn stats(&mut self) -> Result<String> {
        let user_id = self.user_id_param("Expected usage: `stats <user_id>`")?;
        Ok(self.report(user_id)?.to_string())
    }

    fn export(&mut self) -> Result<String> {
        let user_id = self.user_id_param("Expected usage: `export <user_id>`")?;
        let report = self.report(user_id)?;
        serde_json::to_string_pretty(&report).context("Could not serialize streak report.")
    }

    fn history(&mut self) -> Result<String> {
        let user_id = self.user_id_param("Expected usage: `history <user_id> [days]`")?;
        let limit = self.count_param(1, DEFAULT_HISTORY_DAYS)?;

        self.require_user(user_id)?;
        let records = awdb::query_recent_history(&self.app.db, user_id, limit)?;
        if records.is_empty() {
            return Ok(format!("No check-ins recorded for {user_id}."));
        }

        let mut output = format!("**Recent check-ins for {user_id}:**");
        for record in records {
            output += "\n\t";
            output += &record.to_string();
        }

        Ok(output)
    }

    fn leaderboard(&mut self) -> Result<String> {
        let limit = self.count_param(0, self.app.leaderboard_size)?;
        let today = self.app.clock.today();
        let entries = awdb::query_leaderboard(&self.app.db, today, limit)?;

        if entries.is_empty() {
            return Ok(String::from("Nobody has checked in yet."));
        }

        let mut output = String::from("**Leaderboard:**");
        for (rank, entry) in entries.iter().enumerate() {
            output += &format!(
                "\n\t{}. {}: {} days (max {}, level {})",
                rank + 1,
                entry.user_id,
                entry.current_streak,
                entry.max_streak,
                entry.level
            );
        }

        Ok(output)
    }

    fn recompute(&mut self) -> Result<String> {
        match self.parameters.first() {
            Some(&user_id) => {
                let user_id = validate_user_id(user_id)?;
                self.require_user(user_id)?;

                let totals = awdb::recompute_user(&mut self.app.db, user_id)?;
                Ok(format!(
                    "Recomputed {user_id}: max streak {}, total days {}.",
                    totals.max_streak, totals.total_days
                ))
            }
            None => {
                let count = awdb::recompute_all(&mut self.app.db)?;
                Ok(format!("Recomputed streak totals for {count} users."))
            }
        }
    }

    fn report(&self, user_id: &str) -> Result<StreakReport> {
        self.require_user(user_id)?;

        let history = awdb::query_history(&self.app.db, user_id)?;
        Ok(streak::report(user_id, &history, self.app.clock.today()))
    }

    fn require_user(&self, user_id: &str) -> Result<()> {
        if awdb::user_exists(&self.app.db, user_id)? {
            Ok(())
        } else {
            Err(anyhow!("No such user: {user_id}"))
        }
    }

    fn user_id_param(&self, usage: &str) -> Result<&'a str> {
        let parameters: &'a [&'a str] = self.parameters;
        let user_id = parameters
            .first()
            .with_context(|| format!("Expected user id, got none.\n{usage}"))?;
        validate_user_id(user_id)
    }

    fn count_param(&self, index: usize, default: usize) -> Result<usize> {
        match self.parameters.get(index) {
            Some(raw) => {
                let count = raw
                    .parse::<usize>()
                    .with_context(|| format!("Expected a positive number, got: {raw}"))?;
                if count == 0 {
                    return Err(anyhow!("Expected a positive number, got: 0"));
                }
                Ok(count)
            }
            None => Ok(default),
        }
    }
}

/// Non-command helpers
impl Commands {
    /// Ensures that the string slice conforms to C-like identifier regex
    fn is_valid_cmd(s: &str) -> bool {
        s.len() <= MAX_CMD_LENGTH && COMMAND_RE.is_match(s)
    }

    /// Gets a help string. Should be updated after a new command is added
    pub fn get_help() -> String {
        String::from(
            r#"
**Command List:**
`adduser <user_id> [email]`:  Register a user, or update their email.
`checkin <user_id> <success|failed> [YYYY-MM-DD]`:  Record a check-in (defaults to today).
`stats <user_id>`:  Show streak, success rate and level for a user.
`export <user_id>`:  Same as stats, as JSON.
`history <user_id> [days]`:  List a user's most recent check-ins.
`leaderboard [n]`:  Rank users by current streak.
`recompute [user_id]`:  Recompute cached streak totals for one or all users.
`help`:  Get information on supported commands
"#,
        )
    }
}

fn validate_user_id(user_id: &str) -> Result<&str> {
    if USER_ID_RE.is_match(user_id) {
        Ok(user_id)
    } else {
        Err(anyhow!("Invalid user id: {user_id}"))
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("Expected a date as YYYY-MM-DD, got: {raw}"))
}
