use awaken::{
    awdb,
    clock::FixedClock,
    commands::{AppContext, Commands},
    models::StreakReport,
};
use chrono::{Days, NaiveDate};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
}

fn app() -> AppContext {
    AppContext {
        db: awdb::open_in_memory().unwrap(),
        clock: Box::new(FixedClock(today())),
        leaderboard_size: 10,
    }
}

fn run(app: &mut AppContext, input: &str) -> String {
    Commands::run_command(app, input).unwrap_or_else(|err| panic!("`{input}` failed: {err}"))
}

fn checkin(app: &mut AppContext, user: &str, days_ago: u64, status: &str) {
    let date = today() - Days::new(days_ago);
    run(app, &format!("checkin {user} {status} {}", date.format("%Y-%m-%d")));
}

fn export(app: &mut AppContext, user: &str) -> StreakReport {
    serde_json::from_str(&run(app, &format!("export {user}"))).unwrap()
}

#[test]
fn consecutive_successes_build_a_streak() {
    let mut app = app();
    checkin(&mut app, "alice", 2, "success");
    checkin(&mut app, "alice", 1, "success");
    checkin(&mut app, "alice", 0, "success");

    let report = export(&mut app, "alice");
    assert_eq!(report.current_streak, 3);
    assert_eq!(report.max_streak, 3);
    assert_eq!(report.total_days, 3);
    assert_eq!(report.level.level, 1);
    assert_eq!(report.today, today());
}

#[test]
fn failure_restarts_the_streak() {
    let mut app = app();
    checkin(&mut app, "bob", 3, "success");
    checkin(&mut app, "bob", 2, "failed");
    checkin(&mut app, "bob", 1, "success");
    checkin(&mut app, "bob", 0, "success");

    let report = export(&mut app, "bob");
    assert_eq!(report.current_streak, 2);
    assert_eq!(report.max_streak, 2);
    assert_eq!(report.total_days, 3);
}

#[test]
fn missing_past_days_end_the_streak() {
    let mut app = app();
    checkin(&mut app, "carol", 5, "success");
    checkin(&mut app, "carol", 4, "success");

    let report = export(&mut app, "carol");
    assert_eq!(report.current_streak, 0);
    assert_eq!(report.success_rate, 0);
    assert_eq!(report.max_streak, 2);
}

#[test]
fn checkin_defaults_to_today_and_can_be_corrected() {
    let mut app = app();
    checkin(&mut app, "dave", 1, "success");

    let out = run(&mut app, "checkin dave success");
    assert!(out.contains("Recorded success for dave on 2024-03-15"));
    assert!(out.contains("Current Streak: 2"));

    // Re-checking in on the same day overwrites that day's result.
    run(&mut app, "checkin dave failed");
    let report = export(&mut app, "dave");
    assert_eq!(report.current_streak, 0);
    assert_eq!(report.total_days, 1);

    let history = run(&mut app, "history dave");
    assert_eq!(history.lines().count(), 3);
    assert!(history.contains("2024-03-15 ❌ failed"));
}

#[test]
fn long_streak_levels_up() {
    let mut app = app();
    for days_ago in (0..45).rev() {
        checkin(&mut app, "erin", days_ago, "success");
    }

    let report = export(&mut app, "erin");
    assert_eq!(report.current_streak, 45);
    assert_eq!(report.success_rate, 60);
    assert_eq!(report.level.level, 3);
    assert_eq!(report.level.progress, 100);
    assert_eq!(report.level.days_to_next_level, 0);
    assert_eq!(report.level.level_name, "Advancer");
}

#[test]
fn leaderboard_and_recompute() {
    let mut app = app();
    checkin(&mut app, "alice", 1, "success");
    checkin(&mut app, "alice", 0, "success");
    checkin(&mut app, "bob", 0, "success");

    let board = run(&mut app, "leaderboard");
    let alice = board.find("alice").unwrap();
    let bob = board.find("bob").unwrap();
    assert!(alice < bob);
    assert!(board.contains("1. alice: 2 days (max 2, level 1)"));

    let top = run(&mut app, "leaderboard 1");
    assert!(!top.contains("bob"));

    assert_eq!(run(&mut app, "recompute"), "Recomputed streak totals for 2 users.");
    assert_eq!(
        run(&mut app, "recompute alice"),
        "Recomputed alice: max streak 2, total days 2."
    );
}

#[test]
fn empty_leaderboard() {
    let mut app = app();
    assert_eq!(run(&mut app, "leaderboard"), "Nobody has checked in yet.");
}
