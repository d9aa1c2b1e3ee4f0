use anyhow::{Context, Result};

use awaken::{
    awdb,
    clock::OffsetClock,
    commands::{AppContext, Commands},
    config::Config,
};

fn main() -> Result<()> {
    // Begin logger
    env_logger::init();

    let config = Config::from_env()?;

    // Initialize database
    let db = awdb::connect(&config.db_path)
        .with_context(|| format!("Could not open database at {}", config.db_path.display()))?;
    awdb::initialize_db(&db)?;

    let mut app = AppContext {
        db,
        clock: Box::new(OffsetClock::new(config.utc_offset)),
        leaderboard_size: config.leaderboard_size,
    };

    let input = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    let input = if input.trim().is_empty() { String::from("help") } else { input };

    match Commands::run_command(&mut app, &input) {
        Ok(response) => {
            println!("{response}");
            Ok(())
        }
        Err(err) => {
            log::error!("Command '{input}' failed: {err:?}");
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    }
}
