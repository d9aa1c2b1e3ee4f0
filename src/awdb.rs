pub mod checkins;
pub mod leaderboard;
pub mod schema;
pub mod users;

pub use checkins::*;
pub use leaderboard::*;
pub use users::*;

use std::path::Path;

use rusqlite::{Connection, ErrorCode};

pub type DBResult<T> = rusqlite::Result<T>;

/// Opens (or creates) the database at `path`.
pub fn connect(path: &Path) -> DBResult<Connection> {
    log::trace!("[connect] Opening database at {}", path.display());
    Connection::open(path)
}

/// Creates every table if it doesn't exist yet.
pub fn initialize_db(connection: &Connection) -> DBResult<()> {
    connection.pragma_update(None, "foreign_keys", true)?;

    log::debug!("[initialize_db] creating Users table...");
    connection.execute(schema::USERS_SCHEMA, [])?;

    log::debug!("[initialize_db] creating Checkins table...");
    connection.execute(schema::CHECKINS_SCHEMA, [])?;
    connection.execute(schema::CHECKINS_DATE_INDEX, [])?;

    Ok(())
}

/// Turns a uniqueness violation into `Ok(false)` ("already there"), passing any
/// other error through.
pub(crate) fn swallow_constraint_violation(err: rusqlite::Error) -> DBResult<bool> {
    match err {
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation => {
            log::trace!("[swallow_constraint_violation] Row already present, ignoring.");
            Ok(false)
        }
        err => Err(err),
    }
}

/// An initialized in-memory database.
pub fn open_in_memory() -> DBResult<Connection> {
    let connection = Connection::open_in_memory()?;
    initialize_db(&connection)?;
    Ok(connection)
}
