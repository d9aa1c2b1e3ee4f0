pub const USERS_SCHEMA: &str =
    "CREATE TABLE IF NOT EXISTS Users (
        user_id        TEXT        PRIMARY KEY,
        email          TEXT,
        created_at     TIMESTAMP   NOT NULL
    )";

// max_streak and total_days are cached on every row and always rewritten
// together from the user's full history.
pub const CHECKINS_SCHEMA: &str =
    "CREATE TABLE IF NOT EXISTS Checkins (
        user_id        TEXT        NOT NULL    REFERENCES Users(user_id),
        date           DATE        NOT NULL,
        status         TEXT        NOT NULL    CHECK (status IN ('success', 'failed')),

        max_streak     INTEGER     NOT NULL    DEFAULT 0,
        total_days     INTEGER     NOT NULL    DEFAULT 0,

        UNIQUE (user_id, date)
    )";

pub const CHECKINS_DATE_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_checkins_user_date ON Checkins (user_id, date)";
