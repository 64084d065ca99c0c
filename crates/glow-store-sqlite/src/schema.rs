//! SQL schema for the glow SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! the `PRAGMA user_version` number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS profiles (
    user_id          TEXT PRIMARY KEY,
    full_name        TEXT,
    avatar_url       TEXT,
    skin_type        TEXT,
    skin_tone        TEXT,
    morning_reminder TEXT,            -- 'HH:MM' or NULL
    evening_reminder TEXT,            -- 'HH:MM' or NULL
    physician_name   TEXT,
    physician_phone  TEXT,
    created_at       TEXT NOT NULL,   -- ISO 8601 UTC; store-assigned
    updated_at       TEXT NOT NULL
);

-- One row per (user, calendar date); flags flip in place, rows are never
-- deleted by the application.
CREATE TABLE IF NOT EXISTS routine_logs (
    log_id            TEXT PRIMARY KEY,
    user_id           TEXT NOT NULL,
    date              TEXT NOT NULL,   -- 'YYYY-MM-DD'
    morning_completed INTEGER NOT NULL DEFAULT 0,
    evening_completed INTEGER NOT NULL DEFAULT 0,
    created_at        TEXT NOT NULL,
    UNIQUE (user_id, date)
);

-- Unlocked once per (user, milestone name); never mutated.
CREATE TABLE IF NOT EXISTS achievements (
    achievement_id TEXT PRIMARY KEY,
    user_id        TEXT NOT NULL,
    name           TEXT NOT NULL,
    description    TEXT NOT NULL,
    icon           TEXT NOT NULL,     -- 'check' | 'star' | 'award' | 'trophy'
    created_at     TEXT NOT NULL,
    UNIQUE (user_id, name)
);

-- Chat history is strictly append-only.
CREATE TABLE IF NOT EXISTS chat_history (
    chat_id    TEXT PRIMARY KEY,
    user_id    TEXT NOT NULL,
    message    TEXT NOT NULL,
    response   TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS recommended_products (
    product_id  TEXT PRIMARY KEY,
    user_id     TEXT NOT NULL,
    chat_id     TEXT REFERENCES chat_history(chat_id),
    name        TEXT NOT NULL,
    description TEXT,
    link        TEXT,
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS skin_scans (
    scan_id        TEXT PRIMARY KEY,
    user_id        TEXT NOT NULL,
    skin_type      TEXT,
    skin_tone      TEXT,
    skin_issues    TEXT,
    sun_damage     TEXT,
    unique_feature TEXT,
    disease        TEXT,
    disease_change INTEGER NOT NULL DEFAULT 0,
    scan_image     TEXT,
    created_at     TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS routine_logs_user_idx ON routine_logs(user_id);
CREATE INDEX IF NOT EXISTS achievements_user_idx ON achievements(user_id);
CREATE INDEX IF NOT EXISTS chat_history_user_idx ON chat_history(user_id);
CREATE INDEX IF NOT EXISTS products_user_idx     ON recommended_products(user_id);
CREATE INDEX IF NOT EXISTS skin_scans_user_idx   ON skin_scans(user_id);

PRAGMA user_version = 1;
";
