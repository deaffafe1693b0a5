//! Database schema migrations for dayplan.
//!
//! Migrations are versioned and applied automatically when opening the
//! database. The `schema_version` table tracks the current migration
//! version.

use rusqlite::{Connection, Result as SqliteResult};

/// Apply all pending migrations to bring the database to the current
/// schema version.
///
/// # Errors
/// Returns an error if migration fails.
pub fn migrate(conn: &Connection) -> SqliteResult<()> {
    create_schema_version_table(conn)?;

    let current_version = get_schema_version(conn);

    if current_version < 1 {
        migrate_v1(conn)?;
    }

    Ok(())
}

/// Create the schema_version table if it doesn't exist.
fn create_schema_version_table(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        );",
    )
}

/// Get the current schema version from the database.
///
/// Returns 0 if no version is set (initial database).
fn get_schema_version(conn: &Connection) -> i32 {
    conn.query_row("SELECT version FROM schema_version", [], |row| {
        row.get::<_, i32>(0)
    })
    .unwrap_or(0)
}

/// Set the schema version in the database.
fn set_schema_version(conn: &Connection, version: i32) -> SqliteResult<()> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])?;
    Ok(())
}

/// Migration v1: initial schema.
///
/// Creates the day-structure profile tables, the task backlog, and the
/// plan tables.
fn migrate_v1(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schedule_profiles (
            user_id             TEXT PRIMARY KEY,
            wake_time           TEXT NOT NULL,
            sleep_time          TEXT NOT NULL,
            minimum_rest_minutes INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS weekly_schedule (
            user_id             TEXT NOT NULL,
            day_of_week         INTEGER NOT NULL,
            work_start_time     TEXT,
            work_end_time       TEXT,
            commute_minutes     INTEGER NOT NULL DEFAULT 0,
            midday_rest_minutes INTEGER NOT NULL DEFAULT 0,
            PRIMARY KEY (user_id, day_of_week)
        );

        CREATE TABLE IF NOT EXISTS nutrition_profiles (
            user_id        TEXT PRIMARY KEY,
            eating_pattern TEXT NOT NULL DEFAULT 'NORMAL',
            breakfast_time TEXT,
            lunch_time     TEXT,
            dinner_time    TEXT,
            suhoor_time    TEXT,
            iftar_time     TEXT
        );

        CREATE TABLE IF NOT EXISTS daily_modes (
            user_id        TEXT NOT NULL,
            date           TEXT NOT NULL,
            mode           TEXT NOT NULL,
            auto_generated INTEGER NOT NULL DEFAULT 0,
            PRIMARY KEY (user_id, date)
        );

        CREATE TABLE IF NOT EXISTS tasks (
            id                TEXT PRIMARY KEY,
            user_id           TEXT NOT NULL,
            content           TEXT NOT NULL,
            status            TEXT NOT NULL DEFAULT 'INBOX',
            importance        INTEGER NOT NULL DEFAULT 3,
            urgency           INTEGER NOT NULL DEFAULT 3,
            estimated_minutes INTEGER,
            deferred_count    INTEGER NOT NULL DEFAULT 0,
            last_deferred_at  TEXT,
            forced_priority   INTEGER NOT NULL DEFAULT 0,
            created_at        TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS daily_plans (
            id                TEXT PRIMARY KEY,
            user_id           TEXT NOT NULL,
            date              TEXT NOT NULL,
            status            TEXT NOT NULL DEFAULT 'GENERATED',
            strategic_summary TEXT,
            created_at        TEXT NOT NULL,
            UNIQUE (user_id, date)
        );

        CREATE TABLE IF NOT EXISTS plan_items (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id       TEXT NOT NULL,
            daily_plan_id TEXT NOT NULL,
            start_time    TEXT NOT NULL,
            end_time      TEXT NOT NULL,
            item_type     TEXT NOT NULL,
            task_id       TEXT,
            label         TEXT,
            status        TEXT NOT NULL DEFAULT 'PENDING'
        );

        CREATE INDEX IF NOT EXISTS idx_tasks_user_status ON tasks(user_id, status);
        CREATE INDEX IF NOT EXISTS idx_plan_items_plan ON plan_items(daily_plan_id);",
    )?;

    set_schema_version(conn, 1)?;
    Ok(())
}
