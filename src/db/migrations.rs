//! Database migrations
//!
//! Schema creation and migration logic.

use rusqlite::Connection;

use super::connection::DbResult;

/// Current schema version
const SCHEMA_VERSION: i32 = 1;

/// Run all migrations to bring the database up to the current schema version
pub fn run_migrations(conn: &Connection) -> DbResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    let current_version = get_schema_version(conn)?;

    if current_version < 1 {
        migrate_v1(conn)?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (1)", [])?;
        tracing::info!(version = 1, "applied schema migration");
    }

    Ok(())
}

/// Migration v1: profiles and saved plans
fn migrate_v1(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        -- ============================================
        -- USER PROFILES
        -- Biometric inputs keyed by a six-digit code
        -- ============================================
        CREATE TABLE user_profiles (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_code TEXT NOT NULL UNIQUE CHECK(length(user_code) = 6),
            age INTEGER NOT NULL CHECK(age > 0),
            sex TEXT NOT NULL CHECK(sex IN ('male', 'female')),

            -- imperial: height_feet + height_inches; metric: height_cm
            height_system TEXT NOT NULL CHECK(height_system IN ('imperial', 'metric')),
            height_feet INTEGER,
            height_inches REAL,
            height_cm REAL,

            weight REAL NOT NULL CHECK(weight > 0),
            weight_unit TEXT NOT NULL CHECK(weight_unit IN ('lb', 'kg')),
            activity_level REAL NOT NULL,

            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- ============================================
        -- SAVED MEAL PLANS
        -- Snapshot of a generated plan
        -- ============================================
        CREATE TABLE saved_meal_plans (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_code TEXT NOT NULL REFERENCES user_profiles(user_code) ON DELETE CASCADE,
            goal TEXT NOT NULL,
            budget REAL NOT NULL,
            tdee INTEGER NOT NULL,
            target_calories INTEGER NOT NULL,
            reference_date TEXT NOT NULL,        -- ISO date: "2026-10-20"
            meals TEXT NOT NULL,                 -- JSON array of {type, name, time, items, ...}
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_saved_meal_plans_user ON saved_meal_plans(user_code);
        "#,
    )?;

    Ok(())
}

/// Get the current schema version; 0 before the migrations table exists
pub fn get_schema_version(conn: &Connection) -> DbResult<i32> {
    let has_table: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'schema_migrations')",
        [],
        |row| row.get(0),
    )?;
    if !has_table {
        return Ok(0);
    }

    let version: i32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}

/// Check if the database needs migration
pub fn needs_migration(conn: &Connection) -> DbResult<bool> {
    let current = get_schema_version(conn)?;
    Ok(current < SCHEMA_VERSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        assert!(needs_migration(&conn).unwrap());

        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), SCHEMA_VERSION);
        assert!(!needs_migration(&conn).unwrap());
    }

    #[test]
    fn test_unreadable_version_table_is_an_error() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute("CREATE TABLE schema_migrations (applied_at TEXT)", [])
            .unwrap();

        assert!(get_schema_version(&conn).is_err());
        assert!(run_migrations(&conn).is_err());

        let user_profiles: bool = conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE name = 'user_profiles')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert!(!user_profiles);
    }
}
