// SQLite record store for menus and history

pub mod history;
pub mod menus;

pub use menus::MenuUpdate;

use chrono::{DateTime, SecondsFormat, Utc};
use parking_lot::Mutex;
use rusqlite::types::Type;
use rusqlite::{params, Connection};
use std::path::Path;

use crate::errors::{Result, WorkoutError};

const SCHEMA_VERSION: i32 = 1;

/// Keyed collections for menus and history on one SQLite connection.
///
/// Writes are plain single statements; there is no transaction spanning
/// several operations.
pub struct Store {
    conn: Mutex<Connection>,
}

impl Store {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let store = Self { conn: Mutex::new(Connection::open(path)?) };
        store.init()?;
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self> {
        let store = Self { conn: Mutex::new(Connection::open_in_memory()?) };
        store.init()?;
        Ok(store)
    }

    fn init(&self) -> Result<()> {
        let conn = self.conn.lock();
        conn.execute(
            "CREATE TABLE IF NOT EXISTS schema_metadata (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
            [],
        )?;

        let version: Option<String> = conn
            .query_row("SELECT value FROM schema_metadata WHERE key = 'version'", [], |row| row.get(0))
            .ok();
        let version: i32 = version.and_then(|v| v.parse().ok()).unwrap_or(0);

        if version > SCHEMA_VERSION {
            return Err(WorkoutError::Persistence(rusqlite::Error::InvalidParameterName(format!(
                "database schema version {version} is newer than supported version {SCHEMA_VERSION}"
            ))));
        }
        if version == SCHEMA_VERSION {
            return Ok(());
        }

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS workout_menus (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                target_muscle TEXT NOT NULL,
                level TEXT NOT NULL,
                duration INTEGER NOT NULL,
                equipment TEXT NOT NULL,
                exercises TEXT NOT NULL,
                created_at TEXT NOT NULL,
                executed_at TEXT,
                is_executed INTEGER NOT NULL DEFAULT 0
            );
            CREATE INDEX IF NOT EXISTS idx_menus_target_muscle ON workout_menus(target_muscle);
            CREATE INDEX IF NOT EXISTS idx_menus_created_at ON workout_menus(created_at);
            CREATE INDEX IF NOT EXISTS idx_menus_is_executed ON workout_menus(is_executed);

            CREATE TABLE IF NOT EXISTS workout_history (
                id TEXT PRIMARY KEY,
                menu_id TEXT NOT NULL,
                executed_at TEXT NOT NULL,
                duration INTEGER NOT NULL,
                notes TEXT,
                rating INTEGER
            );
            CREATE INDEX IF NOT EXISTS idx_history_menu_id ON workout_history(menu_id);
            CREATE INDEX IF NOT EXISTS idx_history_executed_at ON workout_history(executed_at);",
        )?;
        conn.execute(
            "INSERT OR REPLACE INTO schema_metadata (key, value) VALUES ('version', ?1)",
            params![SCHEMA_VERSION.to_string()],
        )?;
        log::info!("initialised workout store schema v{}", SCHEMA_VERSION);
        Ok(())
    }

    /// Remove every menu and history entry.
    pub fn clear(&self) -> Result<()> {
        let conn = self.conn.lock();
        conn.execute("DELETE FROM workout_menus", [])?;
        conn.execute("DELETE FROM workout_history", [])?;
        Ok(())
    }
}

/// Fixed-width UTC text so string order matches time order.
pub(crate) fn ts_to_sql(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

pub(crate) fn ts_from_sql(idx: usize, s: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

pub(crate) fn json_to_sql<T: serde::Serialize>(value: &T) -> rusqlite::Result<String> {
    serde_json::to_string(value).map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
}

pub(crate) fn json_from_sql<T: serde::de::DeserializeOwned>(idx: usize, s: &str) -> rusqlite::Result<T> {
    serde_json::from_str(s).map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}
