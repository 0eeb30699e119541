// History collection operations

use chrono::{DateTime, Utc};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

use super::{ts_from_sql, ts_to_sql, Store};
use crate::errors::Result;
use crate::model::WorkoutHistory;

const HISTORY_COLUMNS: &str = "id, menu_id, executed_at, duration, notes, rating";

fn history_from_row(row: &Row) -> rusqlite::Result<WorkoutHistory> {
    let executed_at: String = row.get(2)?;
    Ok(WorkoutHistory {
        id: row.get(0)?,
        menu_id: row.get(1)?,
        executed_at: ts_from_sql(2, &executed_at)?,
        duration: row.get(3)?,
        notes: row.get(4)?,
        rating: row.get(5)?,
    })
}

fn insert_history(conn: &Connection, entry: &WorkoutHistory) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO workout_history (id, menu_id, executed_at, duration, notes, rating)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            entry.id,
            entry.menu_id,
            ts_to_sql(&entry.executed_at),
            entry.duration,
            entry.notes,
            entry.rating,
        ],
    )?;
    Ok(())
}

impl Store {
    /// Append a history entry. The referenced menu is not required to exist.
    pub fn add_history(&self, entry: &WorkoutHistory) -> Result<String> {
        entry.validate()?;
        let conn = self.conn.lock();
        insert_history(&conn, entry)?;
        Ok(entry.id.clone())
    }

    /// Mark `menu_id` executed at `at` and append `entry` in one transaction.
    ///
    /// Returns whether a stored menu was marked; the entry is written either
    /// way. On error neither table changes.
    pub fn record_completion(&self, menu_id: &str, at: &DateTime<Utc>, entry: &WorkoutHistory) -> Result<bool> {
        entry.validate()?;
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        let marked = tx.execute(
            "UPDATE workout_menus SET executed_at = ?1, is_executed = 1 WHERE id = ?2",
            params![ts_to_sql(at), menu_id],
        )?;
        insert_history(&tx, entry)?;
        tx.commit()?;
        Ok(marked > 0)
    }

    pub fn get_history(&self, id: &str) -> Result<Option<WorkoutHistory>> {
        let conn = self.conn.lock();
        let entry = conn
            .query_row(
                &format!("SELECT {HISTORY_COLUMNS} FROM workout_history WHERE id = ?1"),
                params![id],
                history_from_row,
            )
            .optional()?;
        Ok(entry)
    }

    /// All entries, oldest first.
    pub fn all_history(&self) -> Result<Vec<WorkoutHistory>> {
        self.query_history("ORDER BY executed_at ASC", Vec::new())
    }

    pub fn history_for_menu(&self, menu_id: &str) -> Result<Vec<WorkoutHistory>> {
        self.query_history("WHERE menu_id = ?1 ORDER BY executed_at ASC", vec![Value::Text(menu_id.to_string())])
    }

    /// The `limit` most recent entries, newest first.
    pub fn recent_history(&self, limit: usize) -> Result<Vec<WorkoutHistory>> {
        self.query_history("ORDER BY executed_at DESC LIMIT ?1", vec![Value::Integer(limit as i64)])
    }

    fn query_history(&self, tail: &str, args: Vec<Value>) -> Result<Vec<WorkoutHistory>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&format!("SELECT {HISTORY_COLUMNS} FROM workout_history {tail}"))?;
        let entries = stmt
            .query_map(params_from_iter(args), history_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(entries)
    }

    /// Returns false when no entry has this id.
    pub fn delete_history(&self, id: &str) -> Result<bool> {
        let conn = self.conn.lock();
        let changed = conn.execute("DELETE FROM workout_history WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }
}
