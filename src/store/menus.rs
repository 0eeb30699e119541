// Menu collection operations

use chrono::{DateTime, Utc};
use rusqlite::types::{Type, Value};
use rusqlite::{params, params_from_iter, OptionalExtension, Row};

use super::{json_from_sql, json_to_sql, ts_from_sql, ts_to_sql, Store};
use crate::errors::Result;
use crate::model::{Level, WorkoutMenu};

const MENU_COLUMNS: &str =
    "id, name, target_muscle, level, duration, equipment, exercises, created_at, executed_at, is_executed";

/// Partial menu update. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct MenuUpdate {
    pub name: Option<String>,
    /// `Some(None)` clears the execution time.
    pub executed_at: Option<Option<DateTime<Utc>>>,
    pub is_executed: Option<bool>,
}

impl MenuUpdate {
    /// Sets the flag and the timestamp together.
    pub fn executed(at: DateTime<Utc>) -> Self {
        Self { executed_at: Some(Some(at)), is_executed: Some(true), ..Self::default() }
    }

    fn is_empty(&self) -> bool {
        self.name.is_none() && self.executed_at.is_none() && self.is_executed.is_none()
    }
}

fn menu_from_row(row: &Row) -> rusqlite::Result<WorkoutMenu> {
    let level: String = row.get(3)?;
    let equipment: String = row.get(5)?;
    let exercises: String = row.get(6)?;
    let created_at: String = row.get(7)?;
    let executed_at: Option<String> = row.get(8)?;

    Ok(WorkoutMenu {
        id: row.get(0)?,
        name: row.get(1)?,
        target_muscle: row.get(2)?,
        level: level
            .parse::<Level>()
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))?,
        duration: row.get(4)?,
        equipment: json_from_sql(5, &equipment)?,
        exercises: json_from_sql(6, &exercises)?,
        created_at: ts_from_sql(7, &created_at)?,
        executed_at: executed_at.map(|s| ts_from_sql(8, &s)).transpose()?,
        is_executed: row.get::<_, i32>(9)? != 0,
    })
}

impl Store {
    /// Insert a new menu and return its id. Fails if the id already exists.
    pub fn add_menu(&self, menu: &WorkoutMenu) -> Result<String> {
        let equipment = json_to_sql(&menu.equipment)?;
        let exercises = json_to_sql(&menu.exercises)?;
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO workout_menus (
                id, name, target_muscle, level, duration, equipment, exercises,
                created_at, executed_at, is_executed
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                menu.id,
                menu.name,
                menu.target_muscle,
                menu.level.as_str(),
                menu.duration,
                equipment,
                exercises,
                ts_to_sql(&menu.created_at),
                menu.executed_at.as_ref().map(ts_to_sql),
                menu.is_executed as i32,
            ],
        )?;
        Ok(menu.id.clone())
    }

    pub fn get_menu(&self, id: &str) -> Result<Option<WorkoutMenu>> {
        let conn = self.conn.lock();
        let menu = conn
            .query_row(
                &format!("SELECT {MENU_COLUMNS} FROM workout_menus WHERE id = ?1"),
                params![id],
                menu_from_row,
            )
            .optional()?;
        Ok(menu)
    }

    /// All menus, oldest first.
    pub fn all_menus(&self) -> Result<Vec<WorkoutMenu>> {
        self.query_menus("ORDER BY created_at ASC", Vec::new())
    }

    pub fn menus_by_target_muscle(&self, target_muscle: &str) -> Result<Vec<WorkoutMenu>> {
        self.query_menus(
            "WHERE target_muscle = ?1 ORDER BY created_at ASC",
            vec![Value::Text(target_muscle.to_string())],
        )
    }

    pub fn menus_by_executed(&self, executed: bool) -> Result<Vec<WorkoutMenu>> {
        self.query_menus("WHERE is_executed = ?1 ORDER BY created_at ASC", vec![Value::Integer(executed as i64)])
    }

    fn query_menus(&self, tail: &str, args: Vec<Value>) -> Result<Vec<WorkoutMenu>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&format!("SELECT {MENU_COLUMNS} FROM workout_menus {tail}"))?;
        let menus = stmt
            .query_map(params_from_iter(args), menu_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(menus)
    }

    /// Apply a partial update. Returns false when no menu has this id.
    pub fn update_menu(&self, id: &str, update: &MenuUpdate) -> Result<bool> {
        if update.is_empty() {
            return Ok(self.get_menu(id)?.is_some());
        }

        let mut sets = Vec::new();
        let mut args = Vec::new();
        if let Some(name) = &update.name {
            sets.push("name = ?");
            args.push(Value::Text(name.clone()));
        }
        if let Some(executed_at) = &update.executed_at {
            sets.push("executed_at = ?");
            args.push(executed_at.as_ref().map(ts_to_sql).map(Value::Text).unwrap_or(Value::Null));
        }
        if let Some(flag) = update.is_executed {
            sets.push("is_executed = ?");
            args.push(Value::Integer(flag as i64));
        }
        args.push(Value::Text(id.to_string()));

        let conn = self.conn.lock();
        let changed = conn.execute(
            &format!("UPDATE workout_menus SET {} WHERE id = ?", sets.join(", ")),
            params_from_iter(args),
        )?;
        Ok(changed > 0)
    }

    /// Returns false when no menu has this id.
    pub fn delete_menu(&self, id: &str) -> Result<bool> {
        let conn = self.conn.lock();
        let changed = conn.execute("DELETE FROM workout_menus WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }
}
