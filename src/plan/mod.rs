use chrono::Utc;

use crate::errors::{Result, WorkoutError};
use crate::ids::IdSource;
use crate::model::{Exercise, UserPreferences, WorkoutMenu};
use crate::wire::MenuPayload;

pub mod fallback;

/// Greedy `{ ... }` slice: from the first `{` to the last `}`.
///
/// Returns None when there is no `{` or no `}` after it.
pub fn extract_json_object(s: &str) -> Option<&str> {
    let start = s.find('{')?;
    let end = s.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&s[start..=end])
}

/// Turn raw model output into a menu for `prefs`.
///
/// Exercise fields are copied as given. The only checks are structural:
/// the menu needs a name and at least one exercise, and every exercise
/// needs at least one set. A difficulty outside easy/medium/hard is kept.
pub fn parse_menu(raw: &str, prefs: &UserPreferences, ids: &dyn IdSource) -> Result<WorkoutMenu> {
    let json = extract_json_object(raw)
        .ok_or_else(|| WorkoutError::Parse("no JSON object found in response".into()))?;

    let payload: MenuPayload = serde_json::from_str(json)
        .map_err(|e| WorkoutError::Parse(format!("malformed menu JSON: {e}")))?;

    if payload.name.trim().is_empty() {
        return Err(WorkoutError::Parse("menu has no name".into()));
    }
    if payload.exercises.is_empty() {
        return Err(WorkoutError::Parse("menu has no exercises".into()));
    }
    if let Some(ex) = payload.exercises.iter().find(|e| e.sets == 0) {
        return Err(WorkoutError::Parse(format!("exercise '{}' has zero sets", ex.name)));
    }

    let seq = ids.next_seq();
    let exercises = payload
        .exercises
        .into_iter()
        .enumerate()
        .map(|(index, ex)| {
            if !ex.difficulty.is_known() {
                log::warn!("passing through unknown difficulty '{}' for {}", ex.difficulty.as_str(), ex.name);
            }
            Exercise {
                id: ids.exercise_id(&seq, index),
                name: ex.name,
                sets: ex.sets,
                reps: ex.reps,
                rest_time: ex.rest_time,
                difficulty: ex.difficulty,
                description: ex.description,
                muscle_groups: ex.muscle_groups,
                equipment: ex.equipment,
            }
        })
        .collect();

    Ok(WorkoutMenu {
        id: ids.menu_id(&seq),
        name: payload.name,
        target_muscle: prefs.target_muscle.clone(),
        level: prefs.level,
        duration: prefs.available_time,
        equipment: prefs.equipment.clone(),
        exercises,
        created_at: Utc::now(),
        executed_at: None,
        is_executed: false,
    })
}
