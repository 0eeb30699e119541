use chrono::Utc;

use crate::model::{Difficulty, Exercise, UserPreferences, WorkoutMenu};

/// Identifier of every fallback menu. Fallback menus are fixed content, so the
/// id is fixed too.
pub const FALLBACK_MENU_ID: &str = "fallback-menu";

fn exercise(
    id: &str,
    name: &str,
    reps: &str,
    rest_time: u32,
    difficulty: Difficulty,
    description: &str,
    muscle_groups: &[&str],
) -> Exercise {
    Exercise {
        id: id.into(),
        name: name.into(),
        sets: 3,
        reps: reps.into(),
        rest_time,
        difficulty,
        description: description.into(),
        muscle_groups: muscle_groups.iter().map(|s| s.to_string()).collect(),
        equipment: vec!["なし".into()],
    }
}

pub fn fallback_exercises() -> Vec<Exercise> {
    vec![
        exercise(
            "fallback-1",
            "プッシュアップ",
            "10-15",
            60,
            Difficulty::Medium,
            "腕立て伏せで胸と腕を鍛えます。手の幅を肩幅より少し広くして、体を一直線に保ちます。",
            &["胸", "腕"],
        ),
        exercise(
            "fallback-2",
            "スクワット",
            "15-20",
            60,
            Difficulty::Easy,
            "基本的なスクワットで脚を鍛えます。足を肩幅に開き、お尻を下げるように腰を落とします。",
            &["脚"],
        ),
        exercise(
            "fallback-3",
            "プランク",
            "30秒",
            30,
            Difficulty::Easy,
            "体幹を鍛えるプランク。肘を床につき、体を一直線に保ちます。",
            &["腹筋"],
        ),
    ]
}

/// Bodyweight menu used whenever generation fails. Depends only on `prefs`
/// and the current time.
pub fn fallback_menu(prefs: &UserPreferences) -> WorkoutMenu {
    WorkoutMenu {
        id: FALLBACK_MENU_ID.into(),
        name: format!("{}基本メニュー", prefs.target_muscle),
        target_muscle: prefs.target_muscle.clone(),
        level: prefs.level,
        duration: prefs.available_time,
        equipment: prefs.equipment.clone(),
        exercises: fallback_exercises(),
        created_at: Utc::now(),
        executed_at: None,
        is_executed: false,
    }
}
