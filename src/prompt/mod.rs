use crate::model::{UserPreferences, WorkoutHistory};

/// How many history entries the history-aware prompt shows.
pub const HISTORY_WINDOW: usize = 5;

pub fn system_prompt() -> &'static str {
    "あなたは筋トレの専門家です。ユーザーの条件に最適な筋トレメニューを提案してください。"
}

fn response_schema() -> &'static str {
r#"以下のJSON形式で出力してください：
{
  "name": "メニュー名",
  "exercises": [
    {
      "name": "種目名",
      "sets": セット数,
      "reps": "回数（例：8-12）",
      "restTime": 休憩時間（秒）,
      "difficulty": "easy|medium|hard",
      "description": "やり方の説明",
      "muscleGroups": ["対象筋群"],
      "equipment": ["使用器具"]
    }
  ]
}"#
}

/// Exercise count bounds for a session of `minutes`: (max(3, m/10), max(6, m/8)).
pub fn exercise_count_range(minutes: u32) -> (u32, u32) {
    ((minutes / 10).max(3), (minutes / 8).max(6))
}

fn conditions(prefs: &UserPreferences) -> String {
    format!(
"鍛えたい部位: {target}
レベル: {level}
時間: {time}分
使用器具: {equipment}",
        target = prefs.target_muscle,
        level = prefs.level,
        time = prefs.available_time,
        equipment = prefs.equipment.join(", "),
    )
}

/// Prompt for a menu built from the current preferences only.
pub fn menu_prompt(prefs: &UserPreferences) -> String {
    let (min, max) = exercise_count_range(prefs.available_time);
    format!(
"
以下の条件で筋トレメニューを生成してください：

{conditions}

{schema}

注意事項：
- 種目数は時間に応じて調整（{time}分なら{min}-{max}種目）
- セット数はレベルに応じて調整（{sets}セット）
- 回数は目標に応じて調整（筋力=5-8回、筋肥大=8-12回、持久力=15-20回）
- 休憩時間は種目・レベルに応じて調整（30秒-3分）
",
        conditions = conditions(prefs),
        schema = response_schema(),
        time = prefs.available_time,
        sets = prefs.level.set_range(),
    )
}

/// One line per entry for the last `HISTORY_WINDOW` entries of `history`.
///
/// `history` is expected oldest first; the tail is the most recent.
pub fn history_summary(history: &[WorkoutHistory]) -> String {
    let start = history.len().saturating_sub(HISTORY_WINDOW);
    history[start..]
        .iter()
        .map(|h| format!("- {}: {}分実行", h.executed_at.format("%Y-%m-%d %H:%M"), h.duration))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Prompt that asks the model to plan the next session from recent history.
pub fn history_prompt(prefs: &UserPreferences, history: &[WorkoutHistory]) -> String {
    let mut recent = history_summary(history);
    if recent.is_empty() {
        recent = "履歴なし".to_string();
    }
    let (min, max) = exercise_count_range(prefs.available_time);

    format!(
"
過去のトレーニング履歴を分析して、次回の最適なメニューを提案してください：

過去の履歴:
{recent}

現在の条件:
{conditions}

前回のトレーニングから考慮すべき点:
- 同じ部位を連続で鍛えすぎないよう配慮
- 負荷の調整
- 種目のバリエーション
- 回復状況
- 継続性

目安：
- 種目数は{min}-{max}種目
- セット数は{sets}セット

{schema}
",
        conditions = conditions(prefs),
        sets = prefs.level.set_range(),
        schema = response_schema(),
    )
}
