use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::{Result, WorkoutError};

pub const TARGET_MUSCLES: &[&str] = &["胸", "背中", "腕", "脚", "腹筋", "肩", "全身"];

pub const LEVELS: &[Level] = &[Level::Beginner, Level::Intermediate, Level::Advanced];

/// Session lengths offered to the user, in minutes.
pub const DURATIONS: &[u32] = &[15, 30, 45, 60, 90];

pub const EQUIPMENT: &[&str] = &["なし", "ダンベル", "バーベル", "ケトルベル", "チューブ", "懸垂バー", "ベンチ"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Beginner,
    Intermediate,
    Advanced,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Beginner => "beginner",
            Level::Intermediate => "intermediate",
            Level::Advanced => "advanced",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Level::Beginner => "初心者",
            Level::Intermediate => "中級者",
            Level::Advanced => "上級者",
        }
    }

    /// Recommended number of sets per exercise.
    pub fn set_range(&self) -> &'static str {
        match self {
            Level::Beginner => "2-3",
            Level::Intermediate => "3-4",
            Level::Advanced => "4-5",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Level {
    type Err = WorkoutError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "beginner" => Ok(Level::Beginner),
            "intermediate" => Ok(Level::Intermediate),
            "advanced" => Ok(Level::Advanced),
            other => Err(WorkoutError::InvalidPreferences(format!("unknown level: {other}"))),
        }
    }
}

/// Exercise difficulty as reported by the model.
///
/// Values outside easy/medium/hard are kept verbatim in `Other` instead of
/// being rejected, so a slightly off-schema response still yields a menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Other(String),
}

impl Difficulty {
    pub fn as_str(&self) -> &str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Other(s) => s,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Difficulty::Other(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "初級",
            Difficulty::Medium => "中級",
            Difficulty::Hard => "上級",
            Difficulty::Other(_) => "不明",
        }
    }
}

impl From<String> for Difficulty {
    fn from(s: String) -> Self {
        match s.as_str() {
            "easy" => Difficulty::Easy,
            "medium" => Difficulty::Medium,
            "hard" => Difficulty::Hard,
            _ => Difficulty::Other(s),
        }
    }
}

impl From<Difficulty> for String {
    fn from(d: Difficulty) -> Self {
        match d {
            Difficulty::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub id: String,
    pub name: String,
    pub sets: u32,
    /// Free-form repetition descriptor, e.g. "8-12" or "30秒".
    pub reps: String,
    /// Rest between sets, in seconds.
    pub rest_time: u32,
    pub difficulty: Difficulty,
    pub description: String,
    pub muscle_groups: Vec<String>,
    pub equipment: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutMenu {
    pub id: String,
    pub name: String,
    pub target_muscle: String,
    pub level: Level,
    /// Planned length in minutes; always the preference's available time.
    pub duration: u32,
    pub equipment: Vec<String>,
    pub exercises: Vec<Exercise>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_executed: bool,
}

impl WorkoutMenu {
    pub fn total_sets(&self) -> u32 {
        self.exercises.iter().map(|e| e.sets).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutHistory {
    pub id: String,
    /// Back-reference to the menu that was performed. Not checked for existence.
    pub menu_id: String,
    pub executed_at: DateTime<Utc>,
    /// Actual minutes spent.
    pub duration: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
}

impl WorkoutHistory {
    pub fn validate(&self) -> Result<()> {
        if let Some(r) = self.rating {
            if !(1..=5).contains(&r) {
                return Err(WorkoutError::InvalidHistory(format!("rating must be 1-5, got {r}")));
            }
        }
        if self.duration == 0 {
            return Err(WorkoutError::InvalidHistory("duration must be positive".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    pub target_muscle: String,
    pub level: Level,
    /// Minutes available for the session.
    pub available_time: u32,
    pub equipment: Vec<String>,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            target_muscle: "胸".into(),
            level: Level::Beginner,
            available_time: 30,
            equipment: vec!["なし".into()],
        }
    }
}

impl UserPreferences {
    /// Check every field against the option catalogues.
    pub fn validate(&self) -> Result<()> {
        if !TARGET_MUSCLES.contains(&self.target_muscle.as_str()) {
            return Err(WorkoutError::InvalidPreferences(format!(
                "unknown target muscle: {}",
                self.target_muscle
            )));
        }
        if !DURATIONS.contains(&self.available_time) {
            return Err(WorkoutError::InvalidPreferences(format!(
                "available time must be one of {:?}, got {}",
                DURATIONS, self.available_time
            )));
        }
        if let Some(unknown) = self.equipment.iter().find(|e| !EQUIPMENT.contains(&e.as_str())) {
            return Err(WorkoutError::InvalidPreferences(format!("unknown equipment: {unknown}")));
        }
        Ok(())
    }

    /// Add the item if missing, remove it if present. Order of the rest is kept.
    pub fn toggle_equipment(&mut self, item: &str) {
        if let Some(pos) = self.equipment.iter().position(|e| e == item) {
            self.equipment.remove(pos);
        } else {
            self.equipment.push(item.to_string());
        }
    }

    /// Drop repeated equipment entries, keeping the first occurrence.
    pub fn dedup_equipment(&mut self) {
        let mut seen = Vec::with_capacity(self.equipment.len());
        self.equipment.retain(|e| {
            if seen.contains(e) {
                false
            } else {
                seen.push(e.clone());
                true
            }
        });
    }
}
