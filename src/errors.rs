use thiserror::Error;

#[derive(Error, Debug)]
pub enum WorkoutError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("transport error{}: {message}", status_suffix(.status))]
    Transport { status: Option<u16>, message: String },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("persistence error: {0}")]
    Persistence(#[from] rusqlite::Error),

    #[error("invalid preferences: {0}")]
    InvalidPreferences(String),

    #[error("invalid history entry: {0}")]
    InvalidHistory(String),
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" ({s})")).unwrap_or_default()
}

impl WorkoutError {
    /// True for the failures the generation pipeline converts into a fallback menu.
    pub fn is_generation_failure(&self) -> bool {
        matches!(
            self,
            WorkoutError::Configuration(_) | WorkoutError::Transport { .. } | WorkoutError::Parse(_)
        )
    }
}

impl From<reqwest::Error> for WorkoutError {
    fn from(e: reqwest::Error) -> Self {
        WorkoutError::Transport {
            status: e.status().map(|s| s.as_u16()),
            message: e.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, WorkoutError>;
