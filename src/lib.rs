//! Workout menu planning: builds a prompt from training preferences, asks a
//! chat-completion model for a menu, parses the reply and falls back to a
//! fixed bodyweight menu when anything goes wrong. Menus and completed
//! sessions are kept in a local SQLite file.

pub mod cli;
pub mod config;
pub mod errors;
pub mod generate;
pub mod ids;
pub mod model;
pub mod plan;
pub mod prompt;
pub mod provider;
pub mod session;
pub mod store;
pub mod transcript;
pub mod ux;
pub mod wire;

pub use errors::{Result, WorkoutError};
pub use generate::{GeneratedMenu, MenuGenerator, Provenance};
pub use model::{Difficulty, Exercise, Level, UserPreferences, WorkoutHistory, WorkoutMenu};
