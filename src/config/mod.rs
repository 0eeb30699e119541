use anyhow::{Context, Result};
use fs_err as fs;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variables consulted for the credential, in order.
pub const API_KEY_VARS: &[&str] = &["WORKOUT_AI_API_KEY", "OPENAI_API_KEY"];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub model: String,
    pub api_base: String,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: Option<u64>,
    pub database_path: String,
    /// Number of recent history entries the session keeps loaded.
    pub history_limit: usize,
    pub transcript_dir: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: "gpt-4o".into(),
            api_base: "https://api.openai.com".into(),
            api_key: None,
            temperature: 0.7,
            max_tokens: 1000,
            timeout_secs: None,
            database_path: "workout.sqlite3".into(),
            history_limit: 20,
            transcript_dir: None,
        }
    }
}

impl Config {
    /// Read an optional TOML file, then pick up the credential from the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut cfg = match path {
            Some(p) => {
                let s = fs::read_to_string(p)?;
                toml::from_str::<Config>(&s).with_context(|| format!("parsing {}", p.display()))?
            }
            None => Config::default(),
        };
        if cfg.api_key.is_none() {
            cfg.api_key = api_key_from(|name| std::env::var(name).ok());
        }
        Ok(cfg)
    }
}

fn api_key_from(lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
    API_KEY_VARS
        .iter()
        .filter_map(|name| lookup(name))
        .find(|v| !v.trim().is_empty())
}
