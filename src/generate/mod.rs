use std::path::PathBuf;
use std::sync::Arc;

use crate::errors::Result;
use crate::ids::{IdSource, RandomIds};
use crate::model::{UserPreferences, WorkoutHistory, WorkoutMenu};
use crate::plan::{self, fallback};
use crate::prompt;
use crate::provider::DynProvider;
use crate::transcript;

/// Where a returned menu came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Provenance {
    Remote,
    /// Generation failed; `reason` is the swallowed error.
    Fallback { reason: String },
}

#[derive(Debug, Clone)]
pub struct GeneratedMenu {
    pub menu: WorkoutMenu,
    pub provenance: Provenance,
}

impl GeneratedMenu {
    pub fn is_fallback(&self) -> bool {
        matches!(self.provenance, Provenance::Fallback { .. })
    }
}

/// Prompt -> remote call -> parse, with the static menu substituted on any failure.
///
/// Neither entry point returns an error: callers always get a usable menu and
/// learn about degradation through [`Provenance`].
pub struct MenuGenerator {
    provider: DynProvider,
    ids: Arc<dyn IdSource>,
    transcript_dir: Option<PathBuf>,
}

impl MenuGenerator {
    pub fn new(provider: DynProvider) -> Self {
        Self { provider, ids: Arc::new(RandomIds::default()), transcript_dir: None }
    }

    pub fn with_ids(mut self, ids: Arc<dyn IdSource>) -> Self {
        self.ids = ids;
        self
    }

    pub fn with_transcripts(mut self, dir: Option<PathBuf>) -> Self {
        self.transcript_dir = dir;
        self
    }

    pub fn ids(&self) -> Arc<dyn IdSource> {
        Arc::clone(&self.ids)
    }

    pub async fn generate(&self, prefs: &UserPreferences) -> GeneratedMenu {
        let prompt = prompt::menu_prompt(prefs);
        self.run(&prompt, prefs).await
    }

    /// `history` is expected oldest first; only its last entries reach the prompt.
    pub async fn generate_from_history(&self, prefs: &UserPreferences, history: &[WorkoutHistory]) -> GeneratedMenu {
        let prompt = prompt::history_prompt(prefs, history);
        self.run(&prompt, prefs).await
    }

    async fn run(&self, prompt: &str, prefs: &UserPreferences) -> GeneratedMenu {
        match self.remote(prompt, prefs).await {
            Ok(menu) => {
                log::info!("generated menu {} with {} exercises via {}", menu.id, menu.exercises.len(), self.provider.model_name());
                GeneratedMenu { menu, provenance: Provenance::Remote }
            }
            Err(e) => {
                log::warn!("menu generation failed, using fallback: {e}");
                let mut menu = fallback::fallback_menu(prefs);
                // Stored menus need distinct keys; the fixed content stays as is.
                menu.id = format!("fallback-{}", self.ids.next_seq());
                GeneratedMenu { menu, provenance: Provenance::Fallback { reason: e.to_string() } }
            }
        }
    }

    async fn remote(&self, prompt: &str, prefs: &UserPreferences) -> Result<WorkoutMenu> {
        let attempt = format!("attempt-{}", self.ids.next_seq());
        let reply = self.provider.generate(prompt).await;
        transcript::save_best_effort(self.transcript_dir.as_deref(), &attempt, prompt, reply.as_deref().ok());
        plan::parse_menu(&reply?, prefs, self.ids.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::WorkoutError;
    use crate::ids::SequentialIds;
    use crate::model::{Level, DURATIONS, LEVELS, TARGET_MUSCLES};
    use crate::provider::fake::ScriptedProvider;
    use chrono::{TimeZone, Utc};

    const REPLY: &str = r#"Here is your plan:
{"name": "脚の日", "exercises": [
  {"name": "ランジ", "sets": 3, "reps": "10", "restTime": 60, "difficulty": "medium",
   "description": "片脚ずつ踏み込む", "muscleGroups": ["脚"], "equipment": ["なし"]}
]}
Good luck!"#;

    fn generator(provider: Arc<ScriptedProvider>) -> MenuGenerator {
        MenuGenerator::new(provider).with_ids(Arc::new(SequentialIds::default()))
    }

    fn chest_beginner() -> UserPreferences {
        UserPreferences {
            target_muscle: "胸".into(),
            level: Level::Beginner,
            available_time: 30,
            equipment: vec![],
        }
    }

    #[tokio::test]
    async fn remote_reply_becomes_the_menu() {
        let provider = Arc::new(ScriptedProvider::replying(REPLY));
        let out = generator(provider.clone()).generate(&chest_beginner()).await;

        assert_eq!(out.provenance, Provenance::Remote);
        assert_eq!(out.menu.name, "脚の日");
        assert_eq!(out.menu.duration, 30);
        assert_eq!(out.menu.exercises[0].name, "ランジ");
        assert!(provider.prompts()[0].contains("鍛えたい部位: 胸"));
    }

    #[tokio::test]
    async fn missing_credential_falls_back_to_basic_menu() {
        let provider = Arc::new(ScriptedProvider::failing(WorkoutError::Configuration("AI API key is not set".into())));
        let out = generator(provider).generate(&chest_beginner()).await;

        assert!(out.is_fallback());
        assert_eq!(out.menu.name, "胸基本メニュー");
        assert_eq!(out.menu.exercises, fallback::fallback_exercises());
        match out.provenance {
            Provenance::Fallback { reason } => assert!(reason.contains("API key")),
            other => panic!("unexpected provenance {other:?}"),
        }
    }

    #[tokio::test]
    async fn unparseable_or_empty_replies_fall_back() {
        for reply in ["I'd rather not.", "", "{ not json }"] {
            let provider = Arc::new(ScriptedProvider::replying(reply));
            let out = generator(provider).generate(&chest_beginner()).await;
            assert!(out.is_fallback(), "reply {reply:?} should fall back");
        }
    }

    #[tokio::test]
    async fn transport_failure_falls_back_in_history_mode() {
        let provider = Arc::new(ScriptedProvider::failing(WorkoutError::Transport {
            status: Some(503),
            message: "unavailable".into(),
        }));
        let out = generator(provider).generate_from_history(&chest_beginner(), &[]).await;
        assert!(out.is_fallback());
        assert_eq!(out.menu.exercises.len(), 3);
    }

    #[tokio::test]
    async fn fallback_menus_get_distinct_ids() {
        let provider = Arc::new(ScriptedProvider::default());
        let gen = generator(provider);
        let a = gen.generate(&chest_beginner()).await;
        let b = gen.generate(&chest_beginner()).await;
        assert!(a.is_fallback() && b.is_fallback());
        assert_ne!(a.menu.id, b.menu.id);
        assert!(a.menu.id.starts_with("fallback-"));
    }

    #[tokio::test]
    async fn history_prompt_sent_with_last_five_entries() {
        let history: Vec<_> = (1..=6)
            .map(|d| WorkoutHistory {
                id: format!("h{d}"),
                menu_id: "m".into(),
                executed_at: Utc.with_ymd_and_hms(2026, 5, d, 18, 30, 0).unwrap(),
                duration: 30,
                notes: None,
                rating: Some(4),
            })
            .collect();
        let provider = Arc::new(ScriptedProvider::replying(REPLY));
        let out = generator(provider.clone()).generate_from_history(&chest_beginner(), &history).await;

        assert_eq!(out.provenance, Provenance::Remote);
        let prompts = provider.prompts();
        let sent = &prompts[0];
        assert!(!sent.contains("2026-05-01"));
        assert!(sent.contains("2026-05-02"));
        assert!(sent.contains("2026-05-06"));
    }

    #[tokio::test]
    async fn every_valid_preference_yields_a_usable_menu() {
        for &muscle in TARGET_MUSCLES {
            for &level in LEVELS {
                for &minutes in DURATIONS {
                    let prefs = UserPreferences {
                        target_muscle: muscle.into(),
                        level,
                        available_time: minutes,
                        equipment: vec!["なし".into()],
                    };
                    let provider = Arc::new(ScriptedProvider::default());
                    provider.push(Ok(REPLY.to_string()));
                    let gen = generator(provider);

                    for out in [gen.generate(&prefs).await, gen.generate(&prefs).await] {
                        assert!(!out.menu.name.is_empty());
                        assert_eq!(out.menu.duration, minutes);
                        assert!(!out.menu.exercises.is_empty());
                        assert_eq!(out.menu.level, level);
                    }
                }
            }
        }
    }

    #[tokio::test]
    async fn transcripts_are_written_when_configured() {
        let dir = tempfile::tempdir().unwrap();
        let provider = Arc::new(ScriptedProvider::replying(REPLY));
        let gen = generator(provider).with_transcripts(Some(dir.path().to_path_buf()));
        gen.generate(&chest_beginner()).await;

        assert!(dir.path().join("attempt-1.prompt.txt").exists());
        let reply = std::fs::read_to_string(dir.path().join("attempt-1.response.txt")).unwrap();
        assert_eq!(reply, REPLY);
    }
}
