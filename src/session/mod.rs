use chrono::Utc;
use std::sync::Arc;

use crate::errors::{Result, WorkoutError};
use crate::generate::{GeneratedMenu, MenuGenerator};
use crate::ids::IdSource;
use crate::model::{UserPreferences, WorkoutHistory};
use crate::store::Store;

/// Interaction state behind the planner front end: the chosen preferences,
/// the menu on screen, recent history and the last user-visible error.
///
/// Store failures never discard a generated menu; they only set `error`.
/// Generation borrows the session mutably, so a second request cannot start
/// while one is in flight.
pub struct WorkoutSession {
    generator: MenuGenerator,
    store: Arc<Store>,
    history_limit: usize,
    preferences: UserPreferences,
    current: Option<GeneratedMenu>,
    /// Newest first.
    history: Vec<WorkoutHistory>,
    error: Option<String>,
}

impl WorkoutSession {
    pub fn new(generator: MenuGenerator, store: Arc<Store>, history_limit: usize) -> Self {
        Self {
            generator,
            store,
            history_limit,
            preferences: UserPreferences::default(),
            current: None,
            history: Vec::new(),
            error: None,
        }
    }

    pub fn preferences(&self) -> &UserPreferences {
        &self.preferences
    }

    pub fn set_preferences(&mut self, mut prefs: UserPreferences) -> Result<()> {
        prefs.dedup_equipment();
        prefs.validate()?;
        self.preferences = prefs;
        Ok(())
    }

    pub fn current(&self) -> Option<&GeneratedMenu> {
        self.current.as_ref()
    }

    pub fn history(&self) -> &[WorkoutHistory] {
        &self.history
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Hand the pending error to the caller once.
    pub fn take_error(&mut self) -> Option<String> {
        self.error.take()
    }

    pub fn load_history(&mut self) {
        match self.store.recent_history(self.history_limit) {
            Ok(h) => self.history = h,
            Err(e) => {
                log::error!("loading history failed: {e}");
                self.error = Some("failed to load workout history".into());
            }
        }
    }

    pub async fn generate_menu(&mut self) -> Option<&GeneratedMenu> {
        self.error = None;
        let out = self.generator.generate(&self.preferences).await;
        self.present(out, "failed to save the generated menu")
    }

    pub async fn generate_from_history(&mut self) -> Option<&GeneratedMenu> {
        self.error = None;
        let chronological: Vec<_> = self.history.iter().rev().cloned().collect();
        let out = self.generator.generate_from_history(&self.preferences, &chronological).await;
        self.present(out, "failed to save the history-based menu")
    }

    fn present(&mut self, out: GeneratedMenu, save_error: &str) -> Option<&GeneratedMenu> {
        if let Err(e) = self.store.add_menu(&out.menu) {
            log::error!("saving menu {} failed: {e}", out.menu.id);
            self.error = Some(save_error.to_string());
        }
        self.current = Some(out);
        self.current.as_ref()
    }

    /// Record the current menu as performed and append a history entry.
    pub fn complete_workout(&mut self, actual_minutes: u32, notes: Option<String>, rating: Option<u8>) -> Result<WorkoutHistory> {
        let menu_id = match &self.current {
            Some(c) => c.menu.id.clone(),
            None => return Err(WorkoutError::InvalidHistory("no menu to complete".into())),
        };
        let now = Utc::now();
        let entry = WorkoutHistory {
            id: self.generator.ids().history_id(),
            menu_id: menu_id.clone(),
            executed_at: now,
            duration: actual_minutes,
            notes: notes.filter(|n| !n.trim().is_empty()),
            rating,
        };
        entry.validate()?;

        match self.store.record_completion(&menu_id, &now, &entry) {
            Ok(true) => {}
            Ok(false) => log::warn!("menu {menu_id} is not in the store; history recorded without marking it"),
            Err(e) => {
                log::error!("recording workout for {menu_id} failed: {e}");
                self.error = Some("failed to record the workout".into());
                return Err(e);
            }
        }

        if let Some(c) = self.current.as_mut() {
            c.menu.is_executed = true;
            c.menu.executed_at = Some(now);
        }
        self.history.insert(0, entry.clone());
        self.history.truncate(self.history_limit);
        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SequentialIds;
    use crate::model::Level;
    use crate::provider::fake::ScriptedProvider;
    use chrono::{Duration, TimeZone};

    const REPLY: &str = r#"{"name": "背中の日", "exercises": [
      {"name": "懸垂", "sets": 4, "reps": "6-8", "restTime": 120, "difficulty": "hard",
       "description": "バーにぶら下がり体を引き上げる", "muscleGroups": ["背中"], "equipment": ["懸垂バー"]}]}"#;

    fn session(provider: Arc<ScriptedProvider>, store: Arc<Store>) -> WorkoutSession {
        let gen = MenuGenerator::new(provider).with_ids(Arc::new(SequentialIds::default()));
        WorkoutSession::new(gen, store, 3)
    }

    fn entry(id: &str, day: u32) -> WorkoutHistory {
        WorkoutHistory {
            id: id.into(),
            menu_id: "old".into(),
            executed_at: Utc.with_ymd_and_hms(2026, 2, day, 6, 0, 0).unwrap(),
            duration: 30,
            notes: None,
            rating: None,
        }
    }

    #[tokio::test]
    async fn generated_menu_is_shown_and_saved() {
        let store = Arc::new(Store::open_in_memory().unwrap());
        let mut s = session(Arc::new(ScriptedProvider::replying(REPLY)), store.clone());

        let id = s.generate_menu().await.unwrap().menu.id.clone();
        assert!(s.error().is_none());
        assert!(!s.current().unwrap().is_fallback());
        assert_eq!(store.get_menu(&id).unwrap().unwrap().name, "背中の日");
    }

    #[tokio::test]
    async fn save_failure_keeps_menu_on_screen() {
        let store = Arc::new(Store::open_in_memory().unwrap());
        let provider = Arc::new(ScriptedProvider::default());
        let mut s = session(provider.clone(), store.clone());

        // Pre-insert a menu with the id the generator is about to hand out.
        let mut taken = crate::plan::fallback::fallback_menu(&UserPreferences::default());
        taken.id = "menu-2".into();
        store.add_menu(&taken).unwrap();
        provider.push(Ok(REPLY.to_string()));

        let menu = s.generate_menu().await.unwrap().menu.clone();
        assert_eq!(menu.id, "menu-2");
        assert_eq!(menu.name, "背中の日");
        assert!(s.error().unwrap().contains("save"));
        assert_eq!(s.current().unwrap().menu.name, "背中の日");
    }

    #[tokio::test]
    async fn history_mode_sends_oldest_first() {
        let store = Arc::new(Store::open_in_memory().unwrap());
        for (id, day) in [("a", 1), ("b", 2), ("c", 3), ("d", 4)] {
            store.add_history(&entry(id, day)).unwrap();
        }
        let provider = Arc::new(ScriptedProvider::replying(REPLY));
        let mut s = session(provider.clone(), store);
        s.load_history();
        assert_eq!(s.history().iter().map(|h| h.id.as_str()).collect::<Vec<_>>(), ["d", "c", "b"]);

        s.generate_from_history().await;
        let prompts = provider.prompts();
        let prompt = &prompts[0];
        let b = prompt.find("2026-02-02").unwrap();
        let d = prompt.find("2026-02-04").unwrap();
        assert!(b < d);
        assert!(!prompt.contains("2026-02-01"));
    }

    #[tokio::test]
    async fn completing_marks_menu_and_records_history() {
        let store = Arc::new(Store::open_in_memory().unwrap());
        let mut s = session(Arc::new(ScriptedProvider::replying(REPLY)), store.clone());
        let id = s.generate_menu().await.unwrap().menu.id.clone();

        let h = s.complete_workout(28, Some("good".into()), Some(5)).unwrap();
        assert_eq!(h.menu_id, id);
        assert_eq!(s.history()[0], h);

        let stored = store.get_menu(&id).unwrap().unwrap();
        assert!(stored.is_executed);
        assert!(stored.executed_at.is_some());
        assert!(s.current().unwrap().menu.is_executed);
        assert_eq!(store.history_for_menu(&id).unwrap(), vec![h]);
    }

    #[tokio::test]
    async fn failed_history_write_leaves_menu_unmarked() {
        let store = Arc::new(Store::open_in_memory().unwrap());
        let mut s = session(Arc::new(ScriptedProvider::replying(REPLY)), store.clone());
        let id = s.generate_menu().await.unwrap().menu.id.clone();
        // Occupy the id the next completion will be given.
        store.add_history(&entry("history-3", 1)).unwrap();

        let res = s.complete_workout(20, None, Some(4));
        assert!(matches!(res, Err(WorkoutError::Persistence(_))));
        assert!(!store.get_menu(&id).unwrap().unwrap().is_executed);
        assert!(!s.current().unwrap().menu.is_executed);
        assert!(store.history_for_menu(&id).unwrap().is_empty());
        assert!(s.history().is_empty());
        assert!(s.error().is_some());
    }

    #[tokio::test]
    async fn completing_an_unsaved_menu_still_records_history() {
        let store = Arc::new(Store::open_in_memory().unwrap());
        let mut s = session(Arc::new(ScriptedProvider::replying(REPLY)), store.clone());
        let id = s.generate_menu().await.unwrap().menu.id.clone();
        store.delete_menu(&id).unwrap();

        let h = s.complete_workout(30, None, None).unwrap();
        assert!(store.get_menu(&id).unwrap().is_none());
        assert_eq!(store.history_for_menu(&id).unwrap(), vec![h]);
        assert!(s.error().is_none());
    }

    #[tokio::test]
    async fn errors_are_handed_out_once() {
        let store = Arc::new(Store::open_in_memory().unwrap());
        let provider = Arc::new(ScriptedProvider::default());
        let mut s = session(provider, store.clone());
        let mut taken = crate::plan::fallback::fallback_menu(&UserPreferences::default());
        taken.id = "fallback-2".into();
        store.add_menu(&taken).unwrap();

        s.generate_menu().await;
        assert!(s.take_error().is_some());
        assert!(s.take_error().is_none());
        assert!(s.error().is_none());
        assert!(s.current().is_some());
    }

    #[tokio::test]
    async fn completing_rejects_bad_rating_and_missing_menu() {
        let store = Arc::new(Store::open_in_memory().unwrap());
        let mut s = session(Arc::new(ScriptedProvider::replying(REPLY)), store.clone());
        assert!(matches!(s.complete_workout(30, None, None), Err(WorkoutError::InvalidHistory(_))));

        let id = s.generate_menu().await.unwrap().menu.id.clone();
        assert!(s.complete_workout(30, None, Some(0)).is_err());
        assert!(!store.get_menu(&id).unwrap().unwrap().is_executed);
        assert!(store.all_history().unwrap().is_empty());
    }

    #[tokio::test]
    async fn history_stays_within_limit() {
        let store = Arc::new(Store::open_in_memory().unwrap());
        let provider = Arc::new(ScriptedProvider::default());
        let mut s = session(provider, store);
        s.generate_menu().await;
        for _ in 0..5 {
            s.complete_workout(20, None, None).unwrap();
        }
        assert_eq!(s.history().len(), 3);
        let newest = s.history()[0].executed_at;
        assert!(s.history().iter().all(|h| h.executed_at <= newest + Duration::seconds(1)));
    }

    #[test]
    fn invalid_preferences_are_refused() {
        let store = Arc::new(Store::open_in_memory().unwrap());
        let mut s = session(Arc::new(ScriptedProvider::default()), store);
        let bad = UserPreferences { available_time: 7, ..UserPreferences::default() };
        assert!(s.set_preferences(bad).is_err());
        assert_eq!(s.preferences().available_time, 30);

        let good = UserPreferences {
            target_muscle: "肩".into(),
            level: Level::Advanced,
            available_time: 45,
            equipment: vec!["ダンベル".into(), "ダンベル".into()],
        };
        s.set_preferences(good).unwrap();
        assert_eq!(s.preferences().equipment, vec!["ダンベル"]);
    }
}
