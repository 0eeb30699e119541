use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Strategy for naming generated menus, exercises and history entries.
pub trait IdSource: Send + Sync {
    /// Next value of a process-wide sequence, unique per call.
    fn next_seq(&self) -> String;

    fn menu_id(&self, seq: &str) -> String {
        format!("menu-{seq}")
    }

    /// Exercise ids share the menu's sequence and add their position.
    fn exercise_id(&self, seq: &str, index: usize) -> String {
        format!("exercise-{seq}-{index}")
    }

    fn history_id(&self) -> String {
        format!("history-{}", self.next_seq())
    }
}

/// Monotonic counter with a random suffix. Unique across restarts.
#[derive(Debug, Default)]
pub struct RandomIds {
    counter: AtomicU64,
}

impl IdSource for RandomIds {
    fn next_seq(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        let suffix = Uuid::new_v4().simple().to_string();
        format!("{n}-{}", &suffix[..8])
    }
}

/// Plain counter starting at 1. Deterministic, for tests and replays.
#[derive(Debug, Default)]
pub struct SequentialIds {
    counter: AtomicU64,
}

impl IdSource for SequentialIds {
    fn next_seq(&self) -> String {
        (self.counter.fetch_add(1, Ordering::Relaxed) + 1).to_string()
    }
}
