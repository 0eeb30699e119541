use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;

use super::Provider;
use crate::errors::{Result, WorkoutError};

/// Provider that replays queued replies and remembers every prompt it saw.
#[derive(Default)]
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<Result<String>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    pub fn replying(text: &str) -> Self {
        let p = Self::default();
        p.push(Ok(text.to_string()));
        p
    }

    pub fn failing(err: WorkoutError) -> Self {
        let p = Self::default();
        p.push(Err(err));
        p
    }

    pub fn push(&self, reply: Result<String>) {
        self.replies.lock().push_back(reply);
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().push(prompt.to_string());
        self.replies
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(WorkoutError::Configuration("script exhausted".into())))
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}
