use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::config::Config;
use crate::errors::{Result, WorkoutError};
use crate::prompt;
use crate::wire::{ChatMessage, ChatRequest, ChatResponse};

/// Everything the chat-completions client needs, passed in explicitly.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_key: Option<String>,
    pub api_base: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// `None` leaves the transport's own default in place.
    pub timeout: Option<Duration>,
}

impl From<&Config> for ClientConfig {
    fn from(cfg: &Config) -> Self {
        Self {
            api_key: cfg.api_key.clone(),
            api_base: cfg.api_base.clone(),
            model: cfg.model.clone(),
            temperature: cfg.temperature,
            max_tokens: cfg.max_tokens,
            timeout: cfg.timeout_secs.map(Duration::from_secs),
        }
    }
}

/// OpenAI-compatible `/v1/chat/completions` client with a fixed fitness-expert
/// system message.
pub struct OpenAIProvider {
    cfg: ClientConfig,
    client: Client,
}

impl OpenAIProvider {
    pub fn new(cfg: ClientConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(t) = cfg.timeout {
            builder = builder.timeout(t);
        }
        let client = builder.build()?;
        Ok(Self { cfg, client })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/chat/completions", self.cfg.api_base.trim_end_matches('/'))
    }

    fn request_body(&self, prompt: &str) -> ChatRequest {
        ChatRequest {
            model: self.cfg.model.clone(),
            messages: vec![
                ChatMessage::system(prompt::system_prompt()),
                ChatMessage::user(prompt),
            ],
            temperature: self.cfg.temperature,
            max_tokens: self.cfg.max_tokens,
        }
    }
}

#[async_trait]
impl super::Provider for OpenAIProvider {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let api_key = match self.cfg.api_key.as_deref() {
            Some(k) if !k.trim().is_empty() => k,
            _ => return Err(WorkoutError::Configuration("AI API key is not set".into())),
        };

        let url = self.endpoint();
        log::debug!("POST {} (model {})", url, self.cfg.model);

        let resp = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&self.request_body(prompt))
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;
        log::debug!("chat completion status: {}", status);

        if !status.is_success() {
            return Err(WorkoutError::Transport {
                status: Some(status.as_u16()),
                message: format!("AI API error: {text}"),
            });
        }

        let parsed: ChatResponse = serde_json::from_str(&text).map_err(|e| WorkoutError::Transport {
            status: Some(status.as_u16()),
            message: format!("unreadable chat completion body: {e}"),
        })?;

        Ok(parsed.first_content())
    }

    fn model_name(&self) -> &str {
        &self.cfg.model
    }
}
