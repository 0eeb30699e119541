use async_trait::async_trait;
use std::sync::Arc;

use crate::errors::Result;

pub mod openai;
#[cfg(test)]
pub mod fake;

pub use openai::{ClientConfig, OpenAIProvider};

/// Remote text generation: one prompt in, the model's raw text out.
///
/// Implementations do not retry and do not cache; every call is a fresh,
/// billable request.
#[async_trait]
pub trait Provider: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;

    fn model_name(&self) -> &str;
}

pub type DynProvider = Arc<dyn Provider>;

pub fn make_provider(cfg: &crate::config::Config) -> Result<DynProvider> {
    Ok(Arc::new(OpenAIProvider::new(ClientConfig::from(cfg))?))
}
