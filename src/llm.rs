use anyhow::Result;
use async_trait::async_trait;

use crate::config::{Config, LlmProvider};
use crate::gemini::Gemini;
use crate::ollama::Ollama;
use crate::stub::Stub;

/// A text generation backend. Implementations never fail: errors are turned
/// into a provider specific sentinel string.
#[async_trait]
pub trait ModelClient: std::fmt::Debug + Send + Sync {
    async fn generate(&self, system_prompt: &str, user_prompt: &str) -> String;
}

pub fn build(config: &Config) -> Result<Box<dyn ModelClient>> {
    tracing::debug!(provider = ?config.llm_provider, "building model client");

    let client: Box<dyn ModelClient> = match config.llm_provider {
        LlmProvider::Gemini => Box::new(Gemini::new(config)?),
        LlmProvider::Ollama => Box::new(Ollama::new(config)?),
        LlmProvider::Stub => Box::new(Stub),
    };

    Ok(client)
}

/// Neither backend has a separate system channel, so both prompts travel as one.
pub fn join_prompts(system_prompt: &str, user_prompt: &str) -> String {
    format!("{system_prompt}\n\n{user_prompt}")
}

pub async fn generate_prompt(client: &dyn ModelClient, prompt: &str) -> String {
    client.generate("", prompt).await
}
