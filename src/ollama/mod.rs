use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tap::Tap;

use crate::config::Config;
use crate::llm::{join_prompts, ModelClient};

pub const ERROR_RESPONSE: &str = "Error generating response from Ollama.";

#[derive(Debug, Clone, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Clone, Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Debug)]
struct OllamaInner {
    client: reqwest::Client,
    host: Url,
    model: String,
}

/// Model served by a local Ollama instance.
#[derive(Clone, Debug)]
pub struct Ollama {
    inner: Arc<OllamaInner>,
}

impl Ollama {
    pub fn new(config: &Config) -> Result<Self> {
        let host = Url::parse(&config.ollama_host).context("Invalid OLLAMA_HOST")?;

        let client = reqwest::ClientBuilder::new()
            .timeout(config.request_timeout())
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Ollama {
            inner: Arc::new(OllamaInner {
                client,
                host,
                model: config.ollama_model.clone(),
            }),
        })
    }

    async fn request(&self, prompt: &str) -> Result<String> {
        let api_generate = self.inner.host.clone().tap_mut(|u| {
            if let Ok(mut segments) = u.path_segments_mut() {
                segments.pop_if_empty().extend(["api", "generate"]);
            }
        });

        let query = GenerateRequest {
            model: &self.inner.model,
            prompt,
            stream: false,
        };

        let resp: GenerateResponse = self
            .inner
            .client
            .post(api_generate)
            .json(&query)
            .send()
            .await
            .context("Failed to post /api/generate (connect)")?
            .error_for_status()
            .context("Failed to post /api/generate (status_code)")?
            .json()
            .await
            .context("Failed to parse /api/generate")?;

        Ok(resp.response)
    }
}

#[async_trait]
impl ModelClient for Ollama {
    async fn generate(&self, system_prompt: &str, user_prompt: &str) -> String {
        let prompt = join_prompts(system_prompt, user_prompt);

        tracing::debug!(model = %self.inner.model, "requesting Ollama generation");

        match self.request(&prompt).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Ollama API error: {e:#}");
                ERROR_RESPONSE.to_string()
            }
        }
    }
}
