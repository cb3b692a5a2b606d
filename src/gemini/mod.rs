use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Url;
use tap::Tap;

use crate::config::{mask_key, Config};
use crate::llm::{join_prompts, ModelClient};

mod api;

pub const MISSING_KEY_RESPONSE: &str = "Error: Gemini API Key not configured.";
pub const ERROR_RESPONSE: &str = "Error generating response from Gemini.";

#[derive(Debug)]
struct GeminiInner {
    client: reqwest::Client,
    host: Url,
    model: String,
    api_key: Option<String>,
}

#[derive(Clone, Debug)]
pub struct Gemini {
    inner: Arc<GeminiInner>,
}

impl Gemini {
    pub fn new(config: &Config) -> Result<Self> {
        let host = Url::parse(&config.gemini_host).context("Invalid GEMINI_HOST")?;

        match &config.gemini_api_key {
            Some(key) => tracing::debug!("Gemini API key: {}", mask_key(key)),
            None => tracing::warn!("GEMINI_API_KEY not found in environment variables"),
        }

        let client = reqwest::ClientBuilder::new()
            .timeout(config.request_timeout())
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Gemini {
            inner: Arc::new(GeminiInner {
                client,
                host,
                model: config.gemini_model.clone(),
                api_key: config.gemini_api_key.clone(),
            }),
        })
    }

    async fn request(&self, api_key: &str, prompt: &str) -> Result<String> {
        let api_generate = self.inner.host.clone().tap_mut(|u| {
            if let Ok(mut segments) = u.path_segments_mut() {
                segments
                    .pop_if_empty()
                    .extend(["v1beta", "models"])
                    .push(&format!("{}:generateContent", self.inner.model));
            }

            u.query_pairs_mut().append_pair("key", api_key);
        });

        let resp = self
            .inner
            .client
            .post(api_generate)
            .json(&api::GenerateContentRequest::single(prompt))
            .send()
            .await
            .map_err(reqwest::Error::without_url)
            .context("Failed to post generateContent (connect)")?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(reqwest::Error::without_url)
            .context("Failed to post generateContent (body)")?;

        if !status.is_success() {
            anyhow::bail!("generateContent failed with status {status}: {body}");
        }

        let resp: api::GenerateContentResponse = serde_json::from_str(&body)
            .with_context(|| format!("Failed to parse generateContent: {body}"))?;

        resp.into_text()
            .with_context(|| format!("No candidate text in generateContent: {body}"))
    }
}

#[async_trait]
impl ModelClient for Gemini {
    async fn generate(&self, system_prompt: &str, user_prompt: &str) -> String {
        let Some(api_key) = self.inner.api_key.as_deref() else {
            return MISSING_KEY_RESPONSE.to_string();
        };

        let prompt = join_prompts(system_prompt, user_prompt);

        tracing::debug!(model = %self.inner.model, "requesting Gemini generation");

        match self.request(api_key, &prompt).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Gemini API error: {e:#}");
                ERROR_RESPONSE.to_string()
            }
        }
    }
}
