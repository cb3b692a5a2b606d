use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{HeaderValue, ACCEPT};
use reqwest::Url;
use tap::Tap;

use crate::config::{mask_key, Config};
use crate::tts::{SpeechRequest, SpeechService};

mod api;

const SAMPLE_RATE: u32 = 24000;

#[derive(Debug)]
struct MurfInner {
    client: reqwest::Client,
    host: Url,
    api_key: Option<String>,
}

#[derive(Clone, Debug)]
pub struct Murf {
    inner: Arc<MurfInner>,
}

impl Murf {
    pub fn new(config: &Config) -> Result<Self> {
        let host = Url::parse(&config.murf_host).context("Invalid MURF_HOST")?;

        match &config.murf_api_key {
            Some(key) => tracing::debug!("Murf API key: {}", mask_key(key)),
            None => tracing::warn!("MURF_API_KEY is not set, speech synthesis will be silent"),
        }

        let client = reqwest::ClientBuilder::new()
            .timeout(config.request_timeout())
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Murf {
            inner: Arc::new(MurfInner {
                client,
                host,
                api_key: config.murf_api_key.clone(),
            }),
        })
    }
}

#[async_trait]
impl SpeechService for Murf {
    async fn synthesize(&self, request: &SpeechRequest) -> Result<Bytes> {
        let api_key = self
            .inner
            .api_key
            .as_deref()
            .context("MURF_API_KEY is not set")?;

        let api_key =
            HeaderValue::from_str(api_key).context("MURF_API_KEY is not a valid header value")?;

        let api_generate = self.inner.host.clone().tap_mut(|u| {
            if let Ok(mut segments) = u.path_segments_mut() {
                segments.pop_if_empty().extend(["v1", "speech", "generate"]);
            }
        });

        let query = api::GenerateRequest {
            voice_id: &request.voice_id,
            text: &request.text,
            format: "MP3",
            channel_type: "MONO",
            sample_rate: SAMPLE_RATE,
        };

        tracing::debug!(voice_id = %request.voice_id, "requesting speech from Murf");

        let resp: api::GenerateResponse = self
            .inner
            .client
            .post(api_generate)
            .header("api-key", api_key)
            .header(ACCEPT, "application/json")
            .json(&query)
            .send()
            .await
            .context("Failed to post /v1/speech/generate (connect)")?
            .error_for_status()
            .context("Failed to post /v1/speech/generate (status_code)")?
            .json()
            .await
            .context("Failed to parse /v1/speech/generate")?;

        let audio_url = resp
            .audio_file
            .filter(|url| !url.is_empty())
            .context("No audioFile in /v1/speech/generate response")?;

        tracing::debug!("downloading audio from {audio_url}");

        let audio = self
            .inner
            .client
            .get(&audio_url)
            .send()
            .await
            .context("Failed to download audio (connect)")?
            .error_for_status()
            .context("Failed to download audio (status_code)")?
            .bytes()
            .await
            .context("Failed to download audio (body)")?;

        Ok(audio)
    }
}
