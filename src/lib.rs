#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc, clippy::module_name_repetitions)]

pub mod cache;
pub mod config;
pub mod gemini;
pub mod llm;
pub mod murf;
pub mod ollama;
pub mod stub;
pub mod tts;

pub use config::Config;
pub use llm::ModelClient;
pub use tts::{SpeechRequest, SpeechService, SpeechSynthesizer, SILENT_AUDIO};

use anyhow::Result;

/// Builds the speech synthesizer described by `config`, backed by Murf.
pub fn speech_synthesizer(config: &Config) -> Result<SpeechSynthesizer> {
    let murf = murf::Murf::new(config)?;

    Ok(SpeechSynthesizer::new(
        Box::new(murf),
        config.audio_cache_capacity,
        &config.default_voice_id,
    ))
}
