use anyhow::{anyhow, Result};
use once_cell::sync::OnceCell;
use serde::Deserialize;

static CONFIG: OnceCell<Config> = OnceCell::new();

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    #[default]
    Gemini,
    Ollama,
    Stub,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    pub murf_api_key: Option<String>,

    #[serde(default = "default_murf_host")]
    pub murf_host: String,

    #[serde(default = "default_voice_id")]
    pub default_voice_id: String,

    #[serde(default = "default_audio_cache_capacity")]
    pub audio_cache_capacity: usize,

    pub gemini_api_key: Option<String>,

    #[serde(default = "default_gemini_host")]
    pub gemini_host: String,

    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,

    #[serde(default)]
    pub llm_provider: LlmProvider,

    #[serde(default = "default_ollama_host")]
    pub ollama_host: String,

    #[serde(default = "default_ollama_model")]
    pub ollama_model: String,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_output_path")]
    pub output_path: String,
}

fn default_murf_host() -> String {
    "https://api.murf.ai".to_string()
}

fn default_voice_id() -> String {
    "en-US-naomi".to_string()
}

fn default_audio_cache_capacity() -> usize {
    100
}

fn default_gemini_host() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_gemini_model() -> String {
    "gemini-flash-latest".to_string()
}

fn default_ollama_host() -> String {
    "http://localhost:11434".to_string()
}

fn default_ollama_model() -> String {
    "llama3".to_string()
}

fn default_request_timeout_secs() -> u64 {
    180
}

fn default_output_path() -> String {
    "/tmp/".to_string()
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(envy::from_env()?)
    }

    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.request_timeout_secs)
    }
}

pub fn init() -> Result<()> {
    if CONFIG.set(Config::from_env()?).is_err() {
        return Err(anyhow!("Failed to set CONFIG"));
    }

    Ok(())
}

pub fn get() -> Option<&'static Config> {
    CONFIG.get()
}

/// Shows only the edges of a credential, e.g. `abcd...wxyz`.
pub fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();

    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }

    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();

    format!("{head}...{tail}")
}

#[cfg(test)]
pub(crate) fn from_pairs(pairs: &[(&str, &str)]) -> Config {
    envy::from_iter(
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string())),
    )
    .expect("Failed to build test config")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = from_pairs(&[]);
        assert_eq!(config.murf_api_key, None);
        assert_eq!(config.murf_host, "https://api.murf.ai");
        assert_eq!(config.default_voice_id, "en-US-naomi");
        assert_eq!(config.audio_cache_capacity, 100);
        assert_eq!(config.gemini_model, "gemini-flash-latest");
        assert_eq!(config.llm_provider, LlmProvider::Gemini);
        assert_eq!(config.request_timeout_secs, 180);
    }

    #[test]
    fn test_overrides() {
        let config = from_pairs(&[
            ("MURF_API_KEY", "murf-key"),
            ("LLM_PROVIDER", "ollama"),
            ("AUDIO_CACHE_CAPACITY", "3"),
            ("OLLAMA_MODEL", "mistral"),
        ]);
        assert_eq!(config.murf_api_key.as_deref(), Some("murf-key"));
        assert_eq!(config.llm_provider, LlmProvider::Ollama);
        assert_eq!(config.audio_cache_capacity, 3);
        assert_eq!(config.ollama_model, "mistral");
    }

    #[test]
    fn test_unknown_provider_is_rejected() {
        let result: Result<Config, _> =
            envy::from_iter(vec![("LLM_PROVIDER".to_string(), "openai".to_string())]);
        assert!(result.is_err());
    }

    #[test]
    fn test_mask_key() {
        assert_eq!(mask_key("abcdefghijkl"), "abcd...ijkl");
        assert_eq!(mask_key("short"), "*****");
        assert_eq!(mask_key(""), "");
    }
}
