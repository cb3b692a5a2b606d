use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::Mutex;

use crate::cache::AudioCache;

/// Empty mono 16-bit 24kHz PCM WAV. Returned whenever synthesis fails so
/// playback on the caller's side always has something decodable.
pub const SILENT_AUDIO: &[u8] = &[
    b'R', b'I', b'F', b'F', 36, 0, 0, 0, // chunk size
    b'W', b'A', b'V', b'E',
    b'f', b'm', b't', b' ', 16, 0, 0, 0,
    1, 0, // PCM
    1, 0, // channels
    0xC0, 0x5D, 0, 0, // 24000 Hz
    0x80, 0xBB, 0, 0, // byte rate
    2, 0, // block align
    16, 0, // bits per sample
    b'd', b'a', b't', b'a', 0, 0, 0, 0,
];

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SpeechRequest {
    pub text: String,
    pub voice_id: String,
}

impl SpeechRequest {
    pub fn new(text: &str, voice_id: &str) -> Self {
        Self {
            text: text.to_string(),
            voice_id: voice_id.to_string(),
        }
    }
}

#[async_trait]
pub trait SpeechService: std::fmt::Debug + Send + Sync {
    async fn synthesize(&self, request: &SpeechRequest) -> Result<Bytes>;
}

#[derive(Debug)]
pub struct SpeechSynthesizer {
    service: Box<dyn SpeechService>,
    cache: Mutex<AudioCache>,
    default_voice_id: String,
}

impl SpeechSynthesizer {
    pub fn new(service: Box<dyn SpeechService>, capacity: usize, default_voice_id: &str) -> Self {
        Self {
            service,
            cache: Mutex::new(AudioCache::new(capacity)),
            default_voice_id: default_voice_id.to_string(),
        }
    }

    pub fn default_voice_id(&self) -> &str {
        &self.default_voice_id
    }

    /// Never fails: provider errors are logged and answered with [`SILENT_AUDIO`].
    pub async fn synthesize(&self, text: &str, voice_id: Option<&str>) -> Bytes {
        let request = SpeechRequest::new(text, voice_id.unwrap_or(self.default_voice_id.as_str()));

        if let Some(audio) = self.cache.lock().await.get(&request) {
            tracing::debug!(voice_id = %request.voice_id, "audio cache hit");
            return audio;
        }

        match self.service.synthesize(&request).await {
            Ok(audio) => {
                self.cache.lock().await.put(request, audio.clone());
                audio
            }
            Err(e) => {
                tracing::warn!(voice_id = %request.voice_id, "speech synthesis failed: {e:#}");
                Bytes::from_static(SILENT_AUDIO)
            }
        }
    }

    pub async fn cached_entries(&self) -> usize {
        self.cache.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;

    #[derive(Debug, Default)]
    struct CountingService {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl SpeechService for CountingService {
        async fn synthesize(&self, request: &SpeechRequest) -> Result<Bytes> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Bytes::from(format!("{}:{}", request.voice_id, request.text)))
        }
    }

    #[derive(Debug)]
    struct FailingService;

    #[async_trait]
    impl SpeechService for FailingService {
        async fn synthesize(&self, _request: &SpeechRequest) -> Result<Bytes> {
            anyhow::bail!("provider unreachable")
        }
    }

    fn counting(capacity: usize) -> (SpeechSynthesizer, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let service = CountingService {
            calls: calls.clone(),
        };

        (
            SpeechSynthesizer::new(Box::new(service), capacity, "en-US-naomi"),
            calls,
        )
    }

    #[test]
    fn test_silent_audio_is_valid_wav() {
        let reader = hound::WavReader::new(Cursor::new(SILENT_AUDIO)).unwrap();
        let spec = reader.spec();

        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate, 24000);
        assert_eq!(spec.bits_per_sample, 16);
        assert_eq!(reader.len(), 0);
    }

    #[tokio::test]
    async fn test_repeated_request_is_served_from_cache() {
        let (synth, calls) = counting(100);

        let first = synth.synthesize("Hello world", Some("en-US-naomi")).await;
        let second = synth.synthesize("Hello world", Some("en-US-naomi")).await;

        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_default_voice_shares_cache_entry() {
        let (synth, calls) = counting(100);

        let implicit = synth.synthesize("Hello world", None).await;
        let explicit = synth.synthesize("Hello world", Some("en-US-naomi")).await;

        assert_eq!(implicit, Bytes::from_static(b"en-US-naomi:Hello world"));
        assert_eq!(implicit, explicit);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_evicted_request_hits_network_again() {
        let (synth, calls) = counting(2);

        synth.synthesize("one", None).await;
        synth.synthesize("two", None).await;
        synth.synthesize("three", None).await;
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(synth.cached_entries().await, 2);

        synth.synthesize("three", None).await;
        assert_eq!(calls.load(Ordering::SeqCst), 3);

        synth.synthesize("one", None).await;
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_failure_returns_silent_audio_and_is_not_cached() {
        let synth = SpeechSynthesizer::new(Box::new(FailingService), 100, "en-US-naomi");

        let audio = synth.synthesize("Hello world", None).await;

        assert_eq!(&audio[..], SILENT_AUDIO);
        assert_eq!(synth.cached_entries().await, 0);
    }
}
