use std::num::NonZeroUsize;

use bytes::Bytes;
use lru::LruCache;

use crate::tts::SpeechRequest;

/// Bounded store of synthesized audio, evicting the least recently used entry.
pub struct AudioCache {
    entries: LruCache<SpeechRequest, Bytes>,
}

impl AudioCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);

        Self {
            entries: LruCache::new(capacity),
        }
    }

    pub fn get(&mut self, request: &SpeechRequest) -> Option<Bytes> {
        self.entries.get(request).cloned()
    }

    pub fn put(&mut self, request: SpeechRequest, audio: Bytes) {
        if let Some((evicted, _)) = self.entries.push(request, audio) {
            tracing::debug!(voice_id = %evicted.voice_id, "displaced cached audio");
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.entries.cap().get()
    }
}

impl std::fmt::Debug for AudioCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioCache")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .finish()
    }
}
