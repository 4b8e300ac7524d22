//! Response Cache
//!
//! In-memory, TTL-bounded memo of finished responses keyed by the serialized
//! canonical request. Entries are checked for expiry only when read; an
//! expired entry stays in place until a later store overwrites it or LRU
//! pressure evicts it.

mod clock;

pub use clock::{Clock, ManualClock, SystemClock};

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use lru::LruCache;
use tokio::sync::Mutex as TokioMutex;

use crate::error::LlmError;
use crate::types::{ChatRequest, ChatResponse};

/// Default upper bound on cached responses.
pub const DEFAULT_CACHE_CAPACITY: NonZeroUsize = NonZeroUsize::new(1000).unwrap();

/// Cached value with its expiry. `None` never expires (TTL past the end of
/// representable time).
struct CacheEntry {
    value: ChatResponse,
    expires_at: Option<Instant>,
}

impl CacheEntry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|at| now <= at)
    }
}

/// Shared response cache. Cloning shares the underlying store.
#[derive(Clone)]
pub struct ResponseCache {
    entries: Arc<TokioMutex<LruCache<String, CacheEntry>>>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for ResponseCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseCache")
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }

    pub fn with_capacity(capacity: NonZeroUsize) -> Self {
        Self {
            entries: Arc::new(TokioMutex::new(LruCache::new(capacity))),
            clock: Arc::new(SystemClock),
        }
    }

    /// Swap the time source (tests drive expiry with a [`ManualClock`]).
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Fetch a live entry. Anything past its expiry reads as a miss.
    pub async fn get(&self, key: &str) -> Option<ChatResponse> {
        let now = self.clock.now();
        let mut entries = self.entries.lock().await;
        match entries.get(key) {
            Some(entry) if entry.is_live(now) => Some(entry.value.clone()),
            _ => None,
        }
    }

    /// Store a response for `ttl`. Last write wins.
    pub async fn put(&self, key: impl Into<String>, value: ChatResponse, ttl: Duration) {
        let expires_at = self.clock.now().checked_add(ttl);
        let mut entries = self.entries.lock().await;
        entries.put(key.into(), CacheEntry { value, expires_at });
    }

    /// Entries currently held, expired ones included.
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn clear(&self) {
        self.entries.lock().await.clear();
    }
}

/// Deterministic cache key: provider name plus the serialized request.
///
/// Field order is fixed by the struct and sampling knobs live in a sorted
/// map, so structurally equal requests always produce the same key.
pub fn cache_key(provider: &str, request: &ChatRequest) -> Result<String, LlmError> {
    Ok(format!("{provider}:{}", serde_json::to_string(request)?))
}
