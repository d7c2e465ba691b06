//! Label-id to display-name resolution.
//!
//! Well-known system label ids resolve through a fixed table; anything else
//! goes through the provider's label catalog. Catalog results, including
//! misses, are cached per-process with a short TTL so repeated fetches do
//! not hammer the catalog endpoint.

use async_trait::async_trait;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use super::decode::UNREAD_LABEL_ID;
use super::traits::Result;
use crate::domain::label_names;

const CACHE_CAPACITY: usize = 512;
const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// On-demand lookup against the provider's label catalog.
#[async_trait]
pub trait LabelCatalog: Send + Sync {
    /// Looks up the display name for a provider label id.
    ///
    /// Returns `Ok(None)` when the catalog does not know the id.
    async fn lookup_label_name(&self, id: &str) -> Result<Option<String>>;
}

/// Fixed mapping for well-known system label ids.
fn system_label_name(id: &str) -> Option<&'static str> {
    match id {
        "INBOX" => Some(label_names::INBOX),
        "SENT" => Some(label_names::SENT),
        "DRAFT" => Some(label_names::DRAFTS),
        "SPAM" => Some(label_names::SPAM),
        "TRASH" => Some(label_names::TRASH),
        "STARRED" => Some(label_names::STARRED),
        "IMPORTANT" => Some(label_names::IMPORTANT),
        _ => None,
    }
}

struct CacheEntry {
    name: Option<String>,
    cached_at: Instant,
}

/// Resolves provider label ids to display names with a TTL'd cache.
pub struct LabelResolver {
    cache: Mutex<LruCache<String, CacheEntry>>,
    ttl: Duration,
}

impl LabelResolver {
    /// Creates a resolver with the default cache TTL.
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_TTL)
    }

    /// Creates a resolver with a custom cache TTL.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            cache: Mutex::new(LruCache::new(
                NonZeroUsize::new(CACHE_CAPACITY).unwrap_or(NonZeroUsize::MIN),
            )),
            ttl,
        }
    }

    /// Resolves a label id to its display name.
    ///
    /// The unread marker never resolves to a name. Unknown ids are looked up
    /// through the catalog; lookup failures and unknown ids resolve to `None`
    /// (the label is dropped) and the miss is cached until the TTL lapses.
    pub async fn resolve(&self, catalog: &dyn LabelCatalog, id: &str) -> Option<String> {
        if id == UNREAD_LABEL_ID {
            return None;
        }
        if let Some(name) = system_label_name(id) {
            return Some(name.to_string());
        }

        {
            let mut cache = self.cache.lock().await;
            if let Some(entry) = cache.get(id) {
                if entry.cached_at.elapsed() < self.ttl {
                    return entry.name.clone();
                }
                cache.pop(id);
            }
        }

        let name = match catalog.lookup_label_name(id).await {
            Ok(name) => name,
            Err(err) => {
                tracing::debug!(label_id = %id, error = %err, "label name lookup failed");
                None
            }
        };

        let mut cache = self.cache.lock().await;
        cache.put(
            id.to_string(),
            CacheEntry {
                name: name.clone(),
                cached_at: Instant::now(),
            },
        );
        name
    }

    /// Drops all cached lookups, forcing the next resolve to hit the catalog.
    pub async fn invalidate(&self) {
        self.cache.lock().await.clear();
    }
}

impl Default for LabelResolver {
    fn default() -> Self {
        Self::new()
    }
}
