use moka::sync::Cache;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::Duration;

/// In-process cache of projected profile texts
///
/// Entries are keyed by profile id and stamped with a fingerprint of the
/// profile content they were projected from. A lookup with a different
/// fingerprint is a miss, so an edited profile never gets the old text, even
/// when a stale projection is written after [`ProfileTextCache::invalidate`].
#[derive(Clone)]
pub struct ProfileTextCache {
    entries: Cache<String, (u64, String)>,
    ttl_secs: u64,
}

impl ProfileTextCache {
    /// Create a cache holding up to `capacity` profiles for `ttl_secs` seconds each
    pub fn new(capacity: u64, ttl_secs: u64) -> Self {
        let entries = Cache::builder()
            .max_capacity(capacity)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self { entries, ttl_secs }
    }

    /// Return the cached text for `profile_id` if it was projected from content
    /// with the same `fingerprint`, otherwise compute and store it
    pub fn get_or_insert_with<F>(&self, profile_id: &str, fingerprint: u64, project: F) -> String
    where
        F: FnOnce() -> String,
    {
        if profile_id.is_empty() {
            return project();
        }

        match self.entries.get(profile_id) {
            Some((cached_fingerprint, text)) if cached_fingerprint == fingerprint => {
                tracing::trace!("Profile text cache hit: {}", profile_id);
                return text;
            }
            Some(_) => tracing::debug!("Profile {} changed, reprojecting", profile_id),
            None => tracing::trace!("Profile text cache miss: {}", profile_id),
        }

        let text = project();
        self.entries
            .insert(profile_id.to_string(), (fingerprint, text.clone()));
        text
    }

    /// Drop the cached text for one profile
    pub fn invalidate(&self, profile_id: &str) {
        self.entries.invalidate(profile_id);
        tracing::debug!("Invalidated profile text for {}", profile_id);
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        self.entries.run_pending_tasks();
        CacheStats {
            entries: self.entries.entry_count(),
            ttl_secs: self.ttl_secs,
        }
    }
}

impl std::fmt::Debug for ProfileTextCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileTextCache")
            .field("entries", &self.entries.entry_count())
            .field("ttl_secs", &self.ttl_secs)
            .finish()
    }
}

/// Content fingerprint of a serializable value
///
/// `None` when the value can't be serialized; callers should skip caching.
pub fn fingerprint<T: Serialize>(value: &T) -> Option<u64> {
    let bytes = serde_json::to_vec(value).ok()?;
    let mut hasher = DefaultHasher::new();
    bytes.hash(&mut hasher);
    Some(hasher.finish())
}

/// Cache statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    pub entries: u64,
    pub ttl_secs: u64,
}
