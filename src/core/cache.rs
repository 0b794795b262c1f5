//! Per-content extraction results.
//!
//! Keyed by [`ContentHash`], so a renamed or edited file is a new entry. An
//! entry is never overwritten: when two workers compute the same key, the
//! first insert is kept and returned to both.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

use crate::core::data::QueryFragment;
use crate::core::error::ExtractError;
use crate::core::features::FeatureFlags;
use crate::core::source::ContentHash;

/// What a file extracted to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CachedResult {
    pub fragments: Vec<QueryFragment>,
    pub features: FeatureFlags,
}

pub trait ResultCache: Send + Sync {
    fn get(&self, key: &ContentHash) -> Option<Arc<CachedResult>>;

    /// Store `value` unless `key` is already present. Returns the entry that
    /// ends up in the cache.
    fn insert(&self, key: ContentHash, value: CachedResult) -> Arc<CachedResult>;
}

/// Look `key` up, computing and storing the result on a miss.
///
/// Errors are returned without touching the cache.
pub fn get_or_compute(
    cache: &dyn ResultCache,
    key: &ContentHash,
    compute: impl FnOnce() -> Result<CachedResult, ExtractError>,
) -> Result<Arc<CachedResult>, ExtractError> {
    if let Some(hit) = cache.get(key) {
        return Ok(hit);
    }
    let value = compute()?;
    Ok(cache.insert(key.clone(), value))
}

/// Thread-safe in-memory cache.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: DashMap<ContentHash, Arc<CachedResult>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

/// Cache counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

impl ResultCache for MemoryCache {
    fn get(&self, key: &ContentHash) -> Option<Arc<CachedResult>> {
        match self.entries.get(key) {
            Some(entry) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(Arc::clone(entry.value()))
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    fn insert(&self, key: ContentHash, value: CachedResult) -> Arc<CachedResult> {
        let entry = self.entries.entry(key).or_insert_with(|| Arc::new(value));
        Arc::clone(entry.value())
    }
}

#[cfg(test)]
mod tests {
    use crate::core::cache::*;
    use pretty_assertions::assert_eq;

    fn features(config: bool) -> CachedResult {
        CachedResult {
            fragments: Vec::new(),
            features: FeatureFlags {
                has_config_export: config,
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_first_insert_wins() {
        let cache = MemoryCache::new();
        let key = ContentHash::compute("a.js", "x");

        let first = cache.insert(key.clone(), features(true));
        let second = cache.insert(key.clone(), features(false));

        assert!(first.features.has_config_export);
        assert!(second.features.has_config_export);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.stats().entries, 1);
    }

    #[test]
    fn test_get_or_compute_runs_once() {
        let cache = MemoryCache::new();
        let key = ContentHash::compute("a.js", "x");
        let mut calls = 0;

        for _ in 0..3 {
            get_or_compute(&cache, &key, || {
                calls += 1;
                Ok(features(true))
            })
            .unwrap();
        }

        assert_eq!(calls, 1);
        assert_eq!(
            cache.stats(),
            CacheStats {
                entries: 1,
                hits: 2,
                misses: 1,
            }
        );
    }

    #[test]
    fn test_errors_are_not_cached() {
        let cache = MemoryCache::new();
        let key = ContentHash::compute("a.js", "graphql``");

        let err = get_or_compute(&cache, &key, || {
            Err(ExtractError::EmptyFragment { template: None })
        });
        assert!(err.is_err());
        assert!(cache.get(&key).is_none());
    }

    #[test]
    fn test_concurrent_inserts_agree() {
        use rayon::prelude::*;

        let cache = MemoryCache::new();
        let key = ContentHash::compute("a.js", "x");
        let results: Vec<_> = (0..16)
            .into_par_iter()
            .map(|i| cache.insert(key.clone(), features(i % 2 == 0)))
            .collect();

        let first = &results[0];
        assert!(results.iter().all(|r| Arc::ptr_eq(r, first)));
    }
}
