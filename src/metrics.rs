//! Translation metrics and observability.
//!
//! Counters for the read path: cache hits and misses, fallbacks to the
//! entity's own attribute, cache failures, and translations written.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Per-`Translator` counters.
#[derive(Debug, Default)]
pub struct TranslationMetrics {
    /// Reads answered from the cache
    cache_hits: AtomicUsize,

    /// Reads that went to the store
    cache_misses: AtomicUsize,

    /// Reads answered with the entity's untranslated attribute
    fallbacks: AtomicUsize,

    /// Cache operations that failed and were ignored
    cache_errors: AtomicUsize,

    /// Translations written through `set_translation`
    writes: AtomicUsize,
}

impl TranslationMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cache_miss(&self) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_fallback(&self) {
        self.fallbacks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cache_error(&self) {
        self.cache_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_write(&self) {
        self.writes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn cache_hits(&self) -> usize {
        self.cache_hits.load(Ordering::Relaxed)
    }

    pub fn cache_misses(&self) -> usize {
        self.cache_misses.load(Ordering::Relaxed)
    }

    pub fn fallbacks(&self) -> usize {
        self.fallbacks.load(Ordering::Relaxed)
    }

    pub fn cache_errors(&self) -> usize {
        self.cache_errors.load(Ordering::Relaxed)
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::Relaxed)
    }

    /// Generate a metrics report.
    pub fn report(&self) -> MetricsReport {
        let hits = self.cache_hits();
        let misses = self.cache_misses();
        let total = hits + misses;
        let cache_hit_rate = if total > 0 {
            (hits as f64 / total as f64) * 100.0
        } else {
            0.0
        };

        MetricsReport {
            cache_hits: hits,
            cache_misses: misses,
            cache_hit_rate,
            fallbacks: self.fallbacks(),
            cache_errors: self.cache_errors(),
            writes: self.writes(),
        }
    }
}

/// Snapshot of the translation counters.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    pub cache_hits: usize,
    pub cache_misses: usize,

    /// Cache hit rate as a percentage (0-100)
    pub cache_hit_rate: f64,

    pub fallbacks: usize,
    pub cache_errors: usize,
    pub writes: usize,
}
