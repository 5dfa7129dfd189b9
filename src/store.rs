//! Translation storage.
//!
//! `TranslationStore` is the seam between the translatable capability and
//! whatever persists the records. `Database` (in `db`) is the durable
//! implementation; `MemoryStore` keeps everything in-process and counts calls.

use crate::error::TranslationError;
use crate::translation::{Translation, TranslationKey};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Keyed storage of translation records.
///
/// Implementations must keep (entity_type, entity_id, language, field) unique
/// and make `get_or_create` converge on one record under concurrent callers.
#[async_trait]
pub trait TranslationStore: Send + Sync {
    /// Return the record for `key`, creating it with no text if absent
    async fn get_or_create(&self, key: &TranslationKey) -> Result<Translation>;

    /// All records of one entity in one language, ordered by field
    async fn filter(
        &self,
        entity_type: &str,
        entity_id: i64,
        language: &str,
    ) -> Result<Vec<Translation>>;

    /// Persist `translation.text` onto the existing record with the same id
    async fn save(&self, translation: &Translation) -> Result<()>;
}

/// In-process store backed by an ordered map.
///
/// Creation happens under the map lock, so the uniqueness invariant holds
/// regardless of how many tasks race on one key.
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<BTreeMap<TranslationKey, Translation>>,
    next_id: AtomicUsize,
    get_or_create_calls: AtomicUsize,
    filter_calls: AtomicUsize,
    save_calls: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.records.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of `get_or_create` calls served so far
    pub fn get_or_create_calls(&self) -> usize {
        self.get_or_create_calls.load(Ordering::Relaxed)
    }

    pub fn filter_calls(&self) -> usize {
        self.filter_calls.load(Ordering::Relaxed)
    }

    pub fn save_calls(&self) -> usize {
        self.save_calls.load(Ordering::Relaxed)
    }

    /// Total calls across all operations
    pub fn total_calls(&self) -> usize {
        self.get_or_create_calls() + self.filter_calls() + self.save_calls()
    }
}

#[async_trait]
impl TranslationStore for MemoryStore {
    async fn get_or_create(&self, key: &TranslationKey) -> Result<Translation> {
        self.get_or_create_calls.fetch_add(1, Ordering::Relaxed);
        let mut records = self
            .records
            .lock()
            .map_err(|_| anyhow!("Translation store lock poisoned"))?;

        let record = records.entry(key.clone()).or_insert_with(|| Translation {
            id: self.next_id.fetch_add(1, Ordering::Relaxed) as i64 + 1,
            entity_type: key.entity_type.clone(),
            entity_id: key.entity_id,
            language: key.language.clone(),
            field: key.field.clone(),
            text: None,
        });

        Ok(record.clone())
    }

    async fn filter(
        &self,
        entity_type: &str,
        entity_id: i64,
        language: &str,
    ) -> Result<Vec<Translation>> {
        self.filter_calls.fetch_add(1, Ordering::Relaxed);
        let records = self
            .records
            .lock()
            .map_err(|_| anyhow!("Translation store lock poisoned"))?;

        let mut matches: Vec<Translation> = records
            .values()
            .filter(|t| {
                t.entity_type == entity_type && t.entity_id == entity_id && t.language == language
            })
            .cloned()
            .collect();
        matches.sort_by(|a, b| a.field.cmp(&b.field));

        Ok(matches)
    }

    async fn save(&self, translation: &Translation) -> Result<()> {
        self.save_calls.fetch_add(1, Ordering::Relaxed);
        let mut records = self
            .records
            .lock()
            .map_err(|_| anyhow!("Translation store lock poisoned"))?;

        let existing = records
            .values_mut()
            .find(|t| t.id == translation.id)
            .ok_or(TranslationError::NotFound(translation.id))?;
        existing.text = translation.text.clone();

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn key(language: &str, field: &str) -> TranslationKey {
        TranslationKey::new("Article", 1, language, field)
    }

    // ==================== get_or_create Tests ====================

    #[tokio::test]
    async fn test_get_or_create_creates_empty_record() {
        let store = MemoryStore::new();

        let record = store.get_or_create(&key("fr", "title")).await.expect("create");

        assert_eq!(record.language, "fr");
        assert_eq!(record.field, "title");
        assert!(record.text.is_none());
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_get_or_create_returns_existing() {
        let store = MemoryStore::new();

        let first = store.get_or_create(&key("fr", "title")).await.expect("create");
        let second = store.get_or_create(&key("fr", "title")).await.expect("get");

        assert_eq!(first.id, second.id);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get_or_create_calls(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_get_or_create_converges() {
        let store = Arc::new(MemoryStore::new());

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.get_or_create(&key("es", "body")).await })
            })
            .collect();

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.expect("join").expect("create").id);
        }

        ids.dedup();
        assert_eq!(ids.len(), 1);
        assert_eq!(store.len(), 1);
    }

    // ==================== filter Tests ====================

    #[tokio::test]
    async fn test_filter_orders_by_field() {
        let store = MemoryStore::new();
        for field in ["title", "body", "summary"] {
            store.get_or_create(&key("fr", field)).await.expect("create");
        }
        store.get_or_create(&key("en", "title")).await.expect("create");

        let records = store.filter("Article", 1, "fr").await.expect("filter");
        let fields: Vec<_> = records.iter().map(|r| r.field.as_str()).collect();

        assert_eq!(fields, vec!["body", "summary", "title"]);
    }

    #[tokio::test]
    async fn test_filter_empty_is_not_an_error() {
        let store = MemoryStore::new();
        let records = store.filter("Article", 99, "fr").await.expect("filter");
        assert!(records.is_empty());
    }

    // ==================== save Tests ====================

    #[tokio::test]
    async fn test_save_updates_text() {
        let store = MemoryStore::new();
        let mut record = store.get_or_create(&key("fr", "title")).await.expect("create");

        record.text = Some("Bonjour".to_string());
        store.save(&record).await.expect("save");

        let reloaded = store.get_or_create(&key("fr", "title")).await.expect("get");
        assert_eq!(reloaded.text.as_deref(), Some("Bonjour"));
    }

    #[tokio::test]
    async fn test_save_unknown_record_fails() {
        let store = MemoryStore::new();
        let record = Translation {
            id: 42,
            entity_type: "Article".to_string(),
            entity_id: 1,
            language: "fr".to_string(),
            field: "title".to_string(),
            text: Some("x".to_string()),
        };

        let err = store.save(&record).await.expect_err("should fail");
        assert_eq!(
            err.downcast_ref::<TranslationError>(),
            Some(&TranslationError::NotFound(42))
        );
    }
}
