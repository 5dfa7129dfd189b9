//! The translatable capability.
//!
//! Any entity implementing [`Translatable`] gets per-language, per-field
//! translations through a [`Translator`], which bundles the store, the shared
//! cache, and the supported-language list. Records are found by key only;
//! nothing is stored on the entity itself.
//!
//! # Example
//!
//! ```rust,ignore
//! use klingon::{Translatable, TranslatableExt, Translator};
//!
//! struct Article { id: i64, title: String }
//!
//! impl Translatable for Article {
//!     fn entity_type(&self) -> &str { "Article" }
//!     fn entity_id(&self) -> i64 { self.id }
//!     fn translatable_fields(&self) -> &[&str] { &["title"] }
//!     fn field_value(&self, field: &str) -> Option<String> {
//!         match field {
//!             "title" => Some(self.title.clone()),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! let title = article.translations(&translator).get_translation("fr", "title").await?;
//! ```

use crate::cache::TranslationCache;
use crate::error::TranslationError;
use crate::i18n::LanguageRegistry;
use crate::metrics::TranslationMetrics;
use crate::store::TranslationStore;
use crate::translation::{Translation, TranslationKey};
use anyhow::Result;
use std::borrow::Cow;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// An entity whose attributes can be translated.
///
/// `field_value` is the name-to-accessor table for the fallback path: it
/// returns the entity's own (untranslated) value of `field`, or `None` when
/// the entity has no such attribute.
pub trait Translatable {
    /// Type tag shared by all instances (e.g., "Article")
    fn entity_type(&self) -> &str;

    /// Stable, non-negative instance id
    fn entity_id(&self) -> i64;

    /// Fields eligible for translation, in declaration order
    fn translatable_fields(&self) -> &[&str];

    fn field_value(&self, field: &str) -> Option<String>;
}

/// Whether reads and writes are limited to configured languages and declared fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TranslationPolicy {
    /// Any (language, field) pair is accepted and created on demand
    #[default]
    Permissive,

    /// Unknown languages and undeclared fields are rejected before touching the store
    Strict,
}

impl FromStr for TranslationPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "permissive" => Ok(Self::Permissive),
            "strict" => Ok(Self::Strict),
            other => anyhow::bail!(
                "Unknown translation policy: '{}' (expected 'permissive' or 'strict')",
                other
            ),
        }
    }
}

/// Cache key for one (entity type, entity id, language, field) tuple.
///
/// Components are `:`-joined; `%` and `:` inside a component are
/// percent-escaped so two different tuples never produce the same key.
pub fn cache_key(entity_type: &str, entity_id: i64, language: &str, field: &str) -> String {
    format!(
        "{}:{}:{}:{}",
        escape_key_part(entity_type),
        entity_id,
        escape_key_part(language),
        escape_key_part(field)
    )
}

fn escape_key_part(part: &str) -> Cow<'_, str> {
    if part.contains(|c: char| c == '%' || c == ':') {
        Cow::Owned(part.replace('%', "%25").replace(':', "%3A"))
    } else {
        Cow::Borrowed(part)
    }
}

/// Shared translation context: store, cache, languages, policy, metrics.
///
/// Build one at startup and pass it by reference; clones share everything.
#[derive(Clone)]
pub struct Translator {
    store: Arc<dyn TranslationStore>,
    cache: Arc<dyn TranslationCache>,
    languages: Arc<LanguageRegistry>,
    policy: TranslationPolicy,
    metrics: Arc<TranslationMetrics>,
}

impl Translator {
    pub fn new(
        store: Arc<dyn TranslationStore>,
        cache: Arc<dyn TranslationCache>,
        languages: LanguageRegistry,
    ) -> Self {
        Self {
            store,
            cache,
            languages: Arc::new(languages),
            policy: TranslationPolicy::default(),
            metrics: Arc::new(TranslationMetrics::new()),
        }
    }

    pub fn with_policy(mut self, policy: TranslationPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> TranslationPolicy {
        self.policy
    }

    pub fn languages(&self) -> &LanguageRegistry {
        &self.languages
    }

    pub fn metrics(&self) -> &TranslationMetrics {
        &self.metrics
    }

    /// Translation handle for one entity
    pub fn entity<'a, E: Translatable + ?Sized>(&'a self, entity: &'a E) -> EntityTranslations<'a, E> {
        EntityTranslations {
            translator: self,
            entity,
        }
    }
}

/// Gives every [`Translatable`] a `translations()` method.
pub trait TranslatableExt: Translatable {
    fn translations<'a>(&'a self, translator: &'a Translator) -> EntityTranslations<'a, Self> {
        translator.entity(self)
    }
}

impl<T: Translatable + ?Sized> TranslatableExt for T {}

/// Translation operations bound to one entity instance.
pub struct EntityTranslations<'a, E: ?Sized> {
    translator: &'a Translator,
    entity: &'a E,
}

impl<'a, E: Translatable + ?Sized> EntityTranslations<'a, E> {
    pub fn cache_key(&self, language: &str, field: &str) -> String {
        cache_key(
            self.entity.entity_type(),
            self.entity.entity_id(),
            language,
            field,
        )
    }

    fn key(&self, language: &str, field: &str) -> TranslationKey {
        TranslationKey::new(
            self.entity.entity_type(),
            self.entity.entity_id(),
            language,
            field,
        )
    }

    fn check_language(&self, language: &str) -> Result<()> {
        if self.translator.policy == TranslationPolicy::Strict
            && !self.translator.languages.is_supported(language)
        {
            return Err(TranslationError::UnsupportedLanguage(language.to_string()).into());
        }
        Ok(())
    }

    fn check(&self, language: &str, field: &str) -> Result<()> {
        self.check_language(language)?;
        if self.translator.policy == TranslationPolicy::Strict
            && !self.entity.translatable_fields().contains(&field)
        {
            return Err(TranslationError::UnsupportedField {
                entity_type: self.entity.entity_type().to_string(),
                field: field.to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Get-or-create every (language, field) record, languages outer, fields inner.
    ///
    /// Idempotent: a second call returns the same records and creates nothing.
    pub async fn materialize_all(&self) -> Result<Vec<Translation>> {
        let fields = self.entity.translatable_fields();
        let mut translations = Vec::with_capacity(self.translator.languages.len() * fields.len());

        for language in self.translator.languages.codes() {
            for field in fields {
                let record = self
                    .translator
                    .store
                    .get_or_create(&self.key(language, field))
                    .await?;
                translations.push(record);
            }
        }

        info!(
            "Materialized {} translations for {}#{}",
            translations.len(),
            self.entity.entity_type(),
            self.entity.entity_id()
        );
        Ok(translations)
    }

    /// Existing records in `language`, ordered by field. Creates nothing.
    pub async fn list_translations(&self, language: &str) -> Result<Vec<Translation>> {
        self.check_language(language)?;
        self.translator
            .store
            .filter(
                self.entity.entity_type(),
                self.entity.entity_id(),
                language,
            )
            .await
    }

    pub async fn get_translation_record(&self, language: &str, field: &str) -> Result<Translation> {
        self.check(language, field)?;
        self.translator
            .store
            .get_or_create(&self.key(language, field))
            .await
    }

    /// Translated text of `field`, falling back to the entity's own value.
    ///
    /// A non-empty cached value is returned without touching the store.
    /// Otherwise the record's text is used if non-empty, else the entity
    /// attribute (or "" if it has none), and the result is cached either way.
    pub async fn get_translation(&self, language: &str, field: &str) -> Result<String> {
        self.check(language, field)?;
        let key = self.cache_key(language, field);

        if let Some(cached) = self.cache_get(&key).await.filter(|text| !text.is_empty()) {
            self.translator.metrics.record_cache_hit();
            debug!("Translation cache hit for {}", key);
            return Ok(cached);
        }
        self.translator.metrics.record_cache_miss();
        debug!("Translation cache miss for {}", key);

        let record = self
            .translator
            .store
            .get_or_create(&self.key(language, field))
            .await?;

        let text = if record.has_text() {
            record.text.unwrap_or_default()
        } else {
            self.translator.metrics.record_fallback();
            self.entity.field_value(field).unwrap_or_default()
        };

        self.cache_set(&key, &text).await;
        Ok(text)
    }

    /// Store `text` as the translation and overwrite the cached value.
    pub async fn set_translation(&self, language: &str, field: &str, text: &str) -> Result<Translation> {
        self.check(language, field)?;

        let mut record = self
            .translator
            .store
            .get_or_create(&self.key(language, field))
            .await?;
        record.text = Some(text.to_string());
        self.translator.store.save(&record).await?;
        self.translator.metrics.record_write();

        self.cache_set(&self.cache_key(language, field), text).await;
        Ok(record)
    }

    async fn cache_get(&self, key: &str) -> Option<String> {
        match self.translator.cache.get(key).await {
            Ok(value) => value,
            Err(e) => {
                self.translator.metrics.record_cache_error();
                warn!("Translation cache read failed for {}: {:#}", key, e);
                None
            }
        }
    }

    async fn cache_set(&self, key: &str, value: &str) {
        if let Err(e) = self.translator.cache.set(key, value).await {
            self.translator.metrics.record_cache_error();
            warn!("Translation cache write failed for {}: {:#}", key, e);
        }
    }
}
