//! Per-entity, per-language, per-field translation storage.
//!
//! - `store` / `db`: where translation records live
//! - `cache`: the shared read-through cache
//! - `translatable`: the capability entities opt into
//! - `i18n`: the supported-language registry

pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod i18n;
pub mod metrics;
pub mod store;
pub mod translatable;
pub mod translation;

pub use cache::{MemoryCache, NullCache, TranslationCache};
pub use db::Database;
pub use error::TranslationError;
pub use i18n::{LanguageConfig, LanguageRegistry};
pub use metrics::{MetricsReport, TranslationMetrics};
pub use store::{MemoryStore, TranslationStore};
pub use translatable::{
    cache_key, EntityTranslations, Translatable, TranslatableExt, TranslationPolicy, Translator,
};
pub use translation::{Translation, TranslationKey};
