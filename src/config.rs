use crate::i18n::LanguageRegistry;
use crate::translatable::TranslationPolicy;
use anyhow::{Context, Result};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    // Storage
    pub database_url: String,
    pub database_max_connections: u32,

    // Languages translations are kept in
    pub languages: LanguageRegistry,

    // Cache
    pub cache_enabled: bool,
    pub cache_ttl: Option<Duration>,

    // Validation of (language, field) pairs
    pub policy: TranslationPolicy,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            // Storage
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://klingon.db".to_string()),
            database_max_connections: std::env::var("DATABASE_MAX_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),

            // Languages
            languages: LanguageRegistry::parse(
                &std::env::var("TRANSLATION_LANGUAGES")
                    .unwrap_or_else(|_| "en:English,es:Spanish".to_string()),
            )
            .context("TRANSLATION_LANGUAGES is invalid")?,

            // Cache - TTL of 0 or unset means entries never expire
            cache_enabled: std::env::var("TRANSLATION_CACHE_ENABLED")
                .map(|v| !matches!(v.trim().to_ascii_lowercase().as_str(), "0" | "false" | "no" | "off"))
                .unwrap_or(true),
            cache_ttl: std::env::var("TRANSLATION_CACHE_TTL_SECS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),

            // Policy
            policy: match std::env::var("TRANSLATION_POLICY") {
                Ok(v) => v.parse::<TranslationPolicy>().context("TRANSLATION_POLICY is invalid")?,
                Err(_) => TranslationPolicy::default(),
            },
        })
    }
}
