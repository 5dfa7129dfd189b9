//! Language registry: the ordered set of languages translations are kept in.
//!
//! The registry is built once from configuration and handed to the
//! `Translator`. Order matters: `materialize_all` walks languages in the
//! order they were configured.

use crate::error::TranslationError;
use std::collections::HashSet;

/// Longest accepted language code ("pt-br", "zh-tw", ...)
pub const MAX_CODE_LEN: usize = 5;

/// Configuration for a supported language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageConfig {
    /// Short language code (e.g., "en", "pt-br")
    pub code: String,

    /// Display name (e.g., "English"); defaults to the code
    pub name: String,
}

impl LanguageConfig {
    pub fn new(code: &str, name: &str) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
        }
    }
}

/// Ordered, validated list of supported languages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageRegistry {
    languages: Vec<LanguageConfig>,
}

impl LanguageRegistry {
    /// Build a registry, rejecting empty lists, empty or over-long codes, and duplicates.
    pub fn new(languages: Vec<LanguageConfig>) -> Result<Self, TranslationError> {
        if languages.is_empty() {
            return Err(TranslationError::InvalidLanguages(
                "at least one language is required".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for lang in &languages {
            if lang.code.is_empty() {
                return Err(TranslationError::InvalidLanguages(
                    "language code cannot be empty".to_string(),
                ));
            }
            if lang.code.chars().count() > MAX_CODE_LEN {
                return Err(TranslationError::InvalidLanguages(format!(
                    "language code '{}' is longer than {} characters",
                    lang.code, MAX_CODE_LEN
                )));
            }
            if !seen.insert(lang.code.as_str()) {
                return Err(TranslationError::InvalidLanguages(format!(
                    "duplicate language code '{}'",
                    lang.code
                )));
            }
        }

        Ok(Self { languages })
    }

    /// Registry from bare codes; names default to the codes
    pub fn from_codes<I, S>(codes: I) -> Result<Self, TranslationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(
            codes
                .into_iter()
                .map(|c| LanguageConfig::new(c.as_ref(), c.as_ref()))
                .collect(),
        )
    }

    /// Parse a `code[:Name],code[:Name]` list such as `en:English,es:Spanish,pt-br`
    pub fn parse(list: &str) -> Result<Self, TranslationError> {
        let languages = list
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(|entry| match entry.split_once(':') {
                Some((code, name)) => {
                    let code = code.trim();
                    let name = name.trim();
                    LanguageConfig::new(code, if name.is_empty() { code } else { name })
                }
                None => LanguageConfig::new(entry, entry),
            })
            .collect();

        Self::new(languages)
    }

    pub fn get_by_code(&self, code: &str) -> Option<&LanguageConfig> {
        self.languages.iter().find(|lang| lang.code == code)
    }

    pub fn is_supported(&self, code: &str) -> bool {
        self.get_by_code(code).is_some()
    }

    /// Codes in configured order
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.languages.iter().map(|lang| lang.code.as_str())
    }

    pub fn list_all(&self) -> &[LanguageConfig] {
        &self.languages
    }

    pub fn len(&self) -> usize {
        self.languages.len()
    }

    /// Always false for a constructed registry
    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }
}

impl Default for LanguageRegistry {
    /// English and Spanish
    fn default() -> Self {
        Self {
            languages: vec![
                LanguageConfig::new("en", "English"),
                LanguageConfig::new("es", "Spanish"),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_contains_english_and_spanish() {
        let registry = LanguageRegistry::default();
        let codes: Vec<_> = registry.codes().collect();
        assert_eq!(codes, vec!["en", "es"]);
        assert_eq!(registry.get_by_code("en").unwrap().name, "English");
    }

    #[test]
    fn test_parse_preserves_order_and_names() {
        let registry = LanguageRegistry::parse("fr:Français, en:English,pt-br").expect("parse");

        let codes: Vec<_> = registry.codes().collect();
        assert_eq!(codes, vec!["fr", "en", "pt-br"]);
        assert_eq!(registry.get_by_code("fr").unwrap().name, "Français");
        assert_eq!(registry.get_by_code("pt-br").unwrap().name, "pt-br");
    }

    #[test]
    fn test_parse_skips_blank_entries() {
        let registry = LanguageRegistry::parse("en,,es,").expect("parse");
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_parse_empty_name_defaults_to_code() {
        let registry = LanguageRegistry::parse("de:").expect("parse");
        assert_eq!(registry.get_by_code("de").unwrap().name, "de");
    }

    #[test]
    fn test_empty_list_rejected() {
        assert!(matches!(
            LanguageRegistry::parse(" , "),
            Err(TranslationError::InvalidLanguages(_))
        ));
    }

    #[test]
    fn test_duplicate_code_rejected() {
        let err = LanguageRegistry::from_codes(["en", "es", "en"]).unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn test_long_code_rejected() {
        let err = LanguageRegistry::from_codes(["english"]).unwrap_err();
        assert!(err.to_string().contains("longer than 5"));
    }

    #[test]
    fn test_empty_code_rejected() {
        let err = LanguageRegistry::parse(":English").unwrap_err();
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn test_is_supported() {
        let registry = LanguageRegistry::from_codes(["en", "pt-br"]).expect("registry");
        assert!(registry.is_supported("pt-br"));
        assert!(!registry.is_supported("fr"));
        assert!(!registry.is_empty());
    }
}
