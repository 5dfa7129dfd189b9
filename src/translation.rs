use serde::{Deserialize, Serialize};

/// A stored translation of one field of one entity into one language.
///
/// Unique per (entity_type, entity_id, language, field). `text` is `None`
/// until someone writes a translation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Translation {
    pub id: i64,
    pub entity_type: String,
    pub entity_id: i64,
    pub language: String,
    pub field: String,
    pub text: Option<String>,
}

impl Translation {
    /// Whether the record carries usable text.
    ///
    /// Empty and absent are the same thing here: both mean "not translated".
    pub fn has_text(&self) -> bool {
        self.text.as_deref().is_some_and(|t| !t.is_empty())
    }

    /// The record's text, or "" when untranslated
    pub fn text_or_empty(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    /// Default listing order: (language, field) ascending
    pub fn sort_key(&self) -> (&str, &str) {
        (&self.language, &self.field)
    }

    pub fn key(&self) -> TranslationKey {
        TranslationKey {
            entity_type: self.entity_type.clone(),
            entity_id: self.entity_id,
            language: self.language.clone(),
            field: self.field.clone(),
        }
    }
}

/// The four-part unique key of a translation record.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TranslationKey {
    pub entity_type: String,
    pub entity_id: i64,
    pub language: String,
    pub field: String,
}

impl TranslationKey {
    pub fn new(entity_type: &str, entity_id: i64, language: &str, field: &str) -> Self {
        Self {
            entity_type: entity_type.to_string(),
            entity_id,
            language: language.to_string(),
            field: field.to_string(),
        }
    }
}

impl std::fmt::Display for TranslationKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}#{} : {} : {}",
            self.entity_type, self.entity_id, self.language, self.field
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(text: Option<&str>) -> Translation {
        Translation {
            id: 1,
            entity_type: "Article".to_string(),
            entity_id: 7,
            language: "fr".to_string(),
            field: "title".to_string(),
            text: text.map(str::to_string),
        }
    }

    #[test]
    fn test_has_text_treats_empty_as_missing() {
        assert!(!record(None).has_text());
        assert!(!record(Some("")).has_text());
        assert!(record(Some("Bonjour")).has_text());
    }

    #[test]
    fn test_text_or_empty() {
        assert_eq!(record(None).text_or_empty(), "");
        assert_eq!(record(Some("Bonjour")).text_or_empty(), "Bonjour");
    }

    #[test]
    fn test_key_matches_record() {
        let key = record(None).key();
        assert_eq!(key, TranslationKey::new("Article", 7, "fr", "title"));
    }

    #[test]
    fn test_key_display() {
        let key = TranslationKey::new("Article", 7, "pt-br", "body");
        assert_eq!(key.to_string(), "Article#7 : pt-br : body");
    }

    #[test]
    fn test_sort_key_orders_by_language_then_field() {
        let mut records = vec![
            Translation { language: "fr".into(), field: "body".into(), ..record(None) },
            Translation { language: "en".into(), field: "title".into(), ..record(None) },
            Translation { language: "en".into(), field: "body".into(), ..record(None) },
        ];
        records.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));

        let order: Vec<_> = records
            .iter()
            .map(|r| (r.language.as_str(), r.field.as_str()))
            .collect();
        assert_eq!(order, vec![("en", "body"), ("en", "title"), ("fr", "body")]);
    }
}
