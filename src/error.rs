use thiserror::Error;

/// Domain errors raised by the translation layer.
///
/// Storage and configuration failures travel as `anyhow::Error`; these are the
/// cases a caller may want to match on (via `anyhow::Error::downcast_ref`).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TranslationError {
    /// Language is not in the configured registry (strict policy only)
    #[error("Unsupported language: '{0}'")]
    UnsupportedLanguage(String),

    /// Field is not declared translatable by the entity (strict policy only)
    #[error("Field '{field}' is not translatable on {entity_type}")]
    UnsupportedField { entity_type: String, field: String },

    /// Record id passed to `save` does not exist in the store
    #[error("Translation {0} not found")]
    NotFound(i64),

    /// Supported-language list failed validation
    #[error("Invalid language configuration: {0}")]
    InvalidLanguages(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_field_message() {
        let err = TranslationError::UnsupportedField {
            entity_type: "Article".to_string(),
            field: "slug".to_string(),
        };
        assert_eq!(err.to_string(), "Field 'slug' is not translatable on Article");
    }

    #[test]
    fn test_downcast_through_anyhow() {
        let err: anyhow::Error = TranslationError::UnsupportedLanguage("xx".to_string()).into();
        assert_eq!(
            err.downcast_ref::<TranslationError>(),
            Some(&TranslationError::UnsupportedLanguage("xx".to_string()))
        );
    }
}
