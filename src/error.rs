use thiserror::Error;

/// Errors raised by the language registry, translation overlay and generator.
#[derive(Error, Debug)]
pub enum TranslationError {
    #[error("invalid language code '{0}': expected a code like 'en' or 'pt-BR'")]
    InvalidLanguageCode(String),

    #[error("invalid model name '{0}': must start with a letter and contain only letters, numbers and underscores")]
    InvalidModelName(String),

    #[error("invalid identifier '{0}'")]
    InvalidIdentifier(String),

    #[error("invalid value for {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("field '{field}' exceeds the maximum length of {max} characters")]
    FieldTooLong { field: String, max: usize },

    #[error("unknown translatable field '{0}'")]
    UnknownField(String),

    #[error("could not find table '{table}' for model {model}")]
    SchemaNotFound { model: String, table: String },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TranslationError {
    /// True for errors caused by caller input rather than the store or filesystem.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            TranslationError::InvalidLanguageCode(_)
                | TranslationError::InvalidModelName(_)
                | TranslationError::InvalidIdentifier(_)
                | TranslationError::Validation { .. }
                | TranslationError::FieldTooLong { .. }
                | TranslationError::UnknownField(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, TranslationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_are_flagged() {
        assert!(TranslationError::InvalidLanguageCode("EN".into()).is_validation());
        assert!(TranslationError::FieldTooLong {
            field: "title".into(),
            max: 10
        }
        .is_validation());
        assert!(!TranslationError::Database(sqlx::Error::RowNotFound).is_validation());
    }

    #[test]
    fn test_messages_name_the_offending_value() {
        let err = TranslationError::SchemaNotFound {
            model: "Post".into(),
            table: "posts".into(),
        };
        assert_eq!(err.to_string(), "could not find table 'posts' for model Post");
    }
}
