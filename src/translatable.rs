//! Translation overlay for base entities.
//!
//! Each translatable model has a `<model>_translations` table holding at most
//! one row per (entity, language). A translated attribute resolves to the
//! row's value when it is non-null and to the entity's own value otherwise.
//!
//! # Example
//!
//! ```rust,ignore
//! let store = TranslationStore::from_config(db, &config);
//! store.save_translation(&post, &data, Some("fr")).await?;
//! let title = store.translated_attribute(&post, "title", Some("fr")).await?;
//! ```

use crate::config::Config;
use crate::db::Database;
use crate::error::{Result, TranslationError};
use crate::validation::{validate_identifier, validate_language_code};
use chrono::Utc;
use serde::Serialize;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

pub const LANGUAGE_CODE_FIELD: &str = "language_code";

/// Static description of one translation table.
///
/// Generated by `create-translation`; `fillable` is the write allow-list and
/// always ends with `language_code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranslationSchema {
    pub model: &'static str,
    pub table: &'static str,
    pub foreign_key: &'static str,
    pub fillable: &'static [&'static str],
}

impl TranslationSchema {
    /// Fillable columns that hold translated values
    pub fn translatable_fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fillable
            .iter()
            .copied()
            .filter(|field| *field != LANGUAGE_CODE_FIELD)
    }

    pub fn is_fillable(&self, field: &str) -> bool {
        self.fillable.iter().any(|f| *f == field)
    }

    /// Every name here is interpolated into SQL.
    pub fn validate(&self) -> Result<()> {
        validate_identifier(self.table)?;
        validate_identifier(self.foreign_key)?;
        for field in self.fillable {
            validate_identifier(field)?;
        }
        Ok(())
    }
}

/// A base entity that can carry translations.
pub trait Translatable {
    fn translation_schema() -> &'static TranslationSchema;

    /// Attributes resolved through the overlay
    fn translatable_attributes() -> &'static [&'static str];

    /// Primary key referenced by the translation table's foreign key
    fn key(&self) -> i64;

    /// The entity's own stored value for an attribute
    fn original_attribute(&self, attribute: &str) -> Option<String>;
}

/// One row of a translation table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranslationRow {
    pub id: i64,
    pub entity_id: i64,
    pub language_code: String,
    pub values: BTreeMap<String, Option<String>>,
}

impl TranslationRow {
    /// Translated value, `None` when the column is null or not part of the schema
    pub fn get(&self, field: &str) -> Option<&str> {
        self.values.get(field).and_then(|v| v.as_deref())
    }

    fn from_row(row: &SqliteRow, schema: &TranslationSchema) -> Result<Self> {
        let mut values = BTreeMap::new();
        for field in schema.translatable_fields() {
            values.insert(field.to_string(), row.try_get::<Option<String>, _>(field)?);
        }

        Ok(Self {
            id: row.try_get("id")?,
            entity_id: row.try_get("entity_id")?,
            language_code: row.try_get(LANGUAGE_CODE_FIELD)?,
            values,
        })
    }
}

/// Reads and writes translation rows for `Translatable` entities.
#[derive(Clone, Debug)]
pub struct TranslationStore {
    db: Database,
    default_language: String,
    max_length: usize,
    validate_codes: bool,
}

impl TranslationStore {
    pub fn new(db: Database, default_language: &str, max_length: usize, validate_codes: bool) -> Self {
        Self {
            db,
            default_language: default_language.to_string(),
            max_length,
            validate_codes,
        }
    }

    /// Store using the configured default language, length limit and code check
    pub fn from_config(db: Database, config: &Config) -> Self {
        Self::new(
            db,
            &config.default_language,
            config.security.max_translation_length,
            config.security.validate_language_codes,
        )
    }

    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    fn language<'a>(&'a self, language: Option<&'a str>) -> &'a str {
        language.unwrap_or(&self.default_language)
    }

    fn checked_language<'a>(&'a self, language: Option<&'a str>) -> Result<&'a str> {
        let code = self.language(language);
        if self.validate_codes {
            validate_language_code(code)?;
        }
        Ok(code)
    }

    fn select_sql(schema: &TranslationSchema) -> String {
        let mut columns = vec![
            "id".to_string(),
            format!("{} AS entity_id", schema.foreign_key),
            LANGUAGE_CODE_FIELD.to_string(),
        ];
        columns.extend(schema.translatable_fields().map(str::to_string));
        format!("SELECT {} FROM {}", columns.join(", "), schema.table)
    }

    /// The entity's translation row for a language
    pub async fn translation<E: Translatable>(
        &self,
        entity: &E,
        language: Option<&str>,
    ) -> Result<Option<TranslationRow>> {
        let schema = E::translation_schema();
        schema.validate()?;

        let sql = format!(
            "{} WHERE {} = ?1 AND language_code = ?2",
            Self::select_sql(schema),
            schema.foreign_key
        );
        let row = sqlx::query(&sql)
            .bind(entity.key())
            .bind(self.language(language))
            .fetch_optional(self.db.pool())
            .await?;

        row.map(|r| TranslationRow::from_row(&r, schema)).transpose()
    }

    /// All of the entity's rows for the given languages in a single query, keyed by language
    pub async fn translations_for<E: Translatable>(
        &self,
        entity: &E,
        languages: &[String],
    ) -> Result<HashMap<String, TranslationRow>> {
        let schema = E::translation_schema();
        schema.validate()?;

        if languages.is_empty() {
            return Ok(HashMap::new());
        }

        let placeholders = (0..languages.len())
            .map(|i| format!("?{}", i + 2))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "{} WHERE {} = ?1 AND language_code IN ({})",
            Self::select_sql(schema),
            schema.foreign_key,
            placeholders
        );

        let mut query = sqlx::query(&sql).bind(entity.key());
        for language in languages {
            query = query.bind(language);
        }

        let rows = query.fetch_all(self.db.pool()).await?;
        let mut translations = HashMap::with_capacity(rows.len());
        for row in &rows {
            let translation = TranslationRow::from_row(row, schema)?;
            translations.insert(translation.language_code.clone(), translation);
        }

        Ok(translations)
    }

    /// Translated value if present, otherwise the entity's original value
    pub async fn translated_attribute<E: Translatable>(
        &self,
        entity: &E,
        attribute: &str,
        language: Option<&str>,
    ) -> Result<Option<String>> {
        let translation = self.translation(entity, language).await?;
        Ok(resolve(entity, translation.as_ref(), attribute))
    }

    /// Every translatable attribute resolved for one language
    pub async fn translated_attributes<E: Translatable>(
        &self,
        entity: &E,
        language: Option<&str>,
    ) -> Result<BTreeMap<String, Option<String>>> {
        let translation = self.translation(entity, language).await?;

        Ok(E::translatable_attributes()
            .iter()
            .map(|attribute| {
                (
                    attribute.to_string(),
                    resolve(entity, translation.as_ref(), attribute),
                )
            })
            .collect())
    }

    /// Create or update the entity's row for a language.
    ///
    /// Only fields in the schema's fillable list are written; the language
    /// code itself is never taken from `data`.
    pub async fn save_translation<E: Translatable>(
        &self,
        entity: &E,
        data: &BTreeMap<String, Option<String>>,
        language: Option<&str>,
    ) -> Result<TranslationRow> {
        let schema = E::translation_schema();
        schema.validate()?;
        let language = self.checked_language(language)?;

        let safe: Vec<(&str, Option<&str>)> = data
            .iter()
            .filter(|(field, _)| field.as_str() != LANGUAGE_CODE_FIELD && schema.is_fillable(field.as_str()))
            .map(|(field, value)| (field.as_str(), value.as_deref()))
            .collect();

        let dropped = data.len() - safe.len();
        if dropped > 0 {
            debug!("Ignored {} non-fillable fields for {}", dropped, schema.table);
        }

        for (field, value) in &safe {
            if let Some(value) = value {
                if value.chars().count() > self.max_length {
                    return Err(TranslationError::FieldTooLong {
                        field: field.to_string(),
                        max: self.max_length,
                    });
                }
            }
        }

        let now = Utc::now().to_rfc3339();
        let mut tx = self.db.pool().begin().await?;

        let existing: Option<i64> = sqlx::query_scalar(&format!(
            "SELECT id FROM {} WHERE {} = ?1 AND language_code = ?2",
            schema.table, schema.foreign_key
        ))
        .bind(entity.key())
        .bind(language)
        .fetch_optional(&mut *tx)
        .await?;

        match existing {
            Some(id) => {
                let assignments: Vec<String> = safe
                    .iter()
                    .enumerate()
                    .map(|(i, (field, _))| format!("{} = ?{}", field, i + 3))
                    .collect();
                let sql = format!(
                    "UPDATE {} SET updated_at = ?1{} WHERE id = ?2",
                    schema.table,
                    assignments.iter().map(|a| format!(", {}", a)).collect::<String>()
                );

                let mut query = sqlx::query(&sql).bind(&now).bind(id);
                for (_, value) in &safe {
                    query = query.bind(*value);
                }
                query.execute(&mut *tx).await?;
            }
            None => {
                let mut columns = vec![schema.foreign_key, LANGUAGE_CODE_FIELD, "created_at", "updated_at"];
                columns.extend(safe.iter().map(|(field, _)| *field));
                let placeholders = (0..columns.len())
                    .map(|i| format!("?{}", i + 1))
                    .collect::<Vec<_>>()
                    .join(", ");
                let sql = format!(
                    "INSERT INTO {} ({}) VALUES ({})",
                    schema.table,
                    columns.join(", "),
                    placeholders
                );

                let mut query = sqlx::query(&sql)
                    .bind(entity.key())
                    .bind(language)
                    .bind(&now)
                    .bind(&now);
                for (_, value) in &safe {
                    query = query.bind(*value);
                }
                query.execute(&mut *tx).await?;
            }
        }

        let row = sqlx::query(&format!(
            "{} WHERE {} = ?1 AND language_code = ?2",
            Self::select_sql(schema),
            schema.foreign_key
        ))
        .bind(entity.key())
        .bind(language)
        .fetch_one(&mut *tx)
        .await?;
        let saved = TranslationRow::from_row(&row, schema)?;

        tx.commit().await?;
        debug!("Saved {} translation for {} #{}", language, schema.model, entity.key());
        Ok(saved)
    }

    /// Returns false when the entity has no row for the language.
    pub async fn delete_translation<E: Translatable>(
        &self,
        entity: &E,
        language: Option<&str>,
    ) -> Result<bool> {
        let schema = E::translation_schema();
        schema.validate()?;
        let language = self.checked_language(language)?;

        let rows_affected = sqlx::query(&format!(
            "DELETE FROM {} WHERE {} = ?1 AND language_code = ?2",
            schema.table, schema.foreign_key
        ))
        .bind(entity.key())
        .bind(language)
        .execute(self.db.pool())
        .await?
        .rows_affected();

        Ok(rows_affected > 0)
    }

    /// Distinct language codes the entity has rows for
    pub async fn available_languages<E: Translatable>(&self, entity: &E) -> Result<Vec<String>> {
        let schema = E::translation_schema();
        schema.validate()?;

        let languages: Vec<String> = sqlx::query_scalar(&format!(
            "SELECT DISTINCT language_code FROM {} WHERE {} = ?1 ORDER BY language_code",
            schema.table, schema.foreign_key
        ))
        .bind(entity.key())
        .fetch_all(self.db.pool())
        .await?;

        Ok(languages)
    }

    pub async fn has_translation<E: Translatable>(&self, entity: &E, language: &str) -> Result<bool> {
        let schema = E::translation_schema();
        schema.validate()?;

        let count: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM {} WHERE {} = ?1 AND language_code = ?2",
            schema.table, schema.foreign_key
        ))
        .bind(entity.key())
        .bind(language)
        .fetch_one(self.db.pool())
        .await?;

        Ok(count > 0)
    }

    /// Keys of the entities of type `E` that have a row for the language
    pub async fn entities_with_translation<E: Translatable>(&self, language: &str) -> Result<Vec<i64>> {
        let schema = E::translation_schema();
        schema.validate()?;

        let ids: Vec<i64> = sqlx::query_scalar(&format!(
            "SELECT DISTINCT {fk} FROM {table} WHERE language_code = ?1 ORDER BY {fk}",
            fk = schema.foreign_key,
            table = schema.table
        ))
        .bind(language)
        .fetch_all(self.db.pool())
        .await?;

        Ok(ids)
    }
}

fn resolve<E: Translatable>(
    entity: &E,
    translation: Option<&TranslationRow>,
    attribute: &str,
) -> Option<String> {
    translation
        .and_then(|t| t.get(attribute))
        .map(str::to_string)
        .or_else(|| entity.original_attribute(attribute))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    // ==================== Fixtures ====================

    pub(crate) static POST_TRANSLATION: TranslationSchema = TranslationSchema {
        model: "Post",
        table: "post_translations",
        foreign_key: "post_id",
        fillable: &["title", "content", LANGUAGE_CODE_FIELD],
    };

    #[derive(Debug, Clone)]
    pub(crate) struct Post {
        pub id: i64,
        pub title: String,
        pub content: Option<String>,
        pub status: String,
    }

    impl Translatable for Post {
        fn translation_schema() -> &'static TranslationSchema {
            &POST_TRANSLATION
        }

        fn translatable_attributes() -> &'static [&'static str] {
            &["title", "content"]
        }

        fn key(&self) -> i64 {
            self.id
        }

        fn original_attribute(&self, attribute: &str) -> Option<String> {
            match attribute {
                "title" => Some(self.title.clone()),
                "content" => self.content.clone(),
                "status" => Some(self.status.clone()),
                _ => None,
            }
        }
    }

    pub(crate) const SCHEMA_SQL: &str = "
        CREATE TABLE posts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            content TEXT,
            status TEXT NOT NULL DEFAULT 'draft'
        );
        CREATE TABLE post_translations (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            post_id INTEGER NOT NULL REFERENCES posts(id) ON DELETE CASCADE,
            language_code TEXT NOT NULL,
            title TEXT NULL,
            content TEXT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            UNIQUE (post_id, language_code)
        );
        INSERT INTO posts (id, title, content, status) VALUES (1, 'Hello', 'Original body', 'published');
        INSERT INTO posts (id, title, content, status) VALUES (2, 'Second', NULL, 'draft');
    ";

    pub(crate) fn post(id: i64) -> Post {
        match id {
            1 => Post {
                id: 1,
                title: "Hello".to_string(),
                content: Some("Original body".to_string()),
                status: "published".to_string(),
            },
            _ => Post {
                id,
                title: "Second".to_string(),
                content: None,
                status: "draft".to_string(),
            },
        }
    }

    pub(crate) async fn create_test_db() -> Database {
        let db = Database::in_memory().await.expect("Failed to create database");
        db.execute_script(SCHEMA_SQL).await.expect("Failed to create schema");
        db
    }

    async fn create_store() -> TranslationStore {
        TranslationStore::new(create_test_db().await, "en", 20, true)
    }

    fn data(pairs: &[(&str, Option<&str>)]) -> BTreeMap<String, Option<String>> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.map(str::to_string)))
            .collect()
    }

    // ==================== Schema Tests ====================

    #[test]
    fn test_translatable_fields_exclude_language_code() {
        let fields: Vec<_> = POST_TRANSLATION.translatable_fields().collect();
        assert_eq!(fields, vec!["title", "content"]);
        assert!(POST_TRANSLATION.is_fillable("language_code"));
        assert!(!POST_TRANSLATION.is_fillable("status"));
    }

    #[test]
    fn test_schema_validate_rejects_injected_names() {
        let schema = TranslationSchema {
            model: "Post",
            table: "post_translations; DROP TABLE posts",
            foreign_key: "post_id",
            fillable: &["title", LANGUAGE_CODE_FIELD],
        };
        assert!(schema.validate().is_err());
    }

    // ==================== save_translation Tests ====================

    #[tokio::test]
    async fn test_save_and_get_translation() {
        let store = create_store().await;
        let post = post(1);

        let saved = store
            .save_translation(&post, &data(&[("title", Some("Bonjour"))]), Some("fr"))
            .await
            .expect("Should save");
        assert_eq!(saved.language_code, "fr");
        assert_eq!(saved.entity_id, 1);
        assert_eq!(saved.get("title"), Some("Bonjour"));
        assert_eq!(saved.get("content"), None);

        let fetched = store.translation(&post, Some("fr")).await.unwrap().unwrap();
        assert_eq!(fetched, saved);
    }

    #[tokio::test]
    async fn test_missing_translation_is_none() {
        let store = create_store().await;
        assert!(store.translation(&post(1), Some("de")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_updates_existing_row() {
        let store = create_store().await;
        let post = post(1);

        let first = store
            .save_translation(&post, &data(&[("title", Some("Hola")), ("content", Some("Cuerpo"))]), Some("es"))
            .await
            .unwrap();
        let second = store
            .save_translation(&post, &data(&[("title", Some("Hola!"))]), Some("es"))
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.get("title"), Some("Hola!"));
        // Fields absent from the update keep their value
        assert_eq!(second.get("content"), Some("Cuerpo"));
        assert_eq!(store.available_languages(&post).await.unwrap(), vec!["es"]);
    }

    #[tokio::test]
    async fn test_save_ignores_non_fillable_fields() {
        let store = create_store().await;
        let post = post(1);

        let saved = store
            .save_translation(
                &post,
                &data(&[
                    ("title", Some("Hallo")),
                    ("status", Some("hacked")),
                    ("language_code", Some("fr")),
                ]),
                Some("de"),
            )
            .await
            .unwrap();

        assert_eq!(saved.language_code, "de");
        assert!(!saved.values.contains_key("status"));
        assert!(!store.has_translation(&post, "fr").await.unwrap());
    }

    #[tokio::test]
    async fn test_save_enforces_max_length() {
        let store = create_store().await;
        let long = "x".repeat(21);

        let result = store
            .save_translation(&post(1), &data(&[("title", Some(long.as_str()))]), Some("fr"))
            .await;

        assert!(matches!(result, Err(TranslationError::FieldTooLong { max: 20, .. })));
        assert!(!store.has_translation(&post(1), "fr").await.unwrap());
    }

    #[tokio::test]
    async fn test_store_from_config_applies_limits() {
        let mut config = Config::default();
        config.default_language = "es".to_string();
        config.security.max_translation_length = 5;
        let store = TranslationStore::from_config(create_test_db().await, &config);

        assert_eq!(store.default_language(), "es");
        let result = store
            .save_translation(&post(1), &data(&[("title", Some("Buenos"))]), None)
            .await;
        assert!(matches!(result, Err(TranslationError::FieldTooLong { max: 5, .. })));

        let saved = store
            .save_translation(&post(1), &data(&[("title", Some("Hola"))]), None)
            .await
            .unwrap();
        assert_eq!(saved.language_code, "es");
    }

    #[tokio::test]
    async fn test_store_from_config_can_skip_code_validation() {
        let mut config = Config::default();
        config.security.validate_language_codes = false;
        let store = TranslationStore::from_config(create_test_db().await, &config);

        let saved = store
            .save_translation(&post(1), &data(&[("title", Some("Hi"))]), Some("en_GB"))
            .await
            .unwrap();
        assert_eq!(saved.language_code, "en_GB");
    }

    #[tokio::test]
    async fn test_save_rejects_invalid_language_code() {
        let store = create_store().await;
        let result = store
            .save_translation(&post(1), &data(&[("title", Some("x"))]), Some("French"))
            .await;
        assert!(matches!(result, Err(TranslationError::InvalidLanguageCode(_))));
    }

    #[tokio::test]
    async fn test_language_defaults_to_store_default() {
        let store = create_store().await;
        let post = post(1);

        store
            .save_translation(&post, &data(&[("title", Some("Hi"))]), None)
            .await
            .unwrap();

        assert!(store.has_translation(&post, "en").await.unwrap());
        assert_eq!(
            store.translated_attribute(&post, "title", None).await.unwrap().as_deref(),
            Some("Hi")
        );
    }

    // ==================== Resolution Tests ====================

    #[tokio::test]
    async fn test_translated_attribute_falls_back_to_original() {
        let store = create_store().await;
        let post = post(1);

        let title = store.translated_attribute(&post, "title", Some("it")).await.unwrap();
        assert_eq!(title.as_deref(), Some("Hello"));
    }

    #[tokio::test]
    async fn test_null_translation_value_falls_back_to_original() {
        let store = create_store().await;
        let post = post(1);
        store
            .save_translation(&post, &data(&[("title", Some("Ciao"))]), Some("it"))
            .await
            .unwrap();

        let attributes = store.translated_attributes(&post, Some("it")).await.unwrap();
        assert_eq!(attributes["title"].as_deref(), Some("Ciao"));
        assert_eq!(attributes["content"].as_deref(), Some("Original body"));
        assert_eq!(attributes.len(), 2);
    }

    #[tokio::test]
    async fn test_translated_attributes_without_any_translation() {
        let store = create_store().await;
        let attributes = store.translated_attributes(&post(2), Some("fr")).await.unwrap();
        assert_eq!(attributes["title"].as_deref(), Some("Second"));
        assert_eq!(attributes["content"], None);
    }

    // ==================== Batched Fetch Tests ====================

    #[tokio::test]
    async fn test_translations_for_returns_requested_languages_only() {
        let store = create_store().await;
        let post = post(1);
        for (lang, title) in [("fr", "Bonjour"), ("es", "Hola"), ("de", "Hallo")] {
            store
                .save_translation(&post, &data(&[("title", Some(title))]), Some(lang))
                .await
                .unwrap();
        }

        let languages = vec!["fr".to_string(), "es".to_string(), "it".to_string()];
        let rows = store.translations_for(&post, &languages).await.unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows["fr"].get("title"), Some("Bonjour"));
        assert_eq!(rows["es"].get("title"), Some("Hola"));
        assert!(!rows.contains_key("de"));
    }

    #[tokio::test]
    async fn test_translations_for_empty_language_list() {
        let store = create_store().await;
        assert!(store.translations_for(&post(1), &[]).await.unwrap().is_empty());
    }

    // ==================== Delete & Membership Tests ====================

    #[tokio::test]
    async fn test_delete_translation() {
        let store = create_store().await;
        let post = post(1);
        store
            .save_translation(&post, &data(&[("title", Some("Hola"))]), Some("es"))
            .await
            .unwrap();

        assert!(store.delete_translation(&post, Some("es")).await.unwrap());
        assert!(!store.has_translation(&post, "es").await.unwrap());
        assert_eq!(
            store.translated_attribute(&post, "title", Some("es")).await.unwrap().as_deref(),
            Some("Hello")
        );
    }

    #[tokio::test]
    async fn test_delete_missing_translation_returns_false() {
        let store = create_store().await;
        assert!(!store.delete_translation(&post(1), Some("es")).await.unwrap());
    }

    #[tokio::test]
    async fn test_translations_are_scoped_to_entity() {
        let store = create_store().await;
        store
            .save_translation(&post(1), &data(&[("title", Some("Hola"))]), Some("es"))
            .await
            .unwrap();
        store
            .save_translation(&post(2), &data(&[("title", Some("Zweite"))]), Some("de"))
            .await
            .unwrap();

        assert_eq!(store.available_languages(&post(1)).await.unwrap(), vec!["es"]);
        assert!(!store.has_translation(&post(2), "es").await.unwrap());
        assert_eq!(store.entities_with_translation::<Post>("es").await.unwrap(), vec![1]);
        assert_eq!(store.entities_with_translation::<Post>("de").await.unwrap(), vec![2]);
        assert!(store.entities_with_translation::<Post>("fr").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_deleting_entity_cascades() {
        let db = create_test_db().await;
        let store = TranslationStore::new(db.clone(), "en", 100, true);
        store
            .save_translation(&post(1), &data(&[("title", Some("Hola"))]), Some("es"))
            .await
            .unwrap();

        db.execute_script("DELETE FROM posts WHERE id = 1").await.unwrap();

        assert!(store.available_languages(&post(1)).await.unwrap().is_empty());
    }
}
