//! Language registry: the set of languages content can be translated into.
//!
//! Languages live in a configurable table (default `languages`) that is
//! created and seeded on first use. Active languages are the ones offered
//! to editors and end users.

use crate::db::Database;
use crate::error::{Result, TranslationError};
use crate::validation::{validate_identifier, validate_language_code};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tracing::{debug, info};

const MAX_CODE_LENGTH: usize = 10;
const MAX_NAME_LENGTH: usize = 255;

/// A row of the languages table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Language {
    pub id: i64,
    pub language_code: String,
    pub name: String,
    pub native_name: Option<String>,
    pub is_active: bool,
    pub sort_order: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl Language {
    /// Native name when present, English name otherwise
    pub fn display_name(&self) -> &str {
        match self.native_name.as_deref() {
            Some(native) if !native.is_empty() => native,
            _ => &self.name,
        }
    }
}

/// Incoming data for creating or updating a language.
///
/// Optional fields left as `None` take the table default on insert and keep
/// their stored value on update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LanguageInput {
    pub language_code: String,
    pub name: String,
    #[serde(default)]
    pub native_name: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub sort_order: Option<i64>,
}

impl LanguageInput {
    pub fn new(language_code: &str, name: &str) -> Self {
        Self {
            language_code: language_code.to_string(),
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.language_code.is_empty() {
            return Err(TranslationError::Validation {
                field: "language_code",
                reason: "is required".to_string(),
            });
        }
        if self.language_code.chars().count() > MAX_CODE_LENGTH {
            return Err(TranslationError::Validation {
                field: "language_code",
                reason: format!("must not exceed {} characters", MAX_CODE_LENGTH),
            });
        }
        validate_language_code(&self.language_code)?;

        if self.name.trim().is_empty() {
            return Err(TranslationError::Validation {
                field: "name",
                reason: "is required".to_string(),
            });
        }
        if self.name.chars().count() > MAX_NAME_LENGTH {
            return Err(TranslationError::Validation {
                field: "name",
                reason: format!("must not exceed {} characters", MAX_NAME_LENGTH),
            });
        }
        if let Some(native) = &self.native_name {
            if native.chars().count() > MAX_NAME_LENGTH {
                return Err(TranslationError::Validation {
                    field: "native_name",
                    reason: format!("must not exceed {} characters", MAX_NAME_LENGTH),
                });
            }
        }
        if let Some(order) = self.sort_order {
            if order < 0 {
                return Err(TranslationError::Validation {
                    field: "sort_order",
                    reason: "must be at least 0".to_string(),
                });
            }
        }

        Ok(())
    }
}

/// (code, English name, native name, active, sort order)
const DEFAULT_LANGUAGES: [(&str, &str, &str, bool, i64); 8] = [
    ("en", "English", "English", true, 1),
    ("es", "Spanish", "Español", false, 2),
    ("fr", "French", "Français", false, 3),
    ("de", "German", "Deutsch", false, 4),
    ("it", "Italian", "Italiano", false, 5),
    ("pt", "Portuguese", "Português", false, 6),
    ("ar", "Arabic", "العربية", false, 7),
    ("zh", "Chinese", "中文", false, 8),
];

/// CRUD over the languages table.
#[derive(Clone, Debug)]
pub struct LanguageManager {
    db: Database,
    table: String,
}

impl LanguageManager {
    pub fn new(db: Database, table: &str) -> Result<Self> {
        validate_identifier(table)?;
        Ok(Self {
            db,
            table: table.to_string(),
        })
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// DDL for the languages table
    pub fn create_table_sql(&self) -> String {
        format!(
            "CREATE TABLE IF NOT EXISTS {table} (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    language_code TEXT NOT NULL UNIQUE CHECK (length(language_code) <= {max_code}),
    name TEXT NOT NULL,
    native_name TEXT NULL,
    is_active INTEGER NOT NULL DEFAULT 0,
    sort_order INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS {table}_is_active_sort_order_index ON {table} (is_active, sort_order);",
            table = self.table,
            max_code = MAX_CODE_LENGTH,
        )
    }

    /// Create the table if missing and seed the default languages into an empty table
    pub async fn ensure_table(&self) -> Result<()> {
        if self.db.table_exists(&self.table).await? {
            if self.count().await? == 0 {
                info!("Languages table '{}' is empty, seeding defaults", self.table);
                self.seed_defaults().await?;
            }
            return Ok(());
        }

        info!("Creating languages table '{}'", self.table);
        self.db.execute_script(&self.create_table_sql()).await?;
        self.seed_defaults().await?;
        Ok(())
    }

    async fn seed_defaults(&self) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        let mut tx = self.db.pool().begin().await?;

        for (code, name, native_name, is_active, sort_order) in DEFAULT_LANGUAGES {
            sqlx::query(&format!(
                "INSERT OR IGNORE INTO {} (language_code, name, native_name, is_active, sort_order, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
                self.table
            ))
            .bind(code)
            .bind(name)
            .bind(native_name)
            .bind(is_active)
            .bind(sort_order)
            .bind(&now)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        info!("✓ Seeded {} default languages", DEFAULT_LANGUAGES.len());
        Ok(())
    }

    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", self.table))
            .fetch_one(self.db.pool())
            .await?;
        Ok(count)
    }

    /// All languages ordered by sort order, then name
    pub async fn all(&self) -> Result<Vec<Language>> {
        let languages = sqlx::query_as::<_, Language>(&format!(
            "SELECT * FROM {} ORDER BY sort_order, name",
            self.table
        ))
        .fetch_all(self.db.pool())
        .await?;
        Ok(languages)
    }

    /// Active languages ordered by sort order, then name
    pub async fn active(&self) -> Result<Vec<Language>> {
        let languages = sqlx::query_as::<_, Language>(&format!(
            "SELECT * FROM {} WHERE is_active = 1 ORDER BY sort_order, name",
            self.table
        ))
        .fetch_all(self.db.pool())
        .await?;
        Ok(languages)
    }

    pub async fn find(&self, code: &str) -> Result<Option<Language>> {
        let language = sqlx::query_as::<_, Language>(&format!(
            "SELECT * FROM {} WHERE language_code = ?1",
            self.table
        ))
        .bind(code)
        .fetch_optional(self.db.pool())
        .await?;
        Ok(language)
    }

    /// Insert a new language or update the one with the same code
    pub async fn save(&self, input: &LanguageInput) -> Result<Language> {
        input.validate()?;

        let now = Utc::now().to_rfc3339();
        let mut tx = self.db.pool().begin().await?;

        let existing = sqlx::query_as::<_, Language>(&format!(
            "SELECT * FROM {} WHERE language_code = ?1",
            self.table
        ))
        .bind(&input.language_code)
        .fetch_optional(&mut *tx)
        .await?;

        match existing {
            Some(current) => {
                sqlx::query(&format!(
                    "UPDATE {} SET name = ?1, native_name = ?2, is_active = ?3, sort_order = ?4, updated_at = ?5
                     WHERE id = ?6",
                    self.table
                ))
                .bind(&input.name)
                .bind(input.native_name.clone().or(current.native_name))
                .bind(input.is_active.unwrap_or(current.is_active))
                .bind(input.sort_order.unwrap_or(current.sort_order))
                .bind(&now)
                .bind(current.id)
                .execute(&mut *tx)
                .await?;
                debug!("Updated language {}", input.language_code);
            }
            None => {
                sqlx::query(&format!(
                    "INSERT INTO {} (language_code, name, native_name, is_active, sort_order, created_at, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
                    self.table
                ))
                .bind(&input.language_code)
                .bind(&input.name)
                .bind(&input.native_name)
                .bind(input.is_active.unwrap_or(false))
                .bind(input.sort_order.unwrap_or(0))
                .bind(&now)
                .execute(&mut *tx)
                .await?;
                debug!("Created language {}", input.language_code);
            }
        }

        let saved = sqlx::query_as::<_, Language>(&format!(
            "SELECT * FROM {} WHERE language_code = ?1",
            self.table
        ))
        .bind(&input.language_code)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(saved)
    }

    /// Flip the active flag. Returns false when the code is unknown.
    pub async fn toggle(&self, code: &str) -> Result<bool> {
        let rows_affected = sqlx::query(&format!(
            "UPDATE {} SET is_active = 1 - is_active, updated_at = ?1 WHERE language_code = ?2",
            self.table
        ))
        .bind(Utc::now().to_rfc3339())
        .bind(code)
        .execute(self.db.pool())
        .await?
        .rows_affected();

        Ok(rows_affected > 0)
    }

    /// Returns false when the code is unknown.
    pub async fn delete(&self, code: &str) -> Result<bool> {
        let rows_affected = sqlx::query(&format!(
            "DELETE FROM {} WHERE language_code = ?1",
            self.table
        ))
        .bind(code)
        .execute(self.db.pool())
        .await?
        .rows_affected();

        Ok(rows_affected > 0)
    }
}
