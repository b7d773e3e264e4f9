//! Scaffolding for translation tables.
//!
//! Given a model name, reads the columns of its base table and writes two
//! artifacts: a Rust module defining the model's `TranslationSchema`, and a
//! SQL migration creating the `<model>_translations` table.

use crate::config::Config;
use crate::db::Database;
use crate::error::{Result, TranslationError};
use crate::languages::LanguageManager;
use crate::translatable::LANGUAGE_CODE_FIELD;
use crate::validation::{validate_identifier, validate_model_name};
use chrono::{DateTime, Utc};
use heck::{ToShoutySnakeCase, ToSnakeCase};
use std::path::{Path, PathBuf};
use tracing::info;

/// Columns never offered for translation
pub const NON_TRANSLATABLE_FIELDS: [&str; 10] = [
    "id",
    "created_at",
    "updated_at",
    "deleted_at",
    "email_verified_at",
    "password",
    "remember_token",
    "email",
    "phone",
    "status",
];

/// A base-table column offered for translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldCandidate {
    pub name: String,
    /// Listed in the configured common translatable fields
    pub commonly_translatable: bool,
}

/// Names derived from a model name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldNames {
    pub model: String,
    pub base_table: String,
    pub translation_table: String,
    pub foreign_key: String,
    pub schema_const: String,
    pub module_name: String,
}

impl ScaffoldNames {
    pub fn new(model: &str, suffix: &str) -> Result<Self> {
        validate_model_name(model)?;

        let snake = model.to_snake_case();
        let names = Self {
            model: model.to_string(),
            base_table: pluralize(model).to_snake_case(),
            translation_table: format!("{}{}", snake, suffix),
            foreign_key: format!("{}_id", snake),
            schema_const: format!("{}_TRANSLATION", model.to_shouty_snake_case()),
            module_name: format!("{}_translation", snake),
        };
        validate_identifier(&names.translation_table)?;
        Ok(names)
    }
}

/// Naive English plural of the last word of an identifier.
pub fn pluralize(word: &str) -> String {
    let lower = word.to_ascii_lowercase();
    let ends_with_consonant_y = lower.ends_with('y')
        && !matches!(lower.chars().rev().nth(1), Some('a' | 'e' | 'i' | 'o' | 'u'));

    if ends_with_consonant_y {
        format!("{}ies", &word[..word.len() - 1])
    } else if ["s", "x", "z", "ch", "sh"].iter().any(|end| lower.ends_with(end)) {
        format!("{}es", word)
    } else {
        format!("{}s", word)
    }
}

/// The write allow-list of a generated schema: selected fields plus the language code
pub fn fillable_fields(selected: &[String]) -> Vec<String> {
    let mut fields: Vec<String> = selected
        .iter()
        .filter(|f| f.as_str() != LANGUAGE_CODE_FIELD)
        .cloned()
        .collect();
    fields.push(LANGUAGE_CODE_FIELD.to_string());
    fields
}

/// Paths of the files written by one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFiles {
    pub model_path: PathBuf,
    pub migration_path: PathBuf,
    pub migration_sql: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerateOutcome {
    Created(GeneratedFiles),
    /// The model file exists and overwriting was not requested
    AlreadyExists(PathBuf),
    NothingSelected,
}

#[derive(Debug, Clone)]
pub struct GeneratorSettings {
    pub translation_suffix: String,
    pub model_namespace: String,
    pub models_dir: PathBuf,
    pub migrations_dir: PathBuf,
    pub common_fields: Vec<String>,
    pub auto_detect: bool,
}

impl GeneratorSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            translation_suffix: config.translation_suffix.clone(),
            model_namespace: config.translation_model_namespace.clone(),
            models_dir: config.models_dir.clone(),
            migrations_dir: config.migrations_dir.clone(),
            common_fields: config.common_translatable_fields.clone(),
            auto_detect: config.auto_detect_translatable_fields,
        }
    }
}

pub struct TranslationGenerator {
    db: Database,
    languages: LanguageManager,
    settings: GeneratorSettings,
}

impl TranslationGenerator {
    pub fn new(db: Database, languages: LanguageManager, settings: GeneratorSettings) -> Self {
        Self {
            db,
            languages,
            settings,
        }
    }

    pub fn settings(&self) -> &GeneratorSettings {
        &self.settings
    }

    pub fn names(&self, model: &str) -> Result<ScaffoldNames> {
        ScaffoldNames::new(model, &self.settings.translation_suffix)
    }

    /// Columns of the model's base table that may be translated
    pub async fn candidate_fields(&self, model: &str) -> Result<Vec<FieldCandidate>> {
        let names = self.names(model)?;
        self.languages.ensure_table().await?;

        if !self.db.table_exists(&names.base_table).await? {
            return Err(TranslationError::SchemaNotFound {
                model: names.model,
                table: names.base_table,
            });
        }

        let columns = self.db.column_listing(&names.base_table).await?;
        Ok(columns
            .into_iter()
            .filter(|c| !NON_TRANSLATABLE_FIELDS.contains(&c.as_str()))
            .map(|name| FieldCandidate {
                commonly_translatable: self.settings.common_fields.contains(&name),
                name,
            })
            .collect())
    }

    /// Fields to pre-select when prompting
    pub fn default_selection(&self, candidates: &[FieldCandidate]) -> Vec<bool> {
        candidates
            .iter()
            .map(|c| self.settings.auto_detect && c.commonly_translatable)
            .collect()
    }

    pub fn render_model(&self, names: &ScaffoldNames, selected: &[String]) -> String {
        let fillable = fillable_fields(selected)
            .iter()
            .map(|f| format!("\"{}\"", f))
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            r#"//! Translation schema for `{model}`.
//!
//! Generated by `create-translation`. Lives in `{namespace}::{module}`.

use row_translations::TranslationSchema;

/// Rows of `{table}`, one per (`{fk}`, `language_code`).
pub static {konst}: TranslationSchema = TranslationSchema {{
    model: "{model}",
    table: "{table}",
    foreign_key: "{fk}",
    fillable: &[{fillable}],
}};
"#,
            model = names.model,
            namespace = self.settings.model_namespace,
            module = names.module_name,
            table = names.translation_table,
            fk = names.foreign_key,
            konst = names.schema_const,
            fillable = fillable,
        )
    }

    pub fn render_migration(&self, names: &ScaffoldNames, selected: &[String]) -> String {
        let fields = selected
            .iter()
            .filter(|f| f.as_str() != LANGUAGE_CODE_FIELD)
            .map(|f| format!("    {} TEXT NULL,\n", f))
            .collect::<String>();

        format!(
            "-- Create {table}
CREATE TABLE IF NOT EXISTS {table} (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    {fk} INTEGER NOT NULL REFERENCES {base}(id) ON DELETE CASCADE,
    language_code TEXT NOT NULL,
{fields}    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    UNIQUE ({fk}, language_code)
);
CREATE INDEX IF NOT EXISTS {table}_{fk}_index ON {table} ({fk});
CREATE INDEX IF NOT EXISTS {table}_language_code_index ON {table} (language_code);
",
            table = names.translation_table,
            fk = names.foreign_key,
            base = names.base_table,
            fields = fields,
        )
    }

    pub fn model_path(&self, names: &ScaffoldNames) -> PathBuf {
        self.settings
            .models_dir
            .join(format!("{}.rs", names.module_name))
    }

    pub fn migration_path(&self, names: &ScaffoldNames, now: DateTime<Utc>) -> PathBuf {
        self.settings.migrations_dir.join(format!(
            "{}_create_{}_table.sql",
            now.format("%Y%m%d%H%M%S"),
            names.translation_table
        ))
    }

    /// Write the schema module and migration for the selected fields
    pub fn generate(&self, model: &str, selected: &[String], force: bool) -> Result<GenerateOutcome> {
        self.generate_at(model, selected, force, Utc::now())
    }

    pub fn generate_at(
        &self,
        model: &str,
        selected: &[String],
        force: bool,
        now: DateTime<Utc>,
    ) -> Result<GenerateOutcome> {
        let names = self.names(model)?;
        for field in selected {
            validate_identifier(field)?;
        }

        if selected.is_empty() {
            return Ok(GenerateOutcome::NothingSelected);
        }

        let model_path = self.model_path(&names);
        if model_path.exists() && !force {
            info!("Translation model already exists: {}", model_path.display());
            return Ok(GenerateOutcome::AlreadyExists(model_path));
        }

        write_file(&model_path, &self.render_model(&names, selected))?;
        info!("📝 Translation model created: {}", model_path.display());

        let migration_sql = self.render_migration(&names, selected);
        let migration_path = self.migration_path(&names, now);
        write_file(&migration_path, &migration_sql)?;
        info!("🗄️  Translation migration created: {}", migration_path.display());

        Ok(GenerateOutcome::Created(GeneratedFiles {
            model_path,
            migration_path,
            migration_sql,
        }))
    }

    /// Apply a generated migration to the connected database
    pub async fn apply(&self, files: &GeneratedFiles) -> Result<()> {
        self.db.execute_script(&files.migration_sql).await?;
        info!("✓ Applied {}", files.migration_path.display());
        Ok(())
    }
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    Ok(())
}

/// Resolve `--fields` names against the candidates, keeping candidate order
pub fn select_by_name(candidates: &[FieldCandidate], names: &[String]) -> Result<Vec<String>> {
    for name in names {
        if !candidates.iter().any(|c| &c.name == name) {
            return Err(TranslationError::UnknownField(name.clone()));
        }
    }

    Ok(candidates
        .iter()
        .filter(|c| names.contains(&c.name))
        .map(|c| c.name.clone())
        .collect())
}
