//! Per-row translations for relational models.
//!
//! A languages registry, a translation overlay that resolves attributes per
//! language with fallback to the base row, a scaffolding generator for new
//! translation tables, an editing view-model and a JSON API for languages.

pub mod api;
pub mod config;
pub mod db;
pub mod editor;
pub mod error;
pub mod generator;
pub mod languages;
pub mod rate_limit;
pub mod security;
pub mod translatable;
pub mod validation;

pub use config::Config;
pub use db::Database;
pub use error::{Result, TranslationError};
pub use languages::{Language, LanguageInput, LanguageManager};
pub use translatable::{Translatable, TranslationRow, TranslationSchema, TranslationStore};
