//! Input validation for language codes, model names and SQL identifiers.
//!
//! Identifiers end up interpolated into DDL and queries (table and column
//! names cannot be bound), so everything that reaches SQL passes through here.

use crate::error::{Result, TranslationError};
use regex::Regex;
use std::sync::OnceLock;

static LANGUAGE_CODE_REGEX: OnceLock<Regex> = OnceLock::new();
static MODEL_NAME_REGEX: OnceLock<Regex> = OnceLock::new();
static IDENTIFIER_REGEX: OnceLock<Regex> = OnceLock::new();

fn language_code_regex() -> &'static Regex {
    LANGUAGE_CODE_REGEX
        .get_or_init(|| Regex::new(r"^[a-z]{2}(-[A-Z]{2})?$").unwrap())
}

fn model_name_regex() -> &'static Regex {
    MODEL_NAME_REGEX
        .get_or_init(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_]*$").unwrap())
}

fn identifier_regex() -> &'static Regex {
    IDENTIFIER_REGEX
        .get_or_init(|| Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_]*$").unwrap())
}

/// Check a language code such as `en` or `pt-BR`.
pub fn is_valid_language_code(code: &str) -> bool {
    language_code_regex().is_match(code)
}

pub fn validate_language_code(code: &str) -> Result<()> {
    if is_valid_language_code(code) {
        Ok(())
    } else {
        Err(TranslationError::InvalidLanguageCode(code.to_string()))
    }
}

/// Model names become file names and table names, so only simple identifiers
/// starting with a letter are accepted.
pub fn validate_model_name(name: &str) -> Result<()> {
    if model_name_regex().is_match(name) {
        Ok(())
    } else {
        Err(TranslationError::InvalidModelName(name.to_string()))
    }
}

pub fn validate_identifier(name: &str) -> Result<()> {
    if identifier_regex().is_match(name) {
        Ok(())
    } else {
        Err(TranslationError::InvalidIdentifier(name.to_string()))
    }
}
