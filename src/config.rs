use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::validation::{validate_identifier, validate_language_code};

#[derive(Debug, Clone)]
pub struct Config {
    // Storage
    pub database_url: String,

    // Server
    pub port: u16,

    // Languages
    pub default_language: String,
    pub languages_table: String,

    // Translation tables
    pub translation_suffix: String,
    pub translation_model_namespace: String,

    // Field detection for scaffolding
    pub auto_detect_translatable_fields: bool,
    pub common_translatable_fields: Vec<String>,

    // Generated artifact locations
    pub models_dir: PathBuf,
    pub migrations_dir: PathBuf,

    pub ui: UiConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
}

/// Theming handed to whatever renders the translation editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UiConfig {
    pub modal: ModalConfig,
    pub colors: ColorConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModalConfig {
    /// Max-width class for the modal container
    pub size: String,
    pub backdrop: bool,
    pub keyboard: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColorConfig {
    pub primary: String,
    pub success: String,
    pub danger: String,
    pub warning: String,
    pub info: String,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub prefix: String,
    pub middleware: Vec<RouteMiddleware>,
    pub rate_limit: RateLimit,
    /// Bearer token required by the `auth` middleware
    pub token: Option<String>,
    /// Key the throttle on `x-forwarded-for` instead of the peer address
    pub trust_proxy: bool,
}

#[derive(Debug, Clone)]
pub struct SecurityConfig {
    pub validate_language_codes: bool,
    pub max_translation_length: usize,
}

/// Middleware that can be attached to the language routes by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteMiddleware {
    Auth,
    Throttle,
}

impl FromStr for RouteMiddleware {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "auth" => Ok(RouteMiddleware::Auth),
            "throttle" => Ok(RouteMiddleware::Throttle),
            other => bail!("Unknown route middleware: '{}'. Expected auth or throttle", other),
        }
    }
}

/// Fixed-window request limit, written as `"<max requests>,<minutes>"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimit {
    pub max_requests: u32,
    pub window: Duration,
}

impl FromStr for RateLimit {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let (requests, minutes) = s
            .split_once(',')
            .with_context(|| format!("Invalid rate limit '{}'. Expected <requests>,<minutes>", s))?;

        let max_requests: u32 = requests
            .trim()
            .parse()
            .with_context(|| format!("Invalid request count in rate limit '{}'", s))?;
        let minutes: u64 = minutes
            .trim()
            .parse()
            .with_context(|| format!("Invalid minutes in rate limit '{}'", s))?;

        if max_requests == 0 || minutes == 0 {
            bail!("Rate limit '{}' must allow at least one request per minute window", s);
        }

        let seconds = minutes
            .checked_mul(60)
            .with_context(|| format!("Rate limit window '{}' is too large", s))?;

        Ok(Self {
            max_requests,
            window: Duration::from_secs(seconds),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite://translations.db".to_string(),
            port: 8080,
            default_language: "en".to_string(),
            languages_table: "languages".to_string(),
            translation_suffix: "_translations".to_string(),
            translation_model_namespace: "crate::models::translations".to_string(),
            auto_detect_translatable_fields: true,
            common_translatable_fields: [
                "name",
                "title",
                "description",
                "content",
                "summary",
                "excerpt",
                "meta_title",
                "meta_description",
                "slug",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            models_dir: PathBuf::from("src/models/translations"),
            migrations_dir: PathBuf::from("migrations"),
            ui: UiConfig {
                modal: ModalConfig {
                    size: "max-w-4xl".to_string(),
                    backdrop: true,
                    keyboard: true,
                },
                colors: ColorConfig {
                    primary: "blue".to_string(),
                    success: "green".to_string(),
                    danger: "red".to_string(),
                    warning: "yellow".to_string(),
                    info: "sky".to_string(),
                },
            },
            api: ApiConfig {
                prefix: "/api/translations".to_string(),
                middleware: vec![RouteMiddleware::Auth, RouteMiddleware::Throttle],
                rate_limit: RateLimit {
                    max_requests: 60,
                    window: Duration::from_secs(60),
                },
                token: None,
                trust_proxy: false,
            },
            security: SecurityConfig {
                validate_language_codes: true,
                max_translation_length: 65535,
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let config = Self {
            // Storage
            database_url: env_or("DATABASE_URL", defaults.database_url),

            // Server
            port: parse_env("PORT", defaults.port)?,

            // Languages
            default_language: env_or("APP_LOCALE", defaults.default_language),
            languages_table: env_or("TRANSLATIONS_LANGUAGES_TABLE", defaults.languages_table),

            // Translation tables
            translation_suffix: env_or("TRANSLATIONS_SUFFIX", defaults.translation_suffix),
            translation_model_namespace: env_or(
                "TRANSLATIONS_MODEL_NAMESPACE",
                defaults.translation_model_namespace,
            ),

            // Field detection
            auto_detect_translatable_fields: parse_env(
                "TRANSLATIONS_AUTO_DETECT",
                defaults.auto_detect_translatable_fields,
            )?,
            common_translatable_fields: std::env::var("TRANSLATIONS_COMMON_FIELDS")
                .map(|v| split_list(&v))
                .unwrap_or(defaults.common_translatable_fields),

            // Generated artifacts
            models_dir: std::env::var("TRANSLATIONS_MODELS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.models_dir),
            migrations_dir: std::env::var("TRANSLATIONS_MIGRATIONS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.migrations_dir),

            // UI
            ui: UiConfig {
                modal: ModalConfig {
                    size: env_or("TRANSLATIONS_UI_MODAL_SIZE", defaults.ui.modal.size),
                    backdrop: parse_env("TRANSLATIONS_UI_MODAL_BACKDROP", defaults.ui.modal.backdrop)?,
                    keyboard: parse_env("TRANSLATIONS_UI_MODAL_KEYBOARD", defaults.ui.modal.keyboard)?,
                },
                colors: ColorConfig {
                    primary: env_or("TRANSLATIONS_UI_COLOR_PRIMARY", defaults.ui.colors.primary),
                    success: env_or("TRANSLATIONS_UI_COLOR_SUCCESS", defaults.ui.colors.success),
                    danger: env_or("TRANSLATIONS_UI_COLOR_DANGER", defaults.ui.colors.danger),
                    warning: env_or("TRANSLATIONS_UI_COLOR_WARNING", defaults.ui.colors.warning),
                    info: env_or("TRANSLATIONS_UI_COLOR_INFO", defaults.ui.colors.info),
                },
            },

            // API
            api: ApiConfig {
                prefix: env_or("TRANSLATIONS_API_PREFIX", defaults.api.prefix),
                middleware: match std::env::var("TRANSLATIONS_API_MIDDLEWARE") {
                    Ok(v) => split_list(&v)
                        .iter()
                        .map(|name| name.parse())
                        .collect::<Result<Vec<_>>>()
                        .context("Invalid TRANSLATIONS_API_MIDDLEWARE")?,
                    Err(_) => defaults.api.middleware,
                },
                rate_limit: match std::env::var("TRANSLATIONS_API_RATE_LIMIT") {
                    Ok(v) => v.parse().context("Invalid TRANSLATIONS_API_RATE_LIMIT")?,
                    Err(_) => defaults.api.rate_limit,
                },
                token: std::env::var("TRANSLATIONS_API_TOKEN")
                    .ok()
                    .filter(|t| !t.is_empty()),
                trust_proxy: parse_env("TRANSLATIONS_API_TRUST_PROXY", defaults.api.trust_proxy)?,
            },

            // Security
            security: SecurityConfig {
                validate_language_codes: parse_env(
                    "TRANSLATIONS_VALIDATE_LANGUAGE_CODES",
                    defaults.security.validate_language_codes,
                )?,
                max_translation_length: parse_env(
                    "TRANSLATIONS_MAX_FIELD_LENGTH",
                    defaults.security.max_translation_length,
                )?,
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Check values that would otherwise only fail deep inside a request.
    pub fn validate(&self) -> Result<()> {
        validate_identifier(&self.languages_table).context("Invalid TRANSLATIONS_LANGUAGES_TABLE")?;
        validate_identifier(&format!("x{}", self.translation_suffix))
            .context("Invalid TRANSLATIONS_SUFFIX")?;
        validate_language_code(&self.default_language).context("Invalid APP_LOCALE")?;

        if !self.api.prefix.starts_with('/') {
            bail!("TRANSLATIONS_API_PREFIX must start with '/': {}", self.api.prefix);
        }
        if self.api.middleware.contains(&RouteMiddleware::Auth) && self.api.token.is_none() {
            bail!("TRANSLATIONS_API_TOKEN must be set when the auth middleware is enabled");
        }
        if self.security.max_translation_length == 0 {
            bail!("TRANSLATIONS_MAX_FIELD_LENGTH must be greater than zero");
        }

        Ok(())
    }
}

fn env_or(name: &str, default: String) -> String {
    std::env::var(name).unwrap_or(default)
}

fn parse_env<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(v) => v
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid {}: '{}' ({})", name, v, e)),
        Err(_) => Ok(default),
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
