//! View-model for the inline translation editor.
//!
//! One editor is bound to one entity. It shows a tab per active language,
//! loads every tab's values up front with a single query, and saves or
//! deletes the current tab's row on submit.

use crate::config::UiConfig;
use crate::error::Result;
use crate::languages::{Language, LanguageManager};
use crate::translatable::{Translatable, TranslationStore};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{error, info};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum EditorState {
    Closed,
    Open { language: String },
    Saving { language: String },
}

/// Notifications for the surrounding page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EditorEvent {
    TranslationSaved { language: String, model_id: i64 },
    TranslationDeleted { language: String, model_id: i64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum Flash {
    Message(String),
    Error(String),
}

pub struct TranslationEditor<E: Translatable> {
    entity: E,
    languages: LanguageManager,
    store: TranslationStore,
    ui: UiConfig,
    state: EditorState,
    current_language: String,
    available_languages: Vec<Language>,
    values: BTreeMap<String, BTreeMap<String, String>>,
    flash: Option<Flash>,
    events: Vec<EditorEvent>,
}

/// Serializable snapshot handed to the renderer.
#[derive(Debug, Clone, Serialize)]
pub struct EditorView<'a> {
    pub state: &'a EditorState,
    pub current_language: &'a str,
    pub languages: &'a [Language],
    pub fields: &'static [&'static str],
    pub values: &'a BTreeMap<String, BTreeMap<String, String>>,
    pub flash: Option<&'a Flash>,
    pub ui: &'a UiConfig,
}

impl<E: Translatable> TranslationEditor<E> {
    /// Bind an editor to an entity and load its translations for every active language
    pub async fn mount(
        entity: E,
        languages: LanguageManager,
        store: TranslationStore,
        ui: UiConfig,
    ) -> Result<Self> {
        let current_language = store.default_language().to_string();
        let mut editor = Self {
            entity,
            languages,
            store,
            ui,
            state: EditorState::Closed,
            current_language,
            available_languages: Vec::new(),
            values: BTreeMap::new(),
            flash: None,
            events: Vec::new(),
        };
        editor.load_data().await?;
        Ok(editor)
    }

    pub fn entity(&self) -> &E {
        &self.entity
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        !matches!(self.state, EditorState::Closed)
    }

    pub fn current_language(&self) -> &str {
        &self.current_language
    }

    pub fn available_languages(&self) -> &[Language] {
        &self.available_languages
    }

    pub fn fields(&self) -> &'static [&'static str] {
        E::translatable_attributes()
    }

    pub fn values(&self, language: &str) -> Option<&BTreeMap<String, String>> {
        self.values.get(language)
    }

    pub fn flash(&self) -> Option<&Flash> {
        self.flash.as_ref()
    }

    /// Events raised since the last call
    pub fn take_events(&mut self) -> Vec<EditorEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn view(&self) -> EditorView<'_> {
        EditorView {
            state: &self.state,
            current_language: &self.current_language,
            languages: &self.available_languages,
            fields: self.fields(),
            values: &self.values,
            flash: self.flash.as_ref(),
            ui: &self.ui,
        }
    }

    /// Open on a language tab (the default language when `None`) and reload
    pub async fn open(&mut self, language: Option<&str>) -> Result<()> {
        self.current_language = language
            .unwrap_or(self.store.default_language())
            .to_string();
        self.state = EditorState::Open {
            language: self.current_language.clone(),
        };
        self.load_data().await
    }

    pub fn close(&mut self) {
        self.state = EditorState::Closed;
        self.flash = None;
    }

    pub fn switch_language(&mut self, language: &str) {
        self.current_language = language.to_string();
        if let EditorState::Open { .. } = self.state {
            self.state = EditorState::Open {
                language: self.current_language.clone(),
            };
        }
    }

    /// Edit a field of the current language. Unknown fields are ignored.
    pub fn set_value(&mut self, field: &str, value: &str) -> bool {
        if !self.fields().iter().any(|f| *f == field) {
            return false;
        }
        self.values
            .entry(self.current_language.clone())
            .or_default()
            .insert(field.to_string(), value.to_string());
        true
    }

    /// Persist the current language's values.
    ///
    /// Blank fields are cleared in the stored row; when every field is blank
    /// the language's row is deleted instead. Failures end up in the flash
    /// error, not in the result.
    pub async fn save(&mut self) {
        let language = self.current_language.clone();
        let previous = std::mem::replace(
            &mut self.state,
            EditorState::Saving {
                language: language.clone(),
            },
        );

        let data: BTreeMap<String, Option<String>> = self
            .values
            .get(&language)
            .into_iter()
            .flatten()
            .map(|(field, value)| {
                let value = (!value.trim().is_empty()).then(|| value.clone());
                (field.clone(), value)
            })
            .collect();
        let model_id = self.entity.key();

        let result = if data.values().all(Option::is_none) {
            match self.store.delete_translation(&self.entity, Some(language.as_str())).await {
                Ok(_) => {
                    self.events.push(EditorEvent::TranslationDeleted {
                        language: language.clone(),
                        model_id,
                    });
                    Ok(Flash::Message("🗑️ Translation deleted successfully!".to_string()))
                }
                Err(e) => Err(e),
            }
        } else {
            match self.store.save_translation(&self.entity, &data, Some(language.as_str())).await {
                Ok(_) => {
                    self.events.push(EditorEvent::TranslationSaved {
                        language: language.clone(),
                        model_id,
                    });
                    Ok(Flash::Message("✅ Translation saved successfully!".to_string()))
                }
                Err(e) => Err(e),
            }
        };

        self.flash = Some(match result {
            Ok(flash) => {
                info!("Saved {} translation for #{}", language, self.entity.key());
                match self.load_translations().await {
                    Ok(()) => flash,
                    Err(e) => self.failure("Error saving translation", &e),
                }
            }
            Err(e) => self.failure("Error saving translation", &e),
        });

        self.state = previous;
    }

    /// Remove a language's row (the current language when `None`)
    pub async fn delete(&mut self, language: Option<&str>) {
        let language = language.unwrap_or(&self.current_language).to_string();

        let result = match self.store.delete_translation(&self.entity, Some(language.as_str())).await {
            Ok(_) => self.load_translations().await,
            Err(e) => Err(e),
        };

        self.flash = Some(match result {
            Ok(()) => {
                self.events.push(EditorEvent::TranslationDeleted {
                    language,
                    model_id: self.entity.key(),
                });
                Flash::Message("🗑️ Translation deleted successfully!".to_string())
            }
            Err(e) => self.failure("Error deleting translation", &e),
        });
    }

    /// Which active languages already have a row, from a single query
    pub async fn translation_status(&self) -> Result<BTreeMap<String, bool>> {
        let existing = self.store.available_languages(&self.entity).await?;

        Ok(self
            .available_languages
            .iter()
            .map(|l| {
                (
                    l.language_code.clone(),
                    existing.contains(&l.language_code),
                )
            })
            .collect())
    }

    fn failure(&self, context: &str, e: &crate::error::TranslationError) -> Flash {
        error!("{} for #{}: {}", context, self.entity.key(), e);
        if e.is_validation() {
            Flash::Error(format!("❌ {}: {}", context, e))
        } else {
            Flash::Error(format!("❌ {}", context))
        }
    }

    async fn load_data(&mut self) -> Result<()> {
        self.available_languages = self.languages.active().await?;
        self.load_translations().await
    }

    async fn load_translations(&mut self) -> Result<()> {
        let codes: Vec<String> = self
            .available_languages
            .iter()
            .map(|l| l.language_code.clone())
            .collect();
        let existing = self.store.translations_for(&self.entity, &codes).await?;

        self.values = codes
            .iter()
            .map(|code| {
                let row = existing.get(code);
                let fields = E::translatable_attributes()
                    .iter()
                    .map(|field| {
                        let value = row.and_then(|r| r.get(field)).unwrap_or_default();
                        (field.to_string(), value.to_string())
                    })
                    .collect();
                (code.clone(), fields)
            })
            .collect();

        Ok(())
    }
}
