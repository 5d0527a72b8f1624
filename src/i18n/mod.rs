//! Translation store
//!
//! Two-language lookup (`tr` / `en`) used by every surface for display text.
//! The selected language is persisted to the local store and read back on
//! startup; the store is created once and passed around explicitly.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::StoreError;
use crate::storage::{keys, KeyValueStore};

mod strings;

/// Display language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Tr,
    En,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::Tr => "tr",
            Language::En => "en",
        }
    }

    pub fn parse(code: &str) -> Option<Self> {
        match code.trim().to_lowercase().as_str() {
            "tr" => Some(Language::Tr),
            "en" => Some(Language::En),
            _ => None,
        }
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::Tr
    }
}

/// Key to display string lookup
pub trait Translator: Send + Sync {
    fn t(&self, key: &str) -> String;
}

/// A fixed language is itself a translator.
/// Lookup order: requested language, the other language, the key itself.
impl Translator for Language {
    fn t(&self, key: &str) -> String {
        match strings::lookup(key) {
            Some((tr, en)) => match self {
                Language::Tr if !tr.is_empty() => tr.to_string(),
                Language::En if !en.is_empty() => en.to_string(),
                Language::Tr => en.to_string(),
                Language::En => tr.to_string(),
            },
            None => key.to_string(),
        }
    }
}

/// Process-wide language selection backed by the local store
pub struct TranslationStore {
    language: RwLock<Language>,
    store: Arc<dyn KeyValueStore>,
}

impl TranslationStore {
    /// Load the persisted language; missing or unknown codes fall back to Turkish
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let language = match store.get(keys::LANGUAGE) {
            Some(code) => Language::parse(&code).unwrap_or_else(|| {
                tracing::warn!("Unknown persisted language '{}', using default", code);
                Language::default()
            }),
            None => Language::default(),
        };
        Self {
            language: RwLock::new(language),
            store,
        }
    }

    pub fn language(&self) -> Language {
        *self.language.read()
    }

    pub fn set_language(&self, language: Language) -> Result<(), StoreError> {
        self.store.set(keys::LANGUAGE, language.code())?;
        *self.language.write() = language;
        tracing::info!("Language switched to {}", language.code());
        Ok(())
    }
}

impl Translator for TranslationStore {
    fn t(&self, key: &str) -> String {
        self.language().t(key)
    }
}
