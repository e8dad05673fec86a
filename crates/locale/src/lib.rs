use std::{
    collections::HashMap,
    fmt,
    path::PathBuf,
    str::FromStr,
    sync::{Arc, PoisonError, RwLock},
};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, warn};

pub mod currency;
pub mod storage;

use storage::{LocalStorage, LOCALE_KEY};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ja,
    Es,
    Fr,
    De,
    Pt,
}

impl Locale {
    pub const ALL: &'static [Locale] = &[
        Locale::En,
        Locale::Ja,
        Locale::Es,
        Locale::Fr,
        Locale::De,
        Locale::Pt,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ja => "ja",
            Self::Es => "es",
            Self::Fr => "fr",
            Self::De => "de",
            Self::Pt => "pt",
        }
    }

    pub fn language_tag(self) -> &'static str {
        match self {
            Self::En => "en-US",
            Self::Ja => "ja-JP",
            Self::Es => "es-ES",
            Self::Fr => "fr-FR",
            Self::De => "de-DE",
            Self::Pt => "pt-BR",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::En => "English",
            Self::Ja => "日本語",
            Self::Es => "Español",
            Self::Fr => "Français",
            Self::De => "Deutsch",
            Self::Pt => "Português",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        let primary = code
            .trim()
            .split(['-', '_', '.'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        Self::ALL.iter().copied().find(|l| l.code() == primary)
    }

    pub fn from_code_or_default(code: &str) -> Self {
        Self::from_code(code).unwrap_or_default()
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported locale `{0}`")]
pub struct UnsupportedLocale(pub String);

impl FromStr for Locale {
    type Err = UnsupportedLocale;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|l| l.code() == value)
            .ok_or_else(|| UnsupportedLocale(value.to_string()))
    }
}

pub fn default_locale(stored: Option<&str>, system_lang: Option<&str>) -> Locale {
    if let Some(locale) = stored.and_then(|s| s.parse::<Locale>().ok()) {
        return locale;
    }
    system_lang.and_then(Locale::from_code).unwrap_or_default()
}

fn system_language() -> Option<String> {
    ["LC_ALL", "LC_MESSAGES", "LANG"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|value| !value.is_empty() && value != "C" && value != "POSIX")
}

type Catalog = HashMap<String, String>;

pub struct I18n {
    locale: RwLock<Locale>,
    fallback: Locale,
    catalogs: RwLock<HashMap<Locale, Catalog>>,
    storage: Arc<dyn LocalStorage>,
    catalog_dir: Option<PathBuf>,
}

impl I18n {
    pub fn new(storage: Arc<dyn LocalStorage>) -> Self {
        let stored = storage.get_item(LOCALE_KEY);
        let locale = default_locale(stored.as_deref(), system_language().as_deref());
        debug!(locale = %locale, "resolved startup locale");
        Self {
            locale: RwLock::new(locale),
            fallback: Locale::En,
            catalogs: RwLock::new(HashMap::new()),
            storage,
            catalog_dir: None,
        }
    }

    pub fn with_catalog_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.catalog_dir = Some(dir.into());
        self
    }

    pub fn current_locale(&self) -> Locale {
        *self.locale.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn available_locales(&self) -> &'static [Locale] {
        Locale::ALL
    }

    pub fn set_locale(&self, code: &str) -> bool {
        let Ok(locale) = code.parse::<Locale>() else {
            return false;
        };
        *self.locale.write().unwrap_or_else(PoisonError::into_inner) = locale;
        if let Err(err) = self.storage.set_item(LOCALE_KEY, locale.code()) {
            warn!(locale = %locale, error = %err, "failed to persist locale preference");
        }
        true
    }

    pub fn load_locale_from_settings(&self, locale: Option<&str>) -> bool {
        match locale {
            Some(code) => self.set_locale(code),
            None => false,
        }
    }

    pub fn insert_messages(&self, locale: Locale, messages: &Value) {
        let mut flat = Catalog::new();
        flatten_messages("", messages, &mut flat);
        self.catalogs
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(locale)
            .or_default()
            .extend(flat);
    }

    pub fn is_loaded(&self, locale: Locale) -> bool {
        self.catalogs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&locale)
    }

    pub async fn load_locale_messages(&self, locale: Locale) -> bool {
        if self.is_loaded(locale) {
            return true;
        }
        let Some(dir) = &self.catalog_dir else {
            warn!(locale = %locale, "no catalog directory configured");
            return false;
        };
        let path = dir.join(format!("{}.json", locale.code()));
        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(err) => {
                error!(
                    locale = %locale,
                    path = %path.display(),
                    error = %err,
                    "failed to read locale catalog"
                );
                return false;
            }
        };
        match serde_json::from_str::<Value>(&raw) {
            Ok(messages) => {
                self.insert_messages(locale, &messages);
                true
            }
            Err(err) => {
                error!(
                    locale = %locale,
                    path = %path.display(),
                    error = %err,
                    "malformed locale catalog"
                );
                false
            }
        }
    }

    /// Looks `key` up in the active locale, then the fallback. Returns the
    /// key itself when neither has it.
    pub fn t(&self, key: &str) -> String {
        self.t_with(key, &[])
    }

    pub fn t_with(&self, key: &str, params: &[(&str, &str)]) -> String {
        match self.lookup(key) {
            Some(template) => interpolate(&template, params),
            None => key.to_string(),
        }
    }

    pub fn try_t(&self, key: &str, params: &[(&str, &str)]) -> Option<String> {
        self.lookup(key).map(|template| interpolate(&template, params))
    }

    fn lookup(&self, key: &str) -> Option<String> {
        let catalogs = self.catalogs.read().unwrap_or_else(PoisonError::into_inner);
        [self.current_locale(), self.fallback]
            .iter()
            .find_map(|locale| catalogs.get(locale).and_then(|c| c.get(key)).cloned())
    }
}

fn flatten_messages(prefix: &str, value: &Value, out: &mut Catalog) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten_messages(&path, child, out);
            }
        }
        Value::String(text) => {
            out.insert(prefix.to_string(), text.clone());
        }
        Value::Null => {}
        other => {
            out.insert(prefix.to_string(), other.to_string());
        }
    }
}

fn interpolate(template: &str, params: &[(&str, &str)]) -> String {
    params
        .iter()
        .fold(template.to_string(), |text, (name, value)| {
            text.replace(&format!("{{{name}}}"), value)
        })
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
