//! Localization
//!
//! Message dictionaries keyed by locale. Templates use `{name}` placeholders.
//! Dictionaries are parsed once, on first use, and shared through `Rc`.

use std::cell::OnceCell;
use std::collections::HashMap;
use std::fmt::Display;
use std::rc::Rc;

/// Locales with a bundled dictionary
pub const LOCALES: &[&str] = &[
    "ar-AE", "bg-BG", "cs-CZ", "da-DK", "de-DE", "el-GR", "en-US", "es-ES", "et-EE", "fi-FI",
    "fr-FR", "he-IL", "hr-HR", "hu-HU", "it-IT", "ja-JP", "ko-KR", "lt-LT", "lv-LV", "nb-NO",
    "nl-NL", "pl-PL", "pt-BR", "pt-PT", "ro-RO", "ru-RU", "sk-SK", "sl-SI", "sr-SP", "sv-SE",
    "tr-TR", "uk-UA", "zh-CN", "zh-TW",
];

const BUNDLED: &[(&str, &str)] = &[
    ("ar-AE", include_str!("../intl/ar-AE.json")),
    ("bg-BG", include_str!("../intl/bg-BG.json")),
    ("cs-CZ", include_str!("../intl/cs-CZ.json")),
    ("da-DK", include_str!("../intl/da-DK.json")),
    ("de-DE", include_str!("../intl/de-DE.json")),
    ("el-GR", include_str!("../intl/el-GR.json")),
    ("en-US", include_str!("../intl/en-US.json")),
    ("es-ES", include_str!("../intl/es-ES.json")),
    ("et-EE", include_str!("../intl/et-EE.json")),
    ("fi-FI", include_str!("../intl/fi-FI.json")),
    ("fr-FR", include_str!("../intl/fr-FR.json")),
    ("he-IL", include_str!("../intl/he-IL.json")),
    ("hr-HR", include_str!("../intl/hr-HR.json")),
    ("hu-HU", include_str!("../intl/hu-HU.json")),
    ("it-IT", include_str!("../intl/it-IT.json")),
    ("ja-JP", include_str!("../intl/ja-JP.json")),
    ("ko-KR", include_str!("../intl/ko-KR.json")),
    ("lt-LT", include_str!("../intl/lt-LT.json")),
    ("lv-LV", include_str!("../intl/lv-LV.json")),
    ("nb-NO", include_str!("../intl/nb-NO.json")),
    ("nl-NL", include_str!("../intl/nl-NL.json")),
    ("pl-PL", include_str!("../intl/pl-PL.json")),
    ("pt-BR", include_str!("../intl/pt-BR.json")),
    ("pt-PT", include_str!("../intl/pt-PT.json")),
    ("ro-RO", include_str!("../intl/ro-RO.json")),
    ("ru-RU", include_str!("../intl/ru-RU.json")),
    ("sk-SK", include_str!("../intl/sk-SK.json")),
    ("sl-SI", include_str!("../intl/sl-SI.json")),
    ("sr-SP", include_str!("../intl/sr-SP.json")),
    ("sv-SE", include_str!("../intl/sv-SE.json")),
    ("tr-TR", include_str!("../intl/tr-TR.json")),
    ("uk-UA", include_str!("../intl/uk-UA.json")),
    ("zh-CN", include_str!("../intl/zh-CN.json")),
    ("zh-TW", include_str!("../intl/zh-TW.json")),
];

/// Localization error
#[derive(Debug, thiserror::Error)]
pub enum IntlError {
    #[error("Could not find intl message {key} in {locale} locale")]
    MissingMessage { key: String, locale: String },

    #[error("Invalid intl dictionary for {locale}: {source}")]
    Parse {
        locale: String,
        #[source]
        source: serde_json::Error,
    },
}

type Messages = HashMap<String, String>;

/// Lazily parsed set of dictionaries
#[derive(Debug)]
pub struct IntlCache {
    sources: Vec<(String, String)>,
    dictionary: OnceCell<HashMap<String, Messages>>,
}

impl IntlCache {
    /// Cache over the bundled dictionaries
    pub fn new() -> Self {
        Self::from_json(
            BUNDLED
                .iter()
                .map(|(locale, json)| (locale.to_string(), json.to_string())),
        )
    }

    /// Cache over caller-supplied `(locale, json)` dictionaries
    pub fn from_json(sources: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            sources: sources.into_iter().collect(),
            dictionary: OnceCell::new(),
        }
    }

    /// Parse every dictionary on first call; later calls are free.
    /// A failed load is retried on the next call.
    pub fn load(&self) -> Result<&HashMap<String, Messages>, IntlError> {
        if let Some(dictionary) = self.dictionary.get() {
            return Ok(dictionary);
        }

        let mut dictionary = HashMap::with_capacity(self.sources.len());
        for (locale, json) in &self.sources {
            let messages: Messages =
                serde_json::from_str(json).map_err(|source| IntlError::Parse {
                    locale: locale.clone(),
                    source,
                })?;
            dictionary.insert(locale.clone(), messages);
        }
        tracing::debug!("Loaded {} intl dictionaries", dictionary.len());

        Ok(self.dictionary.get_or_init(|| dictionary))
    }

    /// Whether a dictionary exists for `locale`
    pub fn has_locale(&self, locale: &str) -> bool {
        self.sources.iter().any(|(l, _)| l == locale)
    }

    /// Formatter bound to `locale`
    pub fn get(self: &Rc<Self>, locale: &str) -> Intl {
        Intl {
            cache: Rc::clone(self),
            locale: locale.to_string(),
        }
    }
}

impl Default for IntlCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Message formatter for one locale
#[derive(Debug, Clone)]
pub struct Intl {
    cache: Rc<IntlCache>,
    locale: String,
}

impl Intl {
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Look up `key`
    pub fn format(&self, key: &str) -> Result<String, IntlError> {
        self.message(key).map(str::to_owned)
    }

    /// Look up `key` and substitute `{name}` placeholders. Each substitution
    /// replaces the first occurrence of its placeholder.
    pub fn format_with<V: Display>(
        &self,
        key: &str,
        values: &[(&str, V)],
    ) -> Result<String, IntlError> {
        let mut message = self.message(key)?.to_owned();
        for (name, value) in values {
            message = message.replacen(&format!("{{{name}}}"), &value.to_string(), 1);
        }
        Ok(message)
    }

    fn message(&self, key: &str) -> Result<&str, IntlError> {
        self.cache
            .load()?
            .get(&self.locale)
            .and_then(|messages| messages.get(key))
            .filter(|message| !message.is_empty())
            .map(String::as_str)
            .ok_or_else(|| IntlError::MissingMessage {
                key: key.to_string(),
                locale: self.locale.clone(),
            })
    }
}
