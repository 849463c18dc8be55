//! UI strings, bundled per language from `data/locales/*.json`.

use std::collections::HashMap;
use std::sync::OnceLock;

/// Looks up display text for a key.
pub trait Translate {
    /// Text for `key` in the current language, else `fallback`, else the key itself.
    fn translate(&self, key: &str, fallback: Option<&str>) -> String;
}

/// A language with a bundled dictionary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Language {
    /// ISO 639-1 code
    pub code: &'static str,
    /// Name of the language in itself
    pub native_name: &'static str,
    /// Written right to left
    pub rtl: bool,
}

/// Languages with a bundled dictionary.
pub const LANGUAGES: &[Language] = &[
    Language {
        code: "en",
        native_name: "English",
        rtl: false,
    },
    Language {
        code: "ar",
        native_name: "العربية",
        rtl: true,
    },
];

fn raw_dictionary(code: &str) -> Option<&'static str> {
    match code {
        "en" => Some(include_str!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/data/locales/en.json"
        ))),
        "ar" => Some(include_str!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/data/locales/ar.json"
        ))),
        _ => None,
    }
}

type Dictionaries = HashMap<&'static str, HashMap<String, String>>;

static DICTIONARIES: OnceLock<Dictionaries> = OnceLock::new();

/// Errors returned when loading or switching languages.
#[derive(Debug)]
pub enum LocalizationError {
    /// A bundled dictionary is not valid JSON.
    Parse(&'static str, serde_json::Error),
    /// No dictionary for the requested language.
    UnsupportedLanguage(String),
}

impl std::fmt::Display for LocalizationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(code, err) => write!(f, "Failed to parse {code} dictionary: {err}"),
            Self::UnsupportedLanguage(code) => write!(f, "Unsupported language: {code}"),
        }
    }
}

impl std::error::Error for LocalizationError {}

fn dictionaries() -> Result<&'static Dictionaries, LocalizationError> {
    if let Some(parsed) = DICTIONARIES.get() {
        return Ok(parsed);
    }
    let mut parsed = HashMap::new();
    for language in LANGUAGES {
        let Some(raw) = raw_dictionary(language.code) else {
            continue;
        };
        let entries: HashMap<String, String> = serde_json::from_str(raw)
            .map_err(|err| LocalizationError::Parse(language.code, err))?;
        parsed.insert(language.code, entries);
    }
    Ok(DICTIONARIES.get_or_init(|| parsed))
}

/// Current language plus its dictionary.
#[derive(Clone, Debug)]
pub struct Localization {
    language: Language,
    dictionaries: &'static Dictionaries,
}

impl Localization {
    /// Loads the bundled dictionaries and starts in `language`.
    pub fn new(language: &str) -> Result<Self, LocalizationError> {
        let language = find_language(language)?;
        Ok(Self {
            language,
            dictionaries: dictionaries()?,
        })
    }

    /// True if a dictionary is bundled for `code`.
    pub fn supports(code: &str) -> bool {
        find_language(code).is_ok()
    }

    /// Current language code.
    pub fn language(&self) -> &'static str {
        self.language.code
    }

    /// Switches language; unknown codes leave the current one in place.
    pub fn set_language(&mut self, code: &str) -> Result<(), LocalizationError> {
        self.language = find_language(code)?;
        Ok(())
    }

    /// True when the current language is written right to left.
    pub fn is_rtl(&self) -> bool {
        self.language.rtl
    }

    /// Shorthand for templates: translate with no fallback.
    pub fn t(&self, key: &str) -> String {
        self.translate(key, None)
    }
}

impl Translate for Localization {
    fn translate(&self, key: &str, fallback: Option<&str>) -> String {
        self.dictionaries
            .get(self.language.code)
            .and_then(|entries| entries.get(key))
            .filter(|text| !text.is_empty())
            .cloned()
            .or_else(|| fallback.map(str::to_string))
            .unwrap_or_else(|| key.to_string())
    }
}

fn find_language(code: &str) -> Result<Language, LocalizationError> {
    let wanted = code.trim();
    LANGUAGES
        .iter()
        .find(|language| language.code.eq_ignore_ascii_case(wanted))
        .copied()
        .ok_or_else(|| LocalizationError::UnsupportedLanguage(code.to_string()))
}
