//! Config handling

use std::num::NonZeroU16;

use tracing::log::LevelFilter;
use url::Url;

use crate::cli::CliOptions;
use crate::i18n::Localization;

/// Sets up logging based on the debug flag
pub fn setup_logging(debug: bool) -> Result<(), Box<std::io::Error>> {
    let level = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let mut logger = simple_logger::SimpleLogger::new().with_level(level);
    if !debug {
        logger = logger
            .with_module_level("tracing", LevelFilter::Warn)
            .with_module_level("rustls", LevelFilter::Info)
            .with_module_level("hyper_util", LevelFilter::Info)
            .with_module_level("reqwest", LevelFilter::Info)
            .with_module_level("tower_sessions", LevelFilter::Warn)
            .with_module_level("h2", LevelFilter::Info);
    }
    logger.init().map_err(|err| {
        eprintln!("Failed to initialize logger: {}", err);
        Box::new(std::io::Error::other(err))
    })
}

/// Where and how to reach the generative API.
#[derive(Clone, Debug)]
pub struct GeminiSettings {
    /// Base URL without a trailing slash, eg `https://host/v1beta`
    pub api_base: String,
    /// API key sent with every request
    pub api_key: String,
    /// Model for prompt synthesis
    pub text_model: String,
    /// Model for the image transformation
    pub image_model: String,
}

/// Validated runtime configuration.
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Address the HTTP server binds to
    pub listen_address: String,
    /// Port the HTTP server binds to
    pub port: NonZeroU16,
    /// Generative API settings
    pub gemini: GeminiSettings,
    /// Number of entries in the filter catalog
    pub catalog_size: usize,
    /// Seed for the generated catalog entries
    pub catalog_seed: u64,
    /// Initial UI language
    pub language: String,
    /// Request body limit for uploads
    pub max_upload_bytes: usize,
}

/// Problems found while validating options.
#[derive(Debug)]
pub enum ConfigError {
    /// The API key was blank.
    MissingApiKey,
    /// The API base was not an absolute http(s) URL.
    InvalidApiBase(String),
    /// The catalog must hold at least one filter.
    EmptyCatalog,
    /// No bundled dictionary for this language.
    UnsupportedLanguage(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingApiKey => write!(f, "Gemini API key is empty"),
            Self::InvalidApiBase(reason) => write!(f, "Invalid API base URL: {reason}"),
            Self::EmptyCatalog => write!(f, "Catalog size must be greater than zero"),
            Self::UnsupportedLanguage(language) => {
                write!(f, "Unsupported language: {language}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl AppConfig {
    /// Validates the parsed CLI options, filling in a random catalog seed when none was given.
    pub fn from_cli(cli: &CliOptions) -> Result<Self, ConfigError> {
        let api_key = cli.gemini_api_key.trim();
        if api_key.is_empty() {
            return Err(ConfigError::MissingApiKey);
        }

        let api_base = Url::parse(cli.api_base.trim())
            .map_err(|err| ConfigError::InvalidApiBase(err.to_string()))?;
        if !matches!(api_base.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidApiBase(format!(
                "unsupported scheme {}",
                api_base.scheme()
            )));
        }

        if cli.catalog_size == 0 {
            return Err(ConfigError::EmptyCatalog);
        }

        let language = cli.language.trim().to_ascii_lowercase();
        if !Localization::supports(&language) {
            return Err(ConfigError::UnsupportedLanguage(language));
        }

        Ok(Self {
            listen_address: cli.listen_address.clone(),
            port: cli.port,
            gemini: GeminiSettings {
                api_base: api_base.as_str().trim_end_matches('/').to_string(),
                api_key: api_key.to_string(),
                text_model: cli.text_model.trim().to_string(),
                image_model: cli.image_model.trim().to_string(),
            },
            catalog_size: cli.catalog_size,
            catalog_seed: cli.catalog_seed.unwrap_or_else(rand::random),
            language,
            max_upload_bytes: cli.max_upload_bytes,
        })
    }
}
