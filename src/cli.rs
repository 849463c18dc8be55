//! CLI parser
use clap::Parser;
use std::num::NonZeroU16;

use crate::constants::{
    DEFAULT_API_BASE, DEFAULT_CATALOG_SIZE, DEFAULT_IMAGE_MODEL, DEFAULT_LANGUAGE,
    DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_TEXT_MODEL,
};

#[derive(Parser, Debug)]
/// CLI Options
pub struct CliOptions {
    #[clap(long, help = "Enable debug logging", env = "PHOTOSTYLE_DEBUG")]
    /// Enable debug logging. Env: PHOTOSTYLE_DEBUG
    pub debug: bool,
    #[clap(long, short, default_value = "9000", env = "PHOTOSTYLE_PORT")]
    /// http listener, defaults to `9000`.
    /// Env: PHOTOSTYLE_PORT
    pub port: NonZeroU16,
    #[clap(
        long,
        short,
        default_value = "127.0.0.1",
        env = "PHOTOSTYLE_LISTEN_ADDRESS"
    )]
    /// Listen address, defaults to `127.0.0.1`.
    /// Env: PHOTOSTYLE_LISTEN_ADDRESS
    pub listen_address: String,

    #[clap(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    /// Gemini API key. Env: GEMINI_API_KEY
    pub gemini_api_key: String,
    #[clap(long, default_value = DEFAULT_API_BASE, env = "PHOTOSTYLE_API_BASE")]
    /// Base URL of the generative language API.
    /// Env: PHOTOSTYLE_API_BASE
    pub api_base: String,
    #[clap(long, default_value = DEFAULT_TEXT_MODEL, env = "PHOTOSTYLE_TEXT_MODEL")]
    /// Model that writes the detailed style prompt.
    /// Env: PHOTOSTYLE_TEXT_MODEL
    pub text_model: String,
    #[clap(long, default_value = DEFAULT_IMAGE_MODEL, env = "PHOTOSTYLE_IMAGE_MODEL")]
    /// Model that restyles the photo.
    /// Env: PHOTOSTYLE_IMAGE_MODEL
    pub image_model: String,

    #[clap(long, default_value_t = DEFAULT_CATALOG_SIZE, env = "PHOTOSTYLE_CATALOG_SIZE")]
    /// Total number of filters in the catalog, defaults to `1000`.
    /// Env: PHOTOSTYLE_CATALOG_SIZE
    pub catalog_size: usize,
    #[clap(long, env = "PHOTOSTYLE_CATALOG_SEED")]
    /// Seed for the generated part of the catalog, random if unset.
    /// Env: PHOTOSTYLE_CATALOG_SEED
    pub catalog_seed: Option<u64>,

    #[clap(long, default_value = DEFAULT_LANGUAGE, env = "PHOTOSTYLE_LANGUAGE")]
    /// UI language (`en` or `ar`).
    /// Env: PHOTOSTYLE_LANGUAGE
    pub language: String,
    #[clap(
        long,
        default_value_t = DEFAULT_MAX_UPLOAD_BYTES,
        env = "PHOTOSTYLE_MAX_UPLOAD_BYTES"
    )]
    /// Largest accepted upload in bytes, defaults to 10MiB.
    /// Env: PHOTOSTYLE_MAX_UPLOAD_BYTES
    pub max_upload_bytes: usize,
}
