//! Shared constants/setters for things
//!

/// Number of filters in the catalog unless told otherwise.
pub const DEFAULT_CATALOG_SIZE: usize = 1000;

/// Gemini REST base URL.
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Model used to expand a filter's base query into a full prompt.
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";

/// Model used to restyle the uploaded photo.
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image-preview";

/// Header carrying the Gemini API key.
pub const GEMINI_API_KEY_HEADER: &str = "x-goog-api-key";

/// Largest accepted upload, in bytes.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Language used when none is configured.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Localization key returned when the image service blocks a response.
pub const RESPONSE_BLOCKED_KEY: &str = "responseBlocked";

/// Localization key used when a run yields neither an image nor any text.
pub const GENERATION_FAILED_KEY: &str = "error_generationFailed";

/// How much of the synthesized prompt is shown while the image is pending.
pub const PROMPT_PREVIEW_CHARS: usize = 100;

/// Seconds between page refreshes while a transformation is running.
pub const PENDING_REFRESH_SECONDS: u32 = 2;

/// Idle lifetime of a browser session (and its CSRF token), in seconds.
pub const SESSION_INACTIVITY_SECONDS: i64 = 60 * 60;

/// Name offered to the browser when downloading the result.
pub const DOWNLOAD_FILE_STEM: &str = "transformed-image";

#[cfg(test)]
/// API key used by tests
pub const TEST_API_KEY: &str = "test-key";
