//! Capabilities the orchestrator needs from a generative AI service.
//!
//! The orchestrator only sees [`PromptSynthesizer`] and [`ImageTransformer`];
//! [`gemini::GeminiClient`] is the production implementation of both.

use std::future::Future;

use base64::Engine;
use base64::engine::general_purpose;

pub mod gemini;
pub mod prompt;

/// Expands a short style description into a detailed transformation prompt.
pub trait PromptSynthesizer: Send + Sync {
    /// Returns the trimmed, non-empty prompt for `style`.
    fn synthesize_prompt(
        &self,
        style: &str,
    ) -> impl Future<Output = Result<String, GenAiError>> + Send;
}

/// Re-renders an image according to a prompt.
pub trait ImageTransformer: Send + Sync {
    /// Sends `image` (of type `mime_type`) and `prompt`, returning whatever came back.
    fn transform_image(
        &self,
        image: &[u8],
        mime_type: &str,
        prompt: &str,
    ) -> impl Future<Output = Result<TransformOutput, GenAiError>> + Send;
}

/// Anything that can do both halves of a transformation.
pub trait StyleBackend: PromptSynthesizer + ImageTransformer + 'static {}

impl<T> StyleBackend for T where T: PromptSynthesizer + ImageTransformer + 'static {}

/// Base64 image data as returned inline by the service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InlineImage {
    /// MIME type of the decoded bytes
    pub mime_type: String,
    /// Standard base64 payload
    pub data: String,
}

impl InlineImage {
    /// Encodes raw bytes.
    pub fn from_bytes(mime_type: &str, bytes: &[u8]) -> Self {
        Self {
            mime_type: mime_type.to_string(),
            data: general_purpose::STANDARD.encode(bytes),
        }
    }

    /// `data:<mime>;base64,<payload>`
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }

    /// Parses a URI produced by [`InlineImage::data_uri`].
    pub fn from_data_uri(uri: &str) -> Option<Self> {
        let (mime_type, data) = uri.strip_prefix("data:")?.split_once(";base64,")?;
        Some(Self {
            mime_type: mime_type.to_string(),
            data: data.to_string(),
        })
    }

    /// Raw image bytes.
    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        general_purpose::STANDARD.decode(&self.data)
    }
}

/// What an image transformation produced. Either half may be missing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransformOutput {
    /// The generated image, if any
    pub image: Option<InlineImage>,
    /// Text the service returned alongside (or instead of) the image
    pub text: Option<String>,
}

/// Failures talking to the generative service.
#[derive(Debug)]
pub enum GenAiError {
    /// Transport failure: DNS, TLS, connection reset, etc.
    Http(reqwest::Error),
    /// The service answered with a non-success status.
    Api {
        /// HTTP status code
        status: u16,
        /// Response body, as text
        body: String,
    },
    /// The response body was not the JSON we expected.
    Decode(serde_json::Error),
    /// Prompt synthesis came back blank.
    EmptyPrompt,
}

impl std::fmt::Display for GenAiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http(err) => write!(f, "Request to generative API failed: {err}"),
            Self::Api { status, body } => {
                write!(f, "Generative API error {status}: {body}")
            }
            Self::Decode(err) => write!(f, "Failed to parse generative API response: {err}"),
            Self::EmptyPrompt => write!(f, "Received an empty prompt from the API"),
        }
    }
}

impl std::error::Error for GenAiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Http(err) => Some(err),
            Self::Decode(err) => Some(err),
            Self::Api { .. } | Self::EmptyPrompt => None,
        }
    }
}

impl From<reqwest::Error> for GenAiError {
    fn from(err: reqwest::Error) -> Self {
        GenAiError::Http(err)
    }
}

impl From<serde_json::Error> for GenAiError {
    fn from(err: serde_json::Error) -> Self {
        GenAiError::Decode(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_uri_round_trips_bytes() {
        let bytes = [0x89, b'P', b'N', b'G', 0, 1, 2, 255];
        let image = InlineImage::from_bytes("image/png", &bytes);
        let uri = image.data_uri();
        let payload = uri
            .strip_prefix("data:image/png;base64,")
            .expect("data uri prefix");
        let decoded = general_purpose::STANDARD
            .decode(payload)
            .expect("decode payload");
        assert_eq!(decoded, bytes);

        let parsed = InlineImage::from_data_uri(&uri).expect("parse data uri");
        assert_eq!(parsed, image);
        assert_eq!(parsed.decode().expect("decode"), bytes);
        assert!(InlineImage::from_data_uri("https://example.com/a.png").is_none());
    }
}
