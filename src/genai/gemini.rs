//! Client for the Gemini `generateContent` REST endpoint.

use base64::Engine;
use base64::engine::general_purpose;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::prompt::style_prompt_instructions;
use super::{GenAiError, ImageTransformer, InlineImage, PromptSynthesizer, TransformOutput};
use crate::config::GeminiSettings;
use crate::constants::{GEMINI_API_KEY_HEADER, RESPONSE_BLOCKED_KEY};

// -----------------------------
// Request bodies
// -----------------------------

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Serialize, Debug)]
struct Content<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize, Debug)]
#[serde(untagged)]
enum RequestPart<'a> {
    Text {
        text: &'a str,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: RequestInlineData<'a>,
    },
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct RequestInlineData<'a> {
    mime_type: &'a str,
    data: String,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_modalities: Vec<&'static str>,
}

// -----------------------------
// Response bodies
// -----------------------------

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
    #[serde(default, alias = "inline_data")]
    inline_data: Option<ResponseInlineData>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct ResponseInlineData {
    #[serde(alias = "mime_type")]
    mime_type: String,
    data: String,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

impl GenerateContentResponse {
    fn first_parts(&self) -> &[ResponsePart] {
        self.candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| content.parts.as_slice())
            .unwrap_or_default()
    }

    /// Text parts of the first candidate, joined.
    fn text(&self) -> String {
        self.first_parts()
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect::<String>()
    }

    /// Splits the first candidate into image and text.
    ///
    /// Later parts overwrite earlier ones of the same kind. No candidates at
    /// all means the request was blocked.
    fn into_transform_output(self) -> TransformOutput {
        if self.candidates.is_empty() {
            let reason = self
                .prompt_feedback
                .and_then(|feedback| feedback.block_reason)
                .unwrap_or_else(|| "unspecified".to_string());
            warn!("Image response blocked, reason: {reason}");
            return TransformOutput {
                image: None,
                text: Some(RESPONSE_BLOCKED_KEY.to_string()),
            };
        }

        let mut output = TransformOutput::default();
        let Some(candidate) = self.candidates.into_iter().next() else {
            return output;
        };
        if let Some(reason) = candidate.finish_reason.as_deref() {
            debug!("Image candidate finished with {reason}");
        }
        for part in candidate
            .content
            .map(|content| content.parts)
            .unwrap_or_default()
        {
            if let Some(inline) = part.inline_data {
                output.image = Some(InlineImage {
                    mime_type: inline.mime_type,
                    data: inline.data,
                });
            } else if let Some(text) = part.text.filter(|text| !text.is_empty()) {
                output.text = Some(text);
            }
        }
        output
    }
}

/// Talks to Gemini for both prompt synthesis and image transformation.
#[derive(Clone, Debug)]
pub struct GeminiClient {
    http: reqwest::Client,
    settings: GeminiSettings,
}

impl GeminiClient {
    /// Creates a client with a fresh connection pool.
    pub fn new(settings: GeminiSettings) -> Self {
        Self::with_http_client(reqwest::Client::new(), settings)
    }

    /// Creates a client that reuses `http`.
    pub fn with_http_client(http: reqwest::Client, settings: GeminiSettings) -> Self {
        Self { http, settings }
    }

    fn endpoint_for_model(&self, model: &str) -> String {
        let trimmed = model.trim();
        let model_path = if trimmed.starts_with("models/") {
            trimmed.to_string()
        } else {
            format!("models/{trimmed}")
        };
        format!("{}/{}:generateContent", self.settings.api_base, model_path)
    }

    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest<'_>,
    ) -> Result<GenerateContentResponse, GenAiError> {
        let endpoint = self.endpoint_for_model(model);
        let resp = self
            .http
            .post(&endpoint)
            .header(GEMINI_API_KEY_HEADER, self.settings.api_key.as_str())
            .json(request)
            .send()
            .await?;

        let status = resp.status();
        let bytes = resp.bytes().await?;
        debug!("{endpoint} answered {status} with {} bytes", bytes.len());

        if !status.is_success() {
            return Err(GenAiError::Api {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }

        Ok(serde_json::from_slice(&bytes)?)
    }
}

impl PromptSynthesizer for GeminiClient {
    async fn synthesize_prompt(&self, style: &str) -> Result<String, GenAiError> {
        let instructions = style_prompt_instructions(style);
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![RequestPart::Text {
                    text: &instructions,
                }],
            }],
            generation_config: None,
        };

        let response = self
            .generate_content(&self.settings.text_model, &request)
            .await?;
        let prompt = response.text().trim().to_string();
        if prompt.is_empty() {
            return Err(GenAiError::EmptyPrompt);
        }
        info!("Synthesized a {} character prompt", prompt.len());
        Ok(prompt)
    }
}

impl ImageTransformer for GeminiClient {
    async fn transform_image(
        &self,
        image: &[u8],
        mime_type: &str,
        prompt: &str,
    ) -> Result<TransformOutput, GenAiError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    RequestPart::InlineData {
                        inline_data: RequestInlineData {
                            mime_type,
                            data: general_purpose::STANDARD.encode(image),
                        },
                    },
                    RequestPart::Text { text: prompt },
                ],
            }],
            generation_config: Some(GenerationConfig {
                response_modalities: vec!["IMAGE", "TEXT"],
            }),
        };

        let response = self
            .generate_content(&self.settings.image_model, &request)
            .await?;
        let output = response.into_transform_output();
        info!(
            "Image transformation returned image={} text={}",
            output.image.is_some(),
            output.text.is_some()
        );
        Ok(output)
    }
}
