//! Runs a transformation: prompt synthesis first, then the image call.

use std::fmt;
use std::sync::Arc;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{error, info, instrument, warn};

use crate::constants::GENERATION_FAILED_KEY;
use crate::genai::{GenAiError, InlineImage, StyleBackend};
use crate::i18n::Translate;
use crate::studio::{Studio, Ticket, TransformationRequest, TransformationResult};

/// Why a transformation did not produce a result.
#[derive(Debug)]
pub enum TransformError {
    /// No photo uploaded.
    MissingImage,
    /// No filter selected.
    MissingFilter,
    /// Another transformation is still running.
    Busy,
    /// Phase one failed.
    Prompt(GenAiError),
    /// Phase two failed.
    Image(GenAiError),
}

impl TransformError {
    /// Localized message for the error panel.
    pub fn message(&self, i18n: &impl Translate) -> String {
        match self {
            Self::MissingImage | Self::MissingFilter => i18n.translate(
                "error_missingInput",
                Some("Please upload an image and select a filter first."),
            ),
            Self::Busy => i18n.translate(
                "error_busy",
                Some("A transformation is already in progress."),
            ),
            Self::Prompt(GenAiError::EmptyPrompt) => i18n.translate(
                "error_emptyPrompt",
                Some("Received an empty prompt from the API."),
            ),
            Self::Prompt(_) => i18n.translate(
                "error_promptFailed",
                Some("Failed to generate prompt with Gemini API."),
            ),
            Self::Image(_) => i18n.translate(
                "error_imageFailed",
                Some("Failed to generate image with Gemini API."),
            ),
        }
    }

    /// True for the errors raised before any remote call.
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::MissingImage | Self::MissingFilter)
    }
}

impl fmt::Display for TransformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingImage => write!(f, "No image uploaded"),
            Self::MissingFilter => write!(f, "No filter selected"),
            Self::Busy => write!(f, "A transformation is already in progress"),
            Self::Prompt(err) => write!(f, "Prompt synthesis failed: {err}"),
            Self::Image(err) => write!(f, "Image transformation failed: {err}"),
        }
    }
}

impl std::error::Error for TransformError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Prompt(err) | Self::Image(err) => Some(err),
            _ => None,
        }
    }
}

/// Owns the backend and the studio it reports progress into.
pub struct Orchestrator<B> {
    backend: Arc<B>,
    studio: Arc<RwLock<Studio>>,
}

impl<B> Clone for Orchestrator<B> {
    fn clone(&self) -> Self {
        Self {
            backend: self.backend.clone(),
            studio: self.studio.clone(),
        }
    }
}

impl<B: StyleBackend> Orchestrator<B> {
    /// Wraps `backend` with an empty studio.
    pub fn new(backend: B) -> Self {
        Self {
            backend: Arc::new(backend),
            studio: Arc::new(RwLock::new(Studio::new())),
        }
    }

    /// Shared studio state.
    pub fn studio(&self) -> &Arc<RwLock<Studio>> {
        &self.studio
    }

    /// Transforms the studio's photo with its selected filter.
    ///
    /// Progress is written to the studio as it happens: the prompt becomes
    /// visible once phase one succeeds, and failures land in the error panel.
    /// The studio lock is released during both remote calls.
    pub async fn apply<T>(&self, i18n: &T) -> Result<TransformationResult, TransformError>
    where
        T: Translate + Sync,
    {
        let ticket = self.start(i18n).await?;
        self.run(ticket, i18n).await
    }

    /// Like [`Orchestrator::apply`], but returns as soon as the run is
    /// pending and finishes it on a background task.
    pub async fn spawn<T>(
        &self,
        i18n: T,
    ) -> Result<JoinHandle<Result<TransformationResult, TransformError>>, TransformError>
    where
        T: Translate + Send + Sync + 'static,
    {
        let ticket = self.start(&i18n).await?;
        let orchestrator = self.clone();
        Ok(tokio::spawn(async move {
            orchestrator.run(ticket, &i18n).await
        }))
    }

    async fn start<T: Translate>(&self, i18n: &T) -> Result<Ticket, TransformError> {
        let mut studio = self.studio.write().await;
        studio.begin().inspect_err(|err| {
            if err.is_precondition() {
                studio.set_error(err.message(i18n));
            }
            warn!("Transformation not started: {err}");
        })
    }

    #[instrument(skip_all, fields(run = ticket.run))]
    async fn run<T>(&self, ticket: Ticket, i18n: &T) -> Result<TransformationResult, TransformError>
    where
        T: Translate + Sync,
    {
        let run = ticket.run;
        let TransformationRequest { image, filter } = ticket.request;
        info!("Run {run}: applying {} to {}", filter.id(), image.mime_type());

        let prompt = match self.backend.synthesize_prompt(filter.base_query()).await {
            Ok(prompt) => prompt,
            Err(err) => return Err(self.abort(run, TransformError::Prompt(err), i18n).await),
        };
        self.studio.write().await.record_prompt(run, &prompt);

        let output = match self
            .backend
            .transform_image(image.bytes(), image.mime_type(), &prompt)
            .await
        {
            Ok(output) => output,
            Err(err) => return Err(self.abort(run, TransformError::Image(err), i18n).await),
        };

        let result = TransformationResult {
            prompt,
            image: output.image.as_ref().map(InlineImage::data_uri),
            text: output.text,
        };
        let diagnostic = match result.image {
            Some(_) => None,
            None => Some(i18n.translate(
                result.text.as_deref().unwrap_or(GENERATION_FAILED_KEY),
                None,
            )),
        };
        if let Some(diagnostic) = diagnostic.as_deref() {
            warn!("Run {run}: no image returned: {diagnostic}");
        }
        self.studio
            .write()
            .await
            .finish(run, result.clone(), diagnostic);
        Ok(result)
    }

    async fn abort<T: Translate>(&self, run: u64, err: TransformError, i18n: &T) -> TransformError {
        error!("Run {run}: {err}");
        self.studio.write().await.fail(run, err.message(i18n));
        err
    }

    /// Clears the studio.
    pub async fn reset(&self) {
        self.studio.write().await.reset();
    }
}
