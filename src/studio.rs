//! Transient state of the single editing session: the uploaded photo, the
//! chosen filter, and the progress of the current transformation.
//!
//! Transitions are guarded: nothing but [`Studio::reset`] is accepted while a
//! run is pending, and completions are matched against the run that started
//! them so a reset discards whatever was in flight.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::catalog::FilterDescriptor;
use crate::orchestrator::TransformError;

/// Where the current transformation is.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum TransformPhase {
    /// Nothing running
    #[default]
    Idle,
    /// Waiting for the text model
    PromptPending,
    /// Waiting for the image model
    ImagePending,
    /// Finished; the result may still lack an image
    Done,
    /// Aborted with an error
    Failed,
}

impl TransformPhase {
    /// True while a remote call is outstanding.
    pub fn is_pending(self) -> bool {
        matches!(self, Self::PromptPending | Self::ImagePending)
    }
}

/// A photo as uploaded by the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageUpload {
    bytes: Arc<[u8]>,
    mime_type: String,
    file_name: Option<String>,
}

impl ImageUpload {
    /// Wraps uploaded bytes.
    pub fn new(bytes: impl Into<Arc<[u8]>>, mime_type: &str, file_name: Option<String>) -> Self {
        Self {
            bytes: bytes.into(),
            mime_type: mime_type.to_string(),
            file_name,
        }
    }

    /// Raw image bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// MIME type, eg `image/png`.
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Original file name, if the browser sent one.
    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }
}

/// Inputs captured when a run starts.
#[derive(Clone, Debug)]
pub struct TransformationRequest {
    /// Photo to transform
    pub image: ImageUpload,
    /// Style to apply
    pub filter: FilterDescriptor,
}

/// Handed out by [`Studio::begin`]; ties completions to their run.
#[derive(Clone, Debug)]
pub struct Ticket {
    /// Run number
    pub run: u64,
    /// What to transform
    pub request: TransformationRequest,
}

/// Outcome of a completed run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformationResult {
    /// Prompt produced by phase one
    pub prompt: String,
    /// Output image as a data URI
    pub image: Option<String>,
    /// Text returned with (or instead of) the image
    pub text: Option<String>,
}

/// JSON view of the studio.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudioSnapshot {
    /// Current phase
    pub phase: TransformPhase,
    /// Whether a photo is loaded
    pub has_image: bool,
    /// MIME type of the loaded photo
    pub image_mime_type: Option<String>,
    /// Id of the chosen filter
    pub selected_filter_id: Option<String>,
    /// Synthesized prompt of the current run
    pub prompt: Option<String>,
    /// Error or diagnostic shown to the user
    pub error: Option<String>,
    /// Result of the last finished run
    pub result: Option<TransformationResult>,
}

/// The editing session.
#[derive(Clone, Debug, Default)]
pub struct Studio {
    image: Option<ImageUpload>,
    selected: Option<FilterDescriptor>,
    phase: TransformPhase,
    prompt: Option<String>,
    result: Option<TransformationResult>,
    error: Option<String>,
    run: u64,
}

impl Studio {
    /// Empty studio.
    pub fn new() -> Self {
        Self::default()
    }

    /// Uploaded photo.
    pub fn image(&self) -> Option<&ImageUpload> {
        self.image.as_ref()
    }

    /// Chosen filter.
    pub fn selected(&self) -> Option<&FilterDescriptor> {
        self.selected.as_ref()
    }

    /// Current phase.
    pub fn phase(&self) -> TransformPhase {
        self.phase
    }

    /// Prompt of the current or last run.
    pub fn prompt(&self) -> Option<&str> {
        self.prompt.as_deref()
    }

    /// Result of the last finished run.
    pub fn result(&self) -> Option<&TransformationResult> {
        self.result.as_ref()
    }

    /// Message for the error panel.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// True while a run is outstanding.
    pub fn is_busy(&self) -> bool {
        self.phase.is_pending()
    }

    fn ensure_idle(&self) -> Result<(), TransformError> {
        if self.is_busy() {
            return Err(TransformError::Busy);
        }
        Ok(())
    }

    /// Replaces the photo and clears everything derived from the old one.
    pub fn upload(&mut self, image: ImageUpload) -> Result<(), TransformError> {
        self.ensure_idle()?;
        self.image = Some(image);
        self.selected = None;
        self.prompt = None;
        self.result = None;
        self.error = None;
        self.phase = TransformPhase::Idle;
        Ok(())
    }

    /// Chooses the filter for the next run.
    pub fn select(&mut self, filter: FilterDescriptor) -> Result<(), TransformError> {
        self.ensure_idle()?;
        self.selected = Some(filter);
        Ok(())
    }

    /// Shows `message` in the error panel without touching the phase.
    pub fn set_error(&mut self, message: String) {
        self.error = Some(message);
    }

    /// Starts a run if a photo and a filter are present.
    pub fn begin(&mut self) -> Result<Ticket, TransformError> {
        self.ensure_idle()?;
        let image = self.image.clone().ok_or(TransformError::MissingImage)?;
        let filter = self.selected.clone().ok_or(TransformError::MissingFilter)?;

        self.run += 1;
        self.phase = TransformPhase::PromptPending;
        self.prompt = None;
        self.result = None;
        self.error = None;
        Ok(Ticket {
            run: self.run,
            request: TransformationRequest { image, filter },
        })
    }

    fn is_current(&self, run: u64, expected: &[TransformPhase]) -> bool {
        let current = self.run == run && expected.contains(&self.phase);
        if !current {
            debug!(
                "Ignoring completion for run {run}, studio is at run {} in {:?}",
                self.run, self.phase
            );
        }
        current
    }

    /// Stores the phase-one prompt. Returns false for a stale run.
    pub fn record_prompt(&mut self, run: u64, prompt: &str) -> bool {
        if !self.is_current(run, &[TransformPhase::PromptPending]) {
            return false;
        }
        self.prompt = Some(prompt.to_string());
        self.phase = TransformPhase::ImagePending;
        true
    }

    /// Stores the result; `diagnostic` goes to the error panel when there is no image.
    pub fn finish(
        &mut self,
        run: u64,
        result: TransformationResult,
        diagnostic: Option<String>,
    ) -> bool {
        if !self.is_current(run, &[TransformPhase::ImagePending]) {
            return false;
        }
        self.result = Some(result);
        self.error = diagnostic;
        self.phase = TransformPhase::Done;
        true
    }

    /// Aborts the run with `message`. Any recorded prompt is kept.
    pub fn fail(&mut self, run: u64, message: String) -> bool {
        if !self.is_current(
            run,
            &[TransformPhase::PromptPending, TransformPhase::ImagePending],
        ) {
            return false;
        }
        self.error = Some(message);
        self.phase = TransformPhase::Failed;
        true
    }

    /// Back to an empty studio. In-flight runs become stale.
    pub fn reset(&mut self) {
        *self = Self {
            run: self.run + 1,
            ..Self::default()
        };
    }

    /// Serializable view for the JSON API.
    pub fn snapshot(&self) -> StudioSnapshot {
        StudioSnapshot {
            phase: self.phase,
            has_image: self.image.is_some(),
            image_mime_type: self.image.as_ref().map(|image| image.mime_type.clone()),
            selected_filter_id: self.selected.as_ref().map(|filter| filter.id().to_string()),
            prompt: self.prompt.clone(),
            error: self.error.clone(),
            result: self.result.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Category;

    fn upload() -> ImageUpload {
        ImageUpload::new(vec![1u8, 2, 3], "image/png", Some("cat.png".to_string()))
    }

    fn filter() -> FilterDescriptor {
        FilterDescriptor::new("Pop Art", Category::Artistic, "pop art style")
    }

    fn ready() -> Studio {
        let mut studio = Studio::new();
        studio.upload(upload()).expect("upload");
        studio.select(filter()).expect("select");
        studio
    }

    fn result() -> TransformationResult {
        TransformationResult {
            prompt: "prompt".to_string(),
            image: Some("data:image/png;base64,AA==".to_string()),
            text: None,
        }
    }

    #[test]
    fn begin_requires_image_then_filter() {
        let mut studio = Studio::new();
        assert!(matches!(studio.begin(), Err(TransformError::MissingImage)));

        studio.upload(upload()).expect("upload");
        assert!(matches!(studio.begin(), Err(TransformError::MissingFilter)));
        assert_eq!(studio.phase(), TransformPhase::Idle);

        studio.select(filter()).expect("select");
        let ticket = studio.begin().expect("begin");
        assert_eq!(ticket.run, 1);
        assert_eq!(ticket.request.filter.id(), "artistic-popart");
        assert_eq!(ticket.request.image.file_name(), Some("cat.png"));
        assert_eq!(studio.phase(), TransformPhase::PromptPending);
    }

    #[test]
    fn pending_run_rejects_other_transitions() {
        let mut studio = ready();
        studio.begin().expect("begin");
        assert!(studio.is_busy());
        assert!(matches!(studio.begin(), Err(TransformError::Busy)));
        assert!(matches!(studio.upload(upload()), Err(TransformError::Busy)));
        assert!(matches!(studio.select(filter()), Err(TransformError::Busy)));
    }

    #[test]
    fn happy_path_walks_through_phases() {
        let mut studio = ready();
        let ticket = studio.begin().expect("begin");
        assert!(studio.record_prompt(ticket.run, "a detailed prompt"));
        assert_eq!(studio.phase(), TransformPhase::ImagePending);
        assert_eq!(studio.prompt(), Some("a detailed prompt"));

        assert!(studio.finish(ticket.run, result(), None));
        assert_eq!(studio.phase(), TransformPhase::Done);
        assert_eq!(studio.result(), Some(&result()));
        assert!(studio.error().is_none());
        assert!(!studio.is_busy());
    }

    #[test]
    fn failure_after_prompt_keeps_prompt() {
        let mut studio = ready();
        let ticket = studio.begin().expect("begin");
        studio.record_prompt(ticket.run, "kept");
        assert!(studio.fail(ticket.run, "boom".to_string()));
        assert_eq!(studio.phase(), TransformPhase::Failed);
        assert_eq!(studio.prompt(), Some("kept"));
        assert_eq!(studio.error(), Some("boom"));

        // a new run starts clean
        let next = studio.begin().expect("begin again");
        assert_eq!(next.run, 2);
        assert!(studio.prompt().is_none());
        assert!(studio.error().is_none());
    }

    #[test]
    fn reset_clears_everything_and_discards_in_flight_run() {
        let mut studio = ready();
        let ticket = studio.begin().expect("begin");
        studio.reset();

        assert!(studio.image().is_none());
        assert!(studio.selected().is_none());
        assert!(studio.prompt().is_none());
        assert!(studio.result().is_none());
        assert!(studio.error().is_none());
        assert_eq!(studio.phase(), TransformPhase::Idle);

        assert!(!studio.record_prompt(ticket.run, "late"));
        assert!(!studio.fail(ticket.run, "late".to_string()));
        assert!(studio.prompt().is_none());
        assert_eq!(studio.phase(), TransformPhase::Idle);
    }

    #[test]
    fn upload_clears_previous_outcome() {
        let mut studio = ready();
        let ticket = studio.begin().expect("begin");
        studio.record_prompt(ticket.run, "p");
        studio.finish(ticket.run, result(), None);

        studio.upload(upload()).expect("upload again");
        assert!(studio.result().is_none());
        assert!(studio.selected().is_none());
        assert!(studio.prompt().is_none());
        assert_eq!(studio.phase(), TransformPhase::Idle);
    }

    #[test]
    fn snapshot_reflects_state() {
        let mut studio = ready();
        let ticket = studio.begin().expect("begin");
        studio.record_prompt(ticket.run, "p");
        let snapshot = studio.snapshot();
        assert_eq!(snapshot.phase, TransformPhase::ImagePending);
        assert!(snapshot.has_image);
        assert_eq!(snapshot.image_mime_type.as_deref(), Some("image/png"));
        assert_eq!(snapshot.selected_filter_id.as_deref(), Some("artistic-popart"));

        let value = serde_json::to_value(&snapshot).expect("serialize");
        assert_eq!(value["phase"], "ImagePending");
        assert_eq!(value["prompt"], "p");
    }
}
