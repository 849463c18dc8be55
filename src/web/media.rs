use axum::body::Body;

use super::prelude::*;
use crate::constants::DOWNLOAD_FILE_STEM;
use crate::genai::InlineImage;

const NO_STORE: &str = "no-store";

/// File extension for an image MIME type, `png` when unknown.
fn extension_for(mime_type: &str) -> &'static str {
    image::ImageFormat::from_mime_type(mime_type)
        .and_then(|format| format.extensions_str().first().copied())
        .unwrap_or("png")
}

/// The uploaded photo, as sent.
pub(crate) async fn original_handler<B: StyleBackend>(
    State(state): State<AppState<B>>,
) -> Result<Response, PhotostyleError> {
    let studio = state.orchestrator.studio().read().await;
    let image = studio
        .image()
        .ok_or_else(|| PhotostyleError::NotFound("original image".to_string()))?;
    Ok(Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, image.mime_type())
        .header(header::CACHE_CONTROL, NO_STORE)
        .body(Body::from(image.bytes().to_vec()))?)
}

/// The transformed image as an attachment.
pub(crate) async fn download_handler<B: StyleBackend>(
    State(state): State<AppState<B>>,
) -> Result<Response, PhotostyleError> {
    let image = state
        .orchestrator
        .studio()
        .read()
        .await
        .result()
        .and_then(|result| result.image.as_deref())
        .and_then(InlineImage::from_data_uri)
        .ok_or_else(|| PhotostyleError::NotFound("transformed image".to_string()))?;
    let bytes = image
        .decode()
        .map_err(|err| PhotostyleError::InternalServerError(err.to_string()))?;
    let file_name = format!(
        "{}.{}",
        DOWNLOAD_FILE_STEM,
        extension_for(&image.mime_type)
    );
    info!("Serving {} ({} bytes)", file_name, bytes.len());
    Ok(Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, image.mime_type.as_str())
        .header(header::CACHE_CONTROL, NO_STORE)
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{file_name}\""),
        )
        .body(Body::from(bytes))?)
}
