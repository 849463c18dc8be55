//! Form posts that change the studio.

use std::io::Cursor;

use axum::extract::Multipart;

use super::prelude::*;
use crate::studio::ImageUpload;

#[derive(Deserialize)]
pub(crate) struct CsrfForm {
    csrf_token: String,
}

#[derive(Deserialize)]
pub(crate) struct SelectForm {
    csrf_token: String,
    filter_id: String,
    category: Option<String>,
    q: Option<String>,
}

#[derive(Deserialize)]
pub(crate) struct LanguageForm {
    csrf_token: String,
    language: String,
}

/// `/?category=..&q=..`, leaving out blank values.
pub(crate) fn back_to_page(category: Option<&str>, search: Option<&str>) -> String {
    let mut query = url::form_urlencoded::Serializer::new(String::new());
    for (key, value) in [("category", category), ("q", search)] {
        if let Some(value) = value.map(str::trim).filter(|value| !value.is_empty()) {
            query.append_pair(key, value);
        }
    }
    let query = query.finish();
    if query.is_empty() {
        "/".to_string()
    } else {
        format!("/?{query}")
    }
}

/// Sniffs the image format from its magic bytes.
fn sniff_mime_type(bytes: &[u8]) -> Result<&'static str, PhotostyleError> {
    if bytes.len() < 4 {
        debug!("Image is too short");
        return Err(PhotostyleError::BadRequest);
    }
    let reader = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|err| {
            debug!("Failed to guess image format: {}", err);
            PhotostyleError::BadRequest
        })?;
    match reader.format() {
        Some(format) => Ok(format.to_mime_type()),
        None => {
            debug!("Upload is not a recognised image");
            Err(PhotostyleError::BadRequest)
        }
    }
}

#[instrument(skip_all)]
pub(crate) async fn upload_handler<B: StyleBackend>(
    State(state): State<AppState<B>>,
    session: Session,
    mut multipart: Multipart,
) -> Result<Redirect, PhotostyleError> {
    let mut image: Option<(Vec<u8>, Option<String>)> = None;
    let mut csrf_token_value: Option<String> = None;

    while let Some(field) = multipart.next_field().await? {
        match field.name().unwrap_or_default() {
            "csrf_token" => csrf_token_value = Some(field.text().await?),
            "image" => {
                let file_name = field.file_name().map(str::to_string);
                let bytes = field.bytes().await?;
                image = Some((bytes.to_vec(), file_name));
            }
            _ => {}
        }
    }

    let csrf_token_value = csrf_token_value.ok_or(PhotostyleError::BadRequest)?;
    validate_csrf(&session, &csrf_token_value).await?;
    let (bytes, file_name) = image.ok_or(PhotostyleError::BadRequest)?;
    let mime_type = sniff_mime_type(&bytes)?;

    info!(
        "Received {} byte {} upload {:?}",
        bytes.len(),
        mime_type,
        file_name
    );
    state
        .orchestrator
        .studio()
        .write()
        .await
        .upload(ImageUpload::new(bytes, mime_type, file_name))?;
    Ok(Redirect::to("/"))
}

#[instrument(skip_all, fields(filter_id = %form.filter_id))]
pub(crate) async fn select_handler<B: StyleBackend>(
    State(state): State<AppState<B>>,
    session: Session,
    Form(form): Form<SelectForm>,
) -> Result<Redirect, PhotostyleError> {
    validate_csrf(&session, &form.csrf_token).await?;
    let filter = state
        .catalog
        .get(&form.filter_id)
        .ok_or_else(|| PhotostyleError::NotFound(format!("filter {}", form.filter_id)))?;
    state
        .orchestrator
        .studio()
        .write()
        .await
        .select(filter.clone())?;
    debug!("Selected {}", filter.name());
    Ok(Redirect::to(&back_to_page(
        form.category.as_deref(),
        form.q.as_deref(),
    )))
}

/// Starts a run and returns straight away; the page refreshes until it is done.
#[instrument(skip_all)]
pub(crate) async fn apply_handler<B: StyleBackend>(
    State(state): State<AppState<B>>,
    session: Session,
    Form(form): Form<CsrfForm>,
) -> Result<Redirect, PhotostyleError> {
    validate_csrf(&session, &form.csrf_token).await?;
    let i18n = state.localization.read().await.clone();
    match state.orchestrator.spawn(i18n).await {
        Ok(_) => Ok(Redirect::to("/")),
        // already in the error panel
        Err(err) if err.is_precondition() => Ok(Redirect::to("/")),
        Err(err) => Err(err.into()),
    }
}

#[instrument(skip_all)]
pub(crate) async fn reset_handler<B: StyleBackend>(
    State(state): State<AppState<B>>,
    session: Session,
    Form(form): Form<CsrfForm>,
) -> Result<Redirect, PhotostyleError> {
    validate_csrf(&session, &form.csrf_token).await?;
    state.orchestrator.reset().await;
    Ok(Redirect::to("/"))
}

#[instrument(skip_all, fields(language = %form.language))]
pub(crate) async fn language_handler<B: StyleBackend>(
    State(state): State<AppState<B>>,
    session: Session,
    Form(form): Form<LanguageForm>,
) -> Result<Redirect, PhotostyleError> {
    validate_csrf(&session, &form.csrf_token).await?;
    state
        .localization
        .write()
        .await
        .set_language(&form.language)
        .map_err(|err| {
            warn!("{err}");
            PhotostyleError::BadRequest
        })?;
    Ok(Redirect::to("/"))
}
