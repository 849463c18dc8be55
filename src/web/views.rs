use super::prelude::*;
use crate::constants::{PENDING_REFRESH_SECONDS, PROMPT_PREVIEW_CHARS};
use crate::i18n::{LANGUAGES, Localization};

/// `?category=<slug>&q=<term>`, shared by the page and the JSON API.
#[derive(Deserialize, Debug, Default)]
pub(crate) struct SelectorQuery {
    pub(crate) category: Option<String>,
    pub(crate) q: Option<String>,
}

impl SelectorQuery {
    /// Requested category, the default one when absent.
    pub(crate) fn category(&self) -> Result<Category, PhotostyleError> {
        match self.category.as_deref().map(str::trim) {
            None | Some("") => Ok(Category::default()),
            Some(value) => value.parse().map_err(|err| {
                debug!("{err}");
                PhotostyleError::BadRequest
            }),
        }
    }

    pub(crate) fn search(&self) -> &str {
        self.q.as_deref().unwrap_or_default()
    }
}

#[derive(Clone, Debug)]
pub(crate) struct CategoryTab {
    pub(crate) slug: String,
    pub(crate) label: String,
    pub(crate) active: bool,
}

#[derive(Clone, Debug)]
pub(crate) struct FilterCard {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) preview_image_url: String,
    pub(crate) selected: bool,
}

#[derive(Clone, Debug)]
pub(crate) struct LanguageOption {
    pub(crate) code: &'static str,
    pub(crate) native_name: &'static str,
    pub(crate) current: bool,
}

#[derive(Template, WebTemplate)]
#[template(path = "studio.html")]
pub(crate) struct StudioTemplate {
    i18n: Localization,
    dir: &'static str,
    languages: Vec<LanguageOption>,
    csrf_token: String,
    categories: Vec<CategoryTab>,
    category: String,
    search: String,
    cards: Vec<FilterCard>,
    has_image: bool,
    has_selection: bool,
    selected_name: String,
    can_apply: bool,
    pending: bool,
    refresh_seconds: u32,
    has_prompt: bool,
    prompt: String,
    has_error: bool,
    error_message: String,
    has_result_image: bool,
    result_image: String,
    has_result_text: bool,
    result_text: String,
}

/// Cuts `text` to at most `max` characters, marking the cut with an ellipsis.
pub(crate) fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}…", &text[..cut]),
        None => text.to_string(),
    }
}

/// handles the / GET
#[instrument(level = "debug", skip_all)]
pub(crate) async fn root_handler<B: StyleBackend>(
    State(state): State<AppState<B>>,
    session: Session,
    Query(query): Query<SelectorQuery>,
) -> Result<StudioTemplate, PhotostyleError> {
    let category = query.category()?;
    let search = query.search().to_string();
    let csrf_token = csrf_token(&session).await?;
    let i18n = state.localization.read().await.clone();
    let studio = state.orchestrator.studio().read().await;

    let selected_id = studio.selected().map(|filter| filter.id().to_string());
    let cards = selector::select(state.catalog.filters(), category, &search)
        .into_iter()
        .map(|filter| FilterCard {
            id: filter.id().to_string(),
            name: filter.name().to_string(),
            preview_image_url: filter.preview_image_url().to_string(),
            selected: selected_id.as_deref() == Some(filter.id()),
        })
        .collect();
    let categories = Category::ALL
        .iter()
        .map(|tab| CategoryTab {
            slug: tab.slug(),
            label: i18n.translate(&tab.locale_key(), Some(tab.label())),
            active: *tab == category,
        })
        .collect();
    let languages = LANGUAGES
        .iter()
        .map(|language| LanguageOption {
            code: language.code,
            native_name: language.native_name,
            current: language.code == i18n.language(),
        })
        .collect();

    let pending = studio.is_busy();
    let prompt = match studio.prompt() {
        Some(prompt) if pending => truncate_chars(prompt, PROMPT_PREVIEW_CHARS),
        Some(prompt) => prompt.to_string(),
        None => String::new(),
    };
    let result_image = studio
        .result()
        .and_then(|result| result.image.clone())
        .unwrap_or_default();
    // text next to an image is commentary; without one it is already the error
    let result_text = studio
        .result()
        .filter(|result| result.image.is_some())
        .and_then(|result| result.text.clone())
        .unwrap_or_default();
    let selected_name = studio
        .selected()
        .map(|filter| filter.name().to_string())
        .unwrap_or_default();
    let error_message = studio.error().unwrap_or_default().to_string();

    Ok(StudioTemplate {
        dir: if i18n.is_rtl() { "rtl" } else { "ltr" },
        languages,
        csrf_token,
        categories,
        category: category.slug(),
        search,
        cards,
        has_image: studio.image().is_some(),
        has_selection: !selected_name.is_empty(),
        can_apply: studio.image().is_some() && studio.selected().is_some() && !pending,
        selected_name,
        pending,
        refresh_seconds: PENDING_REFRESH_SECONDS,
        has_prompt: !prompt.is_empty(),
        prompt,
        has_error: !error_message.is_empty(),
        error_message,
        has_result_image: !result_image.is_empty(),
        result_image,
        has_result_text: !result_text.is_empty(),
        result_text,
        i18n,
    })
}
