//! Read-only JSON views.

use axum::Json;

use super::prelude::*;
use super::views::SelectorQuery;

/// Filters the grid would show for `?category=&q=`.
pub(crate) async fn filters_handler<B: StyleBackend>(
    State(state): State<AppState<B>>,
    Query(query): Query<SelectorQuery>,
) -> Result<Response, PhotostyleError> {
    let category = query.category()?;
    let selected = selector::select(state.catalog.filters(), category, query.search());
    Ok(Json(selected).into_response())
}

pub(crate) async fn studio_handler<B: StyleBackend>(
    State(state): State<AppState<B>>,
) -> impl IntoResponse {
    Json(state.orchestrator.studio().read().await.snapshot())
}
