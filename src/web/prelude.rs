pub(crate) use super::AppState;
pub(crate) use super::csrf::{csrf_token, validate_csrf};
pub(crate) use crate::catalog::{Category, selector};
pub(crate) use crate::error::PhotostyleError;
pub(crate) use crate::genai::StyleBackend;
pub(crate) use crate::i18n::Translate;
pub(crate) use askama::Template;
pub(crate) use askama_web::WebTemplate;
pub(crate) use axum::extract::{Form, Query, State};
pub(crate) use axum::http::{StatusCode, header};
pub(crate) use axum::response::{IntoResponse, Redirect, Response};
pub(crate) use serde::Deserialize;
pub(crate) use tower_sessions::Session;
pub(crate) use tracing::{debug, info, instrument, warn};
