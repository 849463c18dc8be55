//! Error handling

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::{error, info, warn};

use crate::orchestrator::TransformError;

/// Errors returned by the web handlers.
#[derive(Debug)]
pub enum PhotostyleError {
    /// When you didn't do the right thing
    BadRequest,
    /// Missing or invalid session / CSRF token
    Unauthorized,
    /// When a requested resource is not found
    NotFound(String),
    /// The studio is busy with another run
    Conflict(String),
    /// The generative API failed
    BadGateway(String),
    /// When an internal server error occurs
    InternalServerError(String),
}

impl From<TransformError> for PhotostyleError {
    fn from(err: TransformError) -> Self {
        match err {
            TransformError::MissingImage | TransformError::MissingFilter => {
                PhotostyleError::BadRequest
            }
            TransformError::Busy => PhotostyleError::Conflict(err.to_string()),
            TransformError::Prompt(_) | TransformError::Image(_) => {
                PhotostyleError::BadGateway(err.to_string())
            }
        }
    }
}

impl From<std::io::Error> for PhotostyleError {
    fn from(err: std::io::Error) -> Self {
        PhotostyleError::InternalServerError(err.to_string())
    }
}

impl From<axum::http::Error> for PhotostyleError {
    fn from(err: axum::http::Error) -> Self {
        PhotostyleError::InternalServerError(err.to_string())
    }
}

impl From<tower_sessions::session::Error> for PhotostyleError {
    fn from(err: tower_sessions::session::Error) -> Self {
        PhotostyleError::InternalServerError(err.to_string())
    }
}

impl From<axum::extract::multipart::MultipartError> for PhotostyleError {
    fn from(err: axum::extract::multipart::MultipartError) -> Self {
        info!("Multipart error: {}", err);
        PhotostyleError::BadRequest
    }
}

impl IntoResponse for PhotostyleError {
    fn into_response(self) -> Response {
        match self {
            PhotostyleError::BadRequest => {
                info!("Bad request received");
                (StatusCode::BAD_REQUEST, "Bad Request").into_response()
            }
            PhotostyleError::Unauthorized => {
                info!("Unauthorized request received");
                (
                    StatusCode::UNAUTHORIZED,
                    "Unauthorized: invalid or missing session.",
                )
                    .into_response()
            }
            PhotostyleError::NotFound(what) => {
                info!("404 {what}");
                (StatusCode::NOT_FOUND, "Not Found").into_response()
            }
            PhotostyleError::Conflict(message) => {
                warn!("Conflict: {}", message);
                (StatusCode::CONFLICT, message).into_response()
            }
            PhotostyleError::BadGateway(message) => {
                error!("Upstream error: {}", message);
                (StatusCode::BAD_GATEWAY, "Upstream API error").into_response()
            }
            PhotostyleError::InternalServerError(message) => {
                error!("Internal server error: {}", message);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}
