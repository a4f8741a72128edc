use std::io;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Errors surfaced by the content API
#[derive(Debug, Error)]
pub enum SiteError {
    #[error("{0}")]
    Validation(String),

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Cannot delete category '{name}' that has FAQs associated with it")]
    CategoryInUse { name: String, count: usize },

    #[error("Inconsistent state: {0}")]
    InconsistentState(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type SiteResult<T> = Result<T, SiteError>;

impl SiteError {
    pub fn status(&self) -> StatusCode {
        match self {
            SiteError::Validation(_)
            | SiteError::MalformedPayload(_)
            | SiteError::CategoryInUse { .. } => StatusCode::BAD_REQUEST,
            SiteError::NotFound(_) => StatusCode::NOT_FOUND,
            SiteError::Conflict(_) => StatusCode::CONFLICT,
            SiteError::InconsistentState(_) | SiteError::Io(_) | SiteError::Serialization(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for SiteError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();

        if status.is_server_error() {
            log::error!("{}", message);
        } else {
            log::warn!("{} ({})", message, status.as_u16());
        }

        let body = match &self {
            SiteError::CategoryInUse { count, .. } => json!({ "error": message, "count": count }),
            _ => json!({ "error": message }),
        };

        (status, Json(body)).into_response()
    }
}
