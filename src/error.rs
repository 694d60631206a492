use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

use crate::{repository::RepositoryError, views::error_document};

/// PageError
///
/// The error boundary for page handlers. A loader failure aborts the whole render;
/// the client only ever sees a generic status page.
#[derive(Debug, Error)]
pub enum PageError {
    #[error("data loader failed: {0}")]
    Loader(#[from] RepositoryError),
    #[error("not found")]
    NotFound,
}

impl PageError {
    pub fn status(&self) -> StatusCode {
        match self {
            PageError::Loader(_) => StatusCode::INTERNAL_SERVER_ERROR,
            PageError::NotFound => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("page render aborted: {}", self);
        }
        (status, Html(error_document(status))).into_response()
    }
}
