use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use scribe_db::DbError;

use crate::views;

/// Request failures that end up as an HTTP error status.
///
/// Validation problems are not errors: handlers flash them and re-render.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("forbidden")]
    Forbidden,

    #[error("database error: {0}")]
    Database(#[from] DbError),

    #[error("password hashing failed: {0}")]
    PasswordHash(String),

    #[error("session token error: {0}")]
    Session(#[from] jsonwebtoken::errors::Error),

    #[error("session lifetime overflows the clock")]
    SessionLifetime,

    #[error("{0} ran without a logged-in user")]
    MissingUser(&'static str),

    #[error("request task failed: {0}")]
    Task(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Database(_)
            | Self::PasswordHash(_)
            | Self::Session(_)
            | Self::SessionLifetime
            | Self::MissingUser(_)
            | Self::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            Self::NotFound(message) => {
                (status, Html(views::error_page(status, Some(message.as_str())))).into_response()
            }
            Self::Forbidden => status.into_response(),
            other => {
                error!("Request failed: {}", other);
                (status, Html(views::error_page(status, None))).into_response()
            }
        }
    }
}
