use std::error::Error as StdError;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use crate::{domain::error::DomainError, infra::error::InfraError};

/// Presentation-safe HTTP failure: a terse public message goes to the
/// client, the detail chain goes to the log.
#[derive(Debug)]
pub struct HttpError {
    source: &'static str,
    status: StatusCode,
    public_message: &'static str,
    detail: Vec<String>,
}

impl HttpError {
    pub fn new(
        source: &'static str,
        status: StatusCode,
        public_message: &'static str,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            source,
            status,
            public_message,
            detail: vec![detail.into()],
        }
    }

    pub fn from_error(
        source: &'static str,
        status: StatusCode,
        public_message: &'static str,
        error: &dyn StdError,
    ) -> Self {
        let mut detail = vec![error.to_string()];
        let mut current = error.source();
        while let Some(inner) = current {
            detail.push(inner.to_string());
            current = inner.source();
        }
        Self {
            source,
            status,
            public_message,
            detail,
        }
    }

    pub fn bad_request(source: &'static str, public_message: &'static str, error: &dyn StdError) -> Self {
        Self::from_error(source, StatusCode::BAD_REQUEST, public_message, error)
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        error!(
            source = self.source,
            status = %self.status,
            detail = ?self.detail,
            "request failed"
        );
        (self.status, self.public_message).into_response()
    }
}

/// Top-level failure of the binary itself (configuration, startup, bind).
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl AppError {
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected(message.into())
    }
}
