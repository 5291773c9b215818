//! Mapping from operation results to HTTP status and plain-text body.

use domains::BoardError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Board(#[from] BoardError),

    /// Body present but not decodable as JSON or a urlencoded form.
    #[error("invalid request body")]
    MalformedBody,

    /// Query string present but not decodable into the expected fields.
    #[error("invalid query string")]
    MalformedQuery,
}

impl ApiError {
    /// Status code and body text. Store failures keep their detail out of
    /// the body.
    pub fn status_and_body(&self) -> (u16, &'static str) {
        match self {
            ApiError::Board(BoardError::Validation(reason)) => (400, *reason),
            ApiError::Board(BoardError::NotFound(reason)) => (404, *reason),
            ApiError::Board(BoardError::IncorrectPassword) => (200, "incorrect password"),
            ApiError::Board(BoardError::Store(_)) => (500, "server error"),
            ApiError::MalformedBody => (400, "invalid request body"),
            ApiError::MalformedQuery => (400, "invalid query string"),
        }
    }
}

#[cfg(feature = "web-axum")]
mod axum_impl {
    use super::*;
    use axum::http::StatusCode;
    use axum::response::{IntoResponse, Response};

    impl IntoResponse for ApiError {
        fn into_response(self) -> Response {
            if let ApiError::Board(BoardError::Store(err)) = &self {
                tracing::error!(error = %err, "store failure");
            }
            let (status, body) = self.status_and_body();
            let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, body).into_response()
        }
    }
}
