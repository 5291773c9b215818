//! Extractors whose rejections go through [`ApiError`]: a body accepting
//! either JSON or a urlencoded form, and a query string.

use axum::body::{to_bytes, Body};
use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use axum::http::header::CONTENT_TYPE;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use axum::{Form, Json};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::ApiError;

/// Largest request body accepted, in bytes.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// Decodes `T` from a JSON or urlencoded body, picked by content type.
/// An empty body, or one of any other content type, decodes as
/// `T::default()` so the handler's field checks produce the response.
#[derive(Debug, Clone, Copy, Default)]
pub struct Payload<T>(pub T);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyKind {
    Json,
    Form,
    Ignored,
}

fn body_kind(headers: &HeaderMap) -> BodyKind {
    let parsed = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<mime::Mime>().ok());
    let Some(parsed) = parsed else {
        return BodyKind::Ignored;
    };
    if parsed.type_() != mime::APPLICATION {
        return BodyKind::Ignored;
    }
    if parsed.subtype() == mime::JSON || parsed.suffix() == Some(mime::JSON) {
        BodyKind::Json
    } else if parsed.subtype() == mime::WWW_FORM_URLENCODED {
        BodyKind::Form
    } else {
        BodyKind::Ignored
    }
}

impl<S, T> FromRequest<S> for Payload<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Default,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let (parts, body) = req.into_parts();
        let bytes = to_bytes(body, MAX_BODY_BYTES).await.map_err(|err| {
            debug!(error = %err, "unreadable request body");
            ApiError::MalformedBody
        })?;
        let kind = body_kind(&parts.headers);
        if kind == BodyKind::Ignored || bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Payload(T::default()));
        }

        let req = Request::from_parts(parts, Body::from(bytes));
        let decoded = match kind {
            BodyKind::Json => Json::<T>::from_request(req, state)
                .await
                .map(|Json(value)| value)
                .map_err(|rejection| rejection.body_text()),
            _ => Form::<T>::from_request(req, state)
                .await
                .map(|Form(value)| value)
                .map_err(|rejection| rejection.body_text()),
        };

        decoded.map(Payload).map_err(|detail| {
            debug!(%detail, "undecodable request body");
            ApiError::MalformedBody
        })
    }
}

/// `Query<T>` with the board's own rejection.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryParams<T>(pub T);

impl<S, T> FromRequestParts<S> for QueryParams<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Query::<T>::from_request_parts(parts, state)
            .await
            .map(|Query(value)| QueryParams(value))
            .map_err(|rejection| {
                debug!(detail = %rejection.body_text(), "undecodable query string");
                ApiError::MalformedQuery
            })
    }
}
