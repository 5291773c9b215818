//! # Handlers
//!
//! This module coordinates the flow between HTTP requests and `ThreadService`.
//! Each handler validates its input, calls one service operation and shapes
//! the result; all error-to-status mapping lives in [`ApiError`].

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::header;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use domains::ThreadView;
use services::ThreadService;

use crate::error::ApiError;
use crate::extract::{Payload, QueryParams};
use crate::metrics::Metrics;
use crate::requests::{
    CreateReplyRequest, CreateThreadRequest, DeleteReplyRequest, DeleteThreadRequest,
    ReportReplyRequest, ThreadIdRequest,
};

/// State shared across all request tasks.
#[derive(Clone)]
pub struct AppState {
    pub service: ThreadService,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    pub fn new(service: ThreadService) -> Self {
        Self {
            service,
            metrics: Arc::new(Metrics::new()),
        }
    }
}

type ApiResult<T> = Result<T, ApiError>;

/// POST /api/threads/{board}
pub async fn create_thread(
    State(state): State<AppState>,
    Path(board): Path<String>,
    Payload(req): Payload<CreateThreadRequest>,
) -> ApiResult<Json<ThreadView>> {
    let cmd = req.validate()?;
    let thread = state.service.create_thread(&board, cmd).await?;
    Ok(Json(ThreadView::full(&thread)))
}

/// GET /api/threads/{board}
pub async fn list_threads(
    State(state): State<AppState>,
    Path(board): Path<String>,
) -> ApiResult<Json<Vec<ThreadView>>> {
    let threads = state.service.list_threads(&board).await?;
    Ok(Json(threads.iter().map(ThreadView::preview).collect()))
}

/// DELETE /api/threads/{board}
pub async fn delete_thread(
    State(state): State<AppState>,
    Path(board): Path<String>,
    Payload(req): Payload<DeleteThreadRequest>,
) -> ApiResult<&'static str> {
    let (thread_id, password) = req.validate()?;
    state.service.delete_thread(&board, &thread_id, &password).await?;
    Ok("success")
}

/// PUT /api/threads/{board}
pub async fn report_thread(
    State(state): State<AppState>,
    Path(board): Path<String>,
    Payload(req): Payload<ThreadIdRequest>,
) -> ApiResult<&'static str> {
    let thread_id = req.validate()?;
    state.service.report_thread(&board, &thread_id).await?;
    Ok("reported")
}

/// POST /api/replies/{board}
pub async fn create_reply(
    State(state): State<AppState>,
    Path(board): Path<String>,
    Payload(req): Payload<CreateReplyRequest>,
) -> ApiResult<Json<ThreadView>> {
    let cmd = req.validate()?;
    let thread = state.service.create_reply(&board, cmd).await?;
    Ok(Json(ThreadView::full(&thread)))
}

/// GET /api/replies/{board}?thread_id=...
pub async fn view_thread(
    State(state): State<AppState>,
    Path(board): Path<String>,
    QueryParams(query): QueryParams<ThreadIdRequest>,
) -> ApiResult<Json<ThreadView>> {
    let thread_id = query.validate()?;
    let thread = state.service.view_thread(&board, &thread_id).await?;
    Ok(Json(ThreadView::full(&thread)))
}

/// DELETE /api/replies/{board}
pub async fn delete_reply(
    State(state): State<AppState>,
    Path(board): Path<String>,
    Payload(req): Payload<DeleteReplyRequest>,
) -> ApiResult<&'static str> {
    let (thread_id, reply_id, password) = req.validate()?;
    state
        .service
        .delete_reply(&board, &thread_id, &reply_id, &password)
        .await?;
    Ok("success")
}

/// PUT /api/replies/{board}
pub async fn report_reply(
    State(state): State<AppState>,
    Path(board): Path<String>,
    Payload(req): Payload<ReportReplyRequest>,
) -> ApiResult<&'static str> {
    let (thread_id, reply_id) = req.validate()?;
    state.service.report_reply(&board, &thread_id, &reply_id).await?;
    Ok("reported")
}

/// GET /metrics
pub async fn metrics(State(state): State<AppState>) -> Response {
    match state.metrics.render() {
        Ok(body) => (
            [(
                header::CONTENT_TYPE,
                "application/openmetrics-text; version=1.0.0; charset=utf-8",
            )],
            body,
        )
            .into_response(),
        Err(err) => {
            tracing::error!(error = %err, "metrics encoding failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "server error").into_response()
        }
    }
}

/// Every unmatched path or method.
pub async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not Found")
}
