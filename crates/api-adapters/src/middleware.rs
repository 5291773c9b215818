//! anonboard/crates/api-adapters/src/middleware.rs Middleware
//!
//! Security headers, CORS, request tracing and operation counters.

use std::time::Duration;

use axum::extract::{MatchedPath, Request, State};
use axum::http::{header, HeaderName, HeaderValue, Method};
use axum::middleware::Next;
use axum::response::Response;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::AppState;
use crate::metrics::{Operation, Outcome};

/// Headers added to every response unless a handler set them already.
const SECURITY_HEADERS: [(HeaderName, &str); 4] = [
    (header::X_FRAME_OPTIONS, "SAMEORIGIN"),
    (header::X_DNS_PREFETCH_CONTROL, "off"),
    (header::REFERRER_POLICY, "same-origin"),
    (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
];

/// Any origin may call the API.
pub fn cors_policy() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
        .max_age(Duration::from_secs(3600))
}

/// Wraps `router` with the standard layer stack. Tracing is outermost so the
/// logged status is the one the client sees.
pub fn standard_middleware(router: Router) -> Router {
    let mut router = router.layer(cors_policy());
    for (name, value) in SECURITY_HEADERS {
        router = router.layer(SetResponseHeaderLayer::if_not_present(
            name,
            HeaderValue::from_static(value),
        ));
    }
    router.layer(TraceLayer::new_for_http())
}

/// Counts each board operation by outcome. Mounted with `route_layer`, so
/// only matched routes reach it.
pub async fn track_operation(
    State(state): State<AppState>,
    matched: MatchedPath,
    req: Request,
    next: Next,
) -> Response {
    let operation = Operation::resolve(req.method().as_str(), matched.as_str());
    let response = next.run(req).await;
    if let Some(operation) = operation {
        state
            .metrics
            .record(operation, Outcome::from_status(response.status().as_u16()));
    }
    response
}
