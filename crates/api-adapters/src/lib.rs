//! # api-adapters
//!
//! The HTTP layer of the board: routing, body extraction, field validation
//! and response shaping. The axum surface sits behind the `web-axum` feature.

pub mod error;
pub mod metrics;
pub mod requests;

#[cfg(feature = "web-axum")]
pub mod extract;
#[cfg(feature = "web-axum")]
pub mod handlers;
#[cfg(feature = "web-axum")]
pub mod middleware;

pub use error::ApiError;

/// Route template of the thread endpoints.
pub const THREADS_ROUTE: &str = "/api/threads/{board}";
/// Route template of the reply endpoints.
pub const REPLIES_ROUTE: &str = "/api/replies/{board}";

#[cfg(feature = "web-axum")]
pub use router::{app, api_router, Assets};

#[cfg(feature = "web-axum")]
mod router {
    use std::path::PathBuf;

    use axum::routing::get;
    use axum::Router;
    use tower_http::services::{ServeDir, ServeFile};

    use super::{REPLIES_ROUTE, THREADS_ROUTE};
    use crate::handlers::{self, AppState};
    use crate::middleware::{standard_middleware, track_operation};

    /// Optional files served next to the API.
    #[derive(Debug, Clone, Default)]
    pub struct Assets {
        /// Directory served under `/public`.
        pub public_dir: Option<PathBuf>,
        /// File served at `/`.
        pub index_file: Option<PathBuf>,
    }

    /// The eight board operations plus `/metrics`, with 404 fallbacks.
    ///
    /// # Developer Note
    /// Unknown methods on known paths also get the plain 404 rather than
    /// axum's default 405.
    pub fn api_router(state: AppState) -> Router {
        Router::new()
            .route(
                THREADS_ROUTE,
                get(handlers::list_threads)
                    .post(handlers::create_thread)
                    .delete(handlers::delete_thread)
                    .put(handlers::report_thread),
            )
            .route(
                REPLIES_ROUTE,
                get(handlers::view_thread)
                    .post(handlers::create_reply)
                    .delete(handlers::delete_reply)
                    .put(handlers::report_reply),
            )
            .route_layer(axum::middleware::from_fn_with_state(
                state.clone(),
                track_operation,
            ))
            .route("/metrics", get(handlers::metrics))
            .fallback(handlers::not_found)
            .method_not_allowed_fallback(handlers::not_found)
            .with_state(state)
    }

    /// The full application: API, optional static assets and the standard
    /// middleware stack.
    pub fn app(state: AppState, assets: &Assets) -> Router {
        let mut router = api_router(state);
        if let Some(dir) = &assets.public_dir {
            router = router.nest_service("/public", ServeDir::new(dir));
        }
        if let Some(index) = &assets.index_file {
            router = router.route_service("/", ServeFile::new(index));
        }
        standard_middleware(router)
    }
}
