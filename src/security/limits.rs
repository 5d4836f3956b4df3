//! Request size limits.
//!
//! Bodies above the configured size are answered with 413 Payload Too Large
//! before the JSON extractor sees them.

use axum::extract::DefaultBodyLimit;
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;

/// Cap request bodies at `max_body_size` bytes.
pub fn limit_body_size(router: Router, max_body_size: usize) -> Router {
    router
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_body_size))
}
