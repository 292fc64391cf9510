//! Cross-origin isolation and CORS response headers.
//!
//! COOP `same-origin` together with COEP `require-corp` puts the page in a
//! cross-origin isolated context, which browsers require before exposing
//! `SharedArrayBuffer` to WebAssembly threads. The headers override anything
//! set further down the stack, upstream responses included.

use axum::{
    http::{header, HeaderName, HeaderValue},
    Router,
};
use tower_http::set_header::SetResponseHeaderLayer;

pub const CROSS_ORIGIN_OPENER_POLICY: HeaderName =
    HeaderName::from_static("cross-origin-opener-policy");
pub const CROSS_ORIGIN_EMBEDDER_POLICY: HeaderName =
    HeaderName::from_static("cross-origin-embedder-policy");

/// Any origin may read our responses.
pub const ALLOW_ANY_ORIGIN: HeaderValue = HeaderValue::from_static("*");

/// Wrap `router` so every response carries the isolation and CORS headers.
pub fn with_isolation_headers<S>(router: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            ALLOW_ANY_ORIGIN,
        ))
        .layer(SetResponseHeaderLayer::overriding(
            CROSS_ORIGIN_EMBEDDER_POLICY,
            HeaderValue::from_static("require-corp"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            CROSS_ORIGIN_OPENER_POLICY,
            HeaderValue::from_static("same-origin"),
        ))
}
