//! Proxy failures and their client-facing representation.
//!
//! Every failure to reach or talk to the upstream becomes `502 Bad Gateway`
//! with a small JSON body. Failures after the response head has been relayed
//! cannot be reported this way; hyper aborts the connection instead.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Message returned to clients for any upstream failure.
pub const UPSTREAM_FAILED: &str = "Upstream request failed";

#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    /// Connection refused, DNS failure, reset, or malformed upstream response.
    #[error("upstream request failed: {0}")]
    Upstream(#[from] hyper_util::client::legacy::Error),

    /// The rewritten URI could not be assembled.
    #[error("invalid upstream uri: {0}")]
    InvalidUri(#[from] axum::http::uri::InvalidUri),
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        (
            StatusCode::BAD_GATEWAY,
            Json(json!({ "error": UPSTREAM_FAILED })),
        )
            .into_response()
    }
}
