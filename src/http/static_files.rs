//! Static asset serving.
//!
//! Files are served recursively from the configured root by `ServeDir`.
//! Missing files get its default empty `404`. WebAssembly modules must be
//! served as `application/wasm` for streaming compilation, so that type is
//! forced on any successful response for a `.wasm` path.

use std::path::Path;

use axum::{
    body::Body,
    http::{header, HeaderValue, Request},
    middleware::{self, Next},
    response::Response,
    routing::get_service,
    Router,
};
use tower_http::services::{ServeDir, ServeFile};

pub const APPLICATION_WASM: HeaderValue = HeaderValue::from_static("application/wasm");

/// Router serving every file under `root`.
pub fn static_router(root: &Path) -> Router {
    let serve_dir = ServeDir::new(root).append_index_html_on_directories(true);

    Router::new()
        .fallback_service(serve_dir)
        .layer(middleware::from_fn(force_wasm_content_type))
}

/// Routes answering `/` and `/index.html` with `root/document`.
pub fn index_routes(root: &Path, document: &str) -> Router {
    let index = ServeFile::new(root.join(document));

    Router::new()
        .route("/", get_service(index.clone()))
        .route("/index.html", get_service(index))
}

async fn force_wasm_content_type(request: Request<Body>, next: Next) -> Response {
    let is_wasm = request.uri().path().ends_with(".wasm");
    let mut response = next.run(request).await;

    if is_wasm && response.status().is_success() {
        response
            .headers_mut()
            .insert(header::CONTENT_TYPE, APPLICATION_WASM);
    }
    response
}
