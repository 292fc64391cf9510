//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with all handlers
//! - Wire up middleware (isolation headers, tracing, request ID)
//! - Dispatch API paths to the preflight responder or the proxy
//! - Fall through to the index document and static files
//! - Bind server to listener and shut down gracefully

use axum::{
    body::Body,
    extract::State,
    http::{Method, Request},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::config::{ConfigError, ServerConfig};
use crate::http::headers::with_isolation_headers;
use crate::http::preflight;
use crate::http::proxy::{Proxy, Upstream};
use crate::http::request::{propagate_request_id_layer, request_id, set_request_id_layer};
use crate::http::static_files::{index_routes, static_router};
use crate::routing::ApiRouter;

/// Application state injected into the API middleware.
#[derive(Clone)]
pub struct AppState {
    pub routes: Arc<ApiRouter>,
    pub proxy: Proxy,
}

/// HTTP server for the static site and its API proxy.
pub struct HttpServer {
    router: Router,
    config: ServerConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ServerConfig) -> Result<Self, ConfigError> {
        let upstream = Upstream::parse(&config.proxy.upstream)
            .map_err(|e| ConfigError::Validation(vec![e]))?;

        let state = AppState {
            routes: Arc::new(ApiRouter::from_config(&config.proxy.routes)),
            proxy: Proxy::new(upstream),
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ServerConfig, state: AppState) -> Router {
        let root = config.static_files.root.as_path();

        let mut app = Router::new();
        if let Some(document) = &config.static_files.index_document {
            app = app.merge(index_routes(root, document));
        }

        let app = app
            .fallback_service(static_router(root))
            .layer(middleware::from_fn_with_state(state, route_api));

        with_isolation_headers(app)
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http())
            .layer(set_request_id_layer())
    }

    /// The fully layered router, for serving in-process.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires or its sender is dropped.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            profile = %self.config.profile,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Answer API paths; everything else continues to the index and static layers.
async fn route_api(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let Some(route) = state.routes.match_path(request.uri().path()) else {
        return next.run(request).await;
    };

    if request.method() == Method::OPTIONS {
        tracing::debug!(route = route.name(), "Answering preflight");
        return preflight::respond(route);
    }

    let request_id = request_id(request.headers()).to_string();
    match state.proxy.forward(route, request).await {
        Ok(response) => response,
        Err(err) => {
            tracing::error!(
                route = route.name(),
                request_id = %request_id,
                upstream = %state.proxy.upstream().authority(),
                error = %err,
                "Proxy request failed"
            );
            err.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Profile;
    use axum::http::{header, StatusCode};
    use std::path::PathBuf;
    use tower::ServiceExt;

    fn server(profile: Profile) -> HttpServer {
        let mut config = ServerConfig::for_profile(profile);
        config.static_files.root = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/www");
        HttpServer::new(config).unwrap()
    }

    async fn send(app: Router, method: Method, uri: &str) -> Response {
        app.oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
    }

    async fn body_of(response: Response) -> Vec<u8> {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec()
    }

    #[tokio::test]
    async fn test_preflight_for_every_full_route() {
        let app = server(Profile::Full).router();

        for (path, methods) in [
            ("/api/publish_project", "POST, OPTIONS"),
            ("/api/get_published_project", "GET, POST, OPTIONS"),
            ("/api/create_publishing_user_id", "POST, OPTIONS"),
        ] {
            let response = send(app.clone(), Method::OPTIONS, path).await;
            assert_eq!(response.status(), StatusCode::NO_CONTENT, "{path}");
            assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_METHODS], methods);
            assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
            assert_eq!(response.headers()["cross-origin-embedder-policy"], "require-corp");
        }
    }

    #[tokio::test]
    async fn test_publish_profile_only_exposes_publish() {
        let app = server(Profile::Publish).router();

        let response = send(app.clone(), Method::OPTIONS, "/api/publish_project").await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        // Not an API route here, so it is a (missing) static file.
        let response = send(app, Method::GET, "/api/get_published_project").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_index_document_in_full_profile() {
        let app = server(Profile::Full).router();
        let main_html = body_of(send(app.clone(), Method::GET, "/").await).await;
        let index_html = body_of(send(app, Method::GET, "/index.html").await).await;

        assert_eq!(main_html, index_html);
        assert!(String::from_utf8_lossy(&main_html).contains("<div id=\"app\">"));
    }

    #[tokio::test]
    async fn test_plain_index_without_index_document() {
        let app = server(Profile::Static).router();
        let response = send(app, Method::GET, "/").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(String::from_utf8_lossy(&body_of(response).await).contains("plain index"));
    }

    #[tokio::test]
    async fn test_static_headers_and_request_id() {
        let app = server(Profile::Static).router();
        let response = send(app, Method::GET, "/pkg/app_bg.wasm").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/wasm");
        assert_eq!(response.headers()["cross-origin-opener-policy"], "same-origin");
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_invalid_upstream_rejected() {
        let mut config = ServerConfig::default();
        config.proxy.upstream = "not a uri".into();
        assert!(matches!(
            HttpServer::new(config),
            Err(ConfigError::Validation(_))
        ));
    }
}
