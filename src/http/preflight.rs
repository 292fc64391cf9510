//! CORS preflight answers for API routes.
//!
//! `OPTIONS` requests on an API route never reach the upstream.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

use crate::routing::ApiRoute;

pub const ALLOW_HEADERS: HeaderValue = HeaderValue::from_static("Content-Type, Authorization");

/// `204 No Content` advertising the route's methods.
pub fn respond(route: &ApiRoute) -> Response {
    (
        StatusCode::NO_CONTENT,
        [
            (header::ACCESS_CONTROL_ALLOW_METHODS, route.allow_methods().clone()),
            (header::ACCESS_CONTROL_ALLOW_HEADERS, ALLOW_HEADERS),
        ],
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RouteConfig;

    #[tokio::test]
    async fn test_preflight_response() {
        let route = ApiRoute::from_config(&RouteConfig::mirrored("get_published_project", &["GET", "POST"]));
        let response = respond(&route);

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_METHODS],
            "GET, POST, OPTIONS"
        );
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_HEADERS],
            "Content-Type, Authorization"
        );

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(body.is_empty());
    }
}
