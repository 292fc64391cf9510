//! Route lookup.
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(n) path prefix scan (a handful of API routes)
//! - Longest prefix wins, so lookups are deterministic
//! - Explicit `None` rather than a silent default

use axum::http::{HeaderValue, Uri};

use crate::config::RouteConfig;
use crate::routing::matcher::PathPrefixMatcher;

/// A compiled API route.
#[derive(Debug, Clone)]
pub struct ApiRoute {
    name: String,
    matcher: PathPrefixMatcher,
    target_path: String,
    allow_methods: HeaderValue,
}

impl ApiRoute {
    pub fn from_config(config: &RouteConfig) -> Self {
        let mut methods: Vec<&str> = config.methods.iter().map(String::as_str).collect();
        methods.push("OPTIONS");
        let allow_methods = HeaderValue::from_str(&methods.join(", "))
            .unwrap_or_else(|_| HeaderValue::from_static("OPTIONS"));

        Self {
            name: config.name.clone(),
            matcher: PathPrefixMatcher::new(config.path.as_str()),
            target_path: config.target_path.clone(),
            allow_methods,
        }
    }

    /// Label used in logs.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path the route is mounted at.
    pub fn path(&self) -> &str {
        self.matcher.prefix()
    }

    /// Value of `Access-Control-Allow-Methods` for preflight responses.
    pub fn allow_methods(&self) -> &HeaderValue {
        &self.allow_methods
    }

    pub fn matches(&self, path: &str) -> bool {
        self.matcher.matches(path)
    }

    /// Upstream path and query for a request URI.
    ///
    /// The matched path is replaced wholesale by the target path. A query
    /// component, even an empty one, is carried over verbatim.
    pub fn rewrite(&self, uri: &Uri) -> String {
        match uri.query() {
            Some(query) => format!("{}?{}", self.target_path, query),
            None => self.target_path.clone(),
        }
    }
}

/// Immutable table of API routes.
#[derive(Debug, Clone, Default)]
pub struct ApiRouter {
    routes: Vec<ApiRoute>,
}

impl ApiRouter {
    /// Compile routes, longest prefix first.
    pub fn from_config(routes: &[RouteConfig]) -> Self {
        let mut routes: Vec<ApiRoute> = routes.iter().map(ApiRoute::from_config).collect();
        routes.sort_by(|a, b| b.path().len().cmp(&a.path().len()));
        Self { routes }
    }

    /// Find the route serving `path`.
    pub fn match_path(&self, path: &str) -> Option<&ApiRoute> {
        self.routes.iter().find(|route| route.matches(path))
    }
}
