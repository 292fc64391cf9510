//! Configuration validation.
//!
//! Serde handles syntax; this module checks semantics and returns every
//! problem found rather than stopping at the first.

use std::collections::HashSet;
use std::path::{Component, Path};

use axum::http::{Method, Uri};

use crate::config::schema::{RouteConfig, ServerConfig};

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("upstream {0:?} must be an absolute http:// origin")]
    InvalidUpstream(String),

    #[error("route name must not be empty")]
    EmptyRouteName,

    #[error("duplicate route name {0:?}")]
    DuplicateRouteName(String),

    #[error("route {route:?}: {field} {value:?} must start with '/', not be '/', and carry no query")]
    InvalidPath {
        route: String,
        field: &'static str,
        value: String,
    },

    #[error("duplicate route path {0:?}")]
    DuplicatePath(String),

    #[error("route {0:?} must list at least one method")]
    NoMethods(String),

    #[error("route {route:?}: invalid method {method:?}")]
    InvalidMethod { route: String, method: String },

    #[error("index document {0:?} must be a relative file name")]
    InvalidIndexDocument(String),
}

/// Validate a configuration, collecting all errors.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if !is_valid_upstream(&config.proxy.upstream) {
        errors.push(ValidationError::InvalidUpstream(config.proxy.upstream.clone()));
    }

    let mut names = HashSet::new();
    let mut paths = HashSet::new();
    for route in &config.proxy.routes {
        validate_route(route, &mut errors);

        if !route.name.is_empty() && !names.insert(route.name.as_str()) {
            errors.push(ValidationError::DuplicateRouteName(route.name.clone()));
        }
        if !paths.insert(route.path.as_str()) {
            errors.push(ValidationError::DuplicatePath(route.path.clone()));
        }
    }

    if let Some(document) = &config.static_files.index_document {
        if !is_plain_relative(document) {
            errors.push(ValidationError::InvalidIndexDocument(document.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_route(route: &RouteConfig, errors: &mut Vec<ValidationError>) {
    if route.name.is_empty() {
        errors.push(ValidationError::EmptyRouteName);
    }

    for (field, value) in [("path", &route.path), ("target_path", &route.target_path)] {
        if !is_valid_route_path(value) {
            errors.push(ValidationError::InvalidPath {
                route: route.name.clone(),
                field,
                value: value.clone(),
            });
        }
    }

    if route.methods.is_empty() {
        errors.push(ValidationError::NoMethods(route.name.clone()));
    }
    for method in &route.methods {
        let valid = Method::from_bytes(method.as_bytes())
            .map(|m| m != Method::OPTIONS)
            .unwrap_or(false);
        if !valid {
            errors.push(ValidationError::InvalidMethod {
                route: route.name.clone(),
                method: method.clone(),
            });
        }
    }
}

fn is_valid_upstream(upstream: &str) -> bool {
    match upstream.parse::<Uri>() {
        Ok(uri) => {
            uri.scheme_str() == Some("http")
                && uri.authority().is_some()
                && matches!(uri.path(), "" | "/")
                && uri.query().is_none()
        }
        Err(_) => false,
    }
}

fn is_valid_route_path(path: &str) -> bool {
    path.starts_with('/') && path != "/" && !path.contains('?') && path.parse::<Uri>().is_ok()
}

fn is_plain_relative(document: &str) -> bool {
    let path = Path::new(document);
    !document.is_empty()
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
}
