//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the server.
//! All types derive Serde traits for deserialization from config files.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::loader::ConfigError;

/// Upstream origin used by every proxy-enabled profile.
pub const DEFAULT_UPSTREAM: &str = "http://127.0.0.1:8000";

/// Preset route tables and index behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// Plain static file server, no API routes.
    Static,
    /// Static files plus the project publishing endpoint.
    Publish,
    /// Static files, all publishing endpoints and a fixed index document.
    #[default]
    Full,
}

impl Profile {
    pub fn as_str(&self) -> &'static str {
        match self {
            Profile::Static => "static",
            Profile::Publish => "publish",
            Profile::Full => "full",
        }
    }

    /// API routes exposed by this profile.
    pub fn routes(&self) -> Vec<RouteConfig> {
        match self {
            Profile::Static => Vec::new(),
            Profile::Publish => vec![RouteConfig::mirrored("publish_project", &["POST"])],
            Profile::Full => vec![
                RouteConfig::mirrored("publish_project", &["POST"]),
                RouteConfig::mirrored("get_published_project", &["GET", "POST"]),
                RouteConfig::mirrored("create_publishing_user_id", &["POST"]),
            ],
        }
    }

    /// HTML document answered for `/` and `/index.html`, if any.
    pub fn index_document(&self) -> Option<String> {
        match self {
            Profile::Full => Some("main.html".to_string()),
            Profile::Static | Profile::Publish => None,
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Profile {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "static" => Ok(Profile::Static),
            "publish" => Ok(Profile::Publish),
            "full" => Ok(Profile::Full),
            _ => Err(ConfigError::UnknownProfile(s.to_string())),
        }
    }
}

/// Root configuration for the server.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Profile the route table and index document were seeded from.
    pub profile: Profile,

    /// Listener configuration (host, port).
    pub listener: ListenerConfig,

    /// Static file serving.
    pub static_files: StaticConfig,

    /// Reverse proxy upstream and API routes.
    pub proxy: ProxySection,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl ServerConfig {
    /// Build the preset configuration for a profile.
    pub fn for_profile(profile: Profile) -> Self {
        Self {
            profile,
            listener: ListenerConfig::default(),
            static_files: StaticConfig {
                root: PathBuf::from("."),
                index_document: profile.index_document(),
            },
            proxy: ProxySection {
                upstream: DEFAULT_UPSTREAM.to_string(),
                routes: profile.routes(),
            },
            observability: ObservabilityConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::for_profile(Profile::default())
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Interface to bind.
    pub host: String,

    /// TCP port. Overridden by the `PORT` environment variable.
    pub port: u16,
}

impl ListenerConfig {
    /// Address suitable for `TcpListener::bind`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

/// Static file serving configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StaticConfig {
    /// Directory served recursively.
    pub root: PathBuf,

    /// File under `root` answered for `/` and `/index.html`.
    pub index_document: Option<String>,
}

impl Default for StaticConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            index_document: None,
        }
    }
}

/// Reverse proxy configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProxySection {
    /// Origin requests are forwarded to (e.g., "http://127.0.0.1:8000").
    pub upstream: String,

    /// API routes forwarded to the upstream.
    pub routes: Vec<RouteConfig>,
}

impl Default for ProxySection {
    fn default() -> Self {
        Self {
            upstream: DEFAULT_UPSTREAM.to_string(),
            routes: Vec::new(),
        }
    }
}

/// An API path forwarded to the upstream.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RouteConfig {
    /// Route identifier for logging.
    pub name: String,

    /// Path prefix the route is mounted at.
    pub path: String,

    /// Upstream path requests are rewritten to.
    pub target_path: String,

    /// Methods advertised in CORS preflight responses.
    pub methods: Vec<String>,
}

impl RouteConfig {
    /// Route under `/api/<name>` forwarded to the same path upstream.
    pub fn mirrored(name: &str, methods: &[&str]) -> Self {
        let path = format!("/api/{}", name);
        Self {
            name: name.to_string(),
            target_path: path.clone(),
            path,
            methods: methods.iter().map(|m| m.to_string()).collect(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` takes precedence.
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
