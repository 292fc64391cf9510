//! Configuration loading from disk and the process environment.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::schema::{Profile, ServerConfig};
use crate::config::validation::{validate_config, ValidationError};

/// Path to an optional TOML configuration file.
pub const CONFIG_ENV: &str = "ISOLATED_SERVER_CONFIG";
/// Profile preset used when no configuration file is given.
pub const PROFILE_ENV: &str = "ISOLATED_SERVER_PROFILE";
/// Listening port override.
pub const PORT_ENV: &str = "PORT";

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),

    #[error("invalid port {0:?}")]
    InvalidPort(String),

    #[error("unknown profile {0:?} (expected static, publish or full)")]
    UnknownProfile(String),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ServerConfig, ConfigError> {
    let config = read_config(path)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Resolve configuration from the process environment.
pub fn load_from_env() -> Result<ServerConfig, ConfigError> {
    resolve(|key| std::env::var(key).ok())
}

/// Resolve configuration using `lookup` in place of the process environment.
///
/// A config file named by [`CONFIG_ENV`] wins over [`PROFILE_ENV`]; [`PORT_ENV`]
/// is applied on top of either. The result is validated.
pub fn resolve<F>(lookup: F) -> Result<ServerConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let config = match non_empty(lookup(CONFIG_ENV)) {
        Some(path) => read_config(Path::new(&path))?,
        None => {
            let profile = match non_empty(lookup(PROFILE_ENV)) {
                Some(name) => name.parse()?,
                None => Profile::default(),
            };
            ServerConfig::for_profile(profile)
        }
    };

    let config = apply_env(config, &lookup)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Apply environment overrides to an already loaded configuration.
pub fn apply_env<F>(mut config: ServerConfig, lookup: F) -> Result<ServerConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(port) = non_empty(lookup(PORT_ENV)) {
        config.listener.port = port
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidPort(port.clone()))?;
    }
    Ok(config)
}

/// Parse a TOML document without validating it.
///
/// The document's `profile` seeds the route table and index document when the
/// document leaves them out.
pub fn parse_config(content: &str) -> Result<ServerConfig, ConfigError> {
    let table: toml::Table = toml::from_str(content)?;
    let mut config: ServerConfig = toml::from_str(content)?;

    let has_routes = table
        .get("proxy")
        .and_then(|proxy| proxy.get("routes"))
        .is_some();
    if !has_routes {
        config.proxy.routes = config.profile.routes();
    }

    let index = table
        .get("static_files")
        .and_then(|section| section.get("index_document"));
    match index {
        None => config.static_files.index_document = config.profile.index_document(),
        // An empty string disables the index document.
        Some(_) => {
            if config.static_files.index_document.as_deref() == Some("") {
                config.static_files.index_document = None;
            }
        }
    }

    Ok(config)
}

fn read_config(path: &Path) -> Result<ServerConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&content)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
