//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! profile preset (ISOLATED_SERVER_PROFILE) or TOML file (ISOLATED_SERVER_CONFIG)
//!     → loader.rs (parse & deserialize, PORT override)
//!     → validation.rs (semantic checks)
//!     → ServerConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the route table never changes at runtime
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_from_env, ConfigError};
pub use schema::ListenerConfig;
pub use schema::ObservabilityConfig;
pub use schema::Profile;
pub use schema::ProxySection;
pub use schema::RouteConfig;
pub use schema::ServerConfig;
pub use schema::StaticConfig;
pub use validation::ValidationError;
