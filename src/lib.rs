//! Static file server with a small CORS-aware API reverse proxy.
//!
//! Serves a browser application from a directory with the headers needed for
//! cross-origin isolation, and forwards a fixed set of API paths to a local
//! backend.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::ServerConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
