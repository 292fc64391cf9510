//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → request.rs (assign x-request-id)
//!     → headers.rs (COOP/COEP/CORS on every response)
//!     → server.rs route_api: API path?
//!         OPTIONS → preflight.rs (204)
//!         other   → proxy.rs (forward, relay) / error.rs (502 JSON)
//!     → static_files.rs (index document, then ServeDir)
//!     → Send to client
//! ```

pub mod error;
pub mod headers;
pub mod preflight;
pub mod proxy;
pub mod request;
pub mod server;
pub mod static_files;

pub use error::ProxyError;
pub use request::X_REQUEST_ID;
pub use server::HttpServer;
