//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! tracing events and tower-http request spans
//!     → logging.rs (EnvFilter + fmt layer)
//!     → stdout
//! ```
//!
//! # Design Decisions
//! - Structured fields (route, request_id, error) rather than formatted text
//! - Request ID flows from the header into proxy log lines

pub mod logging;

pub use logging::init_logging;
