//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request path
//!     → router.rs (route lookup)
//!     → matcher.rs (segment-aware prefix match)
//!     → Return: matched ApiRoute or None (static fallthrough)
//!
//! Route Compilation (at startup):
//!     RouteConfig[]
//!     → Compile matchers and preflight headers
//!     → Sort by prefix length
//!     → Freeze as immutable ApiRouter
//! ```

pub mod matcher;
pub mod router;

pub use matcher::PathPrefixMatcher;
pub use router::{ApiRoute, ApiRouter};
