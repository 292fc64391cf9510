//! Static file server with API proxy.
//!
//! # Architecture Overview
//!
//! ```text
//!   Client Request
//!        │
//!        ▼
//!   ┌────────────┐   ┌───────────────────┐   ┌───────────┐
//!   │ request id │──▶│ isolation headers │──▶│ route_api │
//!   └────────────┘   └───────────────────┘   └─────┬─────┘
//!                                                  │
//!          ┌───────────────────────┬───────────────┴──────────┐
//!          │ API path, OPTIONS     │ API path, other          │ no API match
//!          ▼                       ▼                          ▼
//!   ┌─────────────┐         ┌─────────────┐         ┌─────────────────────┐
//!   │  preflight  │         │    proxy    │         │ index doc/ServeDir  │
//!   │    (204)    │         │ (502 on err)│         │ (404 when missing)  │
//!   └─────────────┘         └──────┬──────┘         └─────────────────────┘
//!                                  │
//!                                  ▼
//!                        upstream 127.0.0.1:8000
//! ```
//!
//! # Configuration
//! - `PORT`: listening port (default 8080)
//! - `ISOLATED_SERVER_PROFILE`: `static`, `publish` or `full` (default)
//! - `ISOLATED_SERVER_CONFIG`: optional TOML file replacing the profile preset
//! - `RUST_LOG`: log filter

use tokio::net::TcpListener;

use isolated_server::config;
use isolated_server::observability::init_logging;
use isolated_server::{HttpServer, Shutdown};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = config::load_from_env()?;
    init_logging(&config.observability);

    tracing::info!("isolated-server v{} starting", env!("CARGO_PKG_VERSION"));

    let route_names: Vec<&str> = config.proxy.routes.iter().map(|r| r.name.as_str()).collect();
    tracing::info!(
        profile = %config.profile,
        bind_address = %config.listener.bind_address(),
        static_root = %config.static_files.root.display(),
        index_document = ?config.static_files.index_document,
        upstream = %config.proxy.upstream,
        routes = ?route_names,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(config.listener.bind_address()).await?;
    let local_addr = listener.local_addr()?;
    tracing::info!(address = %local_addr, "Server running at http://localhost:{}", local_addr.port());

    let shutdown = Shutdown::new();
    let _signals = shutdown.trigger_on_signal();

    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
