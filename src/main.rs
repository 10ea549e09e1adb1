//! Search proxy (v1)
//!
//! An authenticated relay in front of the GitHub search API.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────────┐
//!                      │                  SEARCH PROXY                    │
//!   POST /search/{c}   │  ┌────────┐   ┌────────────┐   ┌──────────────┐  │
//!   ───────────────────┼─▶│  http  │──▶│  security  │──▶│   upstream   │──┼──▶ GET /search/{c}
//!                      │  │ server │   │ authorizer │   │    client    │  │    ?q=&page=&per_page=
//!                      │  └────────┘   └────────────┘   └──────┬───────┘  │
//!                      │                                       │          │
//!   JSON / chunked     │  ┌──────────┐   ┌────────────┐        │          │
//!   ◀──────────────────┼──│ response │◀──│ pagination │◀───────┘          │
//!                      │  └──────────┘   └────────────┘  (issues only)    │
//!                      │                                                  │
//!                      │  config · observability · lifecycle              │
//!                      └──────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use search_proxy::config::{load_config, Overrides};
use search_proxy::http::HttpServer;
use search_proxy::lifecycle::{signals, Shutdown};
use search_proxy::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "search-proxy", version, about = "Authenticated proxy for the GitHub search API")]
struct Args {
    /// Optional TOML configuration file.
    #[arg(short, long, env = "SEARCH_PROXY_CONFIG")]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Missing secrets or a bad file stop the process here.
    let overrides = Overrides {
        bind_address: args.bind,
    };
    let config = load_config(args.config.as_deref(), overrides)?;

    logging::init_logging(&config.observability);

    tracing::info!("search-proxy v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.base_url,
        auth_scheme = ?config.upstream.auth_scheme,
        request_timeout_secs = config.timeouts.request_secs,
        upstream_timeout_secs = config.timeouts.upstream_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    signals::spawn_signal_handler(shutdown.clone());

    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
