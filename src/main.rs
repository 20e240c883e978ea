//! Transparent forward HTTP proxy.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌──────────────────────────────────────────────┐
//!                         │                FORWARD PROXY                 │
//!                         │                                              │
//!  GET http://origin/x    │  ┌─────────┐   ┌────────┐   ┌────────────┐   │
//!  ───────────────────────┼─▶│   net   │──▶│  http  │──▶│   relay    │   │
//!                         │  │listener │   │ server │   │ scheme gate│   │
//!                         │  └─────────┘   └────────┘   │ hop headers│   │
//!                         │                             │ X-F-F      │   │
//!                         │                             └─────┬──────┘   │
//!                         │                                   ▼          │
//!  status+headers+body    │                             ┌────────────┐   │
//!  ◀──────────────────────┼─────────────────────────────│ transport  │◀──┼── origin
//!                         │                             └────────────┘   │
//!                         │  config · lifecycle · observability ·        │
//!                         │  resilience (deadline) · security (headers)  │
//!                         └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use forward_proxy::config::{self, ConfigError, ProxyConfig, TransportErrorPolicy};
use forward_proxy::lifecycle::{shutdown_signal, Shutdown};
use forward_proxy::observability::logging;
use forward_proxy::{net, HttpServer};

#[derive(Parser, Debug)]
#[command(name = "forward-proxy", version)]
#[command(about = "Transparent forward HTTP proxy", long_about = None)]
struct Cli {
    /// Application address (host:port) [default: 127.0.0.1:8080]
    #[arg(long)]
    addr: Option<String>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// What to do when the origin cannot be reached
    #[arg(long, value_enum)]
    on_transport_error: Option<TransportErrorPolicy>,

    /// Seconds to wait for the origin's response head, 0 disables
    #[arg(long)]
    upstream_timeout_secs: Option<u64>,
}

impl Cli {
    /// Defaults, then the config file, then command-line overrides.
    fn into_config(self) -> Result<ProxyConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => config::load_config(path)?,
            None => ProxyConfig::default(),
        };

        if let Some(addr) = self.addr {
            config.listener.bind_address = addr;
        }
        if let Some(policy) = self.on_transport_error {
            config.relay.transport_error = policy;
        }
        if let Some(secs) = self.upstream_timeout_secs {
            config.timeouts.upstream_secs = secs;
        }

        config::validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Cli::parse().into_config()?;

    logging::init(&config.observability.log_filter);

    tracing::info!("forward-proxy v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        transport_error = ?config.relay.transport_error,
        upstream_timeout_secs = config.timeouts.upstream_secs,
        "Configuration loaded"
    );

    let listener = match net::bind(&config.listener).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, "Cannot start proxy server");
            return Err(e.into());
        }
    };

    tracing::info!(address = %listener.local_addr()?, "Starting proxy server");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        shutdown_signal().await;
        shutdown.trigger();
    });

    let server = HttpServer::new(config);
    if let Err(e) = server.run(listener, server_shutdown).await {
        tracing::error!(error = %e, "Proxy server terminated");
        return Err(e.into());
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
