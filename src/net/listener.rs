//! TCP listener binding.
//!
//! # Responsibilities
//! - Bind to the configured `host:port`
//! - Report bind failures as a startup error
//!
//! # Design Decisions
//! - Host names are resolved by Tokio; the first address that binds wins
//! - Accepting connections is left to the HTTP server runtime

use std::net::SocketAddr;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::ListenerConfig;

/// Error type for listener operations.
#[derive(Debug, Error)]
pub enum ListenerError {
    /// Failed to bind to address.
    #[error("Failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },
}

/// Bind to the configured address.
pub async fn bind(config: &ListenerConfig) -> Result<TcpListener, ListenerError> {
    let bind_err = |source| ListenerError::Bind {
        address: config.bind_address.clone(),
        source,
    };

    let listener = TcpListener::bind(config.bind_address.as_str())
        .await
        .map_err(bind_err)?;
    let local_addr: SocketAddr = listener.local_addr().map_err(bind_err)?;

    tracing::info!(
        address = %local_addr,
        "Listener bound"
    );

    Ok(listener)
}
