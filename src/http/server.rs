//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router that hands every request to the relay
//! - Wire up middleware (tracing)
//! - Build the shared outbound transport once at startup
//! - Serve until shutdown or a fatal transport error
//!
//! # Design Decisions
//! - A single fallback handler: forward-proxy requests are not routed
//! - The peer address comes from `ConnectInfo`, not from headers
//! - Graceful shutdown drains in-flight requests before `run` returns

use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{Request, Response},
    Router,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc, oneshot};
use tower_http::trace::TraceLayer;

use crate::config::ProxyConfig;
use crate::http::relay::Relay;
use crate::http::transport::{HyperTransport, TransportError};

/// Errors that end [`HttpServer::run`].
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An outbound failure under the `exit` transport-error policy.
    #[error("fatal transport error: {0}")]
    Fatal(#[source] TransportError),
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<Relay<HyperTransport>>,
}

/// HTTP server for the forward proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
    fatal_rx: mpsc::UnboundedReceiver<TransportError>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ProxyConfig) -> Self {
        let transport = HyperTransport::new(&config.timeouts);
        let (fatal_tx, fatal_rx) = mpsc::unbounded_channel();

        let relay = Relay::new(
            transport,
            config.timeouts.upstream(),
            config.relay.transport_error,
        )
        .with_fatal_channel(fatal_tx);

        let state = AppState {
            relay: Arc::new(relay),
        };

        let router = Self::build_router(state);
        Self {
            router,
            config,
            fatal_rx,
        }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .fallback(proxy_handler)
            .with_state(state)
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// Returns after `shutdown` fires and in-flight requests drained, or with
    /// [`ServerError::Fatal`] once a fatal transport error was reported. In the
    /// fatal case the drain is bounded by `timeouts.drain_secs`; requests still
    /// running after that are abandoned.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        let (stop_tx, mut stop_rx) = oneshot::channel();
        let stop = wait_for_stop(shutdown, self.fatal_rx);

        let serve = axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = stop_tx.send(stop.await);
            })
            .into_future();
        tokio::pin!(serve);

        let reason = tokio::select! {
            result = &mut serve => {
                result?;
                stop_rx.try_recv().ok().flatten()
            }
            reason = &mut stop_rx => match reason.ok().flatten() {
                Some(err) => {
                    let drain = self.config.timeouts.drain();
                    if tokio::time::timeout(drain, &mut serve).await.is_err() {
                        tracing::warn!(
                            drain_secs = drain.as_secs(),
                            "In-flight requests still running, stopping without them"
                        );
                    }
                    Some(err)
                }
                None => {
                    serve.await?;
                    None
                }
            },
        };

        tracing::info!("HTTP server stopped");
        match reason {
            Some(err) => Err(ServerError::Fatal(err)),
            None => Ok(()),
        }
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }
}

/// Every request, whatever its method or target, goes to the relay.
async fn proxy_handler(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request<Body>,
) -> Response<Body> {
    state.relay.handle(request, &addr.to_string()).await
}

/// Resolves with the fatal error that stopped the server, if any.
async fn wait_for_stop(
    mut shutdown: broadcast::Receiver<()>,
    mut fatal: mpsc::UnboundedReceiver<TransportError>,
) -> Option<TransportError> {
    tokio::select! {
        _ = shutdown.recv() => {
            tracing::info!("Shutdown signal received");
            None
        }
        Some(err) = fatal.recv() => Some(err),
    }
}
