//! Outbound transport to origin servers.
//!
//! # Responsibilities
//! - Perform one HTTP request against the origin named in the URI
//! - Stream the origin response body back without buffering
//! - Classify failures (connect, protocol, deadline)
//!
//! # Design Decisions
//! - One long-lived pooled client is shared by every request
//! - Plain `http` and `https` origins; HTTP/1.1 only on the wire
//! - Redirects are never followed; the origin's answer is relayed as-is

use std::future::Future;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, Response};
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use hyper_util::rt::TokioExecutor;
use thiserror::Error;

use crate::config::TimeoutConfig;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failure to obtain a response head from the origin.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The origin did not answer before the configured deadline.
    #[error("origin did not answer within {0:?}")]
    Timeout(Duration),

    /// DNS resolution, TCP connect or TLS handshake failed.
    #[error("failed to connect to origin: {0}")]
    Connect(#[source] BoxError),

    /// The connection was established but the exchange failed.
    #[error("request to origin failed: {0}")]
    Request(#[source] BoxError),
}

impl TransportError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, TransportError::Timeout(_))
    }
}

/// Something able to send a request to an origin server.
///
/// Implementations must be shareable across concurrent requests.
pub trait OutboundTransport: Send + Sync + 'static {
    fn send(
        &self,
        req: Request<Body>,
    ) -> impl Future<Output = Result<Response<Body>, TransportError>> + Send;
}

/// Pooled hyper client over a TCP/TLS connector.
#[derive(Clone, Debug)]
pub struct HyperTransport {
    client: Client<HttpsConnector<HttpConnector>, Body>,
}

impl HyperTransport {
    /// Build the shared client from the configured timeouts.
    pub fn new(timeouts: &TimeoutConfig) -> Self {
        let mut http = HttpConnector::new();
        // The TLS layer above decides which schemes are allowed.
        http.enforce_http(false);
        http.set_connect_timeout(Some(timeouts.connect()));

        let https = HttpsConnectorBuilder::new()
            .with_webpki_roots()
            .https_or_http()
            .enable_http1()
            .wrap_connector(http);

        let client = Client::builder(TokioExecutor::new())
            .pool_idle_timeout(timeouts.idle())
            .build(https);

        Self { client }
    }
}

impl OutboundTransport for HyperTransport {
    async fn send(&self, req: Request<Body>) -> Result<Response<Body>, TransportError> {
        match self.client.request(req).await {
            Ok(response) => Ok(response.map(Body::new)),
            Err(e) if e.is_connect() => Err(TransportError::Connect(Box::new(e))),
            Err(e) => Err(TransportError::Request(Box::new(e))),
        }
    }
}
