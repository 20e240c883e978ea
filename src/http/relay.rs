//! The request relay: one inbound request in, one origin response out.
//!
//! # Data Flow
//! ```text
//! inbound request
//!     → scheme gate (http / https only, otherwise 400)
//!     → fresh outbound request (method, URI, headers, body)
//!     → strip hop-by-hop headers, set Host, stamp X-Forwarded-For
//!     → transport (optional deadline, no retry)
//!     → strip hop-by-hop headers from the origin response
//!     → status + headers + streamed body back to the caller
//! ```
//!
//! # Design Decisions
//! - No state is shared between invocations except the transport handle
//! - The origin body is moved into the response, never buffered; dropping
//!   the response releases it
//! - Transport failures follow [`TransportErrorPolicy`]

use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, Response};
use tokio::sync::mpsc;

use crate::config::TransportErrorPolicy;
use crate::http::response;
use crate::http::transport::{OutboundTransport, TransportError};
use crate::resilience::timeouts::with_deadline;
use crate::security::headers::{append_forwarded_for, copy_headers, set_host, strip_hop_by_hop};

/// Schemes accepted in a proxy request target.
pub const SUPPORTED_SCHEMES: [&str; 2] = ["http", "https"];

/// Relays proxy requests through an [`OutboundTransport`].
pub struct Relay<T> {
    transport: T,
    deadline: Option<Duration>,
    policy: TransportErrorPolicy,
    fatal: Option<mpsc::UnboundedSender<TransportError>>,
}

impl<T: OutboundTransport> Relay<T> {
    pub fn new(transport: T, deadline: Option<Duration>, policy: TransportErrorPolicy) -> Self {
        Self {
            transport,
            deadline,
            policy,
            fatal: None,
        }
    }

    /// Channel notified when a transport failure must stop the server.
    pub fn with_fatal_channel(mut self, tx: mpsc::UnboundedSender<TransportError>) -> Self {
        self.fatal = Some(tx);
        self
    }

    /// Handle one proxy request from `remote_addr`.
    pub async fn handle(&self, req: Request<Body>, remote_addr: &str) -> Response<Body> {
        tracing::info!(
            peer = %remote_addr,
            method = %req.method(),
            uri = %req.uri(),
            "Relaying request"
        );

        let scheme = req.uri().scheme_str().unwrap_or_default();
        if !SUPPORTED_SCHEMES.contains(&scheme) {
            tracing::warn!(peer = %remote_addr, "Unsupported scheme{scheme}");
            return response::unsupported_scheme(scheme);
        }

        let outbound = outbound_request(req, remote_addr);

        let origin = match with_deadline(self.deadline, self.transport.send(outbound)).await {
            Ok(origin) => origin,
            Err(err) => return self.transport_failure(err, remote_addr),
        };

        tracing::info!(peer = %remote_addr, status = %origin.status(), "Origin responded");
        relay_response(origin)
    }

    fn transport_failure(&self, err: TransportError, remote_addr: &str) -> Response<Body> {
        match self.policy {
            TransportErrorPolicy::Respond => {
                tracing::warn!(peer = %remote_addr, error = %err, "Outbound request failed");
                response::transport_failure(&err)
            }
            TransportErrorPolicy::Exit => {
                tracing::error!(
                    peer = %remote_addr,
                    error = %err,
                    "Outbound request failed, stopping server"
                );
                if let Some(fatal) = &self.fatal {
                    let _ = fatal.send(err);
                }
                response::server_error()
            }
        }
    }
}

/// Build the request handed to the transport.
///
/// Only method, URI, headers and body survive; the protocol version and
/// request extensions of the inbound connection are left behind. `Host` is
/// taken from the target URI, whatever the client sent.
fn outbound_request(req: Request<Body>, remote_addr: &str) -> Request<Body> {
    let (parts, body) = req.into_parts();

    let mut headers = parts.headers;
    strip_hop_by_hop(&mut headers);
    if let Some(authority) = parts.uri.authority() {
        set_host(&mut headers, authority);
    }
    if !append_forwarded_for(&mut headers, remote_addr) {
        tracing::debug!(peer = %remote_addr, "Peer address is not host:port, X-Forwarded-For untouched");
    }

    let mut outbound = Request::new(body);
    *outbound.method_mut() = parts.method;
    *outbound.uri_mut() = parts.uri;
    *outbound.headers_mut() = headers;
    outbound
}

/// Turn the origin response into the response sent to the caller.
fn relay_response(origin: Response<Body>) -> Response<Body> {
    let (mut parts, body) = origin.into_parts();
    strip_hop_by_hop(&mut parts.headers);

    let mut response = Response::new(body);
    *response.status_mut() = parts.status;
    copy_headers(response.headers_mut(), &parts.headers);
    response
}
