//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, peer address, graceful shutdown)
//!     → relay.rs (scheme gate, header sanitization, dispatch)
//!     → transport.rs (pooled client to the origin)
//!     → response.rs (errors the proxy answers itself)
//!     → Send to client
//! ```

pub mod relay;
pub mod response;
pub mod server;
pub mod transport;

pub use relay::Relay;
pub use server::{HttpServer, ServerError};
pub use transport::{HyperTransport, OutboundTransport, TransportError};
