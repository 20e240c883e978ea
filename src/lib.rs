//! Transparent forward HTTP proxy library.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod resilience;
pub mod security;

pub use config::schema::ProxyConfig;
pub use http::{HttpServer, Relay};
pub use lifecycle::Shutdown;
