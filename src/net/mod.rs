//! Network layer.
//!
//! # Data Flow
//! ```text
//! ListenerConfig
//!     → listener.rs (bind host:port)
//!     → TcpListener handed to http::HttpServer::run
//! ```

pub mod listener;

pub use listener::{bind, ListenerError};
