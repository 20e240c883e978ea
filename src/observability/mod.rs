//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! relay / server / lifecycle
//!     → tracing events with peer, method, uri, status fields
//!     → tower-http TraceLayer spans per request
//!     → logging.rs subscriber (EnvFilter + fmt)
//! ```

pub mod logging;
