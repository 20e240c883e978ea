//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Outbound request:
//!     → headers.rs (strip hop-by-hop, append X-Forwarded-For)
//!     → Pass to transport
//!
//! Origin response:
//!     → headers.rs (strip hop-by-hop, copy the rest)
//!     → Pass to client
//! ```
//!
//! # Design Decisions
//! - Connection-scoped headers never cross the proxy
//! - Client identity is appended, never overwritten

pub mod headers;
