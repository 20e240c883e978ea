//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Request to origin:
//!     → timeouts.rs (optional deadline on the response head)
//!     → On failure: the relay's transport-error policy decides
//! ```
//!
//! # Design Decisions
//! - Every dispatch is fire-once; nothing is retried
//! - Deadline expiry is a transport error like any other

pub mod timeouts;
