//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Parse CLI → Load config → Validate → Init logging → Bind listener → Serve
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Stop accepting → Drain connections → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listeners start last (traffic only when ready)

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
pub use signals::shutdown_signal;
