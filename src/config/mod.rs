//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! defaults
//!     → config file (TOML, optional) via loader.rs
//!     → command-line overrides (main.rs)
//!     → validation.rs (semantic checks)
//!     → ProxyConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    ListenerConfig, ObservabilityConfig, ProxyConfig, RelayConfig, TimeoutConfig,
    TransportErrorPolicy,
};
pub use validation::{validate_config, ValidationError};
