//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, ports valid)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;

use crate::config::schema::ProxyConfig;

/// A single semantic problem in a [`ProxyConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address `{0}` is not in host:port form")]
    BindAddress(String),

    #[error("timeouts.connect_secs must be greater than zero")]
    ZeroConnectTimeout,

    #[error("observability.log_filter must not be empty")]
    EmptyLogFilter,
}

/// Check every semantic rule, collecting all failures.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if !is_host_port(&config.listener.bind_address) {
        errors.push(ValidationError::BindAddress(
            config.listener.bind_address.clone(),
        ));
    }
    if config.timeouts.connect_secs == 0 {
        errors.push(ValidationError::ZeroConnectTimeout);
    }
    if config.observability.log_filter.trim().is_empty() {
        errors.push(ValidationError::EmptyLogFilter);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn is_host_port(addr: &str) -> bool {
    let Some((host, port)) = addr.rsplit_once(':') else {
        return false;
    };
    let host = host
        .strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(host);
    !host.is_empty() && port.parse::<u16>().is_ok()
}
