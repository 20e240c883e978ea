//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for the forward proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration for outbound calls.
    pub timeouts: TimeoutConfig,

    /// Relay behaviour.
    pub relay: RelayConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address in `host:port` form (e.g., "127.0.0.1:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".to_string(),
        }
    }
}

/// Timeout configuration for outbound operations.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Deadline for the origin's response head in seconds. `0` disables it.
    pub upstream_secs: u64,

    /// Idle pooled connection timeout in seconds.
    pub idle_secs: u64,

    /// Seconds in-flight requests may keep running after a fatal transport
    /// error before the server stops without them.
    pub drain_secs: u64,
}

impl TimeoutConfig {
    pub fn connect(&self) -> Duration {
        Duration::from_secs(self.connect_secs)
    }

    /// `None` when the upstream deadline is disabled.
    pub fn upstream(&self) -> Option<Duration> {
        (self.upstream_secs > 0).then(|| Duration::from_secs(self.upstream_secs))
    }

    pub fn idle(&self) -> Duration {
        Duration::from_secs(self.idle_secs)
    }

    pub fn drain(&self) -> Duration {
        Duration::from_secs(self.drain_secs)
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            upstream_secs: 30,
            idle_secs: 60,
            drain_secs: 5,
        }
    }
}

/// Relay configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct RelayConfig {
    /// What to do when the outbound call fails.
    pub transport_error: TransportErrorPolicy,
}

/// Reaction to a failed outbound dispatch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TransportErrorPolicy {
    /// Answer 502 Bad Gateway (504 on deadline expiry) and keep serving.
    #[default]
    Respond,
    /// Answer 500 Server Error, then shut the whole server down.
    Exit,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Fallback `EnvFilter` directives used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_filter: "forward_proxy=info,tower_http=info".to_string(),
        }
    }
}
