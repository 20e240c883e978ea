//! Timeout enforcement.
//!
//! # Responsibilities
//! - Wrap the outbound call with an optional deadline
//! - Cancel the in-flight call cleanly on expiry
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - The deadline covers the response head only; bodies may stream forever
//! - Timed-out requests return 504 Gateway Timeout

use std::future::Future;
use std::time::Duration;

use crate::http::transport::TransportError;

/// Run `fut` under `deadline`, or unbounded when `deadline` is `None`.
pub async fn with_deadline<F, T>(deadline: Option<Duration>, fut: F) -> Result<T, TransportError>
where
    F: Future<Output = Result<T, TransportError>>,
{
    match deadline {
        Some(limit) => tokio::time::timeout(limit, fut)
            .await
            .map_err(|_| TransportError::Timeout(limit))?,
        None => fut.await,
    }
}
