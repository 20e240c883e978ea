//! OS signal handling.
//!
//! # Responsibilities
//! - Wait for SIGTERM (Unix) or Ctrl-C
//! - Translate them into a graceful shutdown
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - On non-Unix platforms only Ctrl-C is observed

/// Resolves on the first shutdown signal the process receives.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let sigterm = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Ctrl+C received"),
        () = sigterm => tracing::info!("SIGTERM received"),
    }
}
