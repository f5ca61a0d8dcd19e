//! OS signal handling.
//!
//! # Responsibilities
//! - Register SIGINT / SIGTERM handlers (Ctrl-C only on non-unix)
//! - Resolve once, with the kind of signal that arrived
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - A handler that cannot be installed never resolves instead of
//!   triggering a spurious shutdown

use std::fmt;

/// Process-level signal that requested shutdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalKind {
    /// SIGINT / Ctrl-C.
    Interrupt,
    /// SIGTERM.
    Terminate,
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalKind::Interrupt => write!(f, "SIGINT"),
            SignalKind::Terminate => write!(f, "SIGTERM"),
        }
    }
}

/// Wait for the first interrupt-class OS signal.
#[cfg(unix)]
pub async fn wait_for_os_interrupt() -> SignalKind {
    use tokio::signal::unix::{signal, SignalKind as UnixSignal};

    let mut terminate = match signal(UnixSignal::terminate()) {
        Ok(stream) => Some(stream),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to install SIGTERM handler");
            None
        }
    };

    tokio::select! {
        _ = ctrl_c() => SignalKind::Interrupt,
        _ = async {
            match terminate.as_mut() {
                Some(stream) => {
                    stream.recv().await;
                }
                None => std::future::pending::<()>().await,
            }
        } => SignalKind::Terminate,
    }
}

/// Wait for the first interrupt-class OS signal.
#[cfg(not(unix))]
pub async fn wait_for_os_interrupt() -> SignalKind {
    ctrl_c().await;
    SignalKind::Interrupt
}

async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
}
