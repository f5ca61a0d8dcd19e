//! Interrupt bridge.
//!
//! Forwards the first cancellation the process sees into the single-slot
//! channel the server uses as its shutdown trigger.
//!
//! # Source Precedence
//! ```text
//! caller token supplied?  ── yes ──▶ wait on token only
//!          │ no
//!          ▼
//!   wait on SIGINT / SIGTERM
//! ```
//!
//! The bridge is armed before the server is constructed, so a signal raised
//! during construction is held in the channel until the server reads it.

use std::future::Future;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::lifecycle::signals::{self, SignalKind};

/// Why the server is being asked to stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterruptCause {
    /// The caller's cancellation token fired.
    Cancelled,
    /// An OS signal arrived.
    Signal(SignalKind),
}

/// Receiving half of the interrupt channel, handed to the server.
pub type InterruptReceiver = oneshot::Receiver<InterruptCause>;

/// Arm the bridge against the caller's token, or OS signals when there is none.
pub fn arm(cancel: Option<CancellationToken>) -> (JoinHandle<()>, InterruptReceiver) {
    match cancel {
        Some(token) => arm_with(async move {
            token.cancelled().await;
            InterruptCause::Cancelled
        }),
        None => arm_with(async { InterruptCause::Signal(signals::wait_for_os_interrupt().await) }),
    }
}

/// Arm the bridge against an arbitrary source.
///
/// The spawned task waits once, sends once, and exits.
pub fn arm_with<F>(source: F) -> (JoinHandle<()>, InterruptReceiver)
where
    F: Future<Output = InterruptCause> + Send + 'static,
{
    let (tx, rx) = oneshot::channel();
    let handle = tokio::spawn(async move {
        let cause = source.await;
        tracing::info!(cause = ?cause, "Interrupt received");
        if tx.send(cause).is_err() {
            tracing::debug!("Interrupt channel closed, server already gone");
        }
    });
    (handle, rx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::timeout;

    #[tokio::test]
    async fn token_cancellation_is_forwarded_once() {
        let token = CancellationToken::new();
        let (handle, mut rx) = arm(Some(token.clone()));

        assert!(timeout(Duration::from_millis(50), &mut rx).await.is_err());

        token.cancel();
        let cause = timeout(Duration::from_secs(1), &mut rx).await.unwrap().unwrap();
        assert_eq!(cause, InterruptCause::Cancelled);

        // The bridge is done after its single delivery.
        timeout(Duration::from_secs(1), handle).await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn already_cancelled_token_delivers_immediately() {
        let token = CancellationToken::new();
        token.cancel();

        let (_handle, rx) = arm(Some(token));
        let cause = timeout(Duration::from_secs(1), rx).await.unwrap().unwrap();
        assert_eq!(cause, InterruptCause::Cancelled);
    }

    #[tokio::test]
    async fn signal_raised_before_reader_is_held() {
        let (handle, rx) = arm_with(async { InterruptCause::Signal(SignalKind::Terminate) });
        timeout(Duration::from_secs(1), handle).await.unwrap().unwrap();

        assert_eq!(rx.await.unwrap(), InterruptCause::Signal(SignalKind::Terminate));
    }

    #[tokio::test]
    async fn dropped_receiver_does_not_fail_bridge() {
        let token = CancellationToken::new();
        let (handle, rx) = arm(Some(token.clone()));
        drop(rx);

        token.cancel();
        timeout(Duration::from_secs(1), handle).await.unwrap().unwrap();
    }
}
