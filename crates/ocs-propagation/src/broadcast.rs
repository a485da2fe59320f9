//! Roster broadcast with reply counting (spec §4.D/§5).

use crate::roster::Roster;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{instrument, warn};

/// The outcome of a best-effort broadcast: under-acknowledgment is logged
/// by the caller, never fatal (spec §7: "propagation reply shortfalls
/// log a warning but do not abort").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Number of roster members the message was sent to.
    pub sent: usize,
    /// Number of members that acknowledged within the timeout.
    pub acked: usize,
}

/// Broadcast `message` to every member of `roster` and count acks
/// received within `timeout`. Never fails: a full timeout with zero acks
/// still returns a report for the caller to log.
#[instrument(skip(roster, message))]
pub async fn broadcast(roster: &Roster, message: Arc<[u8]>, timeout: Duration) -> BroadcastReport {
    let sent = roster.len();
    if sent == 0 {
        return BroadcastReport { sent: 0, acked: 0 };
    }

    let (tx, mut rx) = tokio::sync::mpsc::channel::<bool>(sent);
    for (_, endpoint) in roster.iter() {
        let endpoint = endpoint.clone();
        let message = message.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let ack = endpoint.deliver(message).await;
            let _ = tx.send(ack).await;
        });
    }
    drop(tx);

    let deadline = Instant::now() + timeout;
    let mut acked = 0;
    loop {
        match tokio::time::timeout_at(deadline, rx.recv()).await {
            Ok(Some(true)) => acked += 1,
            Ok(Some(false)) => {}
            Ok(None) => break,
            Err(_) => {
                warn!(sent, acked, "broadcast timed out waiting for replies");
                break;
            }
        }
    }

    if acked < sent {
        warn!(sent, acked, "broadcast under-acknowledged");
    }

    BroadcastReport { sent, acked }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use ocs_types::PublicKeyBytes;

    struct AlwaysAck;
    #[async_trait]
    impl crate::roster::PeerEndpoint for AlwaysAck {
        async fn deliver(&self, _message: Arc<[u8]>) -> bool {
            true
        }
    }

    struct NeverAck;
    #[async_trait]
    impl crate::roster::PeerEndpoint for NeverAck {
        async fn deliver(&self, _message: Arc<[u8]>) -> bool {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            true
        }
    }

    fn id(byte: u8) -> PublicKeyBytes {
        [byte; 32]
    }

    #[tokio::test]
    async fn full_acknowledgment() {
        let mut roster = Roster::new();
        for i in 0..4 {
            roster.push(id(i), Arc::new(AlwaysAck));
        }
        let report = broadcast(&roster, Arc::from(b"hello".as_slice()), Duration::from_secs(1)).await;
        assert_eq!(report, BroadcastReport { sent: 4, acked: 4 });
    }

    #[tokio::test]
    async fn empty_roster_reports_zero() {
        let roster = Roster::new();
        let report = broadcast(&roster, Arc::from(b"hi".as_slice()), Duration::from_secs(1)).await;
        assert_eq!(report, BroadcastReport { sent: 0, acked: 0 });
    }

    #[tokio::test(start_paused = true)]
    async fn partial_timeout_reports_shortfall() {
        let mut roster = Roster::new();
        roster.push(id(1), Arc::new(AlwaysAck));
        roster.push(id(2), Arc::new(NeverAck));

        let report = broadcast(&roster, Arc::from(b"hi".as_slice()), Duration::from_millis(50)).await;
        assert_eq!(report.sent, 2);
        assert_eq!(report.acked, 1);
    }
}
