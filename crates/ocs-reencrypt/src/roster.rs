//! A request/response peer abstraction for share collection. Distinct
//! from `ocs-propagation`'s ack-counting broadcast: re-encryption needs
//! each peer's partial share value back, not just a reply count.

use crate::PartialShare;
use async_trait::async_trait;
use std::sync::Arc;

/// A roster member's re-encryption share endpoint.
#[async_trait]
pub trait SharePeer: Send + Sync {
    /// Verify `request` locally and, if it passes, return this node's
    /// partial re-encryption share. `None` means refusal (failed
    /// verification or no shared secret for the chain) — never a panic.
    async fn request_share(&self, request: Arc<[u8]>) -> Option<PartialShare>;
}

/// Collect shares from every peer with no overall timeout (spec §5:
/// unlike DKG, this suspension point is bounded externally, not by this
/// core). Peers that refuse or fail to deserialize the request simply
/// contribute nothing.
pub async fn collect_shares(peers: &[Arc<dyn SharePeer>], request: Arc<[u8]>) -> Vec<PartialShare> {
    if peers.is_empty() {
        return Vec::new();
    }

    let (tx, mut rx) = tokio::sync::mpsc::channel(peers.len());
    for peer in peers {
        let peer = peer.clone();
        let request = request.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let reply = peer.request_share(request).await;
            let _ = tx.send(reply).await;
        });
    }
    drop(tx);

    let mut shares = Vec::new();
    while let Some(reply) = rx.recv().await {
        if let Some(share) = reply {
            shares.push(share);
        }
    }
    shares
}
