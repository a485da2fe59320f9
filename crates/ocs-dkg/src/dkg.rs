//! Distributed key generation, orchestrated as a star tree rooted at the
//! proposing server (spec §4.G). The Feldman VSS math itself lives in
//! `ocs-crypto::shamir`; this module is the broadcast/timeout/storage
//! plumbing around it.

use crate::error::DkgError;
use ocs_crypto::shamir::Polynomial;
use ocs_crypto::{GroupElement, GroupScalar, PublicPoly};
use ocs_propagation::{broadcast, PeerEndpoint, Roster};
use ocs_storage::{SharedSecret, StorageApi};
use ocs_types::Hash;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

/// Upper bound on waiting for every roster member's completion ack.
pub const DKG_TIMEOUT: Duration = Duration::from_secs(10);

/// Broadcast from the proposer: the dealt polynomial's public commitments
/// plus every participant's share. A real point-to-point transport would
/// send each participant only its own row; this core's in-process
/// transport (spec's propagation adapter is a black box beyond broadcast)
/// carries the full vector and each peer extracts its own index.
#[derive(Clone, Serialize, Deserialize)]
pub struct DkgStart {
    /// Chain this run is bootstrapping a collective key for.
    pub chain_id: Hash,
    /// Public commitments to the dealt polynomial's coefficients.
    pub poly: PublicPoly,
    /// `(index, share)` for every roster position, 1-indexed.
    pub shares: Vec<(u32, GroupScalar)>,
}

/// A peer's completion signal: it derived and verified its share.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DkgComplete {
    /// The reporting peer's 1-indexed position.
    pub index: u32,
    /// `base^share`, proof the peer holds a share consistent with `poly`.
    pub commitment: GroupElement,
}

/// Run DKG for `chain_id` over `roster`, as the proposing server at
/// `self_index`. Deals a fresh Feldman polynomial of degree
/// `threshold - 1`, fans it out, and requires every member to
/// acknowledge within [`DKG_TIMEOUT`]. On success, persists this node's
/// own share and the public polynomial into `local_storage` and returns
/// them.
#[instrument(skip(roster, local_storage))]
pub async fn run_dkg(
    self_index: u32,
    chain_id: Hash,
    roster: &Roster,
    threshold: usize,
    local_storage: &dyn StorageApi,
) -> Result<(SharedSecret, PublicPoly), DkgError> {
    run_dkg_with_timeout(self_index, chain_id, roster, threshold, DKG_TIMEOUT, local_storage).await
}

/// As [`run_dkg`], but with the broadcast timeout as a parameter rather
/// than the fixed [`DKG_TIMEOUT`] constant — what `ocs-service`'s façade
/// calls with its configured `dkg_timeout` (spec §4.I ambient
/// configuration).
#[instrument(skip(roster, local_storage))]
pub async fn run_dkg_with_timeout(
    self_index: u32,
    chain_id: Hash,
    roster: &Roster,
    threshold: usize,
    timeout: Duration,
    local_storage: &dyn StorageApi,
) -> Result<(SharedSecret, PublicPoly), DkgError> {
    let degree = threshold.saturating_sub(1);
    let poly = Polynomial::random(degree);
    let public = poly.commit(GroupElement::base());

    let shares: Vec<(u32, GroupScalar)> = (1..=roster.len() as u32)
        .map(|i| (i, poly.eval(GroupScalar::from_u64(i as u64))))
        .collect();

    let start = DkgStart {
        chain_id,
        poly: public.clone(),
        shares: shares.clone(),
    };
    let payload = bincode::serialize(&start).map_err(|e| DkgError::Encoding(e.to_string()))?;
    let message: Arc<[u8]> = Arc::from(payload.into_boxed_slice());

    let report = broadcast(roster, message, timeout).await;
    if report.acked < report.sent {
        return Err(DkgError::Timeout {
            sent: report.sent,
            acked: report.acked,
        });
    }

    let share = shares
        .iter()
        .find(|(i, _)| *i == self_index)
        .map(|(_, s)| s.clone())
        .ok_or(DkgError::MissingShare)?;

    let shared = SharedSecret {
        index: self_index,
        share,
        collective: public.public_secret(),
    };
    local_storage.set_shared(chain_id, shared.clone());
    local_storage.set_poly(chain_id, public.clone());

    Ok((shared, public))
}

/// A roster member's side of the protocol: on receiving a [`DkgStart`],
/// extract and verify this node's share, then persist it.
pub struct DkgPeer<S> {
    index: u32,
    storage: Arc<S>,
}

impl<S: StorageApi> DkgPeer<S> {
    /// A peer handler for participant `index`, persisting into `storage`.
    pub fn new(index: u32, storage: Arc<S>) -> Self {
        Self { index, storage }
    }
}

#[async_trait::async_trait]
impl<S: StorageApi + 'static> PeerEndpoint for DkgPeer<S> {
    async fn deliver(&self, message: Arc<[u8]>) -> bool {
        let Ok(start) = bincode::deserialize::<DkgStart>(&message) else {
            return false;
        };
        let Some((_, share)) = start.shares.iter().find(|(i, _)| *i == self.index) else {
            return false;
        };
        if !start
            .poly
            .verify_share(GroupScalar::from_u64(self.index as u64), share.clone())
        {
            return false;
        }

        self.storage.set_shared(
            start.chain_id,
            SharedSecret {
                index: self.index,
                share: share.clone(),
                collective: start.poly.public_secret(),
            },
        );
        self.storage.set_poly(start.chain_id, start.poly.clone());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ocs_storage::Storage;

    fn roster_of(storages: &[Arc<Storage>]) -> Roster {
        let mut roster = Roster::new();
        for (i, s) in storages.iter().enumerate() {
            let index = (i + 1) as u32;
            roster.push(
                [index as u8; 32],
                Arc::new(DkgPeer::new(index, s.clone())),
            );
        }
        roster
    }

    #[tokio::test]
    async fn run_dkg_populates_every_member_with_a_verifiable_share() {
        let storages: Vec<Arc<Storage>> = (0..4).map(|_| Arc::new(Storage::default())).collect();
        let roster = roster_of(&storages);
        let chain = [7u8; 32];

        let (shared, poly) = run_dkg(1, chain, &roster, 3, storages[0].as_ref())
            .await
            .unwrap();
        assert_eq!(shared.index, 1);
        assert!(poly.verify_share(GroupScalar::from_u64(1), shared.share));

        for (i, s) in storages.iter().enumerate() {
            let index = (i + 1) as u32;
            let stored = s.shared(chain).expect("member stored its share");
            assert_eq!(stored.index, index);
            assert!(poly.verify_share(GroupScalar::from_u64(index as u64), stored.share));
            assert_eq!(s.poly(chain).unwrap().public_secret(), poly.public_secret());
        }
    }

    #[tokio::test(start_paused = true)]
    async fn run_dkg_times_out_when_a_member_never_acks() {
        struct Silent;
        #[async_trait::async_trait]
        impl PeerEndpoint for Silent {
            async fn deliver(&self, _message: Arc<[u8]>) -> bool {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                true
            }
        }

        let storage = Arc::new(Storage::default());
        let mut roster = roster_of(&[storage.clone()]);
        roster.push([9u8; 32], Arc::new(Silent));

        let chain = [1u8; 32];
        let result = run_dkg(1, chain, &roster, 2, storage.as_ref()).await;
        assert!(matches!(result, Err(DkgError::Timeout { .. })));
    }
}
