//! Builds an in-process roster of several wired `OcsService` façades, the
//! same in-process cross-wiring `ocs-node::wiring` does for a single
//! process's worth of simulated peers, generalized here to hand back
//! every member's façade so a test can drive writes/reads from one
//! member and decrypt from another, or drop a member out of the
//! reencryption roster to exercise the fault-tolerance threshold.

use ocs_dkg::DkgPeer;
use ocs_propagation::Roster;
use ocs_reencrypt::SharePeer;
use ocs_service::{BlockPeer, LocalSharePeer, MemoryPersistence, OcsService, Peers, ServiceConfig};
use ocs_skipchain::{MemorySkipchainStore, SkipchainStore};
use ocs_storage::Storage;
use ocs_types::PublicKeyBytes;
use std::sync::Arc;

fn identity_of(index: u32) -> PublicKeyBytes {
    let mut id = [0u8; 32];
    id[0..4].copy_from_slice(&index.to_be_bytes());
    id
}

struct Member {
    identity: PublicKeyBytes,
    storage: Arc<Storage>,
    skipchain: Arc<dyn SkipchainStore>,
}

/// Wire an `n`-member roster, every member fully participating. Returns
/// one `OcsService` per member, in roster order (index 0 is roster
/// position 1, and so on).
pub async fn build_cluster(n: u32) -> Vec<Arc<OcsService<Storage>>> {
    build_cluster_excluding(n, &[]).await
}

/// Wire an `n`-member roster where every position in `offline` is left
/// out of every other member's `dkg_peers`/`reencrypt_peers`/
/// `block_peers` — simulating those members never having come up, not
/// merely refusing a single request. The excluded positions still get a
/// façade back (so a test can assert *they* fail too), just one nobody
/// else talks to.
///
/// `offline` should name the highest-indexed positions (e.g. `&[4]` or
/// `&[3, 4]` out of 4) — DKG assigns share indices `1..=roster.len()` in
/// roster order, so dropping from the middle would hand a present member
/// a share index that doesn't match the position its re-encryption peer
/// is registered under.
pub async fn build_cluster_excluding(n: u32, offline: &[u32]) -> Vec<Arc<OcsService<Storage>>> {
    let members: Vec<Member> = (1..=n)
        .map(|index| Member {
            identity: identity_of(index),
            storage: Arc::new(Storage::default()),
            skipchain: Arc::new(MemorySkipchainStore::new()) as Arc<dyn SkipchainStore>,
        })
        .collect();

    let mut services = Vec::with_capacity(n as usize);
    for (i, me) in members.iter().enumerate() {
        let self_index = (i + 1) as u32;

        let mut block_peers = Roster::new();
        let mut dkg_peers = Roster::new();
        let mut reencrypt_peers: Vec<Arc<dyn SharePeer>> = Vec::new();

        for (j, other) in members.iter().enumerate() {
            let index = (j + 1) as u32;
            if offline.contains(&index) {
                continue;
            }
            dkg_peers.push(other.identity, Arc::new(DkgPeer::new(index, other.storage.clone())));
            reencrypt_peers.push(Arc::new(LocalSharePeer::new(
                index,
                other.skipchain.clone(),
                other.storage.clone(),
            )));
            if index != self_index {
                block_peers.push(
                    other.identity,
                    Arc::new(BlockPeer::new(
                        other.skipchain.clone(),
                        other.storage.clone(),
                        ServiceConfig::default(),
                    )),
                );
            }
        }

        let peers = Peers {
            self_index,
            self_identity: me.identity,
            block_peers,
            dkg_peers,
            reencrypt_peers,
            roster_size: n as usize,
        };

        let service = OcsService::new(
            ServiceConfig::default(),
            me.storage.clone(),
            me.skipchain.clone(),
            peers,
            Arc::new(MemoryPersistence::default()),
        )
        .await
        .expect("wiring a fresh in-memory member never fails");

        services.push(Arc::new(service));
    }

    services
}

/// The roster identity for position `index` (1-indexed), for tests that
/// need to pass a roster to `create_skipchain`.
pub fn roster_identities(n: u32) -> Vec<PublicKeyBytes> {
    (1..=n).map(identity_of).collect()
}
