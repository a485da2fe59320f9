//! Builds the in-process component graph for one `ocs-node` process.
//!
//! A real deployment would run one process per roster member, each
//! reaching the others over a network transport. That transport is out
//! of scope here (spec §1); instead this wiring constructs every
//! member's `Storage`/`SkipchainStore` in-process and cross-wires them
//! through `ocs-propagation`'s in-process `PeerEndpoint`/`SharePeer`
//! stand-ins, then hands back the single `OcsService` for `self_index` —
//! the one whose RPC surface `main` exposes over HTTP.

use crate::config::NodeConfig;
use ocs_dkg::DkgPeer;
use ocs_propagation::Roster;
use ocs_reencrypt::SharePeer;
use ocs_service::{
    BlockPeer, FilePersistence, LocalSharePeer, MemoryPersistence, OcsService, PersistenceAdapter,
    Peers,
};
use ocs_skipchain::{FileSkipchainStore, MemorySkipchainStore, SkipchainStore};
use ocs_storage::Storage;
use ocs_types::PublicKeyBytes;
use std::sync::Arc;

/// One simulated roster member's components, kept alive for the whole
/// process so the peer endpoints wired into `self_index`'s `Peers` stay
/// valid.
struct Member {
    identity: PublicKeyBytes,
    storage: Arc<Storage>,
    skipchain: Arc<dyn SkipchainStore>,
}

fn identity_of(index: u32) -> PublicKeyBytes {
    let mut id = [0u8; 32];
    id[0..4].copy_from_slice(&index.to_be_bytes());
    id
}

fn build_member(config: &NodeConfig, index: u32) -> anyhow::Result<Member> {
    let storage = Arc::new(Storage::default());
    let skipchain: Arc<dyn SkipchainStore> = match config.skipchain_path_for(index) {
        Some(path) => Arc::new(FileSkipchainStore::open(path)?),
        None => Arc::new(MemorySkipchainStore::new()),
    };
    Ok(Member {
        identity: identity_of(index),
        storage,
        skipchain,
    })
}

/// Construct every roster member in-process and return the wired façade
/// for `config.self_index`.
pub async fn build_service(config: &NodeConfig) -> anyhow::Result<Arc<OcsService<Storage>>> {
    config.validate();

    let members: Vec<Member> = (1..=config.roster_size as u32)
        .map(|index| build_member(config, index))
        .collect::<anyhow::Result<_>>()?;

    let mut block_peers = Roster::new();
    let mut dkg_peers = Roster::new();
    let mut reencrypt_peers: Vec<Arc<dyn SharePeer>> = Vec::new();

    for (i, member) in members.iter().enumerate() {
        let index = (i + 1) as u32;

        dkg_peers.push(
            member.identity,
            Arc::new(DkgPeer::new(index, member.storage.clone())),
        );
        reencrypt_peers.push(Arc::new(LocalSharePeer::new(
            index,
            member.skipchain.clone(),
            member.storage.clone(),
        )));

        if index != config.self_index {
            block_peers.push(
                member.identity,
                Arc::new(BlockPeer::new(
                    member.skipchain.clone(),
                    member.storage.clone(),
                    config.service.clone(),
                )),
            );
        }
    }

    let self_member = &members[(config.self_index - 1) as usize];
    let peers = Peers {
        self_index: config.self_index,
        self_identity: self_member.identity,
        block_peers,
        dkg_peers,
        reencrypt_peers,
        roster_size: config.roster_size,
    };

    let persistence: Arc<dyn PersistenceAdapter> = match config.storage_path_for(config.self_index) {
        Some(path) => Arc::new(FilePersistence::new(path)),
        None => Arc::new(MemoryPersistence::default()),
    };

    let service = OcsService::new(
        config.service.clone(),
        self_member.storage.clone(),
        self_member.skipchain.clone(),
        peers,
        persistence,
    )
    .await?;

    Ok(Arc::new(service))
}
