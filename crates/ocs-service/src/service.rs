//! Component I of the OCS core (spec §4.E/§4.I): request dispatch behind
//! a single process-wide serialization lock, wired to the skipchain
//! adapter's verifier callback, the propagation broadcast, the DKG
//! orchestrator, and the re-encryption orchestrator.

use crate::error::OcsError;
use crate::persistence::{PersistenceAdapter, STORAGE_KEY};
use crate::ports::SkipchainWriteLookup;
use crate::ServiceConfig;
use async_trait::async_trait;
use ocs_crypto::GroupElement;
use ocs_darc::{Darc, DarcSignature};
use ocs_dkg::run_dkg_with_timeout;
use ocs_ledger::{verify_transaction_with_window, Read, Transaction, Write};
use ocs_propagation::{broadcast, BroadcastReport, PeerEndpoint, Roster};
use ocs_reencrypt::{reencrypt, threshold, SharePeer};
use ocs_skipchain::{Block, SkipchainStore};
use ocs_storage::{Snapshot, StorageApi};
use ocs_types::{Hash, Identity, PublicKeyBytes, Role, Timestamp};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

fn now() -> Timestamp {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("system clock is after the epoch")
        .as_secs() as Timestamp
}

/// Every peer this node talks to for one running service: other roster
/// members' block-commit endpoints, their DKG protocol endpoints, and
/// their re-encryption share endpoints. Built once at wiring time
/// (`ocs-node`'s container, or a test fixture) and handed to
/// [`OcsService::new`] — the "service handle passed explicitly" shape
/// the spec's design notes recommend over ambient global state.
pub struct Peers {
    /// This node's 1-indexed position within the roster.
    pub self_index: u32,
    /// This node's own Ed25519 public key, recorded on every block this
    /// node proposes.
    pub self_identity: PublicKeyBytes,
    /// Other members' block-commit endpoints (self excluded: the
    /// proposer applies its own commit directly, not via a loopback).
    pub block_peers: Roster,
    /// Every member's DKG protocol endpoint, self included (mirrors the
    /// teacher-adjacent `ocs-dkg` test fixture convention).
    pub dkg_peers: Roster,
    /// Every member's re-encryption share endpoint, self included.
    pub reencrypt_peers: Vec<Arc<dyn SharePeer>>,
    /// Full roster size, used to derive the re-encryption threshold
    /// `t = n - floor((n-1)/3)` (spec §4.H step 1).
    pub roster_size: usize,
}

impl Peers {
    fn reencrypt_threshold(&self) -> usize {
        threshold(self.roster_size)
    }
}

/// The façade every RPC handler in `ocs-node` calls into. One instance
/// per running server.
pub struct OcsService<St> {
    config: ServiceConfig,
    storage: Arc<St>,
    skipchain: Arc<dyn SkipchainStore>,
    peers: Peers,
    persistence: Arc<dyn PersistenceAdapter>,
    process: Mutex<()>,
}

impl<St> OcsService<St>
where
    St: StorageApi + ocs_darc::DarcLookup + ocs_ledger::AdminLookup + 'static,
{
    /// Wire a new façade. Attempts to restore `Storage` from
    /// `persistence` first; absence or corruption falls back to empty
    /// maps (spec §4.I).
    pub async fn new(
        config: ServiceConfig,
        storage: Arc<St>,
        skipchain: Arc<dyn SkipchainStore>,
        peers: Peers,
        persistence: Arc<dyn PersistenceAdapter>,
    ) -> Result<Self, OcsError> {
        config.validate();
        if let Some(bytes) = persistence.load(STORAGE_KEY).await? {
            let snapshot: Snapshot = bincode::deserialize(&bytes)?;
            storage.restore(snapshot);
        }
        Ok(Self {
            config,
            storage,
            skipchain,
            peers,
            persistence,
            process: Mutex::new(()),
        })
    }

    async fn persist(&self) -> Result<(), OcsError> {
        let snapshot = self.storage.snapshot();
        let bytes = bincode::serialize(&snapshot)?;
        self.persistence.save(STORAGE_KEY, bytes).await?;
        Ok(())
    }

    fn verify_closure<'a>(
        &'a self,
        chain: Hash,
    ) -> impl Fn(&Transaction) -> Result<(), ocs_ledger::LedgerError> + 'a {
        move |tx: &Transaction| {
            verify_transaction_with_window(
                tx,
                chain,
                now(),
                self.config.timestamp_window_secs,
                self.storage.as_ref(),
                self.storage.as_ref(),
                &SkipchainWriteLookup(self.skipchain.as_ref()),
            )
        }
    }

    /// Apply a committed block's transaction to the in-memory index
    /// (spec §3): darc insertion, and — only for the chain's genesis
    /// block — recording the admin darc.
    fn apply_block(&self, block: &Block) {
        if let Some(darc) = &block.transaction.darc {
            if let Err(e) = self.storage.insert_darc(darc.clone()) {
                warn!(error = %e, "darc already present on apply (benign on replay)");
            }
            if block.index == 0 {
                self.storage.set_admin(block.skipchain_id, darc.clone());
            }
        }
    }

    async fn commit_and_broadcast(
        &self,
        latest: &Block,
        tx: Transaction,
    ) -> Result<Block, OcsError> {
        let _guard = self.process.lock().await;
        let chain = latest.skipchain_id;
        let verify = self.verify_closure(chain);
        let block = self.skipchain.append(latest, tx, &verify)?;
        self.apply_block(&block);
        self.persist().await?;

        let payload = bincode::serialize(&block)?;
        let report = self
            .broadcast_block(Arc::from(payload.into_boxed_slice()))
            .await;
        if report.acked < report.sent {
            warn!(sent = report.sent, acked = report.acked, "under-acknowledged broadcast");
        }
        Ok(block)
    }

    async fn broadcast_block(&self, payload: Arc<[u8]>) -> BroadcastReport {
        broadcast(&self.peers.block_peers, payload, self.config.propagation_timeout).await
    }

    /// **createSkipchain**: pre: `writers` is a valid genesis darc
    /// (`Version == 0`). Post: genesis block committed with
    /// `Darc = writers`; every roster member runs DKG; returns
    /// `(chain_id, X)`.
    #[instrument(skip(self, writers))]
    pub async fn create_skipchain(
        &self,
        roster: Vec<PublicKeyBytes>,
        writers: Darc,
    ) -> Result<(Hash, GroupElement), OcsError> {
        if writers.version != 0 {
            return Err(OcsError::BadRequest(
                "writers darc must be a fresh genesis (version 0)".into(),
            ));
        }

        let _guard = self.process.lock().await;
        let tx = Transaction::darc(now(), writers.clone());
        let block = self.skipchain.genesis(roster, tx)?;
        self.apply_block(&block);
        self.persist().await?;
        drop(_guard);

        let payload = bincode::serialize(&block)?;
        self.broadcast_block(Arc::from(payload.into_boxed_slice()))
            .await;

        let chain_id = block.skipchain_id;
        let threshold = self.peers.reencrypt_threshold();
        let (shared, _poly) = run_dkg_with_timeout(
            self.peers.self_index,
            chain_id,
            &self.peers.dkg_peers,
            threshold,
            self.config.dkg_timeout,
            self.storage.as_ref(),
        )
        .await?;
        self.persist().await?;

        info!(chain_id = ?chain_id, "skipchain created");
        Ok((chain_id, shared.collective))
    }

    /// **updateDarc**: pre: `verifyDarc(darc)` holds (checked by the
    /// skipchain adapter's verifier on append). Post: block appended;
    /// darc recorded in `Accounts`.
    #[instrument(skip(self, darc))]
    pub async fn update_darc(&self, chain_id: Hash, darc: Darc) -> Result<Block, OcsError> {
        let latest = self
            .skipchain
            .latest(chain_id)
            .ok_or_else(|| OcsError::NotFound(format!("chain {chain_id:?}")))?;
        let tx = Transaction::darc(now(), darc);
        self.commit_and_broadcast(&latest, tx).await
    }

    /// **writeRequest**: pre: `verifyWrite` holds; if `write.reader` is
    /// unknown, its genesis version rides along on the same transaction
    /// so both commit atomically. Post: block appended.
    #[instrument(skip(self, write))]
    pub async fn write_request(&self, chain_id: Hash, write: Write) -> Result<Block, OcsError> {
        let latest = self
            .skipchain
            .latest(chain_id)
            .ok_or_else(|| OcsError::NotFound(format!("chain {chain_id:?}")))?;

        let reader_genesis = if self
            .storage
            .darc_exists(write.reader.base_id, write.reader.version)
        {
            None
        } else {
            Some(write.reader.clone())
        };

        let tx = Transaction::write(now(), write, reader_genesis);
        self.commit_and_broadcast(&latest, tx).await
    }

    /// **readRequest**: pre: `verifyRead` holds. Post: block appended on
    /// the chain the referenced write belongs to.
    #[instrument(skip(self, read))]
    pub async fn read_request(&self, read: Read) -> Result<Block, OcsError> {
        let write_block = self
            .skipchain
            .by_id(read.data_id)
            .ok_or_else(|| OcsError::NotFound(format!("block {:?}", read.data_id)))?;
        if write_block.transaction.write.is_none() {
            return Err(OcsError::BadRequest(format!(
                "block {:?} is not a write block",
                read.data_id
            )));
        }
        let chain_id = write_block.skipchain_id;
        let latest = self
            .skipchain
            .latest(chain_id)
            .ok_or_else(|| OcsError::NotFound(format!("chain {chain_id:?}")))?;
        let tx = Transaction::read(now(), read);
        self.commit_and_broadcast(&latest, tx).await
    }

    /// **getDarcPath**: the trimmed final suffix of the online path
    /// search (spec §4.E) — the starting darc is dropped since the
    /// caller already knows it; what remains is exactly what a verifier
    /// needs to confirm the delegation chain offline.
    pub fn get_darc_path(
        &self,
        base_darc_id: Hash,
        identity: Identity,
        role: Role,
    ) -> Result<Vec<Hash>, OcsError> {
        let start = self
            .storage
            .latest_darc(base_darc_id)
            .ok_or_else(|| OcsError::NotFound(format!("darc {base_darc_id:?}")))?;
        let path = ocs_darc::search_path(self.storage.as_ref(), &start, &identity, role)
            .ok_or_else(|| OcsError::PolicyDenied("no path to identity in role".into()))?;
        Ok(path.into_iter().skip(1).collect())
    }

    /// **getLatestDarc**: every version strictly newer than
    /// `known_version`.
    pub fn get_latest_darc(&self, base_darc_id: Hash, known_version: u64) -> Vec<Darc> {
        self.storage.darcs_after(base_darc_id, known_version)
    }

    /// **sharedPublic**: the chain's collective public key `X`.
    pub fn shared_public(&self, chain_id: Hash) -> Result<GroupElement, OcsError> {
        self.storage
            .shared(chain_id)
            .map(|s| s.collective)
            .ok_or_else(|| OcsError::NotFound(format!("no shared key for chain {chain_id:?}")))
    }

    /// **getReadRequests**: scans forward-links from block `start`
    /// (spec §4.E / §9's documented asymmetry). `count == 0` returns
    /// every read whose `data_id == start`; `count > 0` returns up to
    /// `count` reads encountered in chain order regardless of target.
    pub fn get_read_requests(&self, start: Hash, count: usize) -> Result<Vec<Read>, OcsError> {
        let mut results = Vec::new();
        let mut current = self
            .skipchain
            .by_id(start)
            .ok_or_else(|| OcsError::NotFound(format!("block {start:?}")))?;

        loop {
            let Some(&next_hash) = current.forward_links.first() else {
                break;
            };
            let Some(next_block) = self.skipchain.by_id(next_hash) else {
                break;
            };
            if let Some(read) = &next_block.transaction.read {
                if count == 0 {
                    if read.data_id == start {
                        results.push(read.clone());
                    }
                } else {
                    results.push(read.clone());
                    if results.len() >= count {
                        break;
                    }
                }
            }
            current = next_block;
        }
        Ok(results)
    }

    /// **decryptKey** (component H, spec §4.H): run threshold
    /// re-encryption for the read block at `read_block_hash` and return
    /// the pieces the client needs to recover the symmetric key.
    #[instrument(skip(self, ephemeral_signature))]
    pub async fn decrypt_key(
        &self,
        read_block_hash: Hash,
        ephemeral: Option<PublicKeyBytes>,
        ephemeral_signature: Option<DarcSignature>,
    ) -> Result<DecryptedKey, OcsError> {
        let read_block = self
            .skipchain
            .by_id(read_block_hash)
            .ok_or_else(|| OcsError::NotFound(format!("block {read_block_hash:?}")))?;
        let read = read_block
            .transaction
            .read
            .clone()
            .ok_or_else(|| OcsError::BadRequest(format!("block {read_block_hash:?} is not a read block")))?;
        let write_block = self
            .skipchain
            .by_id(read.data_id)
            .ok_or_else(|| OcsError::NotFound(format!("block {:?}", read.data_id)))?;
        let write = write_block
            .transaction
            .write
            .clone()
            .ok_or_else(|| OcsError::BadRequest(format!("block {:?} is not a write block", read.data_id)))?;

        let chain_id = write_block.skipchain_id;
        let shared = self
            .storage
            .shared(chain_id)
            .ok_or_else(|| OcsError::NotFound(format!("no shared key for chain {chain_id:?}")))?;

        let xc = match ephemeral {
            Some(bytes) => GroupElement::from_bytes(&bytes)
                .map_err(|e| OcsError::BadRequest(e.to_string()))?,
            None => {
                let Identity::Ed25519(pk) = read.signature.signer else {
                    return Err(OcsError::BadRequest(
                        "reader signer is not ed25519 and no ephemeral key was supplied".into(),
                    ));
                };
                GroupElement::from_ed25519_pubkey(&pk)
            }
        };
        let u = GroupElement::from_bytes(&write.u).map_err(|e| OcsError::BadRequest(e.to_string()))?;

        let threshold = self.peers.reencrypt_threshold();
        let xhat_enc = reencrypt(
            chain_id,
            read_block_hash,
            u,
            xc,
            ephemeral,
            ephemeral_signature,
            &self.peers.reencrypt_peers,
            threshold,
        )
        .await?;

        Ok(DecryptedKey {
            cs: write.cs,
            x: shared.collective,
            xhat_enc,
        })
    }
}

/// What `decryptKey` hands back to the caller; the caller decrypts the
/// symmetric key client-side from `xhat_enc` and its own private scalar
/// (spec §4.H step 5, explicitly out of the server's scope).
#[derive(Debug, Clone, Serialize)]
pub struct DecryptedKey {
    /// The encrypted payload blocks from the original write.
    pub cs: Vec<u8>,
    /// The chain's collective public key.
    pub x: GroupElement,
    /// The recovered, re-encrypted commitment.
    pub xhat_enc: GroupElement,
}

/// A roster member's block-commit endpoint: on receiving a broadcast
/// block, replay it into this node's own skipchain and storage (spec
/// §4.D: "the in-memory storage is updated from the block on both the
/// proposing server ... and peers, on propagation receipt").
pub struct BlockPeer<St> {
    skipchain: Arc<dyn SkipchainStore>,
    storage: Arc<St>,
    config: ServiceConfig,
}

impl<St> BlockPeer<St>
where
    St: StorageApi + ocs_darc::DarcLookup + ocs_ledger::AdminLookup + 'static,
{
    /// A peer handler replaying committed blocks into `skipchain`/`storage`.
    pub fn new(skipchain: Arc<dyn SkipchainStore>, storage: Arc<St>, config: ServiceConfig) -> Self {
        Self {
            skipchain,
            storage,
            config,
        }
    }

    fn apply(&self, block: &Block) {
        if let Some(darc) = &block.transaction.darc {
            if self.storage.insert_darc(darc.clone()).is_ok() && block.index == 0 {
                self.storage.set_admin(block.skipchain_id, darc.clone());
            }
        }
    }
}

#[async_trait]
impl<St> PeerEndpoint for BlockPeer<St>
where
    St: StorageApi + ocs_darc::DarcLookup + ocs_ledger::AdminLookup + 'static,
{
    async fn deliver(&self, message: Arc<[u8]>) -> bool {
        let Ok(block) = bincode::deserialize::<Block>(&message) else {
            return false;
        };

        let result = if block.index == 0 {
            self.skipchain
                .genesis(block.roster.clone(), block.transaction.clone())
        } else {
            let Some(parent) = self.skipchain.latest(block.skipchain_id) else {
                return false;
            };
            let chain = block.skipchain_id;
            let window = self.config.timestamp_window_secs;
            let verify = {
                let storage = self.storage.clone();
                let skipchain = self.skipchain.clone();
                move |tx: &Transaction| {
                    verify_transaction_with_window(
                        tx,
                        chain,
                        now(),
                        window,
                        storage.as_ref(),
                        storage.as_ref(),
                        &SkipchainWriteLookup(skipchain.as_ref()),
                    )
                }
            };
            self.skipchain.append(&parent, block.transaction.clone(), &verify)
        };

        match result {
            Ok(committed) => {
                self.apply(&committed);
                true
            }
            Err(e) => {
                warn!(error = %e, "peer rejected propagated block");
                false
            }
        }
    }
}

/// A roster member's re-encryption share endpoint: verifies the request
/// against its own view of the chain and, if it passes, exponentiates
/// `U` by this node's held share.
pub struct LocalSharePeer<St> {
    index: u32,
    skipchain: Arc<dyn SkipchainStore>,
    storage: Arc<St>,
}

impl<St> LocalSharePeer<St>
where
    St: StorageApi + ocs_darc::DarcLookup + 'static,
{
    /// A share responder for roster position `index`, holding `storage`'s
    /// DKG share and consulting `skipchain` to verify each request.
    pub fn new(index: u32, skipchain: Arc<dyn SkipchainStore>, storage: Arc<St>) -> Self {
        Self {
            index,
            skipchain,
            storage,
        }
    }
}

#[async_trait]
impl<St> SharePeer for LocalSharePeer<St>
where
    St: StorageApi + ocs_darc::DarcLookup + Send + Sync + 'static,
{
    async fn request_share(&self, request: Arc<[u8]>) -> Option<ocs_reencrypt::PartialShare> {
        let start: ocs_reencrypt::ReencryptStart = bincode::deserialize(&request).ok()?;
        ocs_reencrypt::verify_reencryption(&start, self.skipchain.as_ref(), self.storage.as_ref())
            .ok()?;
        let shared = self.storage.shared(start.chain_id)?;
        let u = GroupElement::from_bytes(&start.u).ok()?;
        let xc = GroupElement::from_bytes(&start.xc).ok()?;
        Some(ocs_reencrypt::PartialShare {
            index: self.index,
            value: u.add(xc).mul(shared.share).to_bytes(),
        })
    }
}
