//! The `SkipchainStore` port and its adapters.

use crate::block::Block;
use crate::error::SkipchainError;
use ocs_ledger::Transaction;
use ocs_types::{Hash, PublicKeyBytes};

/// The append-only block sequence abstraction the core consumes (spec
/// §4.D). `append` invokes `verify` before committing; a rejection never
/// mutates the chain.
pub trait SkipchainStore: Send + Sync {
    /// Create a new chain. Not subject to `verify` — the façade's own
    /// precondition check (writers darc at version 0) stands in for it,
    /// matching the original's `CreateSkipchains` bypassing the generic
    /// verifier.
    fn genesis(
        &self,
        roster: Vec<PublicKeyBytes>,
        transaction: Transaction,
    ) -> Result<Block, SkipchainError>;

    /// Append `transaction` onto `latest`, re-running `verify` first.
    /// Returns `ChainConflict` if `latest` is no longer the chain's
    /// current tip.
    fn append(
        &self,
        latest: &Block,
        transaction: Transaction,
        verify: &dyn Fn(&Transaction) -> Result<(), ocs_ledger::LedgerError>,
    ) -> Result<Block, SkipchainError>;

    /// Look up a block by its hash.
    fn by_id(&self, hash: Hash) -> Option<Block>;

    /// The current tip of the chain identified by `skipchain_id`.
    fn latest(&self, skipchain_id: Hash) -> Option<Block>;
}

/// In-memory `SkipchainStore`, used for tests and the in-process
/// integration roster.
#[derive(Default)]
pub struct MemorySkipchainStore {
    blocks: parking_lot::RwLock<std::collections::HashMap<Hash, Block>>,
    tips: parking_lot::RwLock<std::collections::HashMap<Hash, Hash>>,
}

impl MemorySkipchainStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SkipchainStore for MemorySkipchainStore {
    fn genesis(
        &self,
        roster: Vec<PublicKeyBytes>,
        transaction: Transaction,
    ) -> Result<Block, SkipchainError> {
        let block = Block::genesis(roster, transaction);
        self.blocks.write().insert(block.hash, block.clone());
        self.tips.write().insert(block.skipchain_id, block.hash);
        Ok(block)
    }

    fn append(
        &self,
        latest: &Block,
        transaction: Transaction,
        verify: &dyn Fn(&Transaction) -> Result<(), ocs_ledger::LedgerError>,
    ) -> Result<Block, SkipchainError> {
        let current_tip = *self
            .tips
            .read()
            .get(&latest.skipchain_id)
            .ok_or(SkipchainError::ChainNotFound(latest.skipchain_id))?;
        if current_tip != latest.hash {
            return Err(SkipchainError::ChainConflict {
                expected: latest.hash,
                actual: current_tip,
            });
        }

        verify(&transaction)?;

        let next = latest.successor(transaction);

        let mut blocks = self.blocks.write();
        blocks.insert(next.hash, next.clone());
        if let Some(prev) = blocks.get_mut(&latest.hash) {
            prev.forward_links.push(next.hash);
        }
        drop(blocks);
        self.tips.write().insert(next.skipchain_id, next.hash);

        Ok(next)
    }

    fn by_id(&self, hash: Hash) -> Option<Block> {
        self.blocks.read().get(&hash).cloned()
    }

    fn latest(&self, skipchain_id: Hash) -> Option<Block> {
        let tip = *self.tips.read().get(&skipchain_id)?;
        self.blocks.read().get(&tip).cloned()
    }
}

/// File-backed `SkipchainStore`: an in-memory index mirrored to a single
/// bincode-encoded file on every mutation, matching the whole-blob
/// persistence idiom used elsewhere in this workspace.
pub struct FileSkipchainStore {
    memory: MemorySkipchainStore,
    path: std::path::PathBuf,
}

#[derive(serde::Serialize, serde::Deserialize, Default)]
struct Snapshot {
    blocks: std::collections::HashMap<Hash, Block>,
    tips: std::collections::HashMap<Hash, Hash>,
}

impl FileSkipchainStore {
    /// Open (or create) a file-backed store at `path`, loading any
    /// existing snapshot.
    pub fn open(path: impl Into<std::path::PathBuf>) -> Result<Self, SkipchainError> {
        let path = path.into();
        let snapshot = match std::fs::read(&path) {
            Ok(bytes) => bincode::deserialize::<Snapshot>(&bytes)
                .map_err(|e| SkipchainError::Io(e.to_string()))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Snapshot::default(),
            Err(e) => return Err(SkipchainError::Io(e.to_string())),
        };
        let memory = MemorySkipchainStore {
            blocks: parking_lot::RwLock::new(snapshot.blocks),
            tips: parking_lot::RwLock::new(snapshot.tips),
        };
        Ok(Self { memory, path })
    }

    fn persist(&self) -> Result<(), SkipchainError> {
        let snapshot = Snapshot {
            blocks: self.memory.blocks.read().clone(),
            tips: self.memory.tips.read().clone(),
        };
        let bytes = bincode::serialize(&snapshot).map_err(|e| SkipchainError::Io(e.to_string()))?;
        std::fs::write(&self.path, bytes).map_err(|e| SkipchainError::Io(e.to_string()))
    }
}

impl SkipchainStore for FileSkipchainStore {
    fn genesis(
        &self,
        roster: Vec<PublicKeyBytes>,
        transaction: Transaction,
    ) -> Result<Block, SkipchainError> {
        let block = self.memory.genesis(roster, transaction)?;
        self.persist()?;
        Ok(block)
    }

    fn append(
        &self,
        latest: &Block,
        transaction: Transaction,
        verify: &dyn Fn(&Transaction) -> Result<(), ocs_ledger::LedgerError>,
    ) -> Result<Block, SkipchainError> {
        let next = self.memory.append(latest, transaction, verify)?;
        self.persist()?;
        Ok(next)
    }

    fn by_id(&self, hash: Hash) -> Option<Block> {
        self.memory.by_id(hash)
    }

    fn latest(&self, skipchain_id: Hash) -> Option<Block> {
        self.memory.latest(skipchain_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ocs_ledger::Transaction;

    fn ok_verifier(_tx: &Transaction) -> Result<(), ocs_ledger::LedgerError> {
        Ok(())
    }

    #[test]
    fn genesis_then_latest_round_trips() {
        let store = MemorySkipchainStore::new();
        let genesis = store.genesis(vec![], Transaction::heartbeat(0)).unwrap();
        let latest = store.latest(genesis.skipchain_id).unwrap();
        assert_eq!(latest, genesis);
    }

    #[test]
    fn append_advances_tip_and_links_forward() {
        let store = MemorySkipchainStore::new();
        let genesis = store.genesis(vec![], Transaction::heartbeat(0)).unwrap();
        let next = store
            .append(&genesis, Transaction::heartbeat(1), &ok_verifier)
            .unwrap();

        assert_eq!(store.latest(genesis.skipchain_id).unwrap(), next);
        let stored_genesis = store.by_id(genesis.hash).unwrap();
        assert_eq!(stored_genesis.forward_links, vec![next.hash]);
    }

    #[test]
    fn stale_append_rejected() {
        let store = MemorySkipchainStore::new();
        let genesis = store.genesis(vec![], Transaction::heartbeat(0)).unwrap();
        store
            .append(&genesis, Transaction::heartbeat(1), &ok_verifier)
            .unwrap();

        // Appending against the now-stale `genesis` tip must fail.
        let result = store.append(&genesis, Transaction::heartbeat(2), &ok_verifier);
        assert!(matches!(result, Err(SkipchainError::ChainConflict { .. })));
    }

    #[test]
    fn rejected_verification_does_not_mutate_chain() {
        let store = MemorySkipchainStore::new();
        let genesis = store.genesis(vec![], Transaction::heartbeat(0)).unwrap();
        let failing = |_tx: &Transaction| {
            Err(ocs_ledger::LedgerError::TimestampOutOfWindow {
                timestamp: 0,
                now: 1000,
            })
        };
        let result = store.append(&genesis, Transaction::heartbeat(1), &failing);
        assert!(result.is_err());
        assert_eq!(store.latest(genesis.skipchain_id).unwrap(), genesis);
    }

    #[test]
    fn file_store_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("skipchain.bin");

        let genesis_hash = {
            let store = FileSkipchainStore::open(&path).unwrap();
            let genesis = store.genesis(vec![], Transaction::heartbeat(0)).unwrap();
            store
                .append(&genesis, Transaction::heartbeat(1), &ok_verifier)
                .unwrap();
            genesis.skipchain_id
        };

        let reopened = FileSkipchainStore::open(&path).unwrap();
        let latest = reopened.latest(genesis_hash).unwrap();
        assert_eq!(latest.index, 1);
    }
}
