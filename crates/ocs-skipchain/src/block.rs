//! The opaque block container the core treats as authoritative once
//! committed (spec §3 `Block`).

use ocs_crypto::blake3_hash;
use ocs_ledger::Transaction;
use ocs_types::{Hash, PublicKeyBytes};
use serde::{Deserialize, Serialize};

/// A single committed block. The genesis block's `hash` doubles as the
/// chain's `skipchain_id`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// The chain this block belongs to (the genesis block's own hash).
    pub skipchain_id: Hash,
    /// 0-based position within the chain.
    pub index: u64,
    /// Content-addressed identifier of this block.
    pub hash: Hash,
    /// The roster cooperatively maintaining this chain, as raw Ed25519
    /// public keys.
    pub roster: Vec<PublicKeyBytes>,
    /// The committed transaction.
    pub transaction: Transaction,
    /// Hashes of blocks that point back to this one as their
    /// predecessor. Single-level: at most one entry in this core (the
    /// original's multi-level skip list is a traversal optimization this
    /// core's semantics don't require).
    pub forward_links: Vec<Hash>,
}

impl Block {
    /// Build the genesis block. Its hash doubles as the `skipchain_id`.
    pub fn genesis(roster: Vec<PublicKeyBytes>, transaction: Transaction) -> Self {
        let mut block = Self {
            skipchain_id: [0u8; 32],
            index: 0,
            hash: [0u8; 32],
            roster,
            transaction,
            forward_links: Vec::new(),
        };
        let hash = block.content_hash();
        block.skipchain_id = hash;
        block.hash = hash;
        block
    }

    /// Build the successor of `self` carrying `transaction`.
    pub fn successor(&self, transaction: Transaction) -> Self {
        let mut block = Self {
            skipchain_id: self.skipchain_id,
            index: self.index + 1,
            hash: [0u8; 32],
            roster: self.roster.clone(),
            transaction,
            forward_links: Vec::new(),
        };
        block.hash = block.content_hash();
        block
    }

    fn content_hash(&self) -> Hash {
        let bytes = bincode::serialize(&(
            self.skipchain_id,
            self.index,
            &self.roster,
            &self.transaction,
        ))
        .expect("block content always encodes");
        blake3_hash(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn genesis_hash_equals_skipchain_id() {
        let block = Block::genesis(vec![], Transaction::heartbeat(0));
        assert_eq!(block.hash, block.skipchain_id);
    }

    #[test]
    fn successor_increments_index_and_preserves_chain_id() {
        let genesis = Block::genesis(vec![], Transaction::heartbeat(0));
        let next = genesis.successor(Transaction::heartbeat(1));
        assert_eq!(next.index, 1);
        assert_eq!(next.skipchain_id, genesis.skipchain_id);
        assert_ne!(next.hash, genesis.hash);
    }
}
