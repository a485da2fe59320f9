//! Small in-crate adapters that let `ocs-ledger`'s ports be satisfied by
//! `ocs-skipchain`'s block store, without either crate depending on the
//! other.

use ocs_ledger::{ports::WriteLookup, Write};
use ocs_skipchain::SkipchainStore;
use ocs_types::Hash;

/// Resolves a read's `data_id` to the write transaction committed at
/// that block, by asking the skipchain store directly.
pub struct SkipchainWriteLookup<'a>(pub &'a dyn SkipchainStore);

impl WriteLookup for SkipchainWriteLookup<'_> {
    fn write_at(&self, data_id: Hash) -> Option<Write> {
        self.0.by_id(data_id)?.transaction.write
    }
}
