//! `BaseID → ordered sequence of DARC versions`, the map `getDarcPath`'s
//! path search and `getLatestDarc` both read through.

use crate::error::StorageError;
use ocs_darc::Darc;
use ocs_types::Hash;
use std::collections::HashMap;

/// Every stored darc sequence, indexed by base id. Each sequence is
/// strictly monotone and contiguous starting from version 0 — enforced
/// at insertion, never rechecked on read.
#[derive(Default)]
pub struct Accounts(HashMap<Hash, Vec<Darc>>);

impl Accounts {
    /// An empty index.
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    /// Insert `darc`, rejecting a version that would break contiguity or
    /// collide with an already-stored version.
    pub fn insert(&mut self, darc: Darc) -> Result<(), StorageError> {
        let sequence = self.0.entry(darc.base_id).or_default();
        let expected = sequence.len() as u64;
        if darc.version < expected {
            return Err(StorageError::VersionConflict {
                base_id: darc.base_id,
                version: darc.version,
            });
        }
        if darc.version != expected {
            return Err(StorageError::NonContiguousVersion {
                base_id: darc.base_id,
                version: darc.version,
                expected,
            });
        }
        sequence.push(darc);
        Ok(())
    }

    /// The highest stored version for `base_id`, if any.
    pub fn latest(&self, base_id: Hash) -> Option<Darc> {
        self.0.get(&base_id).and_then(|seq| seq.last()).cloned()
    }

    /// The exact stored version, if present.
    pub fn version(&self, base_id: Hash, version: u64) -> Option<Darc> {
        self.0
            .get(&base_id)
            .and_then(|seq| seq.get(version as usize))
            .cloned()
    }

    /// Whether this exact `(base_id, version)` has already been stored
    /// (replay check ahead of `verifyDarc`).
    pub fn contains(&self, base_id: Hash, version: u64) -> bool {
        self.0
            .get(&base_id)
            .is_some_and(|seq| (version as usize) < seq.len())
    }

    /// All versions strictly newer than `version`, in ascending order.
    pub fn after(&self, base_id: Hash, version: u64) -> Vec<Darc> {
        self.0
            .get(&base_id)
            .map(|seq| {
                seq.iter()
                    .filter(|d| d.version > version)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// A snapshot of the full map, for persistence.
    pub fn as_map(&self) -> &HashMap<Hash, Vec<Darc>> {
        &self.0
    }

    /// Replace the full map, for restoring from persistence.
    pub fn restore(map: HashMap<Hash, Vec<Darc>>) -> Self {
        Self(map)
    }
}
