//! The four maps of spec.md's data model behind a single
//! `parking_lot::RwLock`, and the narrow traits that let `ocs-ledger`'s
//! verifier and `ocs-service`'s façade depend on an interface rather than
//! this concrete layout.

use crate::accounts::Accounts;
use crate::error::StorageError;
use crate::shared::SharedSecret;
use ocs_crypto::PublicPoly;
use ocs_darc::{Darc, DarcLookup};
use ocs_ledger::AdminLookup;
use ocs_types::Hash;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::instrument;

struct Inner {
    accounts: Accounts,
    admins: HashMap<Hash, Darc>,
    shared: HashMap<Hash, SharedSecret>,
    polys: HashMap<Hash, PublicPoly>,
}

/// The full in-memory index, one instance per running server.
///
/// Lookups take and release the lock immediately; callers must never hold
/// a borrowed guard across an `.await` point or a network/crypto call
/// (spec §5's storage-mutex discipline).
pub struct Storage {
    inner: RwLock<Inner>,
}

impl Default for Storage {
    fn default() -> Self {
        Self {
            inner: RwLock::new(Inner {
                accounts: Accounts::new(),
                admins: HashMap::new(),
                shared: HashMap::new(),
                polys: HashMap::new(),
            }),
        }
    }
}

/// The bincode-serializable shape persisted under the fixed `"storage"`
/// key (spec §6), and restored on startup.
#[derive(Serialize, Deserialize)]
pub struct Snapshot {
    /// `Accounts`.
    pub accounts: HashMap<Hash, Vec<Darc>>,
    /// `Admins`.
    pub admins: HashMap<Hash, Darc>,
    /// `Shared`.
    pub shared: HashMap<Hash, SharedSecret>,
    /// `Polys`.
    pub polys: HashMap<Hash, PublicPoly>,
}

/// The interface `ocs-ledger`'s verifier and `ocs-service`'s façade
/// consume; kept narrow so neither depends on the concrete map layout.
pub trait StorageApi: Send + Sync {
    /// Insert a newly verified darc version.
    fn insert_darc(&self, darc: Darc) -> Result<(), StorageError>;
    /// The highest stored version for `base_id`.
    fn latest_darc(&self, base_id: Hash) -> Option<Darc>;
    /// An exact stored version.
    fn darc_version(&self, base_id: Hash, version: u64) -> Option<Darc>;
    /// Whether this exact version has already been stored (replay check).
    fn darc_exists(&self, base_id: Hash, version: u64) -> bool;
    /// All versions strictly newer than `version`.
    fn darcs_after(&self, base_id: Hash, version: u64) -> Vec<Darc>;
    /// Record a chain's admin (genesis writer) darc. Written once, at
    /// chain-genesis block commit.
    fn set_admin(&self, chain: Hash, admin: Darc);
    /// The chain's admin darc, if genesis has committed.
    fn admin(&self, chain: Hash) -> Option<Darc>;
    /// Record a chain's DKG result. Written once, at DKG completion.
    fn set_shared(&self, chain: Hash, shared: SharedSecret);
    /// The chain's DKG share and collective key, if DKG has completed.
    fn shared(&self, chain: Hash) -> Option<SharedSecret>;
    /// Record a chain's public polynomial. Written once, at DKG completion.
    fn set_poly(&self, chain: Hash, poly: PublicPoly);
    /// The chain's public polynomial, if DKG has completed.
    fn poly(&self, chain: Hash) -> Option<PublicPoly>;
    /// A consistent snapshot of all four maps, for persistence.
    fn snapshot(&self) -> Snapshot;
    /// Replace all four maps from a loaded snapshot.
    fn restore(&self, snapshot: Snapshot);
}

impl StorageApi for Storage {
    #[instrument(skip(self, darc))]
    fn insert_darc(&self, darc: Darc) -> Result<(), StorageError> {
        self.inner.write().accounts.insert(darc)
    }

    fn latest_darc(&self, base_id: Hash) -> Option<Darc> {
        self.inner.read().accounts.latest(base_id)
    }

    fn darc_version(&self, base_id: Hash, version: u64) -> Option<Darc> {
        self.inner.read().accounts.version(base_id, version)
    }

    fn darc_exists(&self, base_id: Hash, version: u64) -> bool {
        self.inner.read().accounts.contains(base_id, version)
    }

    fn darcs_after(&self, base_id: Hash, version: u64) -> Vec<Darc> {
        self.inner.read().accounts.after(base_id, version)
    }

    fn set_admin(&self, chain: Hash, admin: Darc) {
        self.inner.write().admins.insert(chain, admin);
    }

    fn admin(&self, chain: Hash) -> Option<Darc> {
        self.inner.read().admins.get(&chain).cloned()
    }

    fn set_shared(&self, chain: Hash, shared: SharedSecret) {
        self.inner.write().shared.insert(chain, shared);
    }

    fn shared(&self, chain: Hash) -> Option<SharedSecret> {
        self.inner.read().shared.get(&chain).cloned()
    }

    fn set_poly(&self, chain: Hash, poly: PublicPoly) {
        self.inner.write().polys.insert(chain, poly);
    }

    fn poly(&self, chain: Hash) -> Option<PublicPoly> {
        self.inner.read().polys.get(&chain).cloned()
    }

    fn snapshot(&self) -> Snapshot {
        let inner = self.inner.read();
        Snapshot {
            accounts: inner.accounts.as_map().clone(),
            admins: inner.admins.clone(),
            shared: inner.shared.clone(),
            polys: inner.polys.clone(),
        }
    }

    fn restore(&self, snapshot: Snapshot) {
        let mut inner = self.inner.write();
        inner.accounts = Accounts::restore(snapshot.accounts);
        inner.admins = snapshot.admins;
        inner.shared = snapshot.shared;
        inner.polys = snapshot.polys;
    }
}

impl DarcLookup for Storage {
    fn latest_version(&self, base_id: Hash) -> Option<Darc> {
        self.latest_darc(base_id)
    }

    fn version(&self, base_id: Hash, version: u64) -> Option<Darc> {
        self.darc_version(base_id, version)
    }
}

impl AdminLookup for Storage {
    fn admin_darc(&self, chain: Hash) -> Option<Darc> {
        self.admin(chain)
    }
}
