//! Whole-blob persistence under a fixed key (spec §4.I/§6), grounded on
//! the teacher's `qc-02-block-storage::adapters::storage::file` pattern:
//! an in-memory index mirrored to disk on every mutation, save/load
//! serialized by the storage mutex.

use async_trait::async_trait;
use std::path::PathBuf;

/// The fixed key the single persisted blob is stored under (spec §6).
pub const STORAGE_KEY: &str = "storage";

/// Save/load of an opaque byte blob keyed by a string. `ocs-service`
/// only ever uses [`STORAGE_KEY`], but the port stays keyed rather than
/// single-purpose so a test double can exercise multiple blobs.
#[async_trait]
pub trait PersistenceAdapter: Send + Sync {
    /// Persist `bytes` under `key`, replacing any prior value.
    async fn save(&self, key: &str, bytes: Vec<u8>) -> std::io::Result<()>;
    /// Load the bytes under `key`, or `None` if nothing has been saved.
    async fn load(&self, key: &str) -> std::io::Result<Option<Vec<u8>>>;
}

/// A single file holding one key's blob, matching spec §6's "a single
/// opaque blob under key `storage`" — the key is folded into the file's
/// existence rather than a multi-key format, since this core only ever
/// persists one blob.
pub struct FilePersistence {
    path: PathBuf,
}

impl FilePersistence {
    /// Persist to (and restore from) `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl PersistenceAdapter for FilePersistence {
    async fn save(&self, key: &str, bytes: Vec<u8>) -> std::io::Result<()> {
        debug_assert_eq!(key, STORAGE_KEY, "this adapter only ever persists one key");
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || std::fs::write(path, bytes))
            .await
            .expect("blocking save task panicked")
    }

    async fn load(&self, key: &str) -> std::io::Result<Option<Vec<u8>>> {
        debug_assert_eq!(key, STORAGE_KEY, "this adapter only ever persists one key");
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || match std::fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        })
        .await
        .expect("blocking load task panicked")
    }
}

/// An in-memory stand-in for tests: no disk I/O, same save/load contract.
#[derive(Default)]
pub struct MemoryPersistence {
    slot: parking_lot::Mutex<Option<Vec<u8>>>,
}

#[async_trait]
impl PersistenceAdapter for MemoryPersistence {
    async fn save(&self, _key: &str, bytes: Vec<u8>) -> std::io::Result<()> {
        *self.slot.lock() = Some(bytes);
        Ok(())
    }

    async fn load(&self, _key: &str) -> std::io::Result<Option<Vec<u8>>> {
        Ok(self.slot.lock().clone())
    }
}
