//! Service configuration: a plain struct with a `Default` impl and a
//! `validate()`, matching `node-runtime::NodeConfig::validate_for_production`
//! rather than reaching for an external config-file crate (the teacher's
//! own `node-runtime` config is a plain struct too).

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tunables for one running server's façade. Loaded by `ocs-node` from a
/// plain config file or built directly in tests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Upper bound on waiting for a propagation broadcast's reply count
    /// (spec §5 suspension point iii).
    pub propagation_timeout: Duration,
    /// Upper bound on waiting for DKG completion (spec §4.G: fixed at
    /// 10s in the original; kept configurable here, defaulting to it).
    pub dkg_timeout: Duration,
    /// Width of the accepted clock-skew window for transaction
    /// timestamps (spec §4.C; 60s in the original).
    pub timestamp_window_secs: i64,
    /// Path to the persisted storage blob (spec §4.I / §6, fixed key
    /// `"storage"` within it).
    pub storage_path: std::path::PathBuf,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            propagation_timeout: Duration::from_secs(5),
            dkg_timeout: ocs_dkg::DKG_TIMEOUT,
            timestamp_window_secs: ocs_ledger::TIMESTAMP_WINDOW_SECS,
            storage_path: std::path::PathBuf::from("./ocs-storage.bin"),
        }
    }
}

impl ServiceConfig {
    /// Reject nonsensical configuration before a service starts.
    ///
    /// # Panics
    ///
    /// Panics on a zero timeout or a non-positive timestamp window —
    /// these can never be valid, so there's nothing sensible to do but
    /// refuse to start, matching `NodeConfig::validate_for_production`'s
    /// panic-on-misconfiguration contract.
    pub fn validate(&self) {
        assert!(
            !self.propagation_timeout.is_zero(),
            "propagation_timeout must be non-zero"
        );
        assert!(!self.dkg_timeout.is_zero(), "dkg_timeout must be non-zero");
        assert!(
            self.timestamp_window_secs > 0,
            "timestamp_window_secs must be positive"
        );
    }
}
