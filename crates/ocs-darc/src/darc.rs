//! The DARC policy object itself: construction, evolution, signing, and
//! signature verification.

use crate::error::DarcError;
use crate::rules::Rules;
use crate::signer::Signer;
use ocs_crypto::{blake3_hash, Ed25519PublicKey, Ed25519Signature};
use ocs_types::{Hash, Identity, Role, Signature as RawSignature};
use serde::{Deserialize, Serialize};

/// A signature attached to a darc evolution: who signed, the offline path
/// of base ids they signed through (empty means "search online"), and the
/// raw Ed25519 bytes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DarcSignature {
    /// The identity that produced `signature`.
    pub signer: Identity,
    /// Offline path of base ids from the verification root to `signer`'s
    /// darc, in order. Empty triggers an online path search instead.
    pub path: Vec<Hash>,
    /// Raw Ed25519 signature bytes over this version's content.
    pub signature: RawSignature,
}

/// A versioned access-control policy object (spec §3 `DARC`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Darc {
    /// Stable identifier across evolutions: the genesis version's content hash.
    pub base_id: Hash,
    /// Monotone version counter, starting at 0.
    pub version: u64,
    /// Identities permitted to evolve this darc.
    pub owners: Vec<Identity>,
    /// Identities permitted to exercise the access this darc grants.
    pub users: Vec<Identity>,
    /// Action → identity-set rules.
    pub rules: Rules,
    /// Evolution signature; absent for the unsigned genesis version.
    pub signature: Option<DarcSignature>,
}

/// Content used for both `base_id` derivation and the bytes a signer signs:
/// everything but the signature itself.
#[derive(Serialize)]
struct DarcContent<'a> {
    base_id: Hash,
    version: u64,
    owners: &'a [Identity],
    users: &'a [Identity],
    rules: &'a Rules,
}

impl Darc {
    /// Create a new genesis (version 0, unsigned) darc from the given
    /// owners/users/rules.
    pub fn new(owners: Vec<Identity>, users: Vec<Identity>, rules: Rules) -> Self {
        let mut darc = Self {
            base_id: [0u8; 32],
            version: 0,
            owners,
            users,
            rules,
            signature: None,
        };
        darc.base_id = darc.content_hash();
        darc
    }

    /// Deep copy: no aliasing of `owners`/`users`/`rules`.
    pub fn copy(&self) -> Self {
        self.clone()
    }

    /// Produce the next version, inheriting `base_id` and bumping
    /// `version`. The result is unsigned; call [`Darc::sign`] next.
    pub fn evolve_from(
        parent: &Darc,
        owners: Vec<Identity>,
        users: Vec<Identity>,
        rules: Rules,
    ) -> Self {
        Self {
            base_id: parent.base_id,
            version: parent.version + 1,
            owners,
            users,
            rules,
            signature: None,
        }
    }

    /// Content hash used to derive `base_id` (genesis only) and this
    /// version's `GetID()`-equivalent identity.
    fn content_hash(&self) -> Hash {
        let content = DarcContent {
            base_id: self.base_id,
            version: self.version,
            owners: &self.owners,
            users: &self.users,
            rules: &self.rules,
        };
        let bytes = bincode::serialize(&content).expect("darc content always encodes");
        blake3_hash(&bytes)
    }

    /// This specific version's content-addressed id (distinct from
    /// `base_id`, which anchors only the genesis version).
    pub fn id(&self) -> Hash {
        self.content_hash()
    }

    /// Sign this evolution. `path` is the offline owner path from the
    /// verification root to `signer`, or empty to let verifiers search
    /// online.
    pub fn sign(&mut self, signer: &Signer, path: Vec<Hash>) -> Result<(), DarcError> {
        let bytes = bincode::serialize(&DarcContent {
            base_id: self.base_id,
            version: self.version,
            owners: &self.owners,
            users: &self.users,
            rules: &self.rules,
        })
        .expect("darc content always encodes");
        let signature = signer.sign(&bytes)?;
        self.signature = Some(DarcSignature {
            signer: signer.identity(),
            path,
            signature: *signature.as_bytes(),
        });
        Ok(())
    }

    /// Verify this darc's signature was produced by an owner reachable
    /// from `base` (spec §4.B `verify(d, base)`). Dispatches to online
    /// path search or offline pairwise verification depending on whether
    /// `self.signature.path` is populated.
    pub fn verify(
        &self,
        base: &Darc,
        lookup: &dyn crate::path::DarcLookup,
    ) -> Result<(), DarcError> {
        let sig = self.signature.as_ref().ok_or(DarcError::MissingSignature {
            base_id: self.base_id,
            version: self.version,
        })?;

        let terminal_id = if sig.path.is_empty() {
            let path = crate::path::search_path(lookup, base, &sig.signer, Role::Owner)
                .ok_or(DarcError::NoPath {
                    base_id: base.base_id,
                    role: Role::Owner,
                })?;
            *path.last().expect("search_path never returns empty")
        } else {
            crate::path::verify_path(lookup, base, &sig.path, Role::Owner).ok_or(
                DarcError::NoPath {
                    base_id: base.base_id,
                    role: Role::Owner,
                },
            )?
        };
        self.verify_with_terminal(sig, terminal_id, lookup)
    }

    fn verify_with_terminal(
        &self,
        sig: &DarcSignature,
        terminal_base_id: Hash,
        lookup: &dyn crate::path::DarcLookup,
    ) -> Result<(), DarcError> {
        let terminal = lookup
            .latest_version(terminal_base_id)
            .ok_or(DarcError::NotFound(terminal_base_id))?;
        if !terminal.owners.contains(&sig.signer) {
            return Err(DarcError::NoPath {
                base_id: terminal_base_id,
                role: Role::Owner,
            });
        }
        let Identity::Ed25519(pk) = sig.signer else {
            return Err(DarcError::NonSigningIdentity);
        };
        let public_key =
            Ed25519PublicKey::from_bytes(pk).map_err(|_| DarcError::BadSignature {
                base_id: self.base_id,
                version: self.version,
            })?;
        let content = DarcContent {
            base_id: self.base_id,
            version: self.version,
            owners: &self.owners,
            users: &self.users,
            rules: &self.rules,
        };
        let bytes = bincode::serialize(&content).expect("darc content always encodes");
        let signature = Ed25519Signature::from_bytes(sig.signature);
        public_key
            .verify(&bytes, &signature)
            .map_err(|_| DarcError::BadSignature {
                base_id: self.base_id,
                version: self.version,
            })
    }
}
