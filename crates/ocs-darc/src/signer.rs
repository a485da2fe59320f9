//! A signing identity: an [`Identity`] paired with the private key that
//! lets it produce darc evolution / write / read signatures.

use crate::error::DarcError;
use ocs_crypto::{Ed25519KeyPair, Ed25519Signature};
use ocs_types::Identity;

/// An identity plus (for Ed25519) the private key to sign with. A
/// `Darc`-variant identity can only ever appear on the verifying side —
/// you reach one via path search, you cannot hold its key directly.
pub struct Signer {
    keypair: Ed25519KeyPair,
}

impl Signer {
    /// Generate a fresh random signer.
    pub fn generate() -> Self {
        Self {
            keypair: Ed25519KeyPair::generate(),
        }
    }

    /// Restore a signer from a 32-byte seed.
    pub fn from_seed(seed: [u8; 32]) -> Self {
        Self {
            keypair: Ed25519KeyPair::from_seed(seed),
        }
    }

    /// This signer's public identity.
    pub fn identity(&self) -> Identity {
        Identity::Ed25519(*self.keypair.public_key().as_bytes())
    }

    /// Sign an arbitrary byte string.
    pub fn sign(&self, message: &[u8]) -> Result<Ed25519Signature, DarcError> {
        Ok(self.keypair.sign(message))
    }
}
