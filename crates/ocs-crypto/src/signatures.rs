//! # Ed25519 Signatures
//!
//! Twisted Edwards curve signatures with deterministic nonces, used for
//! every signed object in the OCS core: DARC evolutions, write requests,
//! read requests.

use crate::CryptoError;
use ed25519_dalek::{Signer as _, SigningKey, Verifier as _, VerifyingKey};
use ocs_types::{PublicKeyBytes, Signature as RawSignature};
use zeroize::Zeroize;

/// Ed25519 public key (32 bytes).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Ed25519PublicKey(PublicKeyBytes);

impl Ed25519PublicKey {
    /// Create from bytes, rejecting anything that isn't a valid curve point.
    pub fn from_bytes(bytes: PublicKeyBytes) -> Result<Self, CryptoError> {
        VerifyingKey::from_bytes(&bytes).map_err(|_| CryptoError::InvalidPublicKey)?;
        Ok(Self(bytes))
    }

    /// Raw bytes, suitable for the `ed25519:<hex>` identity encoding.
    pub fn as_bytes(&self) -> &PublicKeyBytes {
        &self.0
    }

    /// Verify a signature produced over `message`.
    pub fn verify(&self, message: &[u8], signature: &Ed25519Signature) -> Result<(), CryptoError> {
        let verifying_key =
            VerifyingKey::from_bytes(&self.0).map_err(|_| CryptoError::InvalidPublicKey)?;
        let sig = ed25519_dalek::Signature::from_bytes(&signature.0);
        verifying_key
            .verify(message, &sig)
            .map_err(|_| CryptoError::SignatureVerificationFailed)
    }
}

/// Ed25519 signature (64 bytes).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ed25519Signature(RawSignature);

impl Ed25519Signature {
    /// Wrap raw signature bytes.
    pub fn from_bytes(bytes: RawSignature) -> Self {
        Self(bytes)
    }

    /// Raw bytes.
    pub fn as_bytes(&self) -> &RawSignature {
        &self.0
    }
}

/// An Ed25519 keypair, zeroized on drop.
pub struct Ed25519KeyPair {
    signing_key: SigningKey,
}

impl Ed25519KeyPair {
    /// Generate a random keypair.
    pub fn generate() -> Self {
        let signing_key = SigningKey::generate(&mut rand::thread_rng());
        Self { signing_key }
    }

    /// Restore a keypair from a 32-byte secret seed (on-disk keypair
    /// loading itself is out of scope here; callers supply the bytes).
    pub fn from_seed(seed: [u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(&seed),
        }
    }

    /// The public half of this keypair.
    pub fn public_key(&self) -> Ed25519PublicKey {
        Ed25519PublicKey(self.signing_key.verifying_key().to_bytes())
    }

    /// Sign a message. Deterministic — no RNG dependency.
    pub fn sign(&self, message: &[u8]) -> Ed25519Signature {
        Ed25519Signature(self.signing_key.sign(message).to_bytes())
    }

    /// Secret seed, for persistence.
    pub fn to_seed(&self) -> [u8; 32] {
        self.signing_key.to_bytes()
    }
}

impl Drop for Ed25519KeyPair {
    fn drop(&mut self) {
        let mut bytes = self.signing_key.to_bytes();
        bytes.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_then_verify() {
        let keypair = Ed25519KeyPair::generate();
        let message = b"write request over X";
        let signature = keypair.sign(message);
        assert!(keypair.public_key().verify(message, &signature).is_ok());
    }

    #[test]
    fn wrong_message_rejected() {
        let keypair = Ed25519KeyPair::generate();
        let signature = keypair.sign(b"message1");
        assert!(keypair
            .public_key()
            .verify(b"message2", &signature)
            .is_err());
    }

    #[test]
    fn wrong_key_rejected() {
        let a = Ed25519KeyPair::generate();
        let b = Ed25519KeyPair::generate();
        let signature = a.sign(b"test");
        assert!(b.public_key().verify(b"test", &signature).is_err());
    }

    #[test]
    fn deterministic_signatures() {
        let keypair = Ed25519KeyPair::from_seed([0xABu8; 32]);
        let sig1 = keypair.sign(b"deterministic");
        let sig2 = keypair.sign(b"deterministic");
        assert_eq!(sig1.as_bytes(), sig2.as_bytes());
    }

    #[test]
    fn seed_roundtrip() {
        let original = Ed25519KeyPair::generate();
        let restored = Ed25519KeyPair::from_seed(original.to_seed());
        assert_eq!(original.public_key(), restored.public_key());
    }
}
