//! # Prime-Order Group
//!
//! A thin wrapper over Ristretto255 (`curve25519-dalek`), the group used
//! for the collective key `X`, ciphertext blinding factor `U`, and every
//! re-encryption share. Fixed 32-byte serialization per spec §4.A.

use crate::CryptoError;
use curve25519_dalek::constants::RISTRETTO_BASEPOINT_POINT;
use curve25519_dalek::ristretto::{CompressedRistretto, RistrettoPoint};
use curve25519_dalek::scalar::Scalar;
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};
use zeroize::Zeroize;

/// A scalar in the group's prime-order field. Secret shares and private
/// re-encryption exponents are scalars.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupScalar(Scalar);

impl GroupScalar {
    /// A freshly sampled random scalar.
    pub fn random() -> Self {
        let mut bytes = [0u8; 64];
        OsRng.fill_bytes(&mut bytes);
        Self(Scalar::from_bytes_mod_order_wide(&bytes))
    }

    /// The additive identity.
    pub fn zero() -> Self {
        Self(Scalar::ZERO)
    }

    /// The multiplicative identity.
    pub fn one() -> Self {
        Self(Scalar::ONE)
    }

    /// Build a scalar from a small integer (participant indices, powers).
    pub fn from_u64(v: u64) -> Self {
        Self(Scalar::from(v))
    }

    /// Serialize to 32 canonical bytes.
    pub fn to_bytes(&self) -> [u8; 32] {
        self.0.to_bytes()
    }

    /// Deserialize from 32 bytes, rejecting non-canonical encodings.
    pub fn from_bytes(bytes: &[u8; 32]) -> Result<Self, CryptoError> {
        Option::<Scalar>::from(Scalar::from_canonical_bytes(*bytes))
            .map(Self)
            .ok_or(CryptoError::InvalidGroupElement)
    }

    /// Multiplicative inverse, used by Lagrange coefficient computation.
    pub fn invert(&self) -> Self {
        Self(self.0.invert())
    }
}

impl Drop for GroupScalar {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl Add for GroupScalar {
    type Output = GroupScalar;
    fn add(self, rhs: Self) -> Self::Output {
        GroupScalar(self.0 + rhs.0)
    }
}

impl Sub for GroupScalar {
    type Output = GroupScalar;
    fn sub(self, rhs: Self) -> Self::Output {
        GroupScalar(self.0 - rhs.0)
    }
}

impl Mul for GroupScalar {
    type Output = GroupScalar;
    fn mul(self, rhs: Self) -> Self::Output {
        GroupScalar(self.0 * rhs.0)
    }
}

/// A group element (point). The collective public key `X`, the write
/// blinding factor `U`, and every DKG commitment coefficient are elements.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupElement(RistrettoPoint);

impl GroupElement {
    /// The group's fixed base point.
    pub fn base() -> Self {
        Self(RISTRETTO_BASEPOINT_POINT)
    }

    /// The identity element.
    pub fn identity() -> Self {
        Self(RistrettoPoint::default())
    }

    /// `base^scalar`.
    pub fn base_mul(scalar: GroupScalar) -> Self {
        Self(RISTRETTO_BASEPOINT_POINT * scalar.0)
    }

    /// `self^scalar`.
    pub fn mul(self, scalar: GroupScalar) -> Self {
        Self(self.0 * scalar.0)
    }

    /// Point addition.
    pub fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }

    /// Point subtraction. Used client-side to strip a reader's own
    /// `xc * X` blinding term back out of a combiner's re-encrypted point.
    pub fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }

    /// Serialize to 32 canonical bytes.
    pub fn to_bytes(self) -> [u8; 32] {
        self.0.compress().to_bytes()
    }

    /// Deserialize from 32 bytes, rejecting invalid encodings.
    pub fn from_bytes(bytes: &[u8; 32]) -> Result<Self, CryptoError> {
        CompressedRistretto(*bytes)
            .decompress()
            .map(Self)
            .ok_or(CryptoError::InvalidGroupElement)
    }

    /// Deterministically maps an Ed25519 verifying key's bytes into this
    /// group via hash-to-scalar. The re-encryption protocol's
    /// non-ephemeral branch treats a reader's long-term Ed25519 identity
    /// as a point in this group without reinterpreting its Edwards
    /// encoding directly (Ristretto's encoding isn't bit-compatible with
    /// Ed25519's), so every server can independently recompute the same
    /// point from the identity alone.
    pub fn from_ed25519_pubkey(bytes: &[u8; 32]) -> Self {
        let digest = crate::hashing::blake3_hash(bytes);
        let mut wide = [0u8; 64];
        wide[..32].copy_from_slice(&digest);
        wide[32..].copy_from_slice(&digest);
        Self(RISTRETTO_BASEPOINT_POINT * Scalar::from_bytes_mod_order_wide(&wide))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_roundtrip() {
        let s = GroupScalar::random();
        let bytes = s.to_bytes();
        assert_eq!(GroupScalar::from_bytes(&bytes).unwrap(), s);
    }

    #[test]
    fn element_roundtrip() {
        let e = GroupElement::base_mul(GroupScalar::from_u64(7));
        let bytes = e.to_bytes();
        assert_eq!(GroupElement::from_bytes(&bytes).unwrap(), e);
    }

    #[test]
    fn sub_undoes_add() {
        let a = GroupElement::base_mul(GroupScalar::from_u64(11));
        let b = GroupElement::base_mul(GroupScalar::from_u64(4));
        assert_eq!(a.add(b).sub(b), a);
    }

    #[test]
    fn base_mul_matches_repeated_add() {
        let base = GroupElement::base();
        let three = base.add(base).add(base);
        assert_eq!(GroupElement::base_mul(GroupScalar::from_u64(3)), three);
    }

    #[test]
    fn invert_is_multiplicative_inverse() {
        let s = GroupScalar::from_u64(5);
        let prod = s.clone() * s.invert();
        assert_eq!(prod, GroupScalar::one());
    }

    #[test]
    fn from_ed25519_pubkey_is_deterministic() {
        let bytes = [42u8; 32];
        assert_eq!(
            GroupElement::from_ed25519_pubkey(&bytes),
            GroupElement::from_ed25519_pubkey(&bytes)
        );
        assert_ne!(
            GroupElement::from_ed25519_pubkey(&bytes),
            GroupElement::from_ed25519_pubkey(&[7u8; 32])
        );
    }
}
