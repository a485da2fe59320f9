//! # Primitive Aliases
//!
//! Fixed-width byte types shared by every component. Mirrors the shape of
//! `shared_types::Hash`/`PublicKey`/`Signature` from the wider workspace,
//! narrowed to what the OCS core needs.

/// A 32-byte Blake3 digest. Used for block hashes, DARC ids (`BaseID`), and
/// chain ids (the genesis block's hash).
pub type Hash = [u8; 32];

/// A 32-byte Ed25519 public key.
pub type PublicKeyBytes = [u8; 32];

/// A 64-byte Ed25519 signature.
pub type Signature = [u8; 64];

/// Seconds since the Unix epoch, matching `Transaction::Timestamp` (spec
/// §3) and the 60s verification window (spec §4.C).
pub type Timestamp = i64;
