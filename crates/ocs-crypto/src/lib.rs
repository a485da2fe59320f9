//! # Crypto Primitives Adapter
//!
//! Component A of the OCS core (spec §4.A): produce/verify Ed25519
//! signatures, serialize group elements, and perform scalar operations on
//! a prime-order group with a fixed base. This crate is a thin boundary —
//! callers treat malformed inputs as opaque [`CryptoError`]s and never
//! reach past it into curve internals.
//!
//! ## Components
//!
//! | Module | Algorithm | Use case |
//! |--------|-----------|----------|
//! | `signatures` | Ed25519 | Identity signing (writers, owners, readers) |
//! | `group` | Ristretto255 | Collective key `X`, ciphertext blinding `U` |
//! | `hashing` | Blake3 | Block/DARC hashing |
//! | `shamir` | Feldman VSS + Lagrange | DKG commitments, threshold recovery |

#![warn(missing_docs)]

pub mod error;
pub mod group;
pub mod hashing;
pub mod shamir;
pub mod signatures;

pub use error::CryptoError;
pub use group::{GroupElement, GroupScalar};
pub use hashing::blake3_hash;
pub use shamir::{Polynomial, PublicPoly};
pub use signatures::{Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature};
