//! # Identity & Role
//!
//! An identity is a variant of {Ed25519 public key, DARC reference}
//! (spec §3). Two identities are equal iff same variant and same contents.

use crate::primitives::{Hash, PublicKeyBytes};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The role an identity is being checked against when searching a DARC
/// path (spec §4.B): `Owner`s may evolve a DARC, `User`s may exercise the
/// access it grants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// May sign an evolution of the DARC.
    Owner,
    /// May exercise the access the DARC grants.
    User,
}

/// An identity: either a bare Ed25519 public key, or a reference to
/// another DARC's `BaseID` (hierarchical delegation, spec §3/§GLOSSARY).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Identity {
    /// A directly verifiable Ed25519 signer.
    Ed25519(PublicKeyBytes),
    /// A reference to another DARC, resolved via path search.
    Darc(Hash),
}

impl Identity {
    /// The `darc:` / `ed25519:` prefix used in the wire string encoding
    /// (spec §6).
    pub fn scheme(&self) -> &'static str {
        match self {
            Identity::Ed25519(_) => "ed25519",
            Identity::Darc(_) => "darc",
        }
    }

    /// Whether this identity is the Ed25519 variant.
    pub fn is_ed25519(&self) -> bool {
        matches!(self, Identity::Ed25519(_))
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bytes: &[u8] = match self {
            Identity::Ed25519(pk) => pk,
            Identity::Darc(id) => id,
        };
        write!(f, "{}:{}", self.scheme(), hex::encode(bytes))
    }
}

/// Error parsing an [`Identity`] from its `<scheme>:<hex>` string form.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ParseIdentityError {
    /// Missing or unrecognized `<scheme>:` prefix.
    #[error("unrecognized identity scheme in {0:?}")]
    UnknownScheme(String),
    /// The hex payload didn't decode to valid hex.
    #[error("invalid hex payload: {0}")]
    InvalidHex(String),
    /// The decoded payload wasn't 32 bytes.
    #[error("expected 32 bytes, got {0}")]
    WrongLength(usize),
}

impl FromStr for Identity {
    type Err = ParseIdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // DARC ids are addressed as `darc:<hex>`, parsed by stripping the
        // 5-character prefix (spec §6); ed25519 keys use `ed25519:<hex>`.
        let (scheme, hex_part) = s
            .split_once(':')
            .ok_or_else(|| ParseIdentityError::UnknownScheme(s.to_string()))?;
        let bytes =
            hex::decode(hex_part).map_err(|e| ParseIdentityError::InvalidHex(e.to_string()))?;
        let arr: [u8; 32] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| ParseIdentityError::WrongLength(bytes.len()))?;
        match scheme {
            "ed25519" => Ok(Identity::Ed25519(arr)),
            "darc" => Ok(Identity::Darc(arr)),
            _ => Err(ParseIdentityError::UnknownScheme(scheme.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_ed25519() {
        let id = Identity::Ed25519([7u8; 32]);
        let s = id.to_string();
        assert!(s.starts_with("ed25519:"));
        assert_eq!(s.parse::<Identity>().unwrap(), id);
    }

    #[test]
    fn roundtrip_darc() {
        let id = Identity::Darc([9u8; 32]);
        let s = id.to_string();
        assert!(s.starts_with("darc:"));
        assert_eq!(s.parse::<Identity>().unwrap(), id);
    }

    #[test]
    fn unknown_scheme_rejected() {
        assert!("rsa:aabb".parse::<Identity>().is_err());
    }

    #[test]
    fn wrong_length_rejected() {
        assert!("ed25519:aabb".parse::<Identity>().is_err());
    }
}
