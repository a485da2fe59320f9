//! # Feldman Verifiable Secret Sharing
//!
//! Polynomial evaluation, public commitment generation, and Lagrange-based
//! threshold recovery. `ocs-dkg` uses this to split a collective secret
//! across the roster; `ocs-reencrypt` uses it to recombine partial
//! re-encryption shares into the reader's ciphertext.

use crate::{CryptoError, GroupElement, GroupScalar};
use serde::{Deserialize, Serialize};

/// A secret polynomial `f(x) = a_0 + a_1*x + ... + a_t*x^t` over the
/// scalar field. `a_0` is the shared secret; the rest are random
/// coefficients chosen by the dealer.
#[derive(Clone)]
pub struct Polynomial {
    coeffs: Vec<GroupScalar>,
}

impl Polynomial {
    /// Sample a random polynomial of the given degree. `degree + 1`
    /// coefficients are drawn, the 0th of which is the secret.
    pub fn random(degree: usize) -> Self {
        let coeffs = (0..=degree).map(|_| GroupScalar::random()).collect();
        Self { coeffs }
    }

    /// Build a polynomial from explicit coefficients, constant term first.
    pub fn from_coeffs(coeffs: Vec<GroupScalar>) -> Self {
        Self { coeffs }
    }

    /// The constant term: the shared secret itself.
    pub fn secret(&self) -> GroupScalar {
        self.coeffs[0].clone()
    }

    /// Evaluate `f(x)` at a nonzero participant index using Horner's method.
    pub fn eval(&self, x: GroupScalar) -> GroupScalar {
        let mut acc = GroupScalar::zero();
        for coeff in self.coeffs.iter().rev() {
            acc = acc * x.clone() + coeff.clone();
        }
        acc
    }

    /// Public commitments `base^a_i` for each coefficient, published so
    /// recipients can verify their share without learning the secret.
    pub fn commit(&self, base: GroupElement) -> PublicPoly {
        let commits = self
            .coeffs
            .iter()
            .map(|c| base.mul(c.clone()))
            .collect::<Vec<_>>();
        PublicPoly { base, commits }
    }

    /// Degree of the polynomial (threshold - 1).
    pub fn degree(&self) -> usize {
        self.coeffs.len() - 1
    }
}

/// The public half of a dealer's polynomial: commitments to each
/// coefficient, against which a recipient can verify its share without
/// learning the secret or anyone else's share.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicPoly {
    /// Base element the commitments are raised against.
    pub base: GroupElement,
    /// `base^a_i` for each coefficient `a_i`, constant term first.
    pub commits: Vec<GroupElement>,
}

impl PublicPoly {
    /// Threshold implied by this polynomial (`degree + 1`).
    pub fn threshold(&self) -> usize {
        self.commits.len()
    }

    /// The public commitment to the secret itself (`base^a_0`).
    pub fn public_secret(&self) -> GroupElement {
        self.commits[0]
    }

    /// Evaluate the commitment polynomial at `x`, yielding `base^f(x)`.
    /// Used to verify a share `(x, f(x))` without learning `f(x)` from the
    /// commitments alone: the caller checks `base^share == eval_commit(x)`.
    pub fn eval_commit(&self, x: GroupScalar) -> GroupElement {
        let mut acc = GroupElement::identity();
        let mut power = GroupScalar::one();
        for commit in &self.commits {
            acc = acc.add(commit.mul(power.clone()));
            power = power * x.clone();
        }
        acc
    }

    /// Verify that `share` is a valid evaluation of this polynomial at `x`.
    pub fn verify_share(&self, x: GroupScalar, share: GroupScalar) -> bool {
        GroupElement::base_mul(share) == self.eval_commit(x)
    }
}

/// A single party's share of a secret, tagged with its 1-indexed position.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Share {
    /// 1-indexed participant position (never 0 — the secret lives at `x=0`).
    pub index: u32,
    /// The share value `f(index)`.
    pub value: GroupScalar,
}

/// Lagrange coefficient `l_i(0)` for reconstructing `f(0)` from the shares
/// held at the indices in `all_indices`, evaluated for `index`.
fn lagrange_coefficient_at_zero(index: u32, all_indices: &[u32]) -> GroupScalar {
    let xi = GroupScalar::from_u64(index as u64);
    let mut numerator = GroupScalar::one();
    let mut denominator = GroupScalar::one();
    for &other in all_indices {
        if other == index {
            continue;
        }
        let xj = GroupScalar::from_u64(other as u64);
        numerator = numerator * xj.clone();
        denominator = denominator * (xj - xi.clone());
    }
    numerator * denominator.invert()
}

/// Recover the secret `f(0)` from at least `threshold` shares via Lagrange
/// interpolation at zero.
pub fn recover_secret(shares: &[Share], threshold: usize) -> Result<GroupScalar, CryptoError> {
    if shares.len() < threshold {
        return Err(CryptoError::InsufficientShares {
            got: shares.len(),
            threshold,
        });
    }
    let used = &shares[..threshold];
    let indices: Vec<u32> = used.iter().map(|s| s.index).collect();
    let mut acc = GroupScalar::zero();
    for share in used {
        let coeff = lagrange_coefficient_at_zero(share.index, &indices);
        acc = acc + coeff * share.value.clone();
    }
    Ok(acc)
}

/// Recover a group element `base^f(0)` from partial commitments
/// `base^f(index)`, used by re-encryption to recombine partial decryption
/// shares into the reader-blinded point without ever reconstructing the
/// scalar secret itself.
pub fn recover_commit(
    partials: &[(u32, GroupElement)],
    threshold: usize,
) -> Result<GroupElement, CryptoError> {
    if partials.len() < threshold {
        return Err(CryptoError::InsufficientShares {
            got: partials.len(),
            threshold,
        });
    }
    let used = &partials[..threshold];
    let indices: Vec<u32> = used.iter().map(|(i, _)| *i).collect();
    let mut acc = GroupElement::identity();
    for (index, point) in used {
        let coeff = lagrange_coefficient_at_zero(*index, &indices);
        acc = acc.add(point.mul(coeff));
    }
    Ok(acc)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eval_matches_direct_computation() {
        let poly = Polynomial::from_coeffs(vec![
            GroupScalar::from_u64(3),
            GroupScalar::from_u64(2),
        ]);
        // f(x) = 3 + 2x, f(5) = 13
        assert_eq!(poly.eval(GroupScalar::from_u64(5)), GroupScalar::from_u64(13));
    }

    #[test]
    fn share_verifies_against_commitments() {
        let poly = Polynomial::random(2);
        let public = poly.commit(GroupElement::base());
        let x = GroupScalar::from_u64(4);
        let share = poly.eval(x.clone());
        assert!(public.verify_share(x, share));
    }

    #[test]
    fn bad_share_fails_verification() {
        let poly = Polynomial::random(2);
        let public = poly.commit(GroupElement::base());
        let x = GroupScalar::from_u64(4);
        let forged = poly.eval(x.clone()) + GroupScalar::one();
        assert!(!public.verify_share(x, forged));
    }

    #[test]
    fn threshold_recovery_reconstructs_secret() {
        let poly = Polynomial::random(2); // degree 2, threshold 3
        let shares: Vec<Share> = (1..=5)
            .map(|i| Share {
                index: i,
                value: poly.eval(GroupScalar::from_u64(i as u64)),
            })
            .collect();
        let recovered = recover_secret(&shares[..3], 3).unwrap();
        assert_eq!(recovered, poly.secret());
    }

    #[test]
    fn any_threshold_subset_recovers_same_secret() {
        let poly = Polynomial::random(3); // threshold 4
        let shares: Vec<Share> = (1..=7)
            .map(|i| Share {
                index: i,
                value: poly.eval(GroupScalar::from_u64(i as u64)),
            })
            .collect();
        let subset_a = &shares[0..4];
        let subset_b = &shares[3..7];
        assert_eq!(
            recover_secret(subset_a, 4).unwrap(),
            recover_secret(subset_b, 4).unwrap()
        );
    }

    #[test]
    fn insufficient_shares_rejected() {
        let poly = Polynomial::random(2);
        let shares: Vec<Share> = (1..=2)
            .map(|i| Share {
                index: i,
                value: poly.eval(GroupScalar::from_u64(i as u64)),
            })
            .collect();
        assert!(matches!(
            recover_secret(&shares, 3),
            Err(CryptoError::InsufficientShares { got: 2, threshold: 3 })
        ));
    }

    #[test]
    fn recover_commit_matches_base_mul_of_secret() {
        let poly = Polynomial::random(2);
        let partials: Vec<(u32, GroupElement)> = (1..=3)
            .map(|i| {
                (
                    i,
                    GroupElement::base_mul(poly.eval(GroupScalar::from_u64(i as u64))),
                )
            })
            .collect();
        let recovered = recover_commit(&partials, 3).unwrap();
        assert_eq!(recovered, GroupElement::base_mul(poly.secret()));
    }
}
