//! Group handles and elements. An element is an integer tagged with the
//! handle of its owning group; which arithmetic path it takes (CRT or
//! full-width) follows from the handle's variant.

use crate::error::GroupError;
use crate::group_n::QrGroupN;
use crate::group_pq::QrGroupPq;
use gs_crypto_utils::euclid::mod_inverse;
use gs_crypto_utils::sampling::random_unit;
use num_bigint::{BigInt, BigUint};
use num_traits::{One, Signed, Zero};
use rand::RngCore;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::sync::Arc;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Return `par_iter` or `iter` depending on whether feature `parallel` is enabled
macro_rules! iter {
    ($val:expr) => {{
        #[cfg(feature = "parallel")]
        let it = $val.par_iter();
        #[cfg(not(feature = "parallel"))]
        let it = $val.iter();
        it
    }};
}

/// Capability-distinct handle to a quadratic-residue group. The
/// `KnownOrder` variant exists only on the signer side; deserialization and
/// [`QrGroup::to_public`] only ever produce `UnknownOrder`, so code that is
/// handed wire data cannot obtain the factorization-bearing variant.
#[derive(Clone, Debug)]
pub enum QrGroup {
    KnownOrder(Arc<QrGroupPq>),
    UnknownOrder(Arc<QrGroupN>),
}

impl QrGroup {
    pub fn modulus(&self) -> &BigUint {
        match self {
            Self::KnownOrder(g) => &g.modulus,
            Self::UnknownOrder(g) => &g.modulus,
        }
    }

    /// The order `p'q'` of `QR_N`. Only defined when the factorization is
    /// known; the unknown-order handle refuses by construction.
    pub fn order(&self) -> Result<&BigUint, GroupError> {
        match self {
            Self::KnownOrder(g) => Ok(&g.order),
            Self::UnknownOrder(_) => Err(GroupError::UnknownGroupOrder),
        }
    }

    /// The group's configured generator. Groups reconstructed from wire data
    /// carry none and refuse.
    pub fn generator(&self) -> Result<QrElement, GroupError> {
        let value = match self {
            Self::KnownOrder(g) => g.generator.clone(),
            Self::UnknownOrder(g) => g
                .generator
                .clone()
                .ok_or(GroupError::GeneratorNotConfigured)?,
        };
        Ok(QrElement {
            group: self.clone(),
            value,
        })
    }

    /// Strips the factorization capability. Idempotent on public handles.
    pub fn to_public(&self) -> QrGroup {
        match self {
            Self::KnownOrder(g) => g.to_public(),
            Self::UnknownOrder(_) => self.clone(),
        }
    }

    pub fn is_element(&self, value: &BigUint) -> bool {
        match self {
            Self::KnownOrder(g) => g.is_element(value),
            Self::UnknownOrder(g) => g.is_element(value),
        }
    }

    /// Verified element construction; rejects values outside the group.
    /// For unknown-order groups residuosity cannot be decided, so the check
    /// is the unit-range one documented on [`QrGroupN::is_element`].
    pub fn element(&self, value: BigUint) -> Result<QrElement, GroupError> {
        if !self.is_element(&value) {
            return Err(GroupError::ElementOutsideGroup);
        }
        Ok(QrElement {
            group: self.clone(),
            value,
        })
    }

    /// Fast-path constructor: tags `value` without re-verifying membership.
    /// Callers must only pass values obtained from verified generation.
    pub fn element_unchecked(&self, value: BigUint) -> QrElement {
        QrElement {
            group: self.clone(),
            value,
        }
    }

    /// A uniformly random square, i.e. a random element of `QR_N`.
    pub fn create_random_element<R: RngCore>(&self, rng: &mut R) -> QrElement {
        let s = random_unit(rng, self.modulus());
        let value = (&s * &s) % self.modulus();
        QrElement {
            group: self.clone(),
            value,
        }
    }

    /// A fresh generator candidate. With known order the candidate is
    /// verified to generate the whole of `QR_N`; without it, a random square
    /// is returned, which generates with overwhelming probability for a
    /// special RSA modulus.
    pub fn create_generator<R: RngCore>(&self, rng: &mut R) -> QrElement {
        match self {
            Self::KnownOrder(g) => {
                // rejection-sample a full-order square the same way the
                // constructor does
                let mut candidate = self.create_random_element(rng);
                let p_prime = (&g.p - 1u8) / 2u8;
                let q_prime = (&g.q - 1u8) / 2u8;
                loop {
                    let v = &candidate.value;
                    if !v.is_one()
                        && !v.modpow(&p_prime, &g.modulus).is_one()
                        && !v.modpow(&q_prime, &g.modulus).is_one()
                    {
                        return candidate;
                    }
                    candidate = self.create_random_element(rng);
                }
            }
            Self::UnknownOrder(_) => self.create_random_element(rng),
        }
    }

    fn same_group(&self, other: &QrGroup) -> bool {
        self.modulus() == other.modulus()
    }
}

impl PartialEq for QrGroup {
    fn eq(&self, other: &Self) -> bool {
        self.modulus() == other.modulus()
    }
}

impl Eq for QrGroup {}

/// An element of a quadratic-residue group. The invariant that the value is
/// a quadratic residue is established at construction (`element` /
/// `create_random_element`) and not re-checked by the operations.
#[derive(Clone, Debug)]
pub struct QrElement {
    group: QrGroup,
    value: BigUint,
}

impl QrElement {
    pub fn value(&self) -> &BigUint {
        &self.value
    }

    pub fn group(&self) -> &QrGroup {
        &self.group
    }

    /// Re-tags the value into `group`, verifying the moduli agree. Used to
    /// hand signer-side elements to holders under a public handle.
    pub fn into_group(self, group: &QrGroup) -> Result<QrElement, GroupError> {
        if group.modulus() != self.group.modulus() {
            return Err(GroupError::MismatchedGroups);
        }
        Ok(QrElement {
            group: group.clone(),
            value: self.value,
        })
    }

    /// `self^exp` in the owning group. Negative exponents go through the
    /// modular inverse; known-order groups take the CRT path.
    pub fn mod_pow(&self, exp: &BigInt) -> Result<QrElement, GroupError> {
        if exp.is_negative() {
            return self.mod_inverse()?.mod_pow(&(-exp));
        }
        let e = exp.magnitude();
        let value = match &self.group {
            QrGroup::KnownOrder(g) => g.mod_pow(&self.value, e),
            QrGroup::UnknownOrder(g) => g.mod_pow(&self.value, e),
        };
        Ok(QrElement {
            group: self.group.clone(),
            value,
        })
    }

    pub fn multiply(&self, other: &QrElement) -> Result<QrElement, GroupError> {
        if !self.group.same_group(&other.group) {
            return Err(GroupError::MismatchedGroups);
        }
        let value = match &self.group {
            QrGroup::KnownOrder(g) => g.multiply(&self.value, &other.value),
            QrGroup::UnknownOrder(g) => g.multiply(&self.value, &other.value),
        };
        Ok(QrElement {
            group: self.group.clone(),
            value,
        })
    }

    pub fn mod_inverse(&self) -> Result<QrElement, GroupError> {
        let n = BigInt::from(self.group.modulus().clone());
        let inv = mod_inverse(&BigInt::from(self.value.clone()), &n)
            .ok_or(GroupError::NonInvertibleElement)?;
        Ok(QrElement {
            group: self.group.clone(),
            value: inv.to_biguint().ok_or(GroupError::NonInvertibleElement)?,
        })
    }

    /// Simultaneous multi-exponentiation `∏ bases[i]^exponents[i] mod N`,
    /// the workhorse of witness computation and proof verification.
    pub fn multi_base_exp(
        bases: &[QrElement],
        exponents: &[BigInt],
    ) -> Result<QrElement, GroupError> {
        if bases.len() != exponents.len() {
            return Err(GroupError::UnequalSizeBasesAndExponents(
                bases.len(),
                exponents.len(),
            ));
        }
        let first = bases.first().ok_or(GroupError::UnequalSizeBasesAndExponents(0, 0))?;
        for b in &bases[1..] {
            if !first.group.same_group(&b.group) {
                return Err(GroupError::MismatchedGroups);
            }
        }
        let powers = iter!(bases)
            .zip(iter!(exponents))
            .map(|(b, e)| b.mod_pow(e))
            .collect::<Result<Vec<_>, _>>()?;
        let mut acc = first.group.element_unchecked(BigUint::one());
        for p in &powers {
            acc = acc.multiply(p)?;
        }
        Ok(acc)
    }

    /// Big-endian sign-magnitude bytes for transcript hashing. The encoding
    /// is length-independent of the modulus, so both sides serialize
    /// identically.
    pub fn to_transcript_bytes(&self) -> Vec<u8> {
        self.value.to_bytes_be()
    }
}

impl PartialEq for QrElement {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value && self.group.same_group(&other.group)
    }
}

impl Eq for QrElement {}

impl Serialize for QrElement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (&self.value, self.group.modulus()).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for QrElement {
    /// Deserialization reconstructs an unknown-order handle only: wire data
    /// can never smuggle a factorization into the receiving side.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (value, modulus): (BigUint, BigUint) = Deserialize::deserialize(deserializer)?;
        if value >= modulus || value.is_zero() {
            return Err(D::Error::custom("element value outside [1, modulus)"));
        }
        Ok(QrElement {
            group: QrGroup::UnknownOrder(Arc::new(QrGroupN::new(modulus, None))),
            value,
        })
    }
}
