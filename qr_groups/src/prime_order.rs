//! Prime-order subgroup of `Z*_p`, used for the commitment group.

use crate::error::GroupError;
use gs_crypto_utils::euclid::mod_inverse;
use gs_crypto_utils::primes::{generate_prime, is_probable_prime, DEFAULT_PRIME_CERTAINTY};
use gs_crypto_utils::sampling::random_in_range;
use num_bigint::{BigInt, BigUint, RandBigInt};
use num_integer::Integer;
use num_traits::{One, Signed, Zero};
use rand::RngCore;
use std::sync::Arc;

/// Subgroup of prime order `q'` inside `Z*_p` with `q' | p - 1`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrimeOrderGroup {
    modulus: BigUint,
    order: BigUint,
    generator: BigUint,
}

impl PrimeOrderGroup {
    /// Validates `p` and `q'` prime and `q' | p - 1`, then constructs a
    /// generator by exponentiating random units to the cofactor until a
    /// non-identity element comes out.
    pub fn new<R: RngCore>(
        rng: &mut R,
        p: &BigUint,
        q_prime: &BigUint,
    ) -> Result<Arc<Self>, GroupError> {
        if !is_probable_prime(p, DEFAULT_PRIME_CERTAINTY)
            || !is_probable_prime(q_prime, DEFAULT_PRIME_CERTAINTY)
        {
            return Err(GroupError::FactorNotPrime);
        }
        let p_minus_1 = p - 1u8;
        if !(&p_minus_1 % q_prime).is_zero() {
            return Err(GroupError::OrderDoesNotDivideModulusMinusOne);
        }
        let cofactor = &p_minus_1 / q_prime;
        let generator = loop {
            let h = random_in_range(rng, &BigUint::from(2u8), &p_minus_1);
            let g = h.modpow(&cofactor, p);
            if !g.is_one() {
                break g;
            }
        };
        Ok(Arc::new(Self {
            modulus: p.clone(),
            order: q_prime.clone(),
            generator,
        }))
    }

    /// Generates a fresh group: a random prime order `q'` of `order_bits`
    /// bits and a modulus `p = k*q' + 1` of `modulus_bits` bits found by
    /// resampling the cofactor `k`.
    pub fn generate<R: RngCore>(
        rng: &mut R,
        modulus_bits: u64,
        order_bits: u64,
    ) -> Result<Arc<Self>, GroupError> {
        let q_prime = generate_prime(rng, order_bits)?;
        loop {
            let k = rng.gen_biguint(modulus_bits - order_bits);
            if k.is_zero() {
                continue;
            }
            let p = &k * &q_prime + 1u8;
            if p.bits() == modulus_bits && is_probable_prime(&p, DEFAULT_PRIME_CERTAINTY) {
                return Self::new(rng, &p, &q_prime);
            }
        }
    }

    pub fn modulus(&self) -> &BigUint {
        &self.modulus
    }

    pub fn order(&self) -> &BigUint {
        &self.order
    }

    pub fn generator(self: &Arc<Self>) -> PrimeOrderElement {
        PrimeOrderElement {
            group: self.clone(),
            value: self.generator.clone(),
        }
    }

    /// Membership: a unit whose `q'`-th power is the identity.
    pub fn is_element(&self, value: &BigUint) -> bool {
        !value.is_zero()
            && value < &self.modulus
            && value.gcd(&self.modulus).is_one()
            && value.modpow(&self.order, &self.modulus).is_one()
    }

    pub fn element(self: &Arc<Self>, value: BigUint) -> Result<PrimeOrderElement, GroupError> {
        if !self.is_element(&value) {
            return Err(GroupError::ElementOutsideGroup);
        }
        Ok(PrimeOrderElement {
            group: self.clone(),
            value,
        })
    }

    pub fn create_random_element<R: RngCore>(self: &Arc<Self>, rng: &mut R) -> PrimeOrderElement {
        let e = random_in_range(rng, &BigUint::one(), &self.order);
        PrimeOrderElement {
            group: self.clone(),
            value: self.generator.modpow(&e, &self.modulus),
        }
    }
}

/// Element of a [`PrimeOrderGroup`]; exponents are reduced modulo the group
/// order before exponentiation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrimeOrderElement {
    group: Arc<PrimeOrderGroup>,
    value: BigUint,
}

impl PrimeOrderElement {
    pub fn value(&self) -> &BigUint {
        &self.value
    }

    pub fn mod_pow(&self, exp: &BigInt) -> PrimeOrderElement {
        let order = BigInt::from(self.group.order.clone());
        let e = (((exp % &order) + &order) % &order)
            .to_biguint()
            .unwrap_or_default();
        PrimeOrderElement {
            group: self.group.clone(),
            value: self.value.modpow(&e, &self.group.modulus),
        }
    }

    pub fn multiply(&self, other: &PrimeOrderElement) -> Result<PrimeOrderElement, GroupError> {
        if self.group.modulus != other.group.modulus {
            return Err(GroupError::MismatchedGroups);
        }
        Ok(PrimeOrderElement {
            group: self.group.clone(),
            value: (&self.value * &other.value) % &self.group.modulus,
        })
    }

    pub fn mod_inverse(&self) -> Result<PrimeOrderElement, GroupError> {
        let n = BigInt::from(self.group.modulus.clone());
        let inv = mod_inverse(&BigInt::from(self.value.clone()), &n)
            .ok_or(GroupError::NonInvertibleElement)?;
        debug_assert!(!inv.is_negative());
        Ok(PrimeOrderElement {
            group: self.group.clone(),
            value: inv.to_biguint().ok_or(GroupError::NonInvertibleElement)?,
        })
    }
}
