//! Quadratic-residue group with known factorization: the CRT fast path.

use crate::element::QrGroup;
use crate::error::GroupError;
use gs_crypto_utils::crt::{crt_combine_precomputed, CrtCoefficients};
use gs_crypto_utils::primes::{is_probable_prime, DEFAULT_PRIME_CERTAINTY};
use gs_crypto_utils::sampling::random_unit;
use num_bigint::BigUint;
use num_traits::One;
use rand::RngCore;
use std::sync::Arc;

/// `QR_N` for `N = p*q` a product of safe primes, held together with the
/// factorization. Every exponentiation and multiplication is computed as two
/// half-width operations mod `p` and mod `q` recombined through precomputed
/// Bézout coefficients, roughly a 4x speedup over full-width exponentiation.
///
/// A value of this type answers `order()` and must therefore never cross to
/// verifier-side code; export [`QrGroupPq::to_public`] instead.
#[derive(Clone, Debug)]
pub struct QrGroupPq {
    pub(crate) modulus: BigUint,
    pub(crate) p: BigUint,
    pub(crate) q: BigUint,
    /// `p' * q'`, the order of `QR_N`
    pub(crate) order: BigUint,
    /// Fermat exponents `p - 1` and `q - 1` for component-wise reduction
    pub(crate) exp_p: BigUint,
    pub(crate) exp_q: BigUint,
    pub(crate) crt: CrtCoefficients,
    pub(crate) generator: BigUint,
}

impl QrGroupPq {
    /// Builds the group from safe-prime factors `p = 2p' + 1`, `q = 2q' + 1`
    /// and picks a generator of `QR_N`. Fails if the factors are equal, not
    /// coprime, or fail the primality test.
    pub fn new<R: RngCore>(
        rng: &mut R,
        p: &BigUint,
        q: &BigUint,
        p_prime: &BigUint,
        q_prime: &BigUint,
    ) -> Result<QrGroup, GroupError> {
        for f in [p, q, p_prime, q_prime] {
            if !is_probable_prime(f, DEFAULT_PRIME_CERTAINTY) {
                return Err(GroupError::FactorNotPrime);
            }
        }
        let crt = CrtCoefficients::new(p, q)?;
        let mut group = Self {
            modulus: p * q,
            p: p.clone(),
            q: q.clone(),
            order: p_prime * q_prime,
            exp_p: p - 1u8,
            exp_q: q - 1u8,
            crt,
            generator: BigUint::one(),
        };
        group.generator = group.sample_generator(rng, p_prime, q_prime);
        Ok(QrGroup::KnownOrder(Arc::new(group)))
    }

    /// A handle to the same group that carries the modulus only. This is the
    /// only representation that may be handed to holders and verifiers.
    pub fn to_public(&self) -> QrGroup {
        QrGroup::UnknownOrder(Arc::new(crate::group_n::QrGroupN::new(
            self.modulus.clone(),
            Some(self.generator.clone()),
        )))
    }

    pub fn order(&self) -> &BigUint {
        &self.order
    }

    /// Squares of random units generate `QR_N` unless they land in one of the
    /// two prime-order subgroups; both are rejected explicitly.
    fn sample_generator<R: RngCore>(
        &self,
        rng: &mut R,
        p_prime: &BigUint,
        q_prime: &BigUint,
    ) -> BigUint {
        loop {
            let s = random_unit(rng, &self.modulus);
            let candidate = (&s * &s) % &self.modulus;
            if candidate.is_one() {
                continue;
            }
            if candidate.modpow(p_prime, &self.modulus).is_one()
                || candidate.modpow(q_prime, &self.modulus).is_one()
            {
                continue;
            }
            return candidate;
        }
    }

    /// `base^exp mod N` through the two half-width components. The exponent
    /// is reduced mod `p - 1` and `q - 1` before exponentiating.
    pub(crate) fn mod_pow(&self, base: &BigUint, exp: &BigUint) -> BigUint {
        let xp = (base % &self.p).modpow(&(exp % &self.exp_p), &self.p);
        let xq = (base % &self.q).modpow(&(exp % &self.exp_q), &self.q);
        crt_combine_precomputed(&xp, &xq, &self.crt)
    }

    /// `a * b mod N` recombined from the two modular products.
    pub(crate) fn multiply(&self, a: &BigUint, b: &BigUint) -> BigUint {
        let xp = ((a % &self.p) * (b % &self.p)) % &self.p;
        let xq = ((a % &self.q) * (b % &self.q)) % &self.q;
        crt_combine_precomputed(&xp, &xq, &self.crt)
    }

    /// Membership in `QR_N` checked through the factorization.
    pub(crate) fn is_element(&self, value: &BigUint) -> bool {
        gs_crypto_utils::jacobi::is_quadratic_residue(value, &self.p, &self.q).unwrap_or(false)
    }
}
