//! Chinese Remainder Theorem recombination, with a precomputed-coefficient
//! variant for the common case of reusing one `(p, q)` pair many times.

use crate::error::NumberTheoryError;
use crate::euclid::extended_euclid;
use num_bigint::{BigInt, BigUint};
use num_traits::One;

/// Bézout coefficients for a fixed coprime pair `(p, q)`: `one_p ≡ 1 (mod p)`,
/// `≡ 0 (mod q)` and symmetrically for `one_q`. Computing these once turns
/// every later recombination into two multiplications and one reduction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CrtCoefficients {
    pub one_p: BigUint,
    pub one_q: BigUint,
    pub modulus: BigUint,
}

impl CrtCoefficients {
    pub fn new(p: &BigUint, q: &BigUint) -> Result<Self, NumberTheoryError> {
        let (d, s, t) = extended_euclid(&BigInt::from(p.clone()), &BigInt::from(q.clone()))?;
        if p == q || !d.is_one() {
            return Err(NumberTheoryError::FactorsNotCoprime);
        }
        let n = BigInt::from(p * q);
        // reduced into [0, n), so the magnitude is the value itself
        let one_p = ((t * BigInt::from(q.clone())) % &n + &n) % &n;
        let one_q = ((s * BigInt::from(p.clone())) % &n + &n) % &n;
        Ok(Self {
            one_p: one_p.magnitude().clone(),
            one_q: one_q.magnitude().clone(),
            modulus: p * q,
        })
    }
}

/// Recombines `x ≡ xp (mod p)`, `x ≡ xq (mod q)` into the unique
/// `x mod (p*q)`. Fails if `p = q` or the factors are not coprime.
pub fn crt_combine(
    xp: &BigUint,
    p: &BigUint,
    xq: &BigUint,
    q: &BigUint,
) -> Result<BigUint, NumberTheoryError> {
    let coeffs = CrtCoefficients::new(p, q)?;
    Ok(crt_combine_precomputed(xp, xq, &coeffs))
}

/// Recombination with precomputed Bézout coefficients; infallible since the
/// coefficients witness that the factors were coprime.
pub fn crt_combine_precomputed(xp: &BigUint, xq: &BigUint, coeffs: &CrtCoefficients) -> BigUint {
    (xp * &coeffs.one_p + xq * &coeffs.one_q) % &coeffs.modulus
}
