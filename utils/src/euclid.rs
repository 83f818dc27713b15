//! Extended Euclidean algorithm over arbitrary-precision integers.

use crate::error::NumberTheoryError;
use num_bigint::BigInt;
use num_traits::{One, Signed, Zero};

/// For positive `a` and `b`, returns `(d, s, t)` with `d = gcd(a, b) = s*a + t*b`.
pub fn extended_euclid(a: &BigInt, b: &BigInt) -> Result<(BigInt, BigInt, BigInt), NumberTheoryError> {
    if !a.is_positive() || !b.is_positive() {
        return Err(NumberTheoryError::NonPositiveArgument);
    }
    let (mut old_r, mut r) = (a.clone(), b.clone());
    let (mut old_s, mut s) = (BigInt::one(), BigInt::zero());
    let (mut old_t, mut t) = (BigInt::zero(), BigInt::one());
    while !r.is_zero() {
        let q = &old_r / &r;
        let tmp = &old_r - &q * &r;
        old_r = core::mem::replace(&mut r, tmp);
        let tmp = &old_s - &q * &s;
        old_s = core::mem::replace(&mut s, tmp);
        let tmp = &old_t - &q * &t;
        old_t = core::mem::replace(&mut t, tmp);
    }
    Ok((old_r, old_s, old_t))
}

/// Inverse of `a` modulo `m`, if `gcd(a, m) = 1`. Result is in `[0, m)`.
pub fn mod_inverse(a: &BigInt, m: &BigInt) -> Option<BigInt> {
    if !m.is_positive() {
        return None;
    }
    let a_red = ((a % m) + m) % m;
    if a_red.is_zero() {
        return None;
    }
    let (d, s, _) = extended_euclid(&a_red, m).ok()?;
    if !d.is_one() {
        return None;
    }
    Some(((s % m) + m) % m)
}
