//! Jacobi symbol via quadratic reciprocity, and the quadratic-residue test
//! for moduli with known factorization.

use crate::error::NumberTheoryError;
use num_bigint::{BigInt, BigUint};
use num_traits::{One, Signed, Zero};

/// Jacobi symbol `(a/n)` for odd positive `n`. Returns `-1`, `0` or `1`.
///
/// Implements the binary quadratic-reciprocity algorithm: strip factors of
/// two from `a` (each flips the sign when `n ≡ 3, 5 (mod 8)`), then swap
/// `a` and `n` (flipping the sign when both are `≡ 3 (mod 4)`) and reduce.
pub fn jacobi_symbol(a: &BigInt, n: &BigInt) -> Result<i8, NumberTheoryError> {
    if !n.is_positive() || (n % 2u8).is_zero() {
        return Err(NumberTheoryError::EvenModulus);
    }
    let mut a = ((a % n) + n) % n;
    let mut n = n.clone();
    let mut sign = 1i8;
    let three = BigInt::from(3u8);
    let five = BigInt::from(5u8);
    while !a.is_zero() {
        while (&a % 2u8).is_zero() {
            a /= 2u8;
            let n_mod_8 = &n % 8u8;
            if n_mod_8 == three || n_mod_8 == five {
                sign = -sign;
            }
        }
        core::mem::swap(&mut a, &mut n);
        if &a % 4u8 == three && &n % 4u8 == three {
            sign = -sign;
        }
        a %= &n;
    }
    if n.is_one() {
        Ok(sign)
    } else {
        Ok(0)
    }
}

/// Whether `a` is (the canonical representative of) a quadratic residue
/// modulo `n = p*q`, given the factorization. `a` must lie in
/// `(0, (n-1)/2]` and have Jacobi symbol `1` with respect to both factors.
pub fn is_quadratic_residue(
    a: &BigUint,
    p: &BigUint,
    q: &BigUint,
) -> Result<bool, NumberTheoryError> {
    let n = p * q;
    if a.is_zero() || a > &((&n - 1u8) / 2u8) {
        return Ok(false);
    }
    let a = BigInt::from(a.clone());
    Ok(jacobi_symbol(&a, &BigInt::from(p.clone()))? == 1
        && jacobi_symbol(&a, &BigInt::from(q.clone()))? == 1)
}
