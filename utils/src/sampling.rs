//! Uniform sampling helpers over arbitrary-precision integers. All take the
//! caller's rng; protocol code is expected to pass a cryptographically
//! secure one.

use num_bigint::{BigUint, RandBigInt};
use num_integer::Integer;
use num_traits::One;
use rand::RngCore;

/// Uniform in `[0, 2^bit_length)`.
pub fn random_of_bit_length<R: RngCore>(rng: &mut R, bit_length: u64) -> BigUint {
    rng.gen_biguint(bit_length)
}

/// Uniform in `[low, high)`.
pub fn random_in_range<R: RngCore>(rng: &mut R, low: &BigUint, high: &BigUint) -> BigUint {
    rng.gen_biguint_range(low, high)
}

/// Uniform over the units of `Z_n`, by rejection.
pub fn random_unit<R: RngCore>(rng: &mut R, n: &BigUint) -> BigUint {
    loop {
        let candidate = rng.gen_biguint_range(&BigUint::one(), n);
        if candidate.gcd(n).is_one() {
            return candidate;
        }
    }
}
