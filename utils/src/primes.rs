//! Miller-Rabin primality testing and (safe-)prime generation.

use crate::error::NumberTheoryError;
use num_bigint::{BigUint, RandBigInt};
use num_traits::{One, Zero};
use rand::RngCore;

/// Default certainty used for key generation: a composite survives with
/// probability at most `2^-80`.
pub const DEFAULT_PRIME_CERTAINTY: u32 = 80;

const SMALL_PRIMES: [u32; 30] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89,
    97, 101, 103, 107, 109, 113,
];

/// Miller-Rabin primality test. A `true` result is wrong with probability
/// at most `2^-certainty`; `false` results are always correct.
pub fn is_probable_prime(n: &BigUint, certainty: u32) -> bool {
    let two = BigUint::from(2u8);
    if n < &two {
        return false;
    }
    for sp in SMALL_PRIMES {
        let sp = BigUint::from(sp);
        if n == &sp {
            return true;
        }
        if (n % &sp).is_zero() {
            return false;
        }
    }
    // write n-1 = 2^s * d with d odd
    let n_minus_1 = n - 1u8;
    let s = n_minus_1.trailing_zeros().unwrap_or(0);
    let d = &n_minus_1 >> s;

    // each round has error probability at most 1/4
    let rounds = certainty.div_ceil(2);
    let mut rng = rand::thread_rng();
    'witness: for _ in 0..rounds {
        let a = rng.gen_biguint_range(&two, &n_minus_1);
        let mut x = a.modpow(&d, n);
        if x.is_one() || x == n_minus_1 {
            continue;
        }
        for _ in 0..s.saturating_sub(1) {
            x = x.modpow(&two, n);
            if x == n_minus_1 {
                continue 'witness;
            }
        }
        return false;
    }
    true
}

/// Samples a random probable prime with exactly `bit_length` bits.
pub fn generate_prime<R: RngCore>(
    rng: &mut R,
    bit_length: u64,
) -> Result<BigUint, NumberTheoryError> {
    if bit_length < 2 {
        return Err(NumberTheoryError::BitLengthTooSmall(bit_length));
    }
    loop {
        let mut candidate = rng.gen_biguint(bit_length);
        candidate.set_bit(bit_length - 1, true);
        candidate.set_bit(0, true);
        if is_probable_prime(&candidate, DEFAULT_PRIME_CERTAINTY) {
            return Ok(candidate);
        }
    }
}

/// Samples a safe prime `p = 2p' + 1` of exactly `bit_length` bits, returning
/// `(p, p')` with `p'` the Sophie Germain prime. Resamples `p'` until `p`
/// passes the primality test; unbounded in principle, bounded in practice by
/// the density of safe primes.
pub fn generate_safe_prime<R: RngCore>(
    rng: &mut R,
    bit_length: u64,
) -> Result<(BigUint, BigUint), NumberTheoryError> {
    if bit_length < 3 {
        return Err(NumberTheoryError::BitLengthTooSmall(bit_length));
    }
    loop {
        let p_prime = generate_prime(rng, bit_length - 1)?;
        let p = (&p_prime << 1u32) + 1u8;
        if p.bits() == bit_length && is_probable_prime(&p, DEFAULT_PRIME_CERTAINTY) {
            return Ok((p, p_prime));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn small_primes_and_composites() {
        for p in [2u32, 3, 5, 101, 7919, 104729] {
            assert!(is_probable_prime(&BigUint::from(p), 64), "{} is prime", p);
        }
        for c in [1u32, 4, 100, 7917, 104730, 3599 /* 59*61 */] {
            assert!(!is_probable_prime(&BigUint::from(c), 64), "{} is composite", c);
        }
    }

    #[test]
    fn carmichael_numbers_rejected() {
        for c in [561u32, 1105, 1729, 2465, 2821, 6601] {
            assert!(!is_probable_prime(&BigUint::from(c), 64));
        }
    }

    #[test]
    fn generated_prime_has_requested_size() {
        let mut rng = StdRng::seed_from_u64(0);
        let p = generate_prime(&mut rng, 128).unwrap();
        assert_eq!(p.bits(), 128);
        assert!(is_probable_prime(&p, 100));
    }

    #[test]
    fn safe_prime_structure() {
        let mut rng = StdRng::seed_from_u64(1);
        let (p, p_prime) = generate_safe_prime(&mut rng, 64).unwrap();
        assert_eq!(p.bits(), 64);
        assert_eq!(p, (&p_prime << 1u32) + 1u8);
        assert!(is_probable_prime(&p, 100));
        assert!(is_probable_prime(&p_prime, 100));
    }

    #[test]
    fn rejects_tiny_bit_lengths() {
        let mut rng = StdRng::seed_from_u64(2);
        assert_eq!(
            generate_prime(&mut rng, 1),
            Err(NumberTheoryError::BitLengthTooSmall(1))
        );
    }
}
