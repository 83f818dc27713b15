//! Hashing to fixed-bit-length integers, used for Fiat-Shamir challenges.

use digest::Digest;
use num_bigint::BigUint;

/// Hashes `bytes` to a non-negative integer of at most `bit_length` bits.
///
/// If one digest output is too short, further blocks `D(i || bytes)` for a
/// big-endian `u32` counter `i = 1, 2, …` are appended, and the result is
/// truncated to exactly `bit_length` bits. The construction is deterministic
/// in `bytes` alone, which is what makes independently built prover and
/// verifier transcripts interoperable.
pub fn hash_to_fixed_length_integer<D: Digest>(bytes: &[u8], bit_length: u64) -> BigUint {
    let needed_bytes = bit_length.div_ceil(8) as usize;
    let mut out = D::digest(bytes).to_vec();
    let mut counter = 1u32;
    while out.len() < needed_bytes {
        let mut hasher = D::new();
        hasher.update(counter.to_be_bytes());
        hasher.update(bytes);
        out.extend_from_slice(&hasher.finalize());
        counter += 1;
    }
    out.truncate(needed_bytes);
    // clear the excess high bits of the leading byte
    let excess = (needed_bytes as u64) * 8 - bit_length;
    if excess > 0 {
        out[0] &= 0xff >> excess;
    }
    BigUint::from_bytes_be(&out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use blake2::Blake2b512;
    use sha2::Sha256;

    #[test]
    fn respects_bit_length() {
        for l in [1u64, 7, 8, 80, 160, 256, 521, 1024] {
            let h = hash_to_fixed_length_integer::<Sha256>(b"test input", l);
            assert!(h.bits() <= l, "l={} bits={}", l, h.bits());
        }
    }

    #[test]
    fn deterministic_and_input_sensitive() {
        let a = hash_to_fixed_length_integer::<Blake2b512>(b"abc", 256);
        let b = hash_to_fixed_length_integer::<Blake2b512>(b"abc", 256);
        let c = hash_to_fixed_length_integer::<Blake2b512>(b"abd", 256);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn extends_past_one_digest_block() {
        let h = hash_to_fixed_length_integer::<Sha256>(b"long challenge", 1024);
        assert!(h.bits() > 512);
    }
}
