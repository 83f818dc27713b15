//! Fiat-Shamir challenge derivation over an ordered context list.
//!
//! The context list is the binding contract between prover and verifier: the
//! same values, in the same protocol-fixed order, with the same byte
//! canonicalization, must hash to the same `l_H`-bit challenge on both
//! sides. Changing the canonicalization breaks interoperability, so every
//! entry is length-prefixed and integers travel as sign-tagged big-endian
//! magnitudes.

use digest::Digest;
use gs_crypto_utils::hashing_utils::hash_to_fixed_length_integer;
use num_bigint::{BigInt, BigUint, Sign};
use qr_groups::QrElement;

#[derive(Clone, Debug, Default)]
pub struct ChallengeContext {
    entries: Vec<Vec<u8>>,
}

impl ChallengeContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_bytes(&mut self, bytes: &[u8]) -> &mut Self {
        self.entries.push(bytes.to_vec());
        self
    }

    pub fn add_unsigned(&mut self, value: &BigUint) -> &mut Self {
        let mut entry = vec![1u8];
        entry.extend_from_slice(&value.to_bytes_be());
        self.entries.push(entry);
        self
    }

    pub fn add_integer(&mut self, value: &BigInt) -> &mut Self {
        let tag = match value.sign() {
            Sign::Minus => 0u8,
            _ => 1u8,
        };
        let mut entry = vec![tag];
        entry.extend_from_slice(&value.magnitude().to_bytes_be());
        self.entries.push(entry);
        self
    }

    pub fn add_element(&mut self, element: &QrElement) -> &mut Self {
        self.entries.push(element.to_transcript_bytes());
        self
    }

    pub fn add_elements<'a>(
        &mut self,
        elements: impl IntoIterator<Item = &'a QrElement>,
    ) -> &mut Self {
        for e in elements {
            self.add_element(e);
        }
        self
    }

    /// The canonical byte string: each entry prefixed with its big-endian
    /// `u64` length, concatenated in insertion order.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for entry in &self.entries {
            out.extend_from_slice(&(entry.len() as u64).to_be_bytes());
            out.extend_from_slice(entry);
        }
        out
    }

    /// Hashes the context to an `l_h`-bit challenge.
    pub fn challenge<D: Digest>(&self, l_h: u64) -> BigUint {
        hash_to_fixed_length_integer::<D>(&self.to_bytes(), l_h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sha2::Sha256;

    #[test]
    fn order_is_binding() {
        let mut a = ChallengeContext::new();
        a.add_unsigned(&BigUint::from(5u8))
            .add_unsigned(&BigUint::from(7u8));
        let mut b = ChallengeContext::new();
        b.add_unsigned(&BigUint::from(7u8))
            .add_unsigned(&BigUint::from(5u8));
        assert_ne!(a.challenge::<Sha256>(128), b.challenge::<Sha256>(128));
    }

    #[test]
    fn length_prefix_prevents_boundary_shifts() {
        // "ab" + "c" must not collide with "a" + "bc"
        let mut a = ChallengeContext::new();
        a.add_bytes(b"ab").add_bytes(b"c");
        let mut b = ChallengeContext::new();
        b.add_bytes(b"a").add_bytes(b"bc");
        assert_ne!(a.challenge::<Sha256>(128), b.challenge::<Sha256>(128));
    }

    #[test]
    fn sign_is_part_of_the_encoding() {
        let mut a = ChallengeContext::new();
        a.add_integer(&BigInt::from(42));
        let mut b = ChallengeContext::new();
        b.add_integer(&BigInt::from(-42));
        assert_ne!(a.challenge::<Sha256>(128), b.challenge::<Sha256>(128));
    }

    #[test]
    fn challenge_fits_bit_length() {
        let mut ctx = ChallengeContext::new();
        ctx.add_bytes(b"nonce");
        assert!(ctx.challenge::<Sha256>(80).bits() <= 80);
    }
}
