//! Quadratic-residue group with unknown factorization: the verifier-side
//! instantiation.

use num_bigint::BigUint;
use num_traits::{One, Zero};

/// `QR_N` known through the modulus alone. All arithmetic is full-width
/// modular arithmetic; the order is not merely hidden but uncomputable
/// without factoring `N`, which is what the holder's privacy rests on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QrGroupN {
    pub(crate) modulus: BigUint,
    /// Known for groups distributed with key material; absent for groups
    /// reconstructed from serialized elements.
    pub(crate) generator: Option<BigUint>,
}

impl QrGroupN {
    pub fn new(modulus: BigUint, generator: Option<BigUint>) -> Self {
        Self { modulus, generator }
    }

    pub(crate) fn mod_pow(&self, base: &BigUint, exp: &BigUint) -> BigUint {
        base.modpow(exp, &self.modulus)
    }

    pub(crate) fn multiply(&self, a: &BigUint, b: &BigUint) -> BigUint {
        (a * b) % &self.modulus
    }

    /// Quadratic residuosity is undecidable here; the check is limited to the
    /// value being a unit in the right range, per the constructor contract
    /// that elements are only created through verified generation.
    pub(crate) fn is_element(&self, value: &BigUint) -> bool {
        use num_integer::Integer;
        !value.is_zero() && value < &self.modulus && value.gcd(&self.modulus).is_one()
    }
}
