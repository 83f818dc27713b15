//! Keys and setup parameters for the graph-signature scheme.
//!
//! Key generation produces a special RSA modulus `N = p*q` from two safe
//! primes, the CRT-accelerated group [`QrGroupPq`] over it, and the public
//! bases `S, Z, R_0, {R_i}, {R_{i,j}}`, every one of them a power of `S`
//! whose discrete log the signer retains so the group-setup proof can later
//! show the key was formed correctly.

use crate::element::{QrElement, QrGroup};
use crate::error::GroupError;
use crate::group_pq::QrGroupPq;
use gs_crypto_utils::primes::generate_safe_prime;
use gs_crypto_utils::sampling::random_in_range;
use num_bigint::{BigInt, BigUint};
use num_traits::Zero;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

/// Protocol-fixed bit-length security parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameters {
    /// Modulus bit length
    pub l_n: u64,
    /// Message (exponent) bit length
    pub l_m: u64,
    /// Signature exponent `e` bit length
    pub l_e: u64,
    /// Interval width for `e`
    pub l_prime_e: u64,
    /// Blinding exponent `v` bit length
    pub l_v: u64,
    /// Statistical zero-knowledge margin
    pub l_statzk: u64,
    /// Fiat-Shamir challenge bit length
    pub l_h: u64,
    /// Primality-test error exponent
    pub l_pt: u64,
}

impl Parameters {
    /// Production-scale parameters with a 2048-bit modulus.
    pub fn default_2048() -> Self {
        Self::with_modulus_length(2048)
    }

    /// Test-scale parameters with a 512-bit modulus. Not secure; keeps key
    /// generation fast in tests.
    pub fn test_512() -> Self {
        Self::with_modulus_length(512)
    }

    /// Derives the dependent lengths from the modulus length the way the
    /// protocol's soundness argument sizes them: `e` must dominate the
    /// challenge-times-message product and `v` must statistically hide the
    /// modulus-sized term.
    pub fn with_modulus_length(l_n: u64) -> Self {
        let l_m = 256;
        let l_statzk = 80;
        let l_h = 256;
        let l_e = l_m + l_statzk + l_h + 5;
        let l_prime_e = l_statzk + l_h + 1;
        let l_v = l_n + l_m + l_statzk + l_h + 3;
        Self {
            l_n,
            l_m,
            l_e,
            l_prime_e,
            l_v,
            l_statzk,
            l_h,
            l_pt: 80,
        }
    }

    /// Bit length of the witness randomness for a secret of `l_x` bits.
    pub fn witness_length(&self, l_x: u64) -> u64 {
        l_x + self.l_statzk + self.l_h + 1
    }

    /// Soundness bound exponent for the response to a secret of `l_x` bits:
    /// responses must lie in `(-2^L, 2^L)`.
    pub fn response_bound(&self, l_x: u64) -> u64 {
        l_x + self.l_statzk + self.l_h + 2
    }
}

/// `N = p*q` with `p = 2p' + 1`, `q = 2q' + 1` safe primes. Created once at
/// key-generation time and owned by the key pair; the factors are zeroized
/// on drop.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpecialRsaModulus {
    pub n: BigUint,
    pub p: BigUint,
    pub q: BigUint,
    pub p_prime: BigUint,
    pub q_prime: BigUint,
}

impl SpecialRsaModulus {
    /// Samples two distinct safe primes of `l_n / 2` bits each.
    pub fn generate<R: RngCore>(rng: &mut R, l_n: u64) -> Result<Self, GroupError> {
        let half = l_n / 2;
        let (p, p_prime) = generate_safe_prime(rng, half)?;
        let (q, q_prime) = loop {
            let (q, q_prime) = generate_safe_prime(rng, half)?;
            if q != p {
                break (q, q_prime);
            }
        };
        Ok(Self {
            n: &p * &q,
            p,
            q,
            p_prime,
            q_prime,
        })
    }
}

impl Zeroize for SpecialRsaModulus {
    fn zeroize(&mut self) {
        // num-bigint offers no in-place clearing; dropping the secret limbs
        // by overwriting with zero is the closest available
        self.p = BigUint::zero();
        self.q = BigUint::zero();
        self.p_prime = BigUint::zero();
        self.q_prime = BigUint::zero();
    }
}

/// The signer's secret: the modulus factorization and the discrete logs of
/// every public base with respect to `S`.
#[derive(Clone, Debug)]
pub struct SignerSecretKey {
    pub modulus: SpecialRsaModulus,
    pub x_z: BigUint,
    pub x_r_0: BigUint,
    pub x_r_vertex: Vec<BigUint>,
    pub x_r_edge: Vec<BigUint>,
}

impl Zeroize for SignerSecretKey {
    fn zeroize(&mut self) {
        self.modulus.zeroize();
        self.x_z = BigUint::zero();
        self.x_r_0 = BigUint::zero();
        for x in self.x_r_vertex.iter_mut().chain(self.x_r_edge.iter_mut()) {
            *x = BigUint::zero();
        }
    }
}

impl Drop for SignerSecretKey {
    fn drop(&mut self) {
        self.zeroize();
    }
}

/// The signer's public key. All elements are tagged with the public
/// (unknown-order) group handle, so the key can be shared with holders and
/// verifiers as-is.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignerPublicKey {
    pub params: Parameters,
    pub modulus: BigUint,
    pub base_s: QrElement,
    pub base_z: QrElement,
    pub base_r_0: QrElement,
    pub bases_r_vertex: Vec<QrElement>,
    pub bases_r_edge: Vec<QrElement>,
}

impl SignerPublicKey {
    /// All bases in the challenge-context order fixed by the protocol:
    /// `Z, R_0, R_1, …, R_{i,j}, …`.
    pub fn proven_bases(&self) -> Vec<QrElement> {
        let mut bases = Vec::with_capacity(2 + self.bases_r_vertex.len() + self.bases_r_edge.len());
        bases.push(self.base_z.clone());
        bases.push(self.base_r_0.clone());
        bases.extend(self.bases_r_vertex.iter().cloned());
        bases.extend(self.bases_r_edge.iter().cloned());
        bases
    }
}

/// Key pair plus the signer-side group handle. The known-order handle lives
/// here and in [`SignerSecretKey::modulus`] only.
#[derive(Debug)]
pub struct KeyPair {
    pub secret: SignerSecretKey,
    pub public: SignerPublicKey,
    /// CRT-accelerated handle for signing and signer-side proving
    pub signing_group: QrGroup,
}

impl KeyPair {
    /// Generates the full key: safe-prime modulus, generator `S` of `QR_N`,
    /// and bases `Z, R_0, {R_i}, {R_{i,j}}` as random powers of `S`.
    pub fn generate<R: RngCore>(
        rng: &mut R,
        params: Parameters,
        vertex_base_count: usize,
        edge_base_count: usize,
    ) -> Result<Self, GroupError> {
        let modulus = SpecialRsaModulus::generate(rng, params.l_n)?;
        let signing_group = QrGroupPq::new(
            rng,
            &modulus.p,
            &modulus.q,
            &modulus.p_prime,
            &modulus.q_prime,
        )?;
        let order = signing_group.order()?.clone();
        let public_group = signing_group.to_public();

        let s = signing_group.generator()?;
        let two = BigUint::from(2u8);
        let base_from_log = |rng: &mut R| -> Result<(BigUint, QrElement), GroupError> {
            let x = random_in_range(rng, &two, &order);
            let base = s.mod_pow(&BigInt::from(x.clone()))?;
            Ok((x, base.into_group(&public_group)?))
        };

        let (x_z, base_z) = base_from_log(rng)?;
        let (x_r_0, base_r_0) = base_from_log(rng)?;
        let mut x_r_vertex = Vec::with_capacity(vertex_base_count);
        let mut bases_r_vertex = Vec::with_capacity(vertex_base_count);
        for _ in 0..vertex_base_count {
            let (x, b) = base_from_log(rng)?;
            x_r_vertex.push(x);
            bases_r_vertex.push(b);
        }
        let mut x_r_edge = Vec::with_capacity(edge_base_count);
        let mut bases_r_edge = Vec::with_capacity(edge_base_count);
        for _ in 0..edge_base_count {
            let (x, b) = base_from_log(rng)?;
            x_r_edge.push(x);
            bases_r_edge.push(b);
        }

        let public = SignerPublicKey {
            modulus: modulus.n.clone(),
            base_s: s.into_group(&public_group)?,
            base_z,
            base_r_0,
            bases_r_vertex,
            bases_r_edge,
            params,
        };
        Ok(Self {
            secret: SignerSecretKey {
                modulus,
                x_z,
                x_r_0,
                x_r_vertex,
                x_r_edge,
            },
            public,
            signing_group,
        })
    }

    /// The signer's secret discrete logs in the same order as
    /// [`SignerPublicKey::proven_bases`].
    pub fn base_logs(&self) -> Vec<BigUint> {
        let mut logs = Vec::with_capacity(
            2 + self.secret.x_r_vertex.len() + self.secret.x_r_edge.len(),
        );
        logs.push(self.secret.x_z.clone());
        logs.push(self.secret.x_r_0.clone());
        logs.extend(self.secret.x_r_vertex.iter().cloned());
        logs.extend(self.secret.x_r_edge.iter().cloned());
        logs
    }
}
