//! Graph-signature issuance and verification: `(A, e, v)` over the encoded
//! vertex and edge exponents, `A = Q^{e^{-1} mod p'q'}`.

use crate::element::QrElement;
use crate::error::GroupError;
use crate::setup::{KeyPair, Parameters, SignerPublicKey};
use gs_crypto_utils::euclid::mod_inverse;
use gs_crypto_utils::primes::is_probable_prime;
use gs_crypto_utils::sampling::random_of_bit_length;
use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{One, Zero};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

/// A graph mapped to integer exponents: the master secret `m_0`, one
/// exponent per encoded vertex and one per encoded edge, aligned with the
/// key's `R_0`, `{R_i}` and `{R_{i,j}}` bases. The encoding itself (labels,
/// prime representatives) is an external collaborator's concern.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedGraph {
    pub m_0: BigUint,
    pub vertices: Vec<BigUint>,
    pub edges: Vec<BigUint>,
}

impl EncodedGraph {
    /// Random `l_m`-bit exponents, for tests and benchmarks.
    pub fn random<R: RngCore>(
        rng: &mut R,
        params: &Parameters,
        vertex_count: usize,
        edge_count: usize,
    ) -> Self {
        Self {
            m_0: random_of_bit_length(rng, params.l_m),
            vertices: (0..vertex_count)
                .map(|_| random_of_bit_length(rng, params.l_m))
                .collect(),
            edges: (0..edge_count)
                .map(|_| random_of_bit_length(rng, params.l_m))
                .collect(),
        }
    }

    /// Exponents in the protocol-fixed order `m_0, m_1, …, m_{i,j}, …`.
    pub fn exponents(&self) -> Vec<BigInt> {
        let mut exps = Vec::with_capacity(1 + self.vertices.len() + self.edges.len());
        exps.push(BigInt::from(self.m_0.clone()));
        exps.extend(self.vertices.iter().cloned().map(BigInt::from));
        exps.extend(self.edges.iter().cloned().map(BigInt::from));
        exps
    }
}

/// The message bases `R_0, R_1, …, R_{i,j}, …` matching
/// [`EncodedGraph::exponents`]. Fails if the graph needs more bases than the
/// key provides.
pub fn message_bases(
    pk: &SignerPublicKey,
    graph: &EncodedGraph,
) -> Result<Vec<QrElement>, GroupError> {
    if graph.vertices.len() > pk.bases_r_vertex.len() {
        return Err(GroupError::MessageCountMismatch(
            graph.vertices.len(),
            pk.bases_r_vertex.len(),
        ));
    }
    if graph.edges.len() > pk.bases_r_edge.len() {
        return Err(GroupError::MessageCountMismatch(
            graph.edges.len(),
            pk.bases_r_edge.len(),
        ));
    }
    let mut bases = Vec::with_capacity(1 + graph.vertices.len() + graph.edges.len());
    bases.push(pk.base_r_0.clone());
    bases.extend(pk.bases_r_vertex[..graph.vertices.len()].iter().cloned());
    bases.extend(pk.bases_r_edge[..graph.edges.len()].iter().cloned());
    Ok(bases)
}

/// A Camenisch-Lysyanskaya signature over an encoded graph.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSignature {
    pub a: QrElement,
    pub e: BigUint,
    pub v: BigUint,
}

impl GraphSignature {
    /// `Z == A^e * S^v * R_0^{m_0} * ∏ R_i^{m_i} * ∏ R_{i,j}^{m_{i,j}}`.
    pub fn verify(&self, pk: &SignerPublicKey, graph: &EncodedGraph) -> Result<bool, GroupError> {
        let mut bases = vec![self.a.clone(), pk.base_s.clone()];
        bases.extend(message_bases(pk, graph)?);
        let mut exps = vec![BigInt::from(self.e.clone()), BigInt::from(self.v.clone())];
        exps.extend(graph.exponents());
        let recomputed = QrElement::multi_base_exp(&bases, &exps)?;
        Ok(recomputed.value() == pk.base_z.value())
    }
}

/// Signer-side issuance artifacts: `Q` and the inverted exponent `d`, kept
/// for the signing-Q-correctness proof and zeroized afterwards.
#[derive(Clone, Debug)]
pub struct PreSignature {
    pub q: QrElement,
    pub d: BigUint,
}

impl Zeroize for PreSignature {
    fn zeroize(&mut self) {
        self.d = BigUint::zero();
    }
}

impl Drop for PreSignature {
    fn drop(&mut self) {
        self.zeroize();
    }
}

/// Issues a signature over `graph`: random `v` of `l_v` bits, random prime
/// `e` in `(2^{l_e - 1}, 2^{l_e - 1} + 2^{l'_e - 1})` coprime to the group
/// order, `Q = Z / (S^v R_0^{m_0} ∏ …)` and `A = Q^{e^{-1} mod p'q'}`.
pub fn issue<R: RngCore>(
    rng: &mut R,
    key_pair: &KeyPair,
    graph: &EncodedGraph,
) -> Result<(GraphSignature, PreSignature), GroupError> {
    let params = &key_pair.public.params;
    let order = key_pair.signing_group.order()?.clone();

    let v = random_of_bit_length(rng, params.l_v);
    let e = sample_signing_exponent(rng, params, &order);

    // compute over the CRT-accelerated signing-group handle
    let retag = |b: &QrElement| b.clone().into_group(&key_pair.signing_group);
    let mut bases = vec![retag(&key_pair.public.base_s)?];
    for b in message_bases(&key_pair.public, graph)? {
        bases.push(retag(&b)?);
    }
    let mut exps = vec![BigInt::from(v.clone())];
    exps.extend(graph.exponents());

    let encoded = QrElement::multi_base_exp(&bases, &exps)?;
    let q = retag(&key_pair.public.base_z)?.multiply(&encoded.mod_inverse()?)?;

    let d = mod_inverse(&BigInt::from(e.clone()), &BigInt::from(order))
        .ok_or(GroupError::NonInvertibleElement)?
        .to_biguint()
        .ok_or(GroupError::NonInvertibleElement)?;
    let a = q.mod_pow(&BigInt::from(d.clone()))?;

    let signature = GraphSignature {
        a: a.into_group(&key_pair.public.base_s.group().to_public())?,
        e,
        v,
    };
    Ok((signature, PreSignature { q, d }))
}

/// Random prime in the protocol interval, coprime to the group order.
fn sample_signing_exponent<R: RngCore>(
    rng: &mut R,
    params: &Parameters,
    order: &BigUint,
) -> BigUint {
    let floor = BigUint::one() << (params.l_e - 1);
    loop {
        let mut e = &floor + random_of_bit_length(rng, params.l_prime_e - 1);
        e.set_bit(0, true);
        if is_probable_prime(&e, params.l_pt as u32) && e.gcd(order).is_one() {
            return e;
        }
    }
}
