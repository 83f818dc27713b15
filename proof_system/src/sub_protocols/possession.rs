//! Proof of possession of a graph signature: knowledge of `(e, v', m_0,
//! {m_i}, {m_{i,j}})` such that `Z = A'^e S^{v'} R_0^{m_0} ∏ R_i^{m_i} ∏
//! R_{i,j}^{m_{i,j}}`, where `A'` is the prover's fresh randomization of the
//! signature. Verified in the challenge-recomputation formulation.

use crate::challenge::ChallengeContext;
use crate::error::ProofSystemError;
use crate::proof_store::{ProofRole, ProofStore, ProofValue, Urn};
use crate::sigma::{RejectionReason, SigmaCommitment, SigmaResponse, Verification};
use digest::Digest;
use num_bigint::{BigInt, BigUint};
use qr_groups::signature::message_bases;
use qr_groups::{EncodedGraph, GraphSignature, Parameters, QrElement, SignerPublicKey};
use rand::RngCore;
use serde::{Deserialize, Serialize};

const PROTOCOL: &str = "possession";

/// Width of `v' = v - e*r`: the `e*r` term carries `l_e + l_n + l_statzk`
/// bits and dominates whenever `l_v` is configured smaller than that, so the
/// secret length is the larger of the two plus a carry bit.
fn l_v_prime(params: &Parameters) -> u64 {
    params
        .l_v
        .max(params.l_e + params.l_n + params.l_statzk)
        + 1
}

fn context(
    pk: &SignerPublicKey,
    a_prime: &QrElement,
    tilde_z: &QrElement,
    nonce: &[u8],
) -> ChallengeContext {
    let mut ctx = ChallengeContext::new();
    ctx.add_unsigned(&pk.modulus)
        .add_element(&pk.base_s)
        .add_elements(&pk.proven_bases())
        .add_element(a_prime)
        .add_element(tilde_z)
        .add_bytes(nonce);
    ctx
}

fn statement_bases(
    pk: &SignerPublicKey,
    a_prime: &QrElement,
    vertex_count: usize,
    edge_count: usize,
) -> Result<Vec<QrElement>, ProofSystemError> {
    if vertex_count > pk.bases_r_vertex.len() || edge_count > pk.bases_r_edge.len() {
        return Err(qr_groups::GroupError::MessageCountMismatch(
            vertex_count + edge_count,
            pk.bases_r_vertex.len() + pk.bases_r_edge.len(),
        )
        .into());
    }
    let mut bases = vec![a_prime.clone(), pk.base_s.clone(), pk.base_r_0.clone()];
    bases.extend(pk.bases_r_vertex[..vertex_count].iter().cloned());
    bases.extend(pk.bases_r_edge[..edge_count].iter().cloned());
    Ok(bases)
}

fn response_bounds(params: &Parameters, message_count: usize) -> Vec<u64> {
    let mut bounds = vec![
        params.response_bound(params.l_e),
        params.response_bound(l_v_prime(params)),
    ];
    bounds.extend(std::iter::repeat(params.response_bound(params.l_m)).take(message_count));
    bounds
}

/// Holder-side state. Construction randomizes the signature so the
/// transmitted `A'` is unlinkable to the issued `A`.
pub struct PossessionProver<'a> {
    pk: &'a SignerPublicKey,
    graph: &'a EncodedGraph,
    a_prime: QrElement,
    secret_e: BigUint,
    secret_v_prime: BigInt,
    commitment: Option<SigmaCommitment>,
}

impl<'a> PossessionProver<'a> {
    /// `A' = A * S^r`, `v' = v - e*r` for a fresh `r` of `l_n + l_statzk`
    /// bits.
    pub fn new<R: RngCore>(
        rng: &mut R,
        pk: &'a SignerPublicKey,
        signature: &GraphSignature,
        graph: &'a EncodedGraph,
    ) -> Result<Self, ProofSystemError> {
        // fails early if the graph needs more bases than the key has
        message_bases(pk, graph)?;
        let r = gs_crypto_utils::sampling::random_of_bit_length(
            rng,
            pk.params.l_n + pk.params.l_statzk,
        );
        let a_prime = signature
            .a
            .multiply(&pk.base_s.mod_pow(&BigInt::from(r.clone()))?)?;
        let v_prime =
            BigInt::from(signature.v.clone()) - BigInt::from(signature.e.clone()) * BigInt::from(r);
        Ok(Self {
            pk,
            graph,
            a_prime,
            secret_e: signature.e.clone(),
            secret_v_prime: v_prime,
            commitment: None,
        })
    }

    pub fn a_prime(&self) -> &QrElement {
        &self.a_prime
    }

    fn secrets(&self) -> Vec<BigInt> {
        let mut secrets = vec![
            BigInt::from(self.secret_e.clone()),
            self.secret_v_prime.clone(),
        ];
        secrets.extend(self.graph.exponents());
        secrets
    }

    pub fn pre_challenge<R: RngCore>(
        &mut self,
        rng: &mut R,
        store: &mut ProofStore,
    ) -> Result<QrElement, ProofSystemError> {
        if self.commitment.is_some() {
            return Err(ProofSystemError::SubProtocolAlreadyInitialized(PROTOCOL));
        }
        let params = &self.pk.params;
        let bases = statement_bases(
            self.pk,
            &self.a_prime,
            self.graph.vertices.len(),
            self.graph.edges.len(),
        )?;
        let mut witness_bits = vec![
            params.witness_length(params.l_e),
            params.witness_length(l_v_prime(params)),
        ];
        witness_bits.extend(
            std::iter::repeat(params.witness_length(params.l_m))
                .take(1 + self.graph.vertices.len() + self.graph.edges.len()),
        );
        let commitment = SigmaCommitment::new(rng, &bases, &witness_bits)?;

        store.store(
            Urn::new(ProofRole::PossessionProver, "witnesses.tilde_e"),
            ProofValue::Integer(commitment.randomness[0].clone()),
        )?;
        store.store(
            Urn::new(ProofRole::PossessionProver, "witnesses.tilde_v"),
            ProofValue::Integer(commitment.randomness[1].clone()),
        )?;
        for (i, tilde_m) in commitment.randomness[2..].iter().enumerate() {
            store.store(
                Urn::indexed(ProofRole::PossessionProver, "witnesses.tilde_m", i as u32),
                ProofValue::Integer(tilde_m.clone()),
            )?;
        }
        store.store(
            Urn::new(ProofRole::PossessionProver, "witnesses.tilde_z"),
            ProofValue::Element(commitment.t.clone()),
        )?;
        let tilde_z = commitment.t.clone();
        self.commitment = Some(commitment);
        Ok(tilde_z)
    }

    /// Context order: `N, S, Z, R_0, {R_i}, {R_{i,j}}, A', tilde_Z, nonce`.
    pub fn challenge<D: Digest>(&self, nonce: &[u8]) -> Result<BigUint, ProofSystemError> {
        let commitment = self
            .commitment
            .as_ref()
            .ok_or(ProofSystemError::SubProtocolNotReadyToGenerateChallenge(PROTOCOL))?;
        Ok(context(self.pk, &self.a_prime, &commitment.t, nonce)
            .challenge::<D>(self.pk.params.l_h))
    }

    pub fn post_challenge(
        &mut self,
        challenge: &BigUint,
        store: &mut ProofStore,
    ) -> Result<PossessionProof, ProofSystemError> {
        let commitment = self
            .commitment
            .take()
            .ok_or(ProofSystemError::SubProtocolNotReadyToGenerateProof(PROTOCOL))?;
        let response = commitment.response(&self.secrets(), challenge)?;
        store.store(
            Urn::new(ProofRole::PossessionProver, "responses.hat_e"),
            ProofValue::Integer(response.0[0].clone()),
        )?;
        store.store(
            Urn::new(ProofRole::PossessionProver, "responses.hat_v"),
            ProofValue::Integer(response.0[1].clone()),
        )?;
        for (i, hat_m) in response.0[2..].iter().enumerate() {
            store.store(
                Urn::indexed(ProofRole::PossessionProver, "responses.hat_m", i as u32),
                ProofValue::Integer(hat_m.clone()),
            )?;
        }
        Ok(PossessionProof {
            a_prime: self.a_prime.clone(),
            challenge: challenge.clone(),
            responses: response.0,
        })
    }
}

/// The transmitted proof: the randomized signature component, the challenge
/// and responses ordered `hat_e, hat_v, hat_m_0, {hat_m_i}, {hat_m_{i,j}}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PossessionProof {
    pub a_prime: QrElement,
    pub challenge: BigUint,
    pub responses: Vec<BigInt>,
}

impl PossessionProof {
    /// Reconstructs `tilde_Z' = Z^{-c} * A'^{hat_e} S^{hat_v} R_0^{hat_m_0}
    /// ∏ …`, then accepts iff the recomputed challenge matches. The verifier
    /// knows the graph's shape (how many vertex and edge exponents are
    /// encoded) but none of the exponents.
    pub fn verify<D: Digest>(
        &self,
        pk: &SignerPublicKey,
        vertex_count: usize,
        edge_count: usize,
        nonce: &[u8],
        store: &mut ProofStore,
    ) -> Result<Verification, ProofSystemError> {
        let message_count = 1 + vertex_count + edge_count;
        let bounds = response_bounds(&pk.params, message_count);
        let response = SigmaResponse(self.responses.clone());
        if let rejected @ Verification::Rejected(_) = response.check_bounds(&bounds) {
            return Ok(rejected);
        }

        let a_prime = self.a_prime.clone().into_group(pk.base_s.group())?;
        let bases = statement_bases(pk, &a_prime, vertex_count, edge_count)?;
        let tilde_z = response.recompute_commitment(&bases, &pk.base_z, &self.challenge)?;
        store.store(
            Urn::new(ProofRole::PossessionVerifier, "witnesses.hat_tilde_z"),
            ProofValue::Element(tilde_z.clone()),
        )?;
        let hat_c = context(pk, &a_prime, &tilde_z, nonce).challenge::<D>(pk.params.l_h);
        if hat_c == self.challenge {
            Ok(Verification::Accepted)
        } else {
            Ok(Verification::Rejected(RejectionReason::ChallengeMismatch))
        }
    }
}
