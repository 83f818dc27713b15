//! Proof that the signer's public bases `Z, R_0, {R_i}, {R_{i,j}}` were all
//! constructed as powers of `S` with known discrete logs: one single-base
//! Schnorr instance per base, all sharing one challenge, verified in the
//! challenge-recomputation formulation.

use crate::challenge::ChallengeContext;
use crate::error::ProofSystemError;
use crate::proof_store::{ProofRole, ProofStore, ProofValue, Urn};
use crate::sigma::{SigmaCommitment, SigmaResponse, Verification};
use digest::Digest;
use num_bigint::{BigInt, BigUint};
use qr_groups::{KeyPair, QrElement, SignerPublicKey};
use rand::RngCore;
use serde::{Deserialize, Serialize};

const PROTOCOL: &str = "group-setup";

fn context(
    pk: &SignerPublicKey,
    tilde_bases: &[QrElement],
    nonce: &[u8],
) -> ChallengeContext {
    let mut ctx = ChallengeContext::new();
    ctx.add_unsigned(&pk.modulus)
        .add_element(&pk.base_s)
        .add_elements(&pk.proven_bases())
        .add_elements(tilde_bases)
        .add_bytes(nonce);
    ctx
}

/// Signer-side state across the three phases.
pub struct GroupSetupProver<'a> {
    key_pair: &'a KeyPair,
    commitments: Option<Vec<SigmaCommitment>>,
}

impl<'a> GroupSetupProver<'a> {
    pub fn new(key_pair: &'a KeyPair) -> Self {
        Self {
            key_pair,
            commitments: None,
        }
    }

    /// Samples one witness per base and commits `tilde_B_i = S^{tilde_x_i}`
    /// over the CRT-accelerated signing handle. Witnesses and commitments
    /// land in the store under the prover's namespace.
    pub fn pre_challenge<R: RngCore>(
        &mut self,
        rng: &mut R,
        store: &mut ProofStore,
    ) -> Result<Vec<QrElement>, ProofSystemError> {
        if self.commitments.is_some() {
            return Err(ProofSystemError::SubProtocolAlreadyInitialized(PROTOCOL));
        }
        let params = &self.key_pair.public.params;
        let s = self
            .key_pair
            .public
            .base_s
            .clone()
            .into_group(&self.key_pair.signing_group)?;
        let witness_bits = [params.witness_length(params.l_n)];
        let count = self.key_pair.public.proven_bases().len();

        let mut commitments = Vec::with_capacity(count);
        let mut tilde_bases = Vec::with_capacity(count);
        for i in 0..count {
            let commitment =
                SigmaCommitment::new(rng, core::slice::from_ref(&s), &witness_bits)?;
            store.store(
                Urn::indexed(ProofRole::GroupSetupProver, "witnesses.tilde_x", i as u32),
                ProofValue::Integer(commitment.randomness[0].clone()),
            )?;
            store.store(
                Urn::indexed(ProofRole::GroupSetupProver, "witnesses.tilde_b", i as u32),
                ProofValue::Element(commitment.t.clone()),
            )?;
            tilde_bases.push(commitment.t.clone());
            commitments.push(commitment);
        }
        self.commitments = Some(commitments);
        Ok(tilde_bases)
    }

    /// Context order: `N, S, Z, R_0, {R_i}, {R_{i,j}}, {tilde_B_i}, nonce`.
    pub fn challenge<D: Digest>(&self, nonce: &[u8]) -> Result<BigUint, ProofSystemError> {
        let commitments = self
            .commitments
            .as_ref()
            .ok_or(ProofSystemError::SubProtocolNotReadyToGenerateChallenge(PROTOCOL))?;
        let tilde_bases: Vec<_> = commitments.iter().map(|c| c.t.clone()).collect();
        Ok(context(&self.key_pair.public, &tilde_bases, nonce)
            .challenge::<D>(self.key_pair.public.params.l_h))
    }

    pub fn post_challenge(
        &mut self,
        challenge: &BigUint,
        store: &mut ProofStore,
    ) -> Result<GroupSetupProof, ProofSystemError> {
        let commitments = self
            .commitments
            .take()
            .ok_or(ProofSystemError::SubProtocolNotReadyToGenerateProof(PROTOCOL))?;
        let logs = self.key_pair.base_logs();
        let mut responses = Vec::with_capacity(commitments.len());
        for (i, (commitment, x)) in commitments.iter().zip(&logs).enumerate() {
            let response =
                commitment.response(&[BigInt::from(x.clone())], challenge)?;
            store.store(
                Urn::indexed(ProofRole::GroupSetupProver, "responses.hat_x", i as u32),
                ProofValue::Integer(response.0[0].clone()),
            )?;
            responses.push(response.0[0].clone());
        }
        Ok(GroupSetupProof {
            challenge: challenge.clone(),
            responses,
        })
    }
}

/// The transmitted proof: the challenge and one `hat_x_i` per public base.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSetupProof {
    pub challenge: BigUint,
    pub responses: Vec<BigInt>,
}

impl GroupSetupProof {
    /// Reconstructs every `tilde_B_i' = B_i^{-c} * S^{hat_x_i}`, stores them
    /// under the verifier's namespace, and accepts iff the challenge
    /// recomputed over them equals the transmitted one.
    pub fn verify<D: Digest>(
        &self,
        pk: &SignerPublicKey,
        nonce: &[u8],
        store: &mut ProofStore,
    ) -> Result<Verification, ProofSystemError> {
        let params = &pk.params;
        let bases = pk.proven_bases();
        let bounds = vec![params.response_bound(params.l_n); bases.len()];
        let all = SigmaResponse(self.responses.clone());
        if let rejected @ Verification::Rejected(_) = all.check_bounds(&bounds) {
            return Ok(rejected);
        }

        let mut recomputed = Vec::with_capacity(bases.len());
        for (i, (base, hat_x)) in bases.iter().zip(&self.responses).enumerate() {
            let single = SigmaResponse(vec![hat_x.clone()]);
            let tilde = single.recompute_commitment(
                core::slice::from_ref(&pk.base_s),
                base,
                &self.challenge,
            )?;
            store.store(
                Urn::indexed(ProofRole::GroupSetupVerifier, "witnesses.hat_tilde_b", i as u32),
                ProofValue::Element(tilde.clone()),
            )?;
            recomputed.push(tilde);
        }
        let hat_c = context(pk, &recomputed, nonce).challenge::<D>(params.l_h);
        if hat_c == self.challenge {
            Ok(Verification::Accepted)
        } else {
            Ok(Verification::Rejected(
                crate::sigma::RejectionReason::ChallengeMismatch,
            ))
        }
    }
}
