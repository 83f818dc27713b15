//! Proof of correct opening of a Pedersen-style commitment `C = R^m * S^r`,
//! verified in the direct commitment-equality formulation: the witness
//! commitment `tilde_C` travels with the proof and the verifier checks the
//! reconstruction against it.

use crate::challenge::ChallengeContext;
use crate::error::ProofSystemError;
use crate::proof_store::{ProofRole, ProofStore, ProofValue, Urn};
use crate::sigma::{RejectionReason, SigmaCommitment, SigmaResponse, Verification};
use digest::Digest;
use num_bigint::{BigInt, BigUint};
use num_traits::Zero;
use qr_groups::{Parameters, QrElement};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

const PROTOCOL: &str = "commitment";

/// The secret opening `(m, r)` of a commitment. Zeroized on drop.
#[derive(Clone, Debug)]
pub struct CommitmentOpening {
    pub message: BigUint,
    pub randomness: BigUint,
}

impl Zeroize for CommitmentOpening {
    fn zeroize(&mut self) {
        self.message = BigUint::zero();
        self.randomness = BigUint::zero();
    }
}

impl Drop for CommitmentOpening {
    fn drop(&mut self) {
        self.zeroize();
    }
}

/// `C = R^m * S^r` with `r` of `l_n + l_statzk` bits.
pub fn commit<R: RngCore>(
    rng: &mut R,
    params: &Parameters,
    base_r: &QrElement,
    base_s: &QrElement,
    message: &BigUint,
) -> Result<(QrElement, CommitmentOpening), ProofSystemError> {
    let randomness =
        gs_crypto_utils::sampling::random_of_bit_length(rng, params.l_n + params.l_statzk);
    let c = QrElement::multi_base_exp(
        &[base_r.clone(), base_s.clone()],
        &[
            BigInt::from(message.clone()),
            BigInt::from(randomness.clone()),
        ],
    )?;
    Ok((
        c,
        CommitmentOpening {
            message: message.clone(),
            randomness,
        },
    ))
}

fn context(
    base_r: &QrElement,
    base_s: &QrElement,
    c: &QrElement,
    tilde_c: &QrElement,
    nonce: &[u8],
) -> ChallengeContext {
    let mut ctx = ChallengeContext::new();
    ctx.add_unsigned(base_s.group().modulus())
        .add_element(base_r)
        .add_element(base_s)
        .add_element(c)
        .add_element(tilde_c)
        .add_bytes(nonce);
    ctx
}

fn response_bounds(params: &Parameters) -> [u64; 2] {
    [
        params.response_bound(params.l_m),
        params.response_bound(params.l_n + params.l_statzk),
    ]
}

/// Recipient-side state. `index` distinguishes several commitment proofs
/// sharing one store (one per committed vertex).
pub struct CommitmentProver<'a> {
    params: &'a Parameters,
    base_r: QrElement,
    base_s: QrElement,
    c: QrElement,
    opening: &'a CommitmentOpening,
    index: u32,
    commitment: Option<SigmaCommitment>,
}

impl<'a> CommitmentProver<'a> {
    pub fn new(
        params: &'a Parameters,
        base_r: QrElement,
        base_s: QrElement,
        c: QrElement,
        opening: &'a CommitmentOpening,
        index: u32,
    ) -> Self {
        Self {
            params,
            base_r,
            base_s,
            c,
            opening,
            index,
            commitment: None,
        }
    }

    pub fn pre_challenge<R: RngCore>(
        &mut self,
        rng: &mut R,
        store: &mut ProofStore,
    ) -> Result<QrElement, ProofSystemError> {
        if self.commitment.is_some() {
            return Err(ProofSystemError::SubProtocolAlreadyInitialized(PROTOCOL));
        }
        let witness_bits = [
            self.params.witness_length(self.params.l_m),
            self.params
                .witness_length(self.params.l_n + self.params.l_statzk),
        ];
        let commitment = SigmaCommitment::new(
            rng,
            &[self.base_r.clone(), self.base_s.clone()],
            &witness_bits,
        )?;
        store.store(
            Urn::indexed(ProofRole::CommitmentProver, "witnesses.tilde_m", self.index),
            ProofValue::Integer(commitment.randomness[0].clone()),
        )?;
        store.store(
            Urn::indexed(ProofRole::CommitmentProver, "witnesses.tilde_r", self.index),
            ProofValue::Integer(commitment.randomness[1].clone()),
        )?;
        store.store(
            Urn::indexed(ProofRole::CommitmentProver, "witnesses.tilde_c", self.index),
            ProofValue::Element(commitment.t.clone()),
        )?;
        let tilde_c = commitment.t.clone();
        self.commitment = Some(commitment);
        Ok(tilde_c)
    }

    /// Context order: `N, R, S, C, tilde_C, nonce`.
    pub fn challenge<D: Digest>(&self, nonce: &[u8]) -> Result<BigUint, ProofSystemError> {
        let commitment = self
            .commitment
            .as_ref()
            .ok_or(ProofSystemError::SubProtocolNotReadyToGenerateChallenge(PROTOCOL))?;
        Ok(
            context(&self.base_r, &self.base_s, &self.c, &commitment.t, nonce)
                .challenge::<D>(self.params.l_h),
        )
    }

    pub fn post_challenge(
        &mut self,
        challenge: &BigUint,
        store: &mut ProofStore,
    ) -> Result<CommitmentProof, ProofSystemError> {
        let commitment = self
            .commitment
            .take()
            .ok_or(ProofSystemError::SubProtocolNotReadyToGenerateProof(PROTOCOL))?;
        let secrets = [
            BigInt::from(self.opening.message.clone()),
            BigInt::from(self.opening.randomness.clone()),
        ];
        let response = commitment.response(&secrets, challenge)?;
        store.store(
            Urn::indexed(ProofRole::CommitmentProver, "responses.hat_m", self.index),
            ProofValue::Integer(response.0[0].clone()),
        )?;
        store.store(
            Urn::indexed(ProofRole::CommitmentProver, "responses.hat_r", self.index),
            ProofValue::Integer(response.0[1].clone()),
        )?;
        Ok(CommitmentProof {
            tilde_c: commitment.t.clone(),
            challenge: challenge.clone(),
            hat_m: response.0[0].clone(),
            hat_r: response.0[1].clone(),
        })
    }
}

/// The transmitted proof: the witness commitment, the challenge and the two
/// responses.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitmentProof {
    pub tilde_c: QrElement,
    pub challenge: BigUint,
    pub hat_m: BigInt,
    pub hat_r: BigInt,
}

impl CommitmentProof {
    /// Rebinds the transmitted `tilde_C` through the challenge hash, then
    /// checks `C^{-c} * R^{hat_m} S^{hat_r} == tilde_C`.
    pub fn verify<D: Digest>(
        &self,
        params: &Parameters,
        base_r: &QrElement,
        base_s: &QrElement,
        c: &QrElement,
        index: u32,
        nonce: &[u8],
        store: &mut ProofStore,
    ) -> Result<Verification, ProofSystemError> {
        let hat_c = context(base_r, base_s, c, &self.tilde_c, nonce).challenge::<D>(params.l_h);
        if hat_c != self.challenge {
            return Ok(Verification::Rejected(RejectionReason::ChallengeMismatch));
        }
        let response = SigmaResponse(vec![self.hat_m.clone(), self.hat_r.clone()]);
        let tilde_c = self.tilde_c.clone().into_group(base_s.group())?;
        let outcome = response.verify(
            &[base_r.clone(), base_s.clone()],
            c,
            &tilde_c,
            &self.challenge,
            &response_bounds(params),
        )?;
        if outcome.is_accepted() {
            store.store(
                Urn::indexed(ProofRole::CommitmentVerifier, "witnesses.hat_tilde_c", index),
                ProofValue::Element(tilde_c),
            )?;
        }
        Ok(outcome)
    }
}
