//! Proof that the signer computed `A = Q^d` with `d = e^{-1} mod p'q'`
//! during issuance, without revealing `d`. The exponent is order-sensitive,
//! so the witness is sampled below the group order and the response is
//! reduced modulo it; verified in the challenge-recomputation formulation.

use crate::challenge::ChallengeContext;
use crate::error::ProofSystemError;
use crate::proof_store::{ProofRole, ProofStore, ProofValue, Urn};
use crate::sigma::{RejectionReason, SigmaCommitment, SigmaResponse, Verification};
use digest::Digest;
use num_bigint::{BigInt, BigUint};
use qr_groups::{GraphSignature, KeyPair, PreSignature, QrElement};
use rand::RngCore;
use serde::{Deserialize, Serialize};

const PROTOCOL: &str = "signing-q";

fn context(
    modulus: &BigUint,
    q: &QrElement,
    a: &QrElement,
    tilde_a: &QrElement,
    nonce: &[u8],
) -> ChallengeContext {
    let mut ctx = ChallengeContext::new();
    ctx.add_unsigned(modulus)
        .add_element(q)
        .add_element(a)
        .add_element(tilde_a)
        .add_bytes(nonce);
    ctx
}

/// Signer-side state. Only the signer can run this: it needs the group
/// order, both to sample the witness and to reduce the response.
pub struct SigningQProver<'a> {
    key_pair: &'a KeyPair,
    pre_signature: &'a PreSignature,
    a: QrElement,
    commitment: Option<SigmaCommitment>,
}

impl<'a> SigningQProver<'a> {
    pub fn new(
        key_pair: &'a KeyPair,
        pre_signature: &'a PreSignature,
        signature: &GraphSignature,
    ) -> Self {
        Self {
            key_pair,
            pre_signature,
            a: signature.a.clone(),
            commitment: None,
        }
    }

    /// `tilde_d` uniform below the group order, `tilde_A = Q^{tilde_d}`.
    pub fn pre_challenge<R: RngCore>(
        &mut self,
        rng: &mut R,
        store: &mut ProofStore,
    ) -> Result<QrElement, ProofSystemError> {
        if self.commitment.is_some() {
            return Err(ProofSystemError::SubProtocolAlreadyInitialized(PROTOCOL));
        }
        let order = self.key_pair.signing_group.order()?.clone();
        let tilde_d = gs_crypto_utils::sampling::random_in_range(
            rng,
            &BigUint::from(0u8),
            &order,
        );
        let t = self
            .pre_signature
            .q
            .mod_pow(&BigInt::from(tilde_d.clone()))?;
        let commitment = SigmaCommitment {
            randomness: vec![BigInt::from(tilde_d)],
            t: t.clone(),
        };
        store.store(
            Urn::new(ProofRole::SigningQProver, "witnesses.tilde_d"),
            ProofValue::Integer(commitment.randomness[0].clone()),
        )?;
        store.store(
            Urn::new(ProofRole::SigningQProver, "witnesses.tilde_a"),
            ProofValue::Element(t.clone()),
        )?;
        self.commitment = Some(commitment);
        Ok(t)
    }

    /// Context order: `N, Q, A, tilde_A, nonce`.
    pub fn challenge<D: Digest>(&self, nonce: &[u8]) -> Result<BigUint, ProofSystemError> {
        let commitment = self
            .commitment
            .as_ref()
            .ok_or(ProofSystemError::SubProtocolNotReadyToGenerateChallenge(PROTOCOL))?;
        Ok(context(
            &self.key_pair.public.modulus,
            &self.pre_signature.q,
            &self.a,
            &commitment.t,
            nonce,
        )
        .challenge::<D>(self.key_pair.public.params.l_h))
    }

    pub fn post_challenge(
        &mut self,
        challenge: &BigUint,
        store: &mut ProofStore,
    ) -> Result<SigningQProof, ProofSystemError> {
        let commitment = self
            .commitment
            .take()
            .ok_or(ProofSystemError::SubProtocolNotReadyToGenerateProof(PROTOCOL))?;
        let order = self.key_pair.signing_group.order()?.clone();
        let response = commitment.response_mod_order(
            &[BigInt::from(self.pre_signature.d.clone())],
            challenge,
            &order,
        )?;
        store.store(
            Urn::new(ProofRole::SigningQProver, "responses.hat_d"),
            ProofValue::Integer(response.0[0].clone()),
        )?;
        Ok(SigningQProof {
            challenge: challenge.clone(),
            hat_d: response.0[0].clone(),
        })
    }
}

/// The transmitted proof: the challenge and the order-reduced response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigningQProof {
    pub challenge: BigUint,
    pub hat_d: BigInt,
}

impl SigningQProof {
    /// The recipient checks against the public `Q` and `A` it received:
    /// `tilde_A' = A^{-c} * Q^{hat_d}`, then challenge recomputation. The
    /// response is reduced modulo the (unknown to the verifier) group order,
    /// so its bound is the modulus length itself.
    pub fn verify<D: Digest>(
        &self,
        modulus: &BigUint,
        l_n: u64,
        l_h: u64,
        q: &QrElement,
        a: &QrElement,
        nonce: &[u8],
        store: &mut ProofStore,
    ) -> Result<Verification, ProofSystemError> {
        let response = SigmaResponse(vec![self.hat_d.clone()]);
        if let rejected @ Verification::Rejected(_) = response.check_bounds(&[l_n]) {
            return Ok(rejected);
        }
        let a = a.clone().into_group(q.group())?;
        let tilde_a =
            response.recompute_commitment(core::slice::from_ref(q), &a, &self.challenge)?;
        store.store(
            Urn::new(ProofRole::SigningQVerifier, "witnesses.hat_tilde_a"),
            ProofValue::Element(tilde_a.clone()),
        )?;
        let hat_c = context(modulus, q, &a, &tilde_a, nonce).challenge::<D>(l_h);
        if hat_c == self.challenge {
            Ok(Verification::Accepted)
        } else {
            Ok(Verification::Rejected(RejectionReason::ChallengeMismatch))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blake2::Blake2b512;
    use qr_groups::signature::issue;
    use qr_groups::{EncodedGraph, Parameters};
    use rand::{rngs::StdRng, SeedableRng};

    fn issued(
        rng: &mut StdRng,
    ) -> (KeyPair, GraphSignature, PreSignature) {
        let mut params = Parameters::with_modulus_length(256);
        params.l_m = 32;
        params.l_e = 120;
        params.l_prime_e = 60;
        params.l_v = 140;
        params.l_statzk = 16;
        params.l_h = 80;
        let key_pair = KeyPair::generate(rng, params, 1, 0).unwrap();
        let graph = EncodedGraph::random(rng, &key_pair.public.params, 1, 0);
        let (sig, pre) = issue(rng, &key_pair, &graph).unwrap();
        (key_pair, sig, pre)
    }

    #[test]
    fn completeness() {
        let mut rng = StdRng::seed_from_u64(100);
        let (key_pair, sig, pre) = issued(&mut rng);
        let mut store = ProofStore::new();
        let mut prover = SigningQProver::new(&key_pair, &pre, &sig);
        prover.pre_challenge(&mut rng, &mut store).unwrap();
        let c = prover.challenge::<Blake2b512>(b"issue-nonce").unwrap();
        let proof = prover.post_challenge(&c, &mut store).unwrap();

        // the recipient verifies against the Q and A it was sent
        let params = &key_pair.public.params;
        let q_public = pre
            .q
            .clone()
            .into_group(&key_pair.signing_group.to_public())
            .unwrap();
        let a_public = sig.a.clone();
        let mut verifier_store = ProofStore::new();
        assert!(proof
            .verify::<Blake2b512>(
                &key_pair.public.modulus,
                params.l_n,
                params.l_h,
                &q_public,
                &a_public,
                b"issue-nonce",
                &mut verifier_store,
            )
            .unwrap()
            .is_accepted());
    }

    #[test]
    fn wrong_a_is_rejected() {
        let mut rng = StdRng::seed_from_u64(101);
        let (key_pair, sig, pre) = issued(&mut rng);
        let mut store = ProofStore::new();
        let mut prover = SigningQProver::new(&key_pair, &pre, &sig);
        prover.pre_challenge(&mut rng, &mut store).unwrap();
        let c = prover.challenge::<Blake2b512>(b"n").unwrap();
        let proof = prover.post_challenge(&c, &mut store).unwrap();

        let params = &key_pair.public.params;
        let q_public = pre
            .q
            .clone()
            .into_group(&key_pair.signing_group.to_public())
            .unwrap();
        // a signer that sent some other A must not convince the recipient
        let forged_a = sig.a.multiply(&key_pair.public.base_s).unwrap();
        let mut verifier_store = ProofStore::new();
        assert!(!proof
            .verify::<Blake2b512>(
                &key_pair.public.modulus,
                params.l_n,
                params.l_h,
                &q_public,
                &forged_a,
                b"n",
                &mut verifier_store,
            )
            .unwrap()
            .is_accepted());
    }

    #[test]
    fn oversized_response_is_rejected() {
        let mut rng = StdRng::seed_from_u64(102);
        let (key_pair, sig, pre) = issued(&mut rng);
        let mut store = ProofStore::new();
        let mut prover = SigningQProver::new(&key_pair, &pre, &sig);
        prover.pre_challenge(&mut rng, &mut store).unwrap();
        let c = prover.challenge::<Blake2b512>(b"n").unwrap();
        let mut proof = prover.post_challenge(&c, &mut store).unwrap();
        proof.hat_d = proof.hat_d.clone() << 300;

        let params = &key_pair.public.params;
        let q_public = pre
            .q
            .clone()
            .into_group(&key_pair.signing_group.to_public())
            .unwrap();
        let mut verifier_store = ProofStore::new();
        let outcome = proof
            .verify::<Blake2b512>(
                &key_pair.public.modulus,
                params.l_n,
                params.l_h,
                &q_public,
                &sig.a,
                b"n",
                &mut verifier_store,
            )
            .unwrap();
        assert!(matches!(
            outcome,
            Verification::Rejected(RejectionReason::ResponseOutOfBound { index: 0, .. })
        ));
    }
}
