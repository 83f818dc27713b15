//! Proof that two committed values are coprime (in particular, distinct):
//! from the Bezout identity `a*m_i + b*m_j = 1` the prover shows knowledge
//! of `(a, b, r')` with `R = C_i^a * C_j^b * S^{r'}`, where
//! `r' = -(a*r_i + b*r_j)` folds the commitment randomness. Verified in the
//! challenge-recomputation formulation.

use crate::challenge::ChallengeContext;
use crate::error::ProofSystemError;
use crate::proof_store::{ProofRole, ProofStore, ProofValue, Urn};
use crate::sigma::{RejectionReason, SigmaCommitment, SigmaResponse, Verification};
use crate::sub_protocols::commitment::CommitmentOpening;
use digest::Digest;
use gs_crypto_utils::euclid::extended_euclid;
use num_bigint::{BigInt, BigUint};
use num_traits::One;
use qr_groups::{Parameters, QrElement};
use rand::RngCore;
use serde::{Deserialize, Serialize};

const PROTOCOL: &str = "pairwise-difference";

fn context(
    base_r: &QrElement,
    base_s: &QrElement,
    c_i: &QrElement,
    c_j: &QrElement,
    tilde_r: &QrElement,
    nonce: &[u8],
) -> ChallengeContext {
    let mut ctx = ChallengeContext::new();
    ctx.add_unsigned(base_s.group().modulus())
        .add_element(base_r)
        .add_element(base_s)
        .add_element(c_i)
        .add_element(c_j)
        .add_element(tilde_r)
        .add_bytes(nonce);
    ctx
}

/// Bezout coefficients stay within one bit of the operands; the folded
/// randomness additionally picks up the commitment randomness length.
fn secret_bit_lengths(params: &Parameters) -> [u64; 3] {
    [
        params.l_m + 1,
        params.l_m + 1,
        params.l_m + params.l_n + params.l_statzk + 2,
    ]
}

/// Prover-side state over two commitments `C_i, C_j` under the same bases.
pub struct PairWiseDifferenceProver<'a> {
    params: &'a Parameters,
    base_r: QrElement,
    base_s: QrElement,
    c_i: QrElement,
    c_j: QrElement,
    secrets: [BigInt; 3],
    index: u32,
    commitment: Option<SigmaCommitment>,
}

impl<'a> PairWiseDifferenceProver<'a> {
    /// Fails with [`ProofSystemError::ValuesNotCoprime`] when the committed
    /// messages share a factor, in which case no such proof exists.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        params: &'a Parameters,
        base_r: QrElement,
        base_s: QrElement,
        c_i: QrElement,
        c_j: QrElement,
        opening_i: &CommitmentOpening,
        opening_j: &CommitmentOpening,
        index: u32,
    ) -> Result<Self, ProofSystemError> {
        let (gcd, a, b) = extended_euclid(
            &BigInt::from(opening_i.message.clone()),
            &BigInt::from(opening_j.message.clone()),
        )?;
        if !gcd.is_one() {
            return Err(ProofSystemError::ValuesNotCoprime);
        }
        let r_prime = -(&a * BigInt::from(opening_i.randomness.clone())
            + &b * BigInt::from(opening_j.randomness.clone()));
        Ok(Self {
            params,
            base_r,
            base_s,
            c_i,
            c_j,
            secrets: [a, b, r_prime],
            index,
            commitment: None,
        })
    }

    pub fn pre_challenge<R: RngCore>(
        &mut self,
        rng: &mut R,
        store: &mut ProofStore,
    ) -> Result<QrElement, ProofSystemError> {
        if self.commitment.is_some() {
            return Err(ProofSystemError::SubProtocolAlreadyInitialized(PROTOCOL));
        }
        let bases = [
            self.c_i.clone(),
            self.c_j.clone(),
            self.base_s.clone(),
        ];
        let witness_bits: Vec<u64> = secret_bit_lengths(self.params)
            .iter()
            .map(|l| self.params.witness_length(*l))
            .collect();
        let commitment = SigmaCommitment::new(rng, &bases, &witness_bits)?;
        for (name, tilde) in ["witnesses.tilde_a", "witnesses.tilde_b", "witnesses.tilde_r"]
            .iter()
            .zip(&commitment.randomness)
        {
            store.store(
                Urn::indexed(ProofRole::PairWiseProver, *name, self.index),
                ProofValue::Integer(tilde.clone()),
            )?;
        }
        store.store(
            Urn::indexed(ProofRole::PairWiseProver, "witnesses.tilde_big_r", self.index),
            ProofValue::Element(commitment.t.clone()),
        )?;
        let tilde_r = commitment.t.clone();
        self.commitment = Some(commitment);
        Ok(tilde_r)
    }

    /// Context order: `N, R, S, C_i, C_j, tilde_R, nonce`.
    pub fn challenge<D: Digest>(&self, nonce: &[u8]) -> Result<BigUint, ProofSystemError> {
        let commitment = self
            .commitment
            .as_ref()
            .ok_or(ProofSystemError::SubProtocolNotReadyToGenerateChallenge(PROTOCOL))?;
        Ok(context(
            &self.base_r,
            &self.base_s,
            &self.c_i,
            &self.c_j,
            &commitment.t,
            nonce,
        )
        .challenge::<D>(self.params.l_h))
    }

    pub fn post_challenge(
        &mut self,
        challenge: &BigUint,
        store: &mut ProofStore,
    ) -> Result<PairWiseDifferenceProof, ProofSystemError> {
        let commitment = self
            .commitment
            .take()
            .ok_or(ProofSystemError::SubProtocolNotReadyToGenerateProof(PROTOCOL))?;
        let response = commitment.response(&self.secrets, challenge)?;
        for (name, hat) in ["responses.hat_a", "responses.hat_b", "responses.hat_r"]
            .iter()
            .zip(&response.0)
        {
            store.store(
                Urn::indexed(ProofRole::PairWiseProver, *name, self.index),
                ProofValue::Integer(hat.clone()),
            )?;
        }
        Ok(PairWiseDifferenceProof {
            challenge: challenge.clone(),
            hat_a: response.0[0].clone(),
            hat_b: response.0[1].clone(),
            hat_r: response.0[2].clone(),
        })
    }
}

/// The transmitted proof: the challenge and the three responses.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairWiseDifferenceProof {
    pub challenge: BigUint,
    pub hat_a: BigInt,
    pub hat_b: BigInt,
    pub hat_r: BigInt,
}

impl PairWiseDifferenceProof {
    /// `tilde_R' = R^{-c} * C_i^{hat_a} C_j^{hat_b} S^{hat_r}`, then
    /// challenge recomputation.
    #[allow(clippy::too_many_arguments)]
    pub fn verify<D: Digest>(
        &self,
        params: &Parameters,
        base_r: &QrElement,
        base_s: &QrElement,
        c_i: &QrElement,
        c_j: &QrElement,
        index: u32,
        nonce: &[u8],
        store: &mut ProofStore,
    ) -> Result<Verification, ProofSystemError> {
        let bounds: Vec<u64> = secret_bit_lengths(params)
            .iter()
            .map(|l| params.response_bound(*l))
            .collect();
        let response = SigmaResponse(vec![
            self.hat_a.clone(),
            self.hat_b.clone(),
            self.hat_r.clone(),
        ]);
        if let rejected @ Verification::Rejected(_) = response.check_bounds(&bounds) {
            return Ok(rejected);
        }
        let bases = [
            c_i.clone().into_group(base_s.group())?,
            c_j.clone().into_group(base_s.group())?,
            base_s.clone(),
        ];
        let tilde_r = response.recompute_commitment(&bases, base_r, &self.challenge)?;
        store.store(
            Urn::indexed(ProofRole::PairWiseVerifier, "witnesses.hat_tilde_big_r", index),
            ProofValue::Element(tilde_r.clone()),
        )?;
        let hat_c = context(base_r, base_s, &bases[0], &bases[1], &tilde_r, nonce)
            .challenge::<D>(params.l_h);
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
    use crate::sub_protocols::commitment::commit;
    use blake2::Blake2b512;
    use num_integer::Integer;
    use num_traits::Zero;
    use qr_groups::KeyPair;
    use rand::{rngs::StdRng, SeedableRng};

    fn small_key(rng: &mut StdRng) -> KeyPair {
        let mut params = Parameters::with_modulus_length(128);
        params.l_m = 32;
        params.l_statzk = 16;
        params.l_h = 80;
        KeyPair::generate(rng, params, 1, 0).unwrap()
    }

    fn coprime_pair(rng: &mut StdRng, l_m: u64) -> (BigUint, BigUint) {
        loop {
            let m_i = gs_crypto_utils::sampling::random_of_bit_length(rng, l_m);
            let m_j = gs_crypto_utils::sampling::random_of_bit_length(rng, l_m);
            if !m_i.is_zero() && !m_j.is_zero() && m_i.gcd(&m_j).is_one() {
                return (m_i, m_j);
            }
        }
    }

    #[test]
    fn completeness() {
        let mut rng = StdRng::seed_from_u64(110);
        let key_pair = small_key(&mut rng);
        let pk = &key_pair.public;
        let (m_i, m_j) = coprime_pair(&mut rng, pk.params.l_m);
        let base_r = &pk.bases_r_vertex[0];
        let (c_i, o_i) = commit(&mut rng, &pk.params, base_r, &pk.base_s, &m_i).unwrap();
        let (c_j, o_j) = commit(&mut rng, &pk.params, base_r, &pk.base_s, &m_j).unwrap();

        let mut store = ProofStore::new();
        let mut prover = PairWiseDifferenceProver::new(
            &pk.params,
            base_r.clone(),
            pk.base_s.clone(),
            c_i.clone(),
            c_j.clone(),
            &o_i,
            &o_j,
            0,
        )
        .unwrap();
        prover.pre_challenge(&mut rng, &mut store).unwrap();
        let c = prover.challenge::<Blake2b512>(b"nonce").unwrap();
        let proof = prover.post_challenge(&c, &mut store).unwrap();

        let mut verifier_store = ProofStore::new();
        assert!(proof
            .verify::<Blake2b512>(
                &pk.params,
                base_r,
                &pk.base_s,
                &c_i,
                &c_j,
                0,
                b"nonce",
                &mut verifier_store,
            )
            .unwrap()
            .is_accepted());
    }

    #[test]
    fn shared_factor_is_an_error() {
        let mut rng = StdRng::seed_from_u64(111);
        let key_pair = small_key(&mut rng);
        let pk = &key_pair.public;
        let m_i = BigUint::from(6u8 * 7);
        let m_j = &m_i * 3u8;
        let base_r = &pk.bases_r_vertex[0];
        let (c_i, o_i) = commit(&mut rng, &pk.params, base_r, &pk.base_s, &m_i).unwrap();
        let (c_j, o_j) = commit(&mut rng, &pk.params, base_r, &pk.base_s, &m_j).unwrap();
        assert!(matches!(
            PairWiseDifferenceProver::new(
                &pk.params,
                base_r.clone(),
                pk.base_s.clone(),
                c_i,
                c_j,
                &o_i,
                &o_j,
                0,
            ),
            Err(ProofSystemError::ValuesNotCoprime)
        ));
    }

    #[test]
    fn swapped_commitments_are_rejected() {
        let mut rng = StdRng::seed_from_u64(112);
        let key_pair = small_key(&mut rng);
        let pk = &key_pair.public;
        let (m_i, m_j) = coprime_pair(&mut rng, pk.params.l_m);
        let base_r = &pk.bases_r_vertex[0];
        let (c_i, o_i) = commit(&mut rng, &pk.params, base_r, &pk.base_s, &m_i).unwrap();
        let (c_j, o_j) = commit(&mut rng, &pk.params, base_r, &pk.base_s, &m_j).unwrap();

        let mut store = ProofStore::new();
        let mut prover = PairWiseDifferenceProver::new(
            &pk.params,
            base_r.clone(),
            pk.base_s.clone(),
            c_i.clone(),
            c_j.clone(),
            &o_i,
            &o_j,
            0,
        )
        .unwrap();
        prover.pre_challenge(&mut rng, &mut store).unwrap();
        let c = prover.challenge::<Blake2b512>(b"nonce").unwrap();
        let proof = prover.post_challenge(&c, &mut store).unwrap();

        let mut verifier_store = ProofStore::new();
        assert!(!proof
            .verify::<Blake2b512>(
                &pk.params,
                base_r,
                &pk.base_s,
                &c_j,
                &c_i,
                0,
                b"nonce",
                &mut verifier_store,
            )
            .unwrap()
            .is_accepted());
    }

    #[test]
    fn oversized_response_is_rejected() {
        let mut rng = StdRng::seed_from_u64(113);
        let key_pair = small_key(&mut rng);
        let pk = &key_pair.public;
        let (m_i, m_j) = coprime_pair(&mut rng, pk.params.l_m);
        let base_r = &pk.bases_r_vertex[0];
        let (c_i, o_i) = commit(&mut rng, &pk.params, base_r, &pk.base_s, &m_i).unwrap();
        let (c_j, o_j) = commit(&mut rng, &pk.params, base_r, &pk.base_s, &m_j).unwrap();

        let mut store = ProofStore::new();
        let mut prover = PairWiseDifferenceProver::new(
            &pk.params,
            base_r.clone(),
            pk.base_s.clone(),
            c_i.clone(),
            c_j.clone(),
            &o_i,
            &o_j,
            0,
        )
        .unwrap();
        prover.pre_challenge(&mut rng, &mut store).unwrap();
        let c = prover.challenge::<Blake2b512>(b"nonce").unwrap();
        let mut proof = prover.post_challenge(&c, &mut store).unwrap();
        proof.hat_r = proof.hat_r.clone() << 400;

        let mut verifier_store = ProofStore::new();
        let outcome = proof
            .verify::<Blake2b512>(
                &pk.params,
                base_r,
                &pk.base_s,
                &c_i,
                &c_j,
                0,
                b"nonce",
                &mut verifier_store,
            )
            .unwrap();
        assert!(matches!(
            outcome,
            Verification::Rejected(RejectionReason::ResponseOutOfBound { index: 2, .. })
        ));
    }
}
