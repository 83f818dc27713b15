//! The generic Sigma-protocol engine: witness commitment, response
//! computation and the soundness-gated verification that every proof
//! variant instantiates.

use crate::error::ProofSystemError;
use num_bigint::{BigInt, BigUint};
use num_traits::Zero;
use qr_groups::QrElement;
use rand::RngCore;
use zeroize::Zeroize;

/// Outcome of verifying a proof. Soundness failures are values, not errors:
/// an oversized response or a wrong challenge is adversarial input the
/// caller branches on, never something to raise past the engine boundary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Verification {
    Accepted,
    Rejected(RejectionReason),
}

impl Verification {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RejectionReason {
    /// A response fell outside `[-2^L + 1, 2^L - 1]` for its bound `L`
    ResponseOutOfBound { index: usize, bound_bits: u64 },
    /// The recomputed witness commitment differs from the transmitted one
    CommitmentMismatch,
    /// The challenge recomputed from the reconstructed commitment differs
    ChallengeMismatch,
    ResponseCountMismatch { expected: usize, got: usize },
}

/// `|value| <= 2^bound_bits - 1`.
pub fn within_bound(value: &BigInt, bound_bits: u64) -> bool {
    value.magnitude().bits() <= bound_bits
}

/// Pre-challenge state: the sampled witness randomness (`tilde` values) and
/// the witness commitment `t = ∏ bases[i]^{tilde[i]}`. The randomness is
/// zeroized when the protocol state is dropped.
#[derive(Clone, Debug)]
pub struct SigmaCommitment {
    pub randomness: Vec<BigInt>,
    pub t: QrElement,
}

impl SigmaCommitment {
    /// Samples `tilde[i]` uniformly from `[0, 2^{witness_bits[i]})`, a range
    /// wider than the secret's legal range by the statistical-hiding margin
    /// `l_statzk + l_H + 1` (the caller folds it into `witness_bits`), and
    /// commits to all of them in one multi-exponentiation.
    pub fn new<R: RngCore>(
        rng: &mut R,
        bases: &[QrElement],
        witness_bits: &[u64],
    ) -> Result<Self, ProofSystemError> {
        if bases.len() != witness_bits.len() {
            return Err(ProofSystemError::UnequalWitnessAndSecretCount(
                witness_bits.len(),
                bases.len(),
            ));
        }
        let randomness: Vec<BigInt> = witness_bits
            .iter()
            .map(|bits| gs_crypto_utils::sampling::random_of_bit_length(rng, *bits).into())
            .collect();
        let t = QrElement::multi_base_exp(bases, &randomness)?;
        Ok(Self { randomness, t })
    }

    /// `hat[i] = tilde[i] + c * x[i]`, over the integers.
    pub fn response(
        &self,
        secrets: &[BigInt],
        challenge: &BigUint,
    ) -> Result<SigmaResponse, ProofSystemError> {
        if self.randomness.len() != secrets.len() {
            return Err(ProofSystemError::UnequalWitnessAndSecretCount(
                self.randomness.len(),
                secrets.len(),
            ));
        }
        let c = BigInt::from(challenge.clone());
        Ok(SigmaResponse(
            self.randomness
                .iter()
                .zip(secrets)
                .map(|(tilde, x)| tilde + &c * x)
                .collect(),
        ))
    }

    /// Response for order-sensitive exponents, reduced modulo the group
    /// order the prover knows.
    pub fn response_mod_order(
        &self,
        secrets: &[BigInt],
        challenge: &BigUint,
        order: &BigUint,
    ) -> Result<SigmaResponse, ProofSystemError> {
        let order = BigInt::from(order.clone());
        let responses = self.response(secrets, challenge)?;
        Ok(SigmaResponse(
            responses
                .0
                .iter()
                .map(|hat| ((hat % &order) + &order) % &order)
                .collect(),
        ))
    }
}

impl Zeroize for SigmaCommitment {
    fn zeroize(&mut self) {
        for tilde in self.randomness.iter_mut() {
            *tilde = BigInt::zero();
        }
    }
}

impl Drop for SigmaCommitment {
    fn drop(&mut self) {
        self.zeroize();
    }
}

/// Post-challenge responses (`hat` values).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SigmaResponse(pub Vec<BigInt>);

impl SigmaResponse {
    /// The soundness length gate: every response must lie within its
    /// protocol-defined bound before any algebra is checked.
    pub fn check_bounds(&self, bound_bits: &[u64]) -> Verification {
        if self.0.len() != bound_bits.len() {
            return Verification::Rejected(RejectionReason::ResponseCountMismatch {
                expected: bound_bits.len(),
                got: self.0.len(),
            });
        }
        for (index, (hat, bound)) in self.0.iter().zip(bound_bits).enumerate() {
            if !within_bound(hat, *bound) {
                return Verification::Rejected(RejectionReason::ResponseOutOfBound {
                    index,
                    bound_bits: *bound,
                });
            }
        }
        Verification::Accepted
    }

    /// Reconstructs the witness commitment from the responses:
    /// `t' = target^{-c} * ∏ bases[i]^{hat[i]}`. Used directly by
    /// commitment-equality variants and as the input to challenge
    /// recomputation by the others.
    pub fn recompute_commitment(
        &self,
        bases: &[QrElement],
        target: &QrElement,
        challenge: &BigUint,
    ) -> Result<QrElement, ProofSystemError> {
        let minus_c = -BigInt::from(challenge.clone());
        let target_part = target.mod_pow(&minus_c)?;
        let base_part = QrElement::multi_base_exp(bases, &self.0)?;
        Ok(target_part.multiply(&base_part)?)
    }

    /// Full verification in the commitment-equality formulation: length
    /// gate, then `t' == t`.
    pub fn verify(
        &self,
        bases: &[QrElement],
        target: &QrElement,
        t: &QrElement,
        challenge: &BigUint,
        bound_bits: &[u64],
    ) -> Result<Verification, ProofSystemError> {
        if let rejected @ Verification::Rejected(_) = self.check_bounds(bound_bits) {
            return Ok(rejected);
        }
        let recomputed = self.recompute_commitment(bases, target, challenge)?;
        if &recomputed == t {
            Ok(Verification::Accepted)
        } else {
            Ok(Verification::Rejected(RejectionReason::CommitmentMismatch))
        }
    }
}
