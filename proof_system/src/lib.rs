//! Zero-knowledge proofs over graph signatures, composed from one generic
//! Sigma-protocol engine.
//!
//! Every proof in this crate follows the same three phases, driven explicitly
//! by the caller: a pre-challenge phase committing to witness randomness
//! (`tilde` values), a Fiat-Shamir challenge hashed over a protocol-fixed
//! context list, and a post-challenge phase producing responses (`hat`
//! values). Verification either recomputes the witness commitment and
//! compares it, or recomputes the challenge from the reconstructed
//! commitment; both are used, per variant, as specified by the protocol.
//!
//! Proof components exchange their `tilde` and `hat` values through a
//! [`ProofStore`], a per-session blackboard keyed by typed [`Urn`]s, so
//! independently built components compose without direct coupling.
//!
//! Soundness rejections (out-of-bound responses, challenge mismatches) are
//! ordinary [`Verification`] values, never errors: callers branch on proof
//! validity as control flow, while arithmetic and state errors propagate as
//! [`ProofSystemError`].
//!
//! [`ProofStore`]: crate::proof_store::ProofStore
//! [`Urn`]: crate::proof_store::Urn
//! [`Verification`]: crate::sigma::Verification
//! [`ProofSystemError`]: crate::error::ProofSystemError

pub mod challenge;
pub mod error;
pub mod proof_store;
pub mod sigma;
pub mod sub_protocols;

pub mod prelude {
    pub use crate::challenge::ChallengeContext;
    pub use crate::error::ProofSystemError;
    pub use crate::proof_store::{ProofRole, ProofSignature, ProofStore, ProofValue, Urn};
    pub use crate::sigma::{RejectionReason, SigmaCommitment, SigmaResponse, Verification};
    pub use crate::sub_protocols::commitment::*;
    pub use crate::sub_protocols::group_setup::*;
    pub use crate::sub_protocols::pairwise_difference::*;
    pub use crate::sub_protocols::possession::*;
    pub use crate::sub_protocols::signing_q::*;
}
