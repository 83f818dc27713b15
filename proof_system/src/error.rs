use crate::proof_store::Urn;
use core::fmt;
use gs_crypto_utils::NumberTheoryError;
use qr_groups::GroupError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProofSystemError {
    /// A second `store` on an already-occupied URN
    AlreadyStored(Urn),
    /// `retrieve` on a URN nothing has stored under
    NotFound(Urn),
    /// The stored value under this URN has a different type than requested
    WrongValueType(Urn),
    UnequalWitnessAndSecretCount(usize, usize),
    SubProtocolAlreadyInitialized(&'static str),
    SubProtocolNotReadyToGenerateChallenge(&'static str),
    SubProtocolNotReadyToGenerateProof(&'static str),
    /// Pair-wise difference proof requires the two values to be coprime
    ValuesNotCoprime,
    Group(GroupError),
    NumberTheory(NumberTheoryError),
}

impl From<GroupError> for ProofSystemError {
    fn from(e: GroupError) -> Self {
        Self::Group(e)
    }
}

impl From<NumberTheoryError> for ProofSystemError {
    fn from(e: NumberTheoryError) -> Self {
        Self::NumberTheory(e)
    }
}

impl fmt::Display for ProofSystemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyStored(urn) => write!(f, "urn {} already stored", urn),
            Self::NotFound(urn) => write!(f, "urn {} not found", urn),
            Self::WrongValueType(urn) => write!(f, "urn {} holds a different value type", urn),
            Self::UnequalWitnessAndSecretCount(w, s) => {
                write!(f, "{} witnesses for {} secrets", w, s)
            }
            Self::SubProtocolAlreadyInitialized(p) => {
                write!(f, "{} already initialized", p)
            }
            Self::SubProtocolNotReadyToGenerateChallenge(p) => {
                write!(f, "{} has not run its pre-challenge phase", p)
            }
            Self::SubProtocolNotReadyToGenerateProof(p) => {
                write!(f, "{} has no witness state for the response phase", p)
            }
            Self::ValuesNotCoprime => {
                write!(f, "pair-wise difference requires coprime values")
            }
            Self::Group(e) => write!(f, "{}", e),
            Self::NumberTheory(e) => write!(f, "{}", e),
        }
    }
}
