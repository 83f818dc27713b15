//! The per-session blackboard. Witnesses, the challenge and responses are
//! addressed by typed URNs built from a proof role, a variable name and an
//! optional index; a key, once stored, is immutable until removed.

use crate::error::ProofSystemError;
use core::fmt;
use num_bigint::BigInt;
use std::borrow::Cow;
use qr_groups::QrElement;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The proof component a URN belongs to. One namespace per role keeps
/// independently built components from colliding on one blackboard.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum ProofRole {
    GroupSetupProver,
    GroupSetupVerifier,
    PossessionProver,
    PossessionVerifier,
    CommitmentProver,
    CommitmentVerifier,
    SigningQProver,
    SigningQVerifier,
    PairWiseProver,
    PairWiseVerifier,
}

impl ProofRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GroupSetupProver => "groupsetupprover",
            Self::GroupSetupVerifier => "groupsetupverifier",
            Self::PossessionProver => "possessionprover",
            Self::PossessionVerifier => "possessionverifier",
            Self::CommitmentProver => "commitmentprover",
            Self::CommitmentVerifier => "commitmentverifier",
            Self::SigningQProver => "signingqprover",
            Self::SigningQVerifier => "signingqverifier",
            Self::PairWiseProver => "pairwiseprover",
            Self::PairWiseVerifier => "pairwiseverifier",
        }
    }
}

/// Hierarchical key: role namespace, dotted variable path, optional index.
/// Constructed through [`Urn::new`] / [`Urn::indexed`] only, never by string
/// concatenation, so the set of addressable variables stays checkable.
#[derive(
    Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Urn {
    role: ProofRole,
    name: Cow<'static, str>,
    index: Option<u32>,
}

impl Urn {
    pub fn new(role: ProofRole, name: &'static str) -> Self {
        Self {
            role,
            name: Cow::Borrowed(name),
            index: None,
        }
    }

    pub fn indexed(role: ProofRole, name: &'static str, index: u32) -> Self {
        Self {
            role,
            name: Cow::Borrowed(name),
            index: Some(index),
        }
    }

    pub fn role(&self) -> ProofRole {
        self.role
    }
}

impl fmt::Display for Urn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(i) => write!(f, "urn:gs:{}:{}:{}", self.role.as_str(), self.name, i),
            None => write!(f, "urn:gs:{}:{}", self.role.as_str(), self.name),
        }
    }
}

/// A value on the blackboard: an integer, a group element, or a nested map
/// (used by serialized proof signatures that bundle sub-proofs).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProofValue {
    Integer(BigInt),
    Element(QrElement),
    Map(BTreeMap<String, ProofValue>),
}

/// One blackboard per protocol session (one per prover or verifier role
/// instance), discarded at session end. Stores are immutable per key:
/// `remove` followed by `store` is the only way to overwrite.
#[derive(Clone, Debug, Default)]
pub struct ProofStore {
    values: BTreeMap<Urn, ProofValue>,
}

impl ProofStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&mut self, urn: Urn, value: ProofValue) -> Result<(), ProofSystemError> {
        if self.values.contains_key(&urn) {
            return Err(ProofSystemError::AlreadyStored(urn));
        }
        self.values.insert(urn, value);
        Ok(())
    }

    pub fn retrieve(&self, urn: &Urn) -> Result<&ProofValue, ProofSystemError> {
        self.values
            .get(urn)
            .ok_or_else(|| ProofSystemError::NotFound(urn.clone()))
    }

    pub fn retrieve_integer(&self, urn: &Urn) -> Result<&BigInt, ProofSystemError> {
        match self.retrieve(urn)? {
            ProofValue::Integer(i) => Ok(i),
            _ => Err(ProofSystemError::WrongValueType(urn.clone())),
        }
    }

    pub fn retrieve_element(&self, urn: &Urn) -> Result<&QrElement, ProofSystemError> {
        match self.retrieve(urn)? {
            ProofValue::Element(e) => Ok(e),
            _ => Err(ProofSystemError::WrongValueType(urn.clone())),
        }
    }

    pub fn remove(&mut self, urn: &Urn) -> Option<ProofValue> {
        self.values.remove(urn)
    }

    pub fn size(&self) -> usize {
        self.values.len()
    }

    /// All entries under one role's namespace, in URN order.
    pub fn entries_for_role(
        &self,
        role: ProofRole,
    ) -> impl Iterator<Item = (&Urn, &ProofValue)> {
        self.values.iter().filter(move |(urn, _)| urn.role == role)
    }
}

/// The serializable output of a completed proof: an ordered URN to value
/// map, produced once by the prover and consumed once by the verifier.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ProofSignature {
    #[serde(with = "urn_map_serde")]
    values: BTreeMap<Urn, ProofValue>,
}

/// URN-keyed maps travel as ordered sequences of pairs, since structured
/// keys are not representable in every serde format.
mod urn_map_serde {
    use super::{ProofValue, Urn};
    use serde::{Deserialize, Deserializer, Serializer};
    use std::collections::BTreeMap;

    pub fn serialize<S: Serializer>(
        map: &BTreeMap<Urn, ProofValue>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(map.iter())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<Urn, ProofValue>, D::Error> {
        let entries: Vec<(Urn, ProofValue)> = Deserialize::deserialize(deserializer)?;
        Ok(entries.into_iter().collect())
    }
}

impl ProofSignature {
    /// Snapshots one role's namespace out of a session store.
    pub fn from_store(store: &ProofStore, role: ProofRole) -> Self {
        Self {
            values: store
                .entries_for_role(role)
                .map(|(u, v)| (u.clone(), v.clone()))
                .collect(),
        }
    }

    pub fn get(&self, urn: &Urn) -> Option<&ProofValue> {
        self.values.get(urn)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Urn, &ProofValue)> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(i: i64) -> ProofValue {
        ProofValue::Integer(BigInt::from(i))
    }

    #[test]
    fn double_store_fails() {
        let mut store = ProofStore::new();
        let urn = Urn::new(ProofRole::PossessionProver, "witnesses.tilde_e");
        store.store(urn.clone(), int(1)).unwrap();
        assert_eq!(
            store.store(urn.clone(), int(2)).unwrap_err(),
            ProofSystemError::AlreadyStored(urn)
        );
    }

    #[test]
    fn retrieve_missing_fails() {
        let store = ProofStore::new();
        let urn = Urn::new(ProofRole::PossessionVerifier, "responses.hat_e");
        assert_eq!(
            store.retrieve(&urn).unwrap_err(),
            ProofSystemError::NotFound(urn)
        );
    }

    #[test]
    fn remove_then_store_succeeds() {
        let mut store = ProofStore::new();
        let urn = Urn::indexed(ProofRole::GroupSetupProver, "witnesses.tilde_x", 3);
        store.store(urn.clone(), int(1)).unwrap();
        assert!(store.remove(&urn).is_some());
        store.store(urn.clone(), int(2)).unwrap();
        assert_eq!(store.retrieve_integer(&urn).unwrap(), &BigInt::from(2));
        assert_eq!(store.size(), 1);
    }

    #[test]
    fn typed_retrieval_checks_the_variant() {
        let mut store = ProofStore::new();
        let urn = Urn::new(ProofRole::CommitmentProver, "witnesses.tilde_c");
        store.store(urn.clone(), int(7)).unwrap();
        assert_eq!(
            store.retrieve_element(&urn).unwrap_err(),
            ProofSystemError::WrongValueType(urn)
        );
    }

    #[test]
    fn indexed_urns_are_distinct() {
        let mut store = ProofStore::new();
        for i in 0..4 {
            store
                .store(
                    Urn::indexed(ProofRole::GroupSetupProver, "witnesses.tilde_x", i),
                    int(i as i64),
                )
                .unwrap();
        }
        assert_eq!(store.size(), 4);
        assert_eq!(
            store
                .entries_for_role(ProofRole::GroupSetupProver)
                .count(),
            4
        );
    }

    #[test]
    fn nested_maps_round_trip() {
        let mut inner = BTreeMap::new();
        inner.insert("hat_m".to_string(), int(9));
        let mut store = ProofStore::new();
        store
            .store(
                Urn::new(ProofRole::CommitmentProver, "bundle"),
                ProofValue::Map(inner),
            )
            .unwrap();
        let sig = ProofSignature::from_store(&store, ProofRole::CommitmentProver);
        let json = serde_json::to_string(&sig).unwrap();
        let back: ProofSignature = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sig);
    }

    #[test]
    fn proof_signature_snapshot_and_serde() {
        let mut store = ProofStore::new();
        store
            .store(Urn::new(ProofRole::PossessionProver, "responses.hat_e"), int(5))
            .unwrap();
        store
            .store(Urn::new(ProofRole::CommitmentProver, "responses.hat_m"), int(6))
            .unwrap();
        let sig = ProofSignature::from_store(&store, ProofRole::PossessionProver);
        assert_eq!(sig.len(), 1);
        let json = serde_json::to_string(&sig).unwrap();
        let back: ProofSignature = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sig);
    }
}
