//! Full protocol run at test scale: key generation, group-setup proof,
//! issuance with the signing-Q correctness proof, commitment openings with a
//! pairwise-difference proof, and a possession proof over the issued
//! signature, all against one 512-bit special RSA modulus.

use blake2::Blake2b512;
use graph_proof_system::prelude::*;
use num_integer::Integer;
use num_traits::{One, Zero};
use qr_groups::signature::issue;
use qr_groups::{EncodedGraph, KeyPair, Parameters};
use rand::{rngs::StdRng, SeedableRng};

fn test_key(rng: &mut StdRng, vertices: usize, edges: usize) -> KeyPair {
    let mut params = Parameters::with_modulus_length(512);
    params.l_m = 48;
    params.l_e = 160;
    params.l_prime_e = 80;
    params.l_v = 256;
    params.l_statzk = 16;
    params.l_h = 80;
    KeyPair::generate(rng, params, vertices, edges).unwrap()
}

#[test]
fn group_setup_round_trip() {
    let mut rng = StdRng::seed_from_u64(200);
    let key_pair = test_key(&mut rng, 2, 1);

    let mut prover_store = ProofStore::new();
    let mut prover = GroupSetupProver::new(&key_pair);
    prover.pre_challenge(&mut rng, &mut prover_store).unwrap();
    let c = prover.challenge::<Blake2b512>(b"setup").unwrap();
    let proof = prover.post_challenge(&c, &mut prover_store).unwrap();

    let mut verifier_store = ProofStore::new();
    assert!(proof
        .verify::<Blake2b512>(&key_pair.public, b"setup", &mut verifier_store)
        .unwrap()
        .is_accepted());

    // same proof against a key with one corrupted base must be rejected
    let mut corrupted = key_pair.public.clone();
    corrupted.base_r_0 = corrupted.base_r_0.multiply(&corrupted.base_s).unwrap();
    let mut store = ProofStore::new();
    assert!(!proof
        .verify::<Blake2b512>(&corrupted, b"setup", &mut store)
        .unwrap()
        .is_accepted());
}

#[test]
fn issuance_with_signing_q_correctness() {
    let mut rng = StdRng::seed_from_u64(201);
    let key_pair = test_key(&mut rng, 2, 1);
    let graph = EncodedGraph::random(&mut rng, &key_pair.public.params, 2, 1);
    let (sig, pre) = issue(&mut rng, &key_pair, &graph).unwrap();
    assert!(sig.verify(&key_pair.public, &graph).unwrap());

    let mut signer_store = ProofStore::new();
    let mut prover = SigningQProver::new(&key_pair, &pre, &sig);
    prover.pre_challenge(&mut rng, &mut signer_store).unwrap();
    let c = prover.challenge::<Blake2b512>(b"issuance").unwrap();
    let proof = prover.post_challenge(&c, &mut signer_store).unwrap();

    // the recipient re-derives Q from public values before checking the
    // proof, exactly as it would on receipt of (A, e, v)
    let params = &key_pair.public.params;
    let q_received = pre
        .q
        .clone()
        .into_group(&key_pair.signing_group.to_public())
        .unwrap();
    let mut recipient_store = ProofStore::new();
    assert!(proof
        .verify::<Blake2b512>(
            &key_pair.public.modulus,
            params.l_n,
            params.l_h,
            &q_received,
            &sig.a,
            b"issuance",
            &mut recipient_store,
        )
        .unwrap()
        .is_accepted());
}

#[test]
fn possession_of_issued_signature() {
    let mut rng = StdRng::seed_from_u64(202);
    let key_pair = test_key(&mut rng, 2, 1);
    let graph = EncodedGraph::random(&mut rng, &key_pair.public.params, 2, 1);
    let (sig, _) = issue(&mut rng, &key_pair, &graph).unwrap();

    let mut holder_store = ProofStore::new();
    let mut prover =
        PossessionProver::new(&mut rng, &key_pair.public, &sig, &graph).unwrap();
    prover.pre_challenge(&mut rng, &mut holder_store).unwrap();
    let c = prover.challenge::<Blake2b512>(b"present").unwrap();
    let proof = prover.post_challenge(&c, &mut holder_store).unwrap();

    let mut verifier_store = ProofStore::new();
    assert!(proof
        .verify::<Blake2b512>(&key_pair.public, 2, 1, b"present", &mut verifier_store)
        .unwrap()
        .is_accepted());

    // an oversized response must be rejected, never accepted or panicked on
    let mut forged = proof.clone();
    forged.responses[1] = forged.responses[1].clone() << 600;
    let mut store = ProofStore::new();
    assert!(matches!(
        forged
            .verify::<Blake2b512>(&key_pair.public, 2, 1, b"present", &mut store)
            .unwrap(),
        Verification::Rejected(RejectionReason::ResponseOutOfBound { index: 1, .. })
    ));

    // and a replay under a different nonce fails challenge recomputation
    let mut store = ProofStore::new();
    assert!(matches!(
        proof
            .verify::<Blake2b512>(&key_pair.public, 2, 1, b"other-nonce", &mut store)
            .unwrap(),
        Verification::Rejected(RejectionReason::ChallengeMismatch)
    ));
}

#[test]
fn committed_vertices_shown_pairwise_distinct() {
    let mut rng = StdRng::seed_from_u64(203);
    let key_pair = test_key(&mut rng, 2, 0);
    let pk = &key_pair.public;
    let params = &pk.params;

    let (m_i, m_j) = loop {
        let m_i = gs_crypto_utils::sampling::random_of_bit_length(&mut rng, params.l_m);
        let m_j = gs_crypto_utils::sampling::random_of_bit_length(&mut rng, params.l_m);
        if !m_i.is_zero() && !m_j.is_zero() && m_i.gcd(&m_j).is_one() {
            break (m_i, m_j);
        }
    };
    let base_r = &pk.bases_r_vertex[0];
    let (c_i, o_i) = commit(&mut rng, params, base_r, &pk.base_s, &m_i).unwrap();
    let (c_j, o_j) = commit(&mut rng, params, base_r, &pk.base_s, &m_j).unwrap();

    let mut prover_store = ProofStore::new();

    // opening proofs for both commitments, sharing the store
    let mut opening_proofs = Vec::new();
    for (index, (c, o)) in [(&c_i, &o_i), (&c_j, &o_j)].iter().enumerate() {
        let mut prover = CommitmentProver::new(
            params,
            base_r.clone(),
            pk.base_s.clone(),
            (*c).clone(),
            o,
            index as u32,
        );
        prover.pre_challenge(&mut rng, &mut prover_store).unwrap();
        let ch = prover.challenge::<Blake2b512>(b"open").unwrap();
        opening_proofs.push((index as u32, (*c).clone(), prover.post_challenge(&ch, &mut prover_store).unwrap()));
    }

    let mut pairwise = PairWiseDifferenceProver::new(
        params,
        base_r.clone(),
        pk.base_s.clone(),
        c_i.clone(),
        c_j.clone(),
        &o_i,
        &o_j,
        0,
    )
    .unwrap();
    pairwise.pre_challenge(&mut rng, &mut prover_store).unwrap();
    let ch = pairwise.challenge::<Blake2b512>(b"distinct").unwrap();
    let pairwise_proof = pairwise.post_challenge(&ch, &mut prover_store).unwrap();

    let mut verifier_store = ProofStore::new();
    for (index, c, proof) in &opening_proofs {
        assert!(proof
            .verify::<Blake2b512>(
                params,
                base_r,
                &pk.base_s,
                c,
                *index,
                b"open",
                &mut verifier_store,
            )
            .unwrap()
            .is_accepted());
    }
    assert!(pairwise_proof
        .verify::<Blake2b512>(
            params,
            base_r,
            &pk.base_s,
            &c_i,
            &c_j,
            0,
            b"distinct",
            &mut verifier_store,
        )
        .unwrap()
        .is_accepted());
}

#[test]
fn proof_signature_snapshot_travels() {
    let mut rng = StdRng::seed_from_u64(204);
    let key_pair = test_key(&mut rng, 1, 0);
    let graph = EncodedGraph::random(&mut rng, &key_pair.public.params, 1, 0);
    let (sig, _) = issue(&mut rng, &key_pair, &graph).unwrap();

    let mut store = ProofStore::new();
    let mut prover =
        PossessionProver::new(&mut rng, &key_pair.public, &sig, &graph).unwrap();
    prover.pre_challenge(&mut rng, &mut store).unwrap();
    let c = prover.challenge::<Blake2b512>(b"n").unwrap();
    prover.post_challenge(&c, &mut store).unwrap();

    let snapshot = ProofSignature::from_store(&store, ProofRole::PossessionProver);
    let json = serde_json::to_string(&snapshot).unwrap();
    let back: ProofSignature = serde_json::from_str(&json).unwrap();
    assert_eq!(back, snapshot);

    // responses survive the round trip with their values intact
    let urn = Urn::new(ProofRole::PossessionProver, "responses.hat_e");
    let hat_e = store.retrieve_integer(&urn).unwrap();
    match back.get(&urn) {
        Some(ProofValue::Integer(v)) => assert_eq!(v, hat_e),
        other => panic!("unexpected value for {}: {:?}", urn, other),
    }
}

#[test]
fn fresh_challenge_per_session() {
    // two sessions over the same key and graph produce unlinkable proofs
    let mut rng = StdRng::seed_from_u64(205);
    let key_pair = test_key(&mut rng, 1, 0);
    let graph = EncodedGraph::random(&mut rng, &key_pair.public.params, 1, 0);
    let (sig, _) = issue(&mut rng, &key_pair, &graph).unwrap();

    let run = |rng: &mut StdRng| {
        let mut store = ProofStore::new();
        let mut prover = PossessionProver::new(rng, &key_pair.public, &sig, &graph).unwrap();
        prover.pre_challenge(rng, &mut store).unwrap();
        let c = prover.challenge::<Blake2b512>(b"n").unwrap();
        let proof = prover.post_challenge(&c, &mut store).unwrap();
        (c, proof)
    };
    let (c1, p1) = run(&mut rng);
    let (c2, p2) = run(&mut rng);
    assert_ne!(c1, c2);
    assert_ne!(p1.a_prime.value(), p2.a_prime.value());
    assert_ne!(p1.responses[0], p2.responses[0]);
}
