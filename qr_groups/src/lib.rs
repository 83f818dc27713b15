//! Group algebra over special-RSA-modulus quadratic-residue groups, plus the
//! key material built on top of it for Camenisch-Lysyanskaya-style graph
//! signatures.
//!
//! The same subgroup `QR_N` is exposed through two capability-distinct
//! handles: [`QrGroupPq`] carries the factorization of `N` and computes
//! every operation through two half-width CRT components, while [`QrGroupN`]
//! knows the modulus only and can never answer [`QrGroup::order`]. Holder- and
//! verifier-side code receives the latter, so factorization-revealing values
//! are unrepresentable there rather than merely unchecked.
//!
//! [`setup`] generates the special RSA modulus and the signer's bases
//! `S, Z, R_0, {R_i}, {R_{i,j}}` (retaining their discrete logs for the
//! group-setup proof), and [`signature`] issues `(A, e, v)` over an encoded
//! graph.

pub mod element;
pub mod error;
pub mod group_n;
pub mod group_pq;
pub mod prime_order;
pub mod setup;
pub mod signature;

pub use element::{QrElement, QrGroup};
pub use error::GroupError;
pub use group_n::QrGroupN;
pub use group_pq::QrGroupPq;
pub use prime_order::{PrimeOrderElement, PrimeOrderGroup};
pub use setup::{KeyPair, Parameters, SignerPublicKey, SignerSecretKey, SpecialRsaModulus};
pub use signature::{EncodedGraph, GraphSignature, PreSignature};
