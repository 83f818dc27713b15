//! The proof variants. Each fixes its set of secret exponents and bases,
//! the per-exponent response bound, and the exact context-list ordering of
//! its Fiat-Shamir challenge, and drives the generic engine in
//! [`crate::sigma`] through explicit pre-challenge / challenge /
//! post-challenge phases.

pub mod commitment;
pub mod group_setup;
pub mod pairwise_difference;
pub mod possession;
pub mod signing_q;
