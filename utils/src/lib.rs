//! Number-theoretic primitives for the graph-signature crates: primality
//! testing and (safe-)prime generation, the extended Euclidean algorithm,
//! Jacobi symbols, the Chinese Remainder Theorem and fixed-bit-length
//! challenge hashing.
//!
//! All functions here are pure; randomized ones take the caller's
//! `R: RngCore` so that key generation and proof generation stay
//! deterministic under a seeded rng in tests.

pub mod crt;
pub mod error;
pub mod euclid;
pub mod hashing_utils;
pub mod jacobi;
pub mod primes;
pub mod sampling;

pub use crt::{crt_combine, crt_combine_precomputed, CrtCoefficients};
pub use error::NumberTheoryError;
pub use euclid::extended_euclid;
pub use jacobi::{is_quadratic_residue, jacobi_symbol};
pub use primes::{generate_prime, generate_safe_prime, is_probable_prime};
