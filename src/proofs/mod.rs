//! Non-interactive Chaum-Pedersen proofs over ElGamal ciphertexts, made offline using
//! Fiat-Shamir. Builders are deterministic in their seed; verifiers never fail loudly and
//! instead report every individual check to a diagnostics sink.

pub mod constant; // prove that the ciphertext encrypts a known constant
pub mod diagnostics;
pub mod disjunctive; // prove that the ciphertext encrypts zero or one
