//! Chaum-Pedersen proofs for ElGamal encrypted ballot selections
use crypto_bigint::Uint;

/// Use the same big integer type everywhere
pub const LIMBS: usize = 4096 / 64; // 64 words each 64 bits, a total of 4096 bits
pub type BigInt = Uint<LIMBS>;

/// Width of the fixed big-endian encoding of a BigInt
pub const BIGINT_BYTES: usize = LIMBS * 8;

/// Largest tally a constant proof is allowed to claim (exclusive)
pub const MAX_CONSTANT: i64 = 1_000_000_000;

/// Nonce stream label of the disjunctive (zero or one) proof
pub const DISJUNCTIVE_PROOF_LABEL: &str = "disjoint-chaum-pedersen-proof";

/// Nonce stream label of the constant proof
pub const CONSTANT_PROOF_LABEL: &str = "constant-chaum-pedersen-proof";

pub mod arithmetics;
pub mod elgamal;
pub mod errors;
pub mod hash;
pub mod keys;
pub mod nonces;
pub mod proofs;

pub use arithmetics::{ElementModP, ElementModQ, GroupParams};
pub use elgamal::ElGamalCiphertext;
pub use errors::{GroupError, KeyError, ProofError};
pub use keys::ElGamalKeyPair;
pub use proofs::{
    constant::{ConstantChecks, ConstantProof},
    diagnostics::{Checks, Diagnostic, DiagnosticsSink, ProofRecord, TracingSink},
    disjunctive::{DisjunctiveChecks, DisjunctiveProof},
};
