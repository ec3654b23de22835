use thiserror::Error;

/// The group parameters (P, Q, g) do not describe a usable Schnorr group
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GroupError {
    #[error("modulus must be odd")]
    EvenModulus,

    #[error("modulus must be greater than one")]
    ModulusTooSmall,

    #[error("subgroup order Q must be smaller than P")]
    SubgroupTooLarge,

    #[error("subgroup order Q does not divide P - 1")]
    SubgroupOrderMismatch,

    #[error("generator is not an element of order Q")]
    InvalidGenerator,

    #[error("integer does not fit in {0} bytes")]
    Overflow(usize),

    #[error("requested bit lengths q={q_bits}, p={p_bits} are not usable")]
    InvalidBitLength { q_bits: usize, p_bits: usize },

    #[error(transparent)]
    Hex(#[from] hex::FromHexError),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    #[error("secret key must lie in [2, Q)")]
    SecretOutOfRange,
}

/// Misuse of a proof builder. These are programming errors, never the outcome of verifying a
/// proof
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProofError {
    #[error("disjunctive proofs only support plaintexts of 0 or 1, got {0}")]
    PlaintextOutOfRange(u64),
}
