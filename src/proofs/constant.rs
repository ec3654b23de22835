//! Constant Chaum-Pedersen proof that a ciphertext (alpha, beta) encrypts a known constant m, e.g.
//! that the aggregate of the selections in a contest adds up to the selection limit.
//!
//! statement: (alpha, beta), public key k, constant m
//! commit: a = g ** u, b = k ** u
//! challenge: c = H(alpha, beta, a, b)
//! response: v = u + c * r
//! verify:
//!     g ** v = a * alpha ** c
//!     (g ** (c * m)) * (k ** v) = b * beta ** c
use crate::{
    arithmetics::{ElementModP, ElementModQ, GroupParams},
    elgamal::ElGamalCiphertext,
    hash::hash_elems,
    nonces::Nonces,
    proofs::diagnostics::{report, Checks, DiagnosticsSink, ProofRecord, TracingSink},
    CONSTANT_PROOF_LABEL, MAX_CONSTANT,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Eq, PartialEq, Copy, Clone, Serialize, Deserialize)]
pub struct ConstantProof {
    pub a: ElementModP,
    pub b: ElementModP,
    pub c: ElementModQ,
    pub v: ElementModQ,

    /// The claimed plaintext. Signed so that out-of-range claims can be represented and rejected
    pub constant: i64,
}

/// Every check performed by [`ConstantProof::check`]
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub struct ConstantChecks {
    pub in_bounds_alpha: bool,
    pub in_bounds_beta: bool,
    pub in_bounds_a: bool,
    pub in_bounds_b: bool,
    pub in_bounds_c: bool,
    pub in_bounds_v: bool,
    pub in_bounds_constant: bool,
    pub sane_constant: bool,
    pub consistent_c: bool,
    pub consistent_gv: bool,
    pub consistent_kv: bool,
}

impl Checks for ConstantChecks {
    fn items(&self) -> Vec<(&'static str, bool)> {
        return vec![
            ("in_bounds_alpha", self.in_bounds_alpha),
            ("in_bounds_beta", self.in_bounds_beta),
            ("in_bounds_a", self.in_bounds_a),
            ("in_bounds_b", self.in_bounds_b),
            ("in_bounds_c", self.in_bounds_c),
            ("in_bounds_v", self.in_bounds_v),
            ("in_bounds_constant", self.in_bounds_constant),
            ("sane_constant", self.sane_constant),
            ("consistent_c", self.consistent_c),
            ("consistent_gv", self.consistent_gv),
            ("consistent_kv", self.consistent_kv),
        ];
    }
}

impl ConstantProof {
    /// Prove that the ciphertext, encrypted with (aggregate) nonce r under public key k, encrypts
    /// the constant. Deterministic in (ciphertext, constant, r, k, seed)
    pub fn prove(
        params: &GroupParams,
        ciphertext: &ElGamalCiphertext,
        constant: i64,
        r: &ElementModQ,
        k: &ElementModP,
        seed: &ElementModQ,
    ) -> Self {
        let ElGamalCiphertext { alpha, beta } = ciphertext;
        // nonce 0: commitment u
        let [u] = Nonces::new(params, seed, CONSTANT_PROOF_LABEL).draw::<1>();

        let a = params.g_pow_p(&u);
        let b = params.pow_p(k, &u);
        let c = hash_elems(params, &[alpha, beta, &a, &b]);
        let v = params.a_plus_bc_q(&u, &c, r);

        tracing::debug!(constant, c = %c, "made constant Chaum-Pedersen proof");
        return Self {
            a,
            b,
            c,
            v,
            constant,
        };
    }

    /// Run every check on the proof without reporting anything. The challenge is always
    /// recomputed from the transcript; the proof's own c must agree with it
    pub fn check(
        &self,
        params: &GroupParams,
        ciphertext: &ElGamalCiphertext,
        k: &ElementModP,
    ) -> ConstantChecks {
        let ElGamalCiphertext { alpha, beta } = ciphertext;
        let Self {
            a,
            b,
            c: claimed_c,
            v,
            constant,
        } = self;

        let (constant_q, in_bounds_constant) = match params.int_to_q(*constant) {
            Some(constant_q) => (constant_q, true),
            None => (ElementModQ::from_u64(0), false),
        };
        let c = hash_elems(params, &[alpha, beta, a, b]);
        let c_constant = params.mult_q(&c, &constant_q);

        let in_bounds_alpha = params.is_valid_residue(alpha);
        let in_bounds_a = params.is_valid_residue(a);
        let in_bounds_c = params.in_bounds_q(claimed_c);
        let in_bounds_v = params.in_bounds_q(v);

        return ConstantChecks {
            in_bounds_alpha,
            in_bounds_beta: params.is_valid_residue(beta),
            in_bounds_a,
            in_bounds_b: params.is_valid_residue(b),
            in_bounds_c,
            in_bounds_v,
            in_bounds_constant,
            sane_constant: (0..MAX_CONSTANT).contains(constant),
            consistent_c: c == *claimed_c,
            // g ** v = a * alpha ** c only counts over canonical inputs
            consistent_gv: in_bounds_v
                && in_bounds_a
                && in_bounds_alpha
                && in_bounds_c
                && params.g_pow_p(v) == params.mult_p(&[a, &params.pow_p(alpha, &c)]),
            consistent_kv: in_bounds_constant
                && params.mult_p(&[&params.g_pow_p(&c_constant), &params.pow_p(k, v)])
                    == params.mult_p(&[b, &params.pow_p(beta, &c)]),
        };
    }

    /// Verify the proof against the ciphertext and the election public key, reporting failures
    /// as `tracing` warnings
    pub fn verify(
        &self,
        params: &GroupParams,
        ciphertext: &ElGamalCiphertext,
        k: &ElementModP,
    ) -> bool {
        return self.verify_with(params, ciphertext, k, &TracingSink);
    }

    /// Verify the proof, reporting failures to the given sink
    pub fn verify_with(
        &self,
        params: &GroupParams,
        ciphertext: &ElGamalCiphertext,
        k: &ElementModP,
        sink: &dyn DiagnosticsSink,
    ) -> bool {
        let checks = self.check(params, ciphertext, k);
        return report(&checks, k, ProofRecord::Constant(*self), sink);
    }
}
