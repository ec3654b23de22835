//! Disjunctive Chaum-Pedersen proof that a ciphertext (alpha, beta) encrypts either zero or one,
//! without revealing which.
//!
//! The proof runs two sigma protocols side by side. Branch 0 proves that beta = k ** r, i.e. the
//! plaintext is zero; branch 1 proves that beta / g = k ** r, i.e. the plaintext is one. The prover
//! knows r, so it runs the true branch honestly and simulates the other one by picking that
//! branch's challenge and response first and solving for its commitment. Binding the sum of the
//! two challenges to the Fiat-Shamir challenge c = H(alpha, beta, a0, b0, a1, b1) leaves the
//! prover free to choose only one of them.
//!
//! statement: (alpha, beta), public key k
//! commit: (a0, b0), (a1, b1)
//! challenge: c = c0 + c1
//! response: v0, v1
//! verify:
//!     g ** v0 = a0 * alpha ** c0
//!     g ** v1 = a1 * alpha ** c1
//!     k ** v0 = b0 * beta ** c0
//!     (g ** c1) * (k ** v1) = b1 * beta ** c1
use crate::{
    arithmetics::{ElementModP, ElementModQ, GroupParams},
    elgamal::ElGamalCiphertext,
    errors::ProofError,
    hash::hash_elems,
    nonces::Nonces,
    proofs::diagnostics::{report, Checks, DiagnosticsSink, ProofRecord, TracingSink},
    DISJUNCTIVE_PROOF_LABEL,
};
use serde::{Deserialize, Serialize};

/// The transcript of a zero-or-one proof. Both branches have the same shape regardless of which
/// one was simulated
#[derive(Debug, Eq, PartialEq, Copy, Clone, Serialize, Deserialize)]
pub struct DisjunctiveProof {
    pub a0: ElementModP,
    pub b0: ElementModP,
    pub a1: ElementModP,
    pub b1: ElementModP,
    pub c0: ElementModQ,
    pub c1: ElementModQ,
    pub v0: ElementModQ,
    pub v1: ElementModQ,
}

/// Every check performed by [`DisjunctiveProof::check`]
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub struct DisjunctiveChecks {
    pub in_bounds_alpha: bool,
    pub in_bounds_beta: bool,
    pub in_bounds_a0: bool,
    pub in_bounds_b0: bool,
    pub in_bounds_a1: bool,
    pub in_bounds_b1: bool,
    pub in_bounds_c0: bool,
    pub in_bounds_c1: bool,
    pub in_bounds_v0: bool,
    pub in_bounds_v1: bool,
    pub consistent_c: bool,
    pub consistent_gv0: bool,
    pub consistent_gv1: bool,
    pub consistent_kv0: bool,
    pub consistent_gc1kv1: bool,
}

impl Checks for DisjunctiveChecks {
    fn items(&self) -> Vec<(&'static str, bool)> {
        return vec![
            ("in_bounds_alpha", self.in_bounds_alpha),
            ("in_bounds_beta", self.in_bounds_beta),
            ("in_bounds_a0", self.in_bounds_a0),
            ("in_bounds_b0", self.in_bounds_b0),
            ("in_bounds_a1", self.in_bounds_a1),
            ("in_bounds_b1", self.in_bounds_b1),
            ("in_bounds_c0", self.in_bounds_c0),
            ("in_bounds_c1", self.in_bounds_c1),
            ("in_bounds_v0", self.in_bounds_v0),
            ("in_bounds_v1", self.in_bounds_v1),
            ("consistent_c", self.consistent_c),
            ("consistent_gv0", self.consistent_gv0),
            ("consistent_gv1", self.consistent_gv1),
            ("consistent_kv0", self.consistent_kv0),
            ("consistent_gc1kv1", self.consistent_gc1kv1),
        ];
    }
}

impl DisjunctiveProof {
    /// Prove that the ciphertext, encrypted with nonce r under public key k, encrypts the given
    /// plaintext and that the plaintext is zero or one. Any other plaintext is a misuse and is
    /// rejected before any computation.
    ///
    /// The proof is deterministic in (ciphertext, r, k, seed, plaintext).
    pub fn prove(
        params: &GroupParams,
        ciphertext: &ElGamalCiphertext,
        r: &ElementModQ,
        k: &ElementModP,
        seed: &ElementModQ,
        plaintext: u64,
    ) -> Result<Self, ProofError> {
        let proof = match plaintext {
            0 => Self::prove_zero(params, ciphertext, r, k, seed),
            1 => Self::prove_one(params, ciphertext, r, k, seed),
            _ => return Err(ProofError::PlaintextOutOfRange(plaintext)),
        };
        tracing::debug!(c0 = %proof.c0, c1 = %proof.c1, "made disjunctive Chaum-Pedersen proof");
        return Ok(proof);
    }

    /// Branch 0 is real, branch 1 is simulated
    fn prove_zero(
        params: &GroupParams,
        ciphertext: &ElGamalCiphertext,
        r: &ElementModQ,
        k: &ElementModP,
        seed: &ElementModQ,
    ) -> Self {
        let ElGamalCiphertext { alpha, beta } = ciphertext;
        // nonce 0: simulated challenge c1, nonce 1: simulated response v1, nonce 2: commitment u0
        let [c1, v1, u0] = Nonces::new(params, seed, DISJUNCTIVE_PROOF_LABEL).draw::<3>();

        let neg_c1 = params.negate_q(&c1);
        let a0 = params.g_pow_p(&u0);
        let b0 = params.pow_p(k, &u0);
        let a1 = params.mult_p(&[&params.g_pow_p(&v1), &params.pow_p(alpha, &neg_c1)]);
        let b1 = params.mult_p(&[
            &params.pow_p(k, &v1),
            &params.g_pow_p(&c1),
            &params.pow_p(beta, &neg_c1),
        ]);
        let c = hash_elems(params, &[alpha, beta, &a0, &b0, &a1, &b1]);
        let c0 = params.a_minus_b_q(&c, &c1);
        let v0 = params.a_plus_bc_q(&u0, &c0, r);

        return Self {
            a0,
            b0,
            a1,
            b1,
            c0,
            c1,
            v0,
            v1,
        };
    }

    /// Branch 1 is real, branch 0 is simulated
    fn prove_one(
        params: &GroupParams,
        ciphertext: &ElGamalCiphertext,
        r: &ElementModQ,
        k: &ElementModP,
        seed: &ElementModQ,
    ) -> Self {
        let ElGamalCiphertext { alpha, beta } = ciphertext;
        // nonce 0: simulated challenge c0, nonce 1: simulated response v0, nonce 2: commitment u1
        let [c0, v0, u1] = Nonces::new(params, seed, DISJUNCTIVE_PROOF_LABEL).draw::<3>();

        let neg_c0 = params.negate_q(&c0);
        let a0 = params.mult_p(&[&params.g_pow_p(&v0), &params.pow_p(alpha, &neg_c0)]);
        let b0 = params.mult_p(&[&params.pow_p(k, &v0), &params.pow_p(beta, &neg_c0)]);
        let a1 = params.g_pow_p(&u1);
        let b1 = params.pow_p(k, &u1);
        let c = hash_elems(params, &[alpha, beta, &a0, &b0, &a1, &b1]);
        let c1 = params.a_minus_b_q(&c, &c0);
        let v1 = params.a_plus_bc_q(&u1, &c1, r);

        return Self {
            a0,
            b0,
            a1,
            b1,
            c0,
            c1,
            v0,
            v1,
        };
    }

    /// Run every check on the proof without reporting anything
    pub fn check(
        &self,
        params: &GroupParams,
        ciphertext: &ElGamalCiphertext,
        k: &ElementModP,
    ) -> DisjunctiveChecks {
        let ElGamalCiphertext { alpha, beta } = ciphertext;
        let Self {
            a0,
            b0,
            a1,
            b1,
            c0,
            c1,
            v0,
            v1,
        } = self;
        let c = hash_elems(params, &[alpha, beta, a0, b0, a1, b1]);

        return DisjunctiveChecks {
            in_bounds_alpha: params.is_valid_residue(alpha),
            in_bounds_beta: params.is_valid_residue(beta),
            in_bounds_a0: params.is_valid_residue(a0),
            in_bounds_b0: params.is_valid_residue(b0),
            in_bounds_a1: params.is_valid_residue(a1),
            in_bounds_b1: params.is_valid_residue(b1),
            in_bounds_c0: params.in_bounds_q(c0),
            in_bounds_c1: params.in_bounds_q(c1),
            in_bounds_v0: params.in_bounds_q(v0),
            in_bounds_v1: params.in_bounds_q(v1),
            consistent_c: c == params.add_q(c0, c1),
            consistent_gv0: params.g_pow_p(v0) == params.mult_p(&[a0, &params.pow_p(alpha, c0)]),
            consistent_gv1: params.g_pow_p(v1) == params.mult_p(&[a1, &params.pow_p(alpha, c1)]),
            consistent_kv0: params.pow_p(k, v0) == params.mult_p(&[b0, &params.pow_p(beta, c0)]),
            consistent_gc1kv1: params.mult_p(&[&params.g_pow_p(c1), &params.pow_p(k, v1)])
                == params.mult_p(&[b1, &params.pow_p(beta, c1)]),
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
        return report(&checks, k, ProofRecord::Disjunctive(*self), sink);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        arithmetics::tests::{test_group, toy_group},
        keys::ElGamalKeyPair,
        proofs::diagnostics::{tests::RecordingSink, Diagnostic},
        BigInt,
    };
    use proptest::prelude::*;

    struct Fixture {
        group: GroupParams,
        keypair: ElGamalKeyPair,
        nonce: ElementModQ,
        seed: ElementModQ,
    }

    impl Fixture {
        fn new(group: GroupParams, secret: u64, nonce: u64, seed: u64) -> Self {
            let keypair =
                ElGamalKeyPair::from_secret(&group, &ElementModQ::from_u64(secret)).unwrap();
            return Self {
                group,
                keypair,
                nonce: ElementModQ::from_u64(nonce),
                seed: ElementModQ::from_u64(seed),
            };
        }

        fn encrypt(&self, plaintext: u64) -> ElGamalCiphertext {
            let pk = self.keypair.get_pk();
            return ElGamalCiphertext::encrypt(&self.group, plaintext, &self.nonce, pk).unwrap();
        }

        fn prove(&self, ciphertext: &ElGamalCiphertext, plaintext: u64) -> DisjunctiveProof {
            return DisjunctiveProof::prove(
                &self.group,
                ciphertext,
                &self.nonce,
                self.keypair.get_pk(),
                &self.seed,
                plaintext,
            )
            .unwrap();
        }

        /// Verify and return the diagnostic, if any
        fn verify(
            &self,
            ciphertext: &ElGamalCiphertext,
            proof: &DisjunctiveProof,
        ) -> (bool, Option<Diagnostic>) {
            let sink = RecordingSink::default();
            let valid = proof.verify_with(&self.group, ciphertext, self.keypair.get_pk(), &sink);
            return (valid, sink.last());
        }
    }

    fn fixture() -> Fixture {
        return Fixture::new(test_group(), 0x1234_5678_9abc, 0xdead_beef_1234, 0x5eed);
    }

    /// P = 23, Q = 11, g = 4: encrypt zero, prove, verify, then break v1
    #[test]
    fn test_toy_group_scenario() {
        let fixture = Fixture::new(toy_group(), 3, 5, 7);
        let ciphertext = fixture.encrypt(0);
        let proof = fixture.prove(&ciphertext, 0);
        let (valid, diagnostic) = fixture.verify(&ciphertext, &proof);
        assert!(valid);
        assert!(diagnostic.is_none());

        let one = ElementModQ::from_u64(1);
        let tampered = DisjunctiveProof {
            v1: fixture.group.add_q(&proof.v1, &one),
            ..proof
        };
        let (valid, diagnostic) = fixture.verify(&ciphertext, &tampered);
        assert!(!valid);
        let diagnostic = diagnostic.unwrap();
        assert_eq!(diagnostic.check("consistent_gv1"), Some(false));
        assert_eq!(diagnostic.check("in_bounds_v1"), Some(true));
        assert_eq!(diagnostic.proof, ProofRecord::Disjunctive(tampered));
        assert_eq!(&diagnostic.public_key, fixture.keypair.get_pk());
        assert_eq!(diagnostic.checks.len(), 15);
    }

    #[test]
    fn test_both_branches_verify() {
        let fixture = fixture();
        for plaintext in [0u64, 1] {
            let ciphertext = fixture.encrypt(plaintext);
            let proof = fixture.prove(&ciphertext, plaintext);
            assert!(proof.check(&fixture.group, &ciphertext, fixture.keypair.get_pk()).is_valid());
            assert!(proof.verify(&fixture.group, &ciphertext, fixture.keypair.get_pk()));
        }
    }

    #[test]
    fn test_challenge_split() {
        let fixture = fixture();
        for plaintext in [0u64, 1] {
            let ciphertext = fixture.encrypt(plaintext);
            let proof = fixture.prove(&ciphertext, plaintext);
            let c = hash_elems(
                &fixture.group,
                &[&ciphertext.alpha, &ciphertext.beta, &proof.a0, &proof.b0, &proof.a1, &proof.b1],
            );
            assert_eq!(fixture.group.add_q(&proof.c0, &proof.c1), c);
        }
    }

    #[test]
    fn test_deterministic() {
        let fixture = fixture();
        for plaintext in [0u64, 1] {
            let ciphertext = fixture.encrypt(plaintext);
            assert_eq!(
                fixture.prove(&ciphertext, plaintext),
                fixture.prove(&ciphertext, plaintext)
            );
        }

        // a different seed gives a different transcript for the same statement
        let ciphertext = fixture.encrypt(1);
        let other = Fixture::new(test_group(), 0x1234_5678_9abc, 0xdead_beef_1234, 0x5eee);
        assert_ne!(fixture.prove(&ciphertext, 1), other.prove(&ciphertext, 1));
    }

    /// The simulated branch of one proof uses the same nonce entries as the real branch of the
    /// other, so the two transcripts mirror each other's structure
    #[test]
    fn test_branch_symmetry() {
        let fixture = fixture();
        let zero = fixture.encrypt(0);
        let one = fixture.encrypt(1);
        let zero_proof = fixture.prove(&zero, 0);
        let one_proof = fixture.prove(&one, 1);
        let [first, second, _] =
            Nonces::new(&fixture.group, &fixture.seed, DISJUNCTIVE_PROOF_LABEL).draw::<3>();
        assert_eq!((zero_proof.c1, zero_proof.v1), (first, second));
        assert_eq!((one_proof.c0, one_proof.v0), (first, second));

        for (ciphertext, proof) in [(zero, zero_proof), (one, one_proof)] {
            let checks = proof.check(&fixture.group, &ciphertext, fixture.keypair.get_pk());
            assert!(checks.items().iter().all(|(_, passed)| *passed));
        }
    }

    #[test]
    fn test_plaintext_out_of_range() {
        let fixture = fixture();
        let ciphertext = fixture.encrypt(2);
        for plaintext in [2u64, 3, u64::MAX] {
            assert_eq!(
                DisjunctiveProof::prove(
                    &fixture.group,
                    &ciphertext,
                    &fixture.nonce,
                    fixture.keypair.get_pk(),
                    &fixture.seed,
                    plaintext,
                ),
                Err(ProofError::PlaintextOutOfRange(plaintext))
            );
        }
    }

    /// Claiming the wrong plaintext yields a proof that does not verify
    #[test]
    fn test_false_statement() {
        let fixture = fixture();
        let one = fixture.encrypt(1);
        let (valid, diagnostic) = fixture.verify(&one, &fixture.prove(&one, 0));
        assert!(!valid);
        assert_eq!(diagnostic.unwrap().check("consistent_kv0"), Some(false));

        let zero = fixture.encrypt(0);
        let (valid, diagnostic) = fixture.verify(&zero, &fixture.prove(&zero, 1));
        assert!(!valid);
        assert_eq!(diagnostic.unwrap().check("consistent_gc1kv1"), Some(false));

        // an encryption of two cannot be proven either way
        let two = fixture.encrypt(2);
        for plaintext in [0u64, 1] {
            assert!(!fixture.verify(&two, &fixture.prove(&two, plaintext)).0);
        }
    }

    #[test]
    fn test_tampering() {
        let fixture = fixture();
        let group = &fixture.group;
        let g = group.generator();
        let one = ElementModQ::from_u64(1);
        let bump_p = |elem: &ElementModP| group.mult_p(&[elem, &g]);
        let bump_q = |elem: &ElementModQ| group.add_q(elem, &one);

        for plaintext in [0u64, 1] {
            let ciphertext = fixture.encrypt(plaintext);
            let proof = fixture.prove(&ciphertext, plaintext);
            let cases = [
                (DisjunctiveProof { a0: bump_p(&proof.a0), ..proof }, "consistent_gv0"),
                (DisjunctiveProof { b0: bump_p(&proof.b0), ..proof }, "consistent_kv0"),
                (DisjunctiveProof { a1: bump_p(&proof.a1), ..proof }, "consistent_gv1"),
                (DisjunctiveProof { b1: bump_p(&proof.b1), ..proof }, "consistent_gc1kv1"),
                (DisjunctiveProof { c0: bump_q(&proof.c0), ..proof }, "consistent_c"),
                (DisjunctiveProof { c1: bump_q(&proof.c1), ..proof }, "consistent_c"),
                (DisjunctiveProof { v0: bump_q(&proof.v0), ..proof }, "consistent_gv0"),
                (DisjunctiveProof { v1: bump_q(&proof.v1), ..proof }, "consistent_gv1"),
            ];
            for (tampered, failing) in cases {
                let (valid, diagnostic) = fixture.verify(&ciphertext, &tampered);
                assert!(!valid);
                assert_eq!(diagnostic.unwrap().check(failing), Some(false));
            }
        }
    }

    /// Values that are congruent to the honest ones satisfy every equation but are not canonical
    #[test]
    fn test_out_of_bounds() {
        let fixture = fixture();
        let group = &fixture.group;
        let ciphertext = fixture.encrypt(1);
        let proof = fixture.prove(&ciphertext, 1);

        let shifted_p = ElementModP::new(proof.b1.get_val().wrapping_add(group.p()));
        let tampered = DisjunctiveProof { b1: shifted_p, ..proof };
        let (valid, diagnostic) = fixture.verify(&ciphertext, &tampered);
        assert!(!valid);
        let diagnostic = diagnostic.unwrap();
        assert_eq!(diagnostic.check("in_bounds_b1"), Some(false));
        assert_eq!(diagnostic.check("consistent_gc1kv1"), Some(true));

        let shifted_q = ElementModQ::new(proof.v0.get_val().wrapping_add(group.q()));
        let tampered = DisjunctiveProof { v0: shifted_q, ..proof };
        let (valid, diagnostic) = fixture.verify(&ciphertext, &tampered);
        assert!(!valid);
        assert_eq!(diagnostic.unwrap().failed_checks(), vec!["in_bounds_v0"]);

        // alpha outside of the order-Q subgroup
        let minus_one = ElementModP::new(group.p().wrapping_sub(&BigInt::ONE));
        let forged = ElGamalCiphertext::new(minus_one, ciphertext.beta);
        let (valid, diagnostic) = fixture.verify(&forged, &proof);
        assert!(!valid);
        assert_eq!(diagnostic.unwrap().check("in_bounds_alpha"), Some(false));
    }

    #[test]
    fn test_serialized_shape() {
        let fixture = Fixture::new(toy_group(), 3, 5, 7);
        let ciphertext = fixture.encrypt(1);
        let proof = fixture.prove(&ciphertext, 1);
        let json = serde_json::to_value(proof).unwrap();
        for field in ["a0", "b0", "a1", "b1", "c0", "c1", "v0", "v1"] {
            assert!(json[field].is_string());
        }
        let parsed: DisjunctiveProof = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, proof);
    }

    #[test]
    fn test_concurrent_verification() {
        let fixture = fixture();
        let ballots = (0..4u64)
            .map(|i| {
                let ciphertext = fixture.encrypt(i % 2);
                (ciphertext, fixture.prove(&ciphertext, i % 2))
            })
            .collect::<Vec<_>>();
        std::thread::scope(|scope| {
            let handles = ballots
                .iter()
                .map(|(ciphertext, proof)| {
                    let fixture = &fixture;
                    scope.spawn(move || {
                        proof.verify(&fixture.group, ciphertext, fixture.keypair.get_pk())
                    })
                })
                .collect::<Vec<_>>();
            for handle in handles {
                assert!(handle.join().unwrap());
            }
        });
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        /// Every honest proof over the toy group verifies
        #[test]
        fn test_completeness(
            secret in 2u64..11,
            nonce in 1u64..11,
            seed in any::<u64>(),
            plaintext in 0u64..2,
        ) {
            let fixture = Fixture::new(toy_group(), secret, nonce, seed);
            let ciphertext = fixture.encrypt(plaintext);
            let proof = fixture.prove(&ciphertext, plaintext);
            let (valid, diagnostic) = fixture.verify(&ciphertext, &proof);
            prop_assert!(valid);
            prop_assert!(diagnostic.is_none());
        }
    }
}
