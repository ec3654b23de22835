//! What a verifier reports about a proof that does not check out. Reporting is a side channel:
//! the boolean returned by the verifier is the only verdict, and a sink can never change it.
use crate::{
    arithmetics::ElementModP,
    proofs::{constant::ConstantProof, disjunctive::DisjunctiveProof},
};

/// The itemized outcome of verifying one proof
pub trait Checks {
    /// Every check by name, in a fixed order
    fn items(&self) -> Vec<(&'static str, bool)>;

    /// A proof is valid only if every single check holds
    fn is_valid(&self) -> bool {
        return self.items().iter().all(|(_, passed)| *passed);
    }
}

/// The proof that failed verification
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum ProofRecord {
    Disjunctive(DisjunctiveProof),
    Constant(ConstantProof),
}

/// Structured context of a failed verification
#[derive(Debug, Eq, PartialEq, Clone)]
pub struct Diagnostic {
    pub message: &'static str,

    /// Every check by name, passed or not
    pub checks: Vec<(&'static str, bool)>,

    /// The election public key the proof was checked against
    pub public_key: ElementModP,

    pub proof: ProofRecord,
}

impl Diagnostic {
    /// Outcome of the named check, if the verifier performs such a check
    pub fn check(&self, name: &str) -> Option<bool> {
        return self
            .checks
            .iter()
            .find(|(check, _)| *check == name)
            .map(|(_, passed)| *passed);
    }

    pub fn failed_checks(&self) -> Vec<&'static str> {
        return self
            .checks
            .iter()
            .filter(|(_, passed)| !*passed)
            .map(|(check, _)| *check)
            .collect();
    }
}

/// Receiver of diagnostics. Fire and forget
pub trait DiagnosticsSink: Send + Sync {
    fn warn(&self, diagnostic: &Diagnostic);
}

/// Emit diagnostics as `tracing` warnings
#[derive(Debug, Default, Copy, Clone)]
pub struct TracingSink;

impl DiagnosticsSink for TracingSink {
    fn warn(&self, diagnostic: &Diagnostic) {
        tracing::warn!(
            failed = ?diagnostic.failed_checks(),
            checks = ?diagnostic.checks,
            k = %diagnostic.public_key,
            proof = ?diagnostic.proof,
            "{}",
            diagnostic.message
        );
    }
}

/// Turn the checks into a verdict, reporting to the sink if the proof is invalid
pub(crate) fn report(
    checks: &impl Checks,
    public_key: &ElementModP,
    proof: ProofRecord,
    sink: &dyn DiagnosticsSink,
) -> bool {
    if checks.is_valid() {
        return true;
    }
    let diagnostic = Diagnostic {
        message: "found an invalid Chaum-Pedersen proof",
        checks: checks.items(),
        public_key: *public_key,
        proof,
    };
    sink.warn(&diagnostic);
    return false;
}
