//! A sample election: every voter marks exactly SELECTION_LIMIT of the SELECTIONS in a single
//! contest, proves each selection to be zero or one and the contest total to be the limit. The
//! tally is decrypted at the end and compared with the true tally.
//!
//! No `tracing` subscriber is installed here, so proof failures are printed by `StderrSink`
use chaum_pedersen::{
    ConstantProof, Diagnostic, DiagnosticsSink, DisjunctiveProof, ElGamalCiphertext,
    ElGamalKeyPair, ElementModQ, GroupParams,
};
use rand::rngs::OsRng;
use rand::seq::SliceRandom;

const Q_BITS: usize = 64;
const P_BITS: usize = 256;

const VOTERS: usize = 10;
const SELECTIONS: usize = 4;
const SELECTION_LIMIT: usize = 2;

/// Print the failed checks of every invalid proof
struct StderrSink;

impl DiagnosticsSink for StderrSink {
    fn warn(&self, diagnostic: &Diagnostic) {
        eprintln!("{}: failed {:?}", diagnostic.message, diagnostic.failed_checks());
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let group = GroupParams::generate(Q_BITS, P_BITS)?;
    let keypair = ElGamalKeyPair::random(&group);
    let pk = keypair.get_pk();
    println!("{group:?}");

    let mut ballots: Vec<Vec<ElGamalCiphertext>> = vec![];
    let mut true_tally = [0u64; SELECTIONS];
    for _ in 0..VOTERS {
        let mut votes = [0u64; SELECTIONS];
        for vote in votes.iter_mut().take(SELECTION_LIMIT) {
            *vote = 1;
        }
        votes.shuffle(&mut OsRng);

        let mut ballot = vec![];
        let mut aggregate_nonce = ElementModQ::from_u64(0);
        for (selection, vote) in votes.iter().enumerate() {
            let nonce = loop {
                let nonce = group.random_q();
                if nonce != ElementModQ::from_u64(0) {
                    break nonce;
                }
            };
            let ciphertext = ElGamalCiphertext::encrypt(&group, *vote, &nonce, pk)
                .ok_or("nonce must be a non-zero scalar")?;
            let proof =
                DisjunctiveProof::prove(&group, &ciphertext, &nonce, pk, &group.random_q(), *vote)?;
            if !proof.verify_with(&group, &ciphertext, pk, &StderrSink) {
                panic!("Selection {selection} failed to prove that it is zero or one");
            }
            aggregate_nonce = group.add_q(&aggregate_nonce, &nonce);
            true_tally[selection] += vote;
            ballot.push(ciphertext);
        }

        // Prove that the ballot does not overvote or undervote the contest
        let aggregate = ElGamalCiphertext::aggregate(&group, &ballot);
        let proof = ConstantProof::prove(
            &group,
            &aggregate,
            SELECTION_LIMIT as i64,
            &aggregate_nonce,
            pk,
            &group.random_q(),
        );
        if !proof.verify_with(&group, &aggregate, pk, &StderrSink) {
            panic!("Ballot failed to prove the selection limit");
        }
        ballots.push(ballot);
    }

    // Tally every selection homomorphically and decrypt
    for (selection, expected) in true_tally.iter().enumerate() {
        let column = ballots.iter().map(|ballot| &ballot[selection]);
        let tally = ElGamalCiphertext::aggregate(&group, column);
        let decrypted = tally.decrypt(&group, keypair.get_sk(), VOTERS as u64 + 1);
        if decrypted != Some(*expected) {
            panic!("the tally of selection {selection} is incorrect!");
        }
        println!("selection {selection}: {expected} votes");
    }
    println!("The election is a success!");
    return Ok(());
}
