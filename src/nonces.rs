//! A deterministic stream of scalars derived from a seed and a label. Entry i of the stream is
//! SHA3-256(domain, seed, label, i) reduced (mod Q), so any entry can be recomputed on its own and
//! the same (seed, label) always yields the same sequence
use crate::arithmetics::{ElementModQ, GroupParams};
use crypto_bigint::Encoding;
use digest::Digest;
use sha3::Sha3_256;

const NONCE_DOMAIN: &[u8] = b"chaum-pedersen/nonces/v1";

#[derive(Debug, Clone)]
pub struct Nonces<'a> {
    params: &'a GroupParams,
    seed: ElementModQ,
    label: &'a str,
    next: u64,
}

impl<'a> Nonces<'a> {
    /// The seed is taken (mod Q), so congruent seeds give the same stream
    pub fn new(params: &'a GroupParams, seed: &ElementModQ, label: &'a str) -> Self {
        return Self {
            params,
            seed: params.reduce_q(seed.get_val()),
            label,
            next: 0,
        };
    }

    /// The entry at the given position
    pub fn get(&self, index: u64) -> ElementModQ {
        let mut hasher = Sha3_256::new();
        hasher.update(NONCE_DOMAIN);
        hasher.update(self.seed.get_val().to_be_bytes());
        hasher.update((self.label.len() as u64).to_be_bytes());
        hasher.update(self.label.as_bytes());
        hasher.update(index.to_be_bytes());
        let digest = hasher.finalize();
        return self.params.q_from_be_bytes(&digest);
    }

    /// Entries 0..N, in order
    pub fn draw<const N: usize>(&self) -> [ElementModQ; N] {
        return std::array::from_fn(|index| self.get(index as u64));
    }
}

impl Iterator for Nonces<'_> {
    type Item = ElementModQ;

    fn next(&mut self) -> Option<ElementModQ> {
        let nonce = self.get(self.next);
        self.next += 1;
        return Some(nonce);
    }
}
