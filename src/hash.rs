//! The challenge function of the Fiat-Shamir transform. An ordered list of elements is hashed
//! with SHA3-256 under a fixed domain tag and the digest is reduced (mod Q)
use crate::arithmetics::{ElementModP, ElementModQ, GroupParams};
use crypto_bigint::Encoding;
use digest::Digest;
use sha3::Sha3_256;

const CHALLENGE_DOMAIN: &[u8] = b"chaum-pedersen/challenge/v1";

const TAG_MOD_P: u8 = 0x01;
const TAG_MOD_Q: u8 = 0x02;

/// Anything that can be absorbed into a challenge
pub trait CryptoHashable {
    /// Feed an unambiguous encoding of self into the hasher
    fn absorb(&self, hasher: &mut Sha3_256);
}

impl CryptoHashable for ElementModP {
    fn absorb(&self, hasher: &mut Sha3_256) {
        hasher.update([TAG_MOD_P]);
        hasher.update(self.get_val().to_be_bytes());
    }
}

impl CryptoHashable for ElementModQ {
    fn absorb(&self, hasher: &mut Sha3_256) {
        hasher.update([TAG_MOD_Q]);
        hasher.update(self.get_val().to_be_bytes());
    }
}

/// Hash the elements, in order, into a scalar (mod Q)
pub fn hash_elems(params: &GroupParams, elems: &[&dyn CryptoHashable]) -> ElementModQ {
    let mut hasher = Sha3_256::new();
    hasher.update(CHALLENGE_DOMAIN);
    for elem in elems {
        elem.absorb(&mut hasher);
    }
    let digest = hasher.finalize();
    return params.q_from_be_bytes(&digest);
}
