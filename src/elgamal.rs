//! Exponential ElGamal over the order-Q subgroup. A plaintext m encrypted under public key k with
//! nonce r is (alpha, beta) = (g ** r, (g ** m) * (k ** r)), so that multiplying ciphertexts adds
//! their plaintexts
use crate::{
    arithmetics::{discrete_log, ElementModP, ElementModQ, GroupParams},
    BigInt,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Eq, PartialEq, Copy, Clone, Serialize, Deserialize)]
pub struct ElGamalCiphertext {
    /// g ** r
    pub alpha: ElementModP,

    /// (g ** m) * (k ** r)
    pub beta: ElementModP,
}

impl ElGamalCiphertext {
    pub fn new(alpha: ElementModP, beta: ElementModP) -> Self {
        return Self { alpha, beta };
    }

    /// Encrypt the plaintext. Returns None if the nonce is zero or not a canonical scalar
    pub fn encrypt(
        params: &GroupParams,
        plaintext: u64,
        nonce: &ElementModQ,
        public_key: &ElementModP,
    ) -> Option<Self> {
        if *nonce.get_val() == BigInt::ZERO || !params.in_bounds_q(nonce) {
            return None;
        }
        let m = params.reduce_q(&BigInt::from_u64(plaintext));
        let alpha = params.g_pow_p(nonce);
        let beta = params.mult_p(&[&params.g_pow_p(&m), &params.pow_p(public_key, nonce)]);
        return Some(Self::new(alpha, beta));
    }

    /// Homomorphic addition: the result encrypts the sum of the plaintexts under the sum of the
    /// nonces
    pub fn add(&self, other: &Self, params: &GroupParams) -> Self {
        return Self::new(
            params.mult_p(&[&self.alpha, &other.alpha]),
            params.mult_p(&[&self.beta, &other.beta]),
        );
    }

    /// Add up all the ciphertexts; the empty sum is the trivial encryption of zero (1, 1)
    pub fn aggregate<'a>(
        params: &GroupParams,
        ciphertexts: impl IntoIterator<Item = &'a ElGamalCiphertext>,
    ) -> Self {
        let one = ElementModP::from_u64(1);
        return ciphertexts
            .into_iter()
            .fold(Self::new(one, one), |acc, ciphertext| acc.add(ciphertext, params));
    }

    /// Recover a plaintext smaller than bound, given the blinding factor k ** r = alpha ** s
    pub fn decrypt_known_product(
        &self,
        params: &GroupParams,
        product: &ElementModP,
        bound: u64,
    ) -> Option<u64> {
        let blinding = params.inverse_p(product)?;
        let g_to_m = params.mult_p(&[&self.beta, &blinding]);
        return discrete_log(params, &g_to_m, bound);
    }

    /// Decrypt with the secret key
    pub fn decrypt(&self, params: &GroupParams, secret_key: &ElementModQ, bound: u64) -> Option<u64> {
        let product = params.pow_p(&self.alpha, secret_key);
        return self.decrypt_known_product(params, &product, bound);
    }

    /// Decrypt with the nonce that produced the ciphertext
    pub fn decrypt_known_nonce(
        &self,
        params: &GroupParams,
        nonce: &ElementModQ,
        public_key: &ElementModP,
        bound: u64,
    ) -> Option<u64> {
        let product = params.pow_p(public_key, nonce);
        return self.decrypt_known_product(params, &product, bound);
    }
}
