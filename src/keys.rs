//! The election key pair
use crate::{
    arithmetics::{ElementModP, ElementModQ, GroupParams},
    errors::KeyError,
    BigInt,
};

#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub struct ElGamalKeyPair {
    secret_key: ElementModQ,
    public_key: ElementModP,
}

impl ElGamalKeyPair {
    /// Derive the key pair from a known secret s, with public key k = g ** s. The secret must
    /// lie in [2, Q)
    pub fn from_secret(params: &GroupParams, secret_key: &ElementModQ) -> Result<Self, KeyError> {
        if !params.in_bounds_q(secret_key) || *secret_key.get_val() < BigInt::from_u64(2) {
            return Err(KeyError::SecretOutOfRange);
        }
        let public_key = params.g_pow_p(secret_key);
        return Ok(Self {
            secret_key: *secret_key,
            public_key,
        });
    }

    /// Sample a fresh secret in [2, Q)
    pub fn random(params: &GroupParams) -> Self {
        loop {
            if let Ok(keypair) = Self::from_secret(params, &params.random_q()) {
                return keypair;
            }
        }
    }

    pub fn get_sk(&self) -> &ElementModQ {
        &self.secret_key
    }

    pub fn get_pk(&self) -> &ElementModP {
        &self.public_key
    }
}
