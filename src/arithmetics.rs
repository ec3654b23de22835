//! Arithmetics in the Schnorr group used by the election: elements of Z_P^* (ciphertexts and
//! commitments) and scalars of Z_Q (exponents, challenges and responses).
//!
//! P and Q are runtime parameters, so every operation goes through a [`GroupParams`] that
//! carries the precomputed Montgomery parameters for both moduli.
use crate::{errors::GroupError, BigInt, BIGINT_BYTES, LIMBS};
use crypto_bigint::{
    modular::runtime_mod::{DynResidue, DynResidueParams},
    Encoding, NonZero, Random, RandomMod,
};
use rand::rngs::OsRng;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// An element of the multiplicative group (mod P). The value is not checked on construction;
/// use [`GroupParams::is_valid_residue`] to decide membership in the order-Q subgroup
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub struct ElementModP(BigInt);

/// A scalar (mod Q). The value is not checked on construction; use
/// [`GroupParams::in_bounds_q`] to decide whether it is canonical
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub struct ElementModQ(BigInt);

impl ElementModP {
    pub fn new(val: BigInt) -> Self {
        return Self(val);
    }

    pub fn from_u64(val: u64) -> Self {
        return Self(BigInt::from_u64(val));
    }

    pub fn get_val(&self) -> &BigInt {
        return &self.0;
    }

    /// Upper case big-endian hex without leading zero bytes
    pub fn to_hex(&self) -> String {
        return trimmed_hex(&self.0);
    }

    pub fn from_hex(hex: &str) -> Result<Self, GroupError> {
        return Ok(Self(bigint_from_hex(hex)?));
    }
}

impl ElementModQ {
    pub fn new(val: BigInt) -> Self {
        return Self(val);
    }

    pub fn from_u64(val: u64) -> Self {
        return Self(BigInt::from_u64(val));
    }

    pub fn get_val(&self) -> &BigInt {
        return &self.0;
    }

    pub fn to_hex(&self) -> String {
        return trimmed_hex(&self.0);
    }

    pub fn from_hex(hex: &str) -> Result<Self, GroupError> {
        return Ok(Self(bigint_from_hex(hex)?));
    }
}

impl fmt::Display for ElementModP {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Display for ElementModQ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

macro_rules! impl_hex_serde {
    ($element:ident) => {
        impl Serialize for $element {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.to_hex())
            }
        }

        impl<'de> Deserialize<'de> for $element {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let hex = String::deserialize(deserializer)?;
                $element::from_hex(&hex).map_err(de::Error::custom)
            }
        }
    };
}

impl_hex_serde!(ElementModP);
impl_hex_serde!(ElementModQ);

fn trimmed_hex(val: &BigInt) -> String {
    let bytes = val.to_be_bytes();
    let start = bytes
        .iter()
        .position(|byte| *byte != 0)
        .unwrap_or(BIGINT_BYTES - 1);
    return hex::encode_upper(&bytes[start..]);
}

/// Parse big-endian hex of any length up to the width of BigInt, with an optional "0x" prefix
pub fn bigint_from_hex(hex: &str) -> Result<BigInt, GroupError> {
    let hex = hex.trim();
    let hex = hex
        .strip_prefix("0x")
        .or_else(|| hex.strip_prefix("0X"))
        .unwrap_or(hex);
    let bytes = if hex.len() % 2 == 1 {
        hex::decode(format!("0{hex}"))?
    } else {
        hex::decode(hex)?
    };
    return bigint_from_be_bytes(&bytes);
}

/// Left-pad big-endian bytes into a BigInt. Leading zero bytes beyond the width are tolerated
pub fn bigint_from_be_bytes(bytes: &[u8]) -> Result<BigInt, GroupError> {
    let mut bytes = bytes;
    while bytes.len() > BIGINT_BYTES {
        if bytes[0] != 0 {
            return Err(GroupError::Overflow(BIGINT_BYTES));
        }
        bytes = &bytes[1..];
    }
    let mut buf = [0u8; BIGINT_BYTES];
    buf[BIGINT_BYTES - bytes.len()..].copy_from_slice(bytes);
    return Ok(BigInt::from_be_slice(&buf));
}

/// The group (P, Q, g): P is a prime, Q is a prime dividing P - 1 and g generates the subgroup of
/// order Q in Z_P^*
#[derive(Copy, Clone)]
pub struct GroupParams {
    p: BigInt,
    q: BigInt,
    g: BigInt,
    p_params: DynResidueParams<LIMBS>,
    q_params: DynResidueParams<LIMBS>,
    q_bits: usize,
}

impl fmt::Debug for GroupParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroupParams")
            .field("p", &trimmed_hex(&self.p))
            .field("q", &trimmed_hex(&self.q))
            .field("g", &trimmed_hex(&self.g))
            .finish()
    }
}

impl PartialEq for GroupParams {
    fn eq(&self, other: &Self) -> bool {
        return self.p == other.p && self.q == other.q && self.g == other.g;
    }
}

impl Eq for GroupParams {}

impl GroupParams {
    /// Check the structure of (P, Q, g) and precompute the Montgomery parameters. Primality of P
    /// and Q is not tested here; use [`GroupParams::generate`] for fresh parameters.
    pub fn new(p: BigInt, q: BigInt, g: BigInt) -> Result<Self, GroupError> {
        for modulus in [&p, &q] {
            if *modulus <= BigInt::ONE {
                return Err(GroupError::ModulusTooSmall);
            }
            if modulus.as_words()[0] & 1 == 0 {
                return Err(GroupError::EvenModulus);
            }
        }
        if q >= p {
            return Err(GroupError::SubgroupTooLarge);
        }
        let q_nonzero: Option<NonZero<BigInt>> = NonZero::new(q).into();
        let q_nonzero = q_nonzero.ok_or(GroupError::ModulusTooSmall)?;
        if p.wrapping_sub(&BigInt::ONE) % q_nonzero != BigInt::ZERO {
            return Err(GroupError::SubgroupOrderMismatch);
        }

        let params = Self {
            p,
            q,
            g,
            p_params: DynResidueParams::new(&p),
            q_params: DynResidueParams::new(&q),
            q_bits: q.bits_vartime(),
        };
        if g <= BigInt::ONE || g >= p || params.pow_bounded(&g, &q, params.q_bits) != BigInt::ONE {
            return Err(GroupError::InvalidGenerator);
        }
        return Ok(params);
    }

    /// Same as [`GroupParams::new`], from big-endian hex strings
    pub fn from_be_hex(p: &str, q: &str, g: &str) -> Result<Self, GroupError> {
        return Self::new(bigint_from_hex(p)?, bigint_from_hex(q)?, bigint_from_hex(g)?);
    }

    /// Generate a fresh Schnorr group: Q is a random prime of q_bits, P = kQ + 1 is a prime of
    /// at most p_bits with k even, and g = h^k for some h such that g != 1
    pub fn generate(q_bits: usize, p_bits: usize) -> Result<Self, GroupError> {
        if q_bits < 3 || p_bits < q_bits + 3 || p_bits > LIMBS * 64 {
            return Err(GroupError::InvalidBitLength { q_bits, p_bits });
        }
        let q: BigInt = crypto_primes::generate_prime(Some(q_bits));

        // k = 2 * half where half has exactly (k_bits - 1) bits, so k has exactly k_bits bits
        let k_bits = p_bits - q_bits;
        let floor = BigInt::ONE.shl_vartime(k_bits - 2);
        let floor_nonzero: Option<NonZero<BigInt>> = NonZero::new(floor).into();
        let floor_nonzero = floor_nonzero.ok_or(GroupError::InvalidBitLength { q_bits, p_bits })?;
        let (k, p) = loop {
            let half = BigInt::random_mod(&mut OsRng, &floor_nonzero).wrapping_add(&floor);
            let k = half.shl_vartime(1);
            let p = k.wrapping_mul(&q).wrapping_add(&BigInt::ONE);
            if crypto_primes::is_prime(&p) {
                break (k, p);
            }
        };

        let p_params = DynResidueParams::new(&p);
        let g = loop {
            let h = DynResidue::new(&BigInt::random(&mut OsRng), p_params);
            let g = h.pow_bounded_exp(&k, k_bits).retrieve();
            if g != BigInt::ONE && g != BigInt::ZERO {
                break g;
            }
        };
        return Self::new(p, q, g);
    }

    pub fn p(&self) -> &BigInt {
        return &self.p;
    }

    pub fn q(&self) -> &BigInt {
        return &self.q;
    }

    pub fn g(&self) -> &BigInt {
        return &self.g;
    }

    /// The generator as a group element
    pub fn generator(&self) -> ElementModP {
        return ElementModP(self.g);
    }

    /// Bit length of Q; every canonical scalar fits in this many bits
    pub fn q_bits(&self) -> usize {
        return self.q_bits;
    }

    fn pow_bounded(&self, base: &BigInt, exp: &BigInt, exp_bits: usize) -> BigInt {
        return DynResidue::new(base, self.p_params)
            .pow_bounded_exp(exp, exp_bits)
            .retrieve();
    }

    fn residue_q(&self, val: &ElementModQ) -> DynResidue<LIMBS> {
        return DynResidue::new(&val.0, self.q_params);
    }

    /// Reduce an arbitrary integer (mod Q)
    pub fn reduce_q(&self, val: &BigInt) -> ElementModQ {
        return ElementModQ(DynResidue::new(val, self.q_params).retrieve());
    }

    /// Interpret big-endian bytes (e.g. a digest) as an integer and reduce it (mod Q). Only the
    /// trailing BIGINT_BYTES bytes are significant.
    pub fn q_from_be_bytes(&self, bytes: &[u8]) -> ElementModQ {
        let bytes = &bytes[bytes.len().saturating_sub(BIGINT_BYTES)..];
        let mut buf = [0u8; BIGINT_BYTES];
        buf[BIGINT_BYTES - bytes.len()..].copy_from_slice(bytes);
        return self.reduce_q(&BigInt::from_be_slice(&buf));
    }

    /// base ** exp (mod P). The exponent is reduced (mod Q) first, which does not change the
    /// result for members of the order-Q subgroup
    pub fn pow_p(&self, base: &ElementModP, exp: &ElementModQ) -> ElementModP {
        let exp = self.reduce_q(&exp.0);
        return ElementModP(self.pow_bounded(&base.0, &exp.0, self.q_bits));
    }

    /// g ** exp (mod P)
    pub fn g_pow_p(&self, exp: &ElementModQ) -> ElementModP {
        return self.pow_p(&self.generator(), exp);
    }

    /// Product of all the elements (mod P); the empty product is one
    pub fn mult_p(&self, elems: &[&ElementModP]) -> ElementModP {
        let product = elems
            .iter()
            .fold(DynResidue::one(self.p_params), |acc, elem| {
                acc.mul(&DynResidue::new(&elem.0, self.p_params))
            });
        return ElementModP(product.retrieve());
    }

    /// Multiplicative inverse (mod P), if it exists
    pub fn inverse_p(&self, elem: &ElementModP) -> Option<ElementModP> {
        let (inverse, invertible) = DynResidue::new(&elem.0, self.p_params).invert();
        let invertible: bool = invertible.into();
        if invertible {
            return Some(ElementModP(inverse.retrieve()));
        }
        return None;
    }

    /// True iff 0 < elem < P and elem is in the subgroup of order Q, i.e. elem ** Q = 1 (mod P)
    pub fn is_valid_residue(&self, elem: &ElementModP) -> bool {
        if elem.0 == BigInt::ZERO || elem.0 >= self.p {
            return false;
        }
        return self.pow_bounded(&elem.0, &self.q, self.q_bits) == BigInt::ONE;
    }

    /// True iff 0 <= elem < Q
    pub fn in_bounds_q(&self, elem: &ElementModQ) -> bool {
        return elem.0 < self.q;
    }

    /// a + b (mod Q)
    pub fn add_q(&self, a: &ElementModQ, b: &ElementModQ) -> ElementModQ {
        return ElementModQ(self.residue_q(a).add(&self.residue_q(b)).retrieve());
    }

    /// a - b (mod Q)
    pub fn a_minus_b_q(&self, a: &ElementModQ, b: &ElementModQ) -> ElementModQ {
        return ElementModQ(self.residue_q(a).sub(&self.residue_q(b)).retrieve());
    }

    /// -a (mod Q), i.e. Q - a for non-zero a
    pub fn negate_q(&self, a: &ElementModQ) -> ElementModQ {
        return ElementModQ(self.residue_q(a).neg().retrieve());
    }

    /// a * b (mod Q)
    pub fn mult_q(&self, a: &ElementModQ, b: &ElementModQ) -> ElementModQ {
        return ElementModQ(self.residue_q(a).mul(&self.residue_q(b)).retrieve());
    }

    /// a + b * c (mod Q)
    pub fn a_plus_bc_q(&self, a: &ElementModQ, b: &ElementModQ, c: &ElementModQ) -> ElementModQ {
        let bc = self.residue_q(b).mul(&self.residue_q(c));
        return ElementModQ(self.residue_q(a).add(&bc).retrieve());
    }

    /// Encode a small integer as a scalar. Fails for negative integers and integers not less
    /// than Q
    pub fn int_to_q(&self, val: i64) -> Option<ElementModQ> {
        let val = u64::try_from(val).ok()?;
        let elem = ElementModQ::from_u64(val);
        if !self.in_bounds_q(&elem) {
            return None;
        }
        return Some(elem);
    }

    /// Uniformly sample a scalar (mod Q)
    pub fn random_q(&self) -> ElementModQ {
        return self.reduce_q(&BigInt::random(&mut OsRng));
    }
}

/// Brute-force discrete log base g. Returns the smallest m < bound with g ** m = target (mod P),
/// or None if there is no such m.
pub fn discrete_log(params: &GroupParams, target: &ElementModP, bound: u64) -> Option<u64> {
    let base = DynResidue::new(&params.g, params.p_params);
    let target = DynResidue::new(&target.0, params.p_params);
    let mut power = DynResidue::one(params.p_params);

    for exp in 0..bound {
        if power == target {
            return Some(exp);
        }
        power = power.mul(&base);
    }
    return None;
}
