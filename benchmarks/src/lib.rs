//! Fixed regression corpus for the chain algorithms.
//!
//! Exponents used for field inversion (`p - 2`) and square roots over the
//! prime fields of common elliptic curves.

use num_bigint::BigUint;
use num_traits::One;

/// A named exponent.
#[derive(Debug, Clone)]
pub struct Target {
    pub name: &'static str,
    pub n: BigUint,
}

fn pow2(e: u32) -> BigUint {
    BigUint::one() << e
}

/// `2^255 - 19`
pub fn curve25519_p() -> BigUint {
    pow2(255) - 19u32
}

/// `2^256 - 2^224 + 2^192 + 2^96 - 1`
pub fn p256_p() -> BigUint {
    pow2(256) + pow2(192) + pow2(96) - pow2(224) - 1u32
}

/// `2^256 - 2^32 - 977`
pub fn secp256k1_p() -> BigUint {
    pow2(256) - pow2(32) - 977u32
}

/// `2^384 - 2^128 - 2^96 + 2^32 - 1`
pub fn p384_p() -> BigUint {
    pow2(384) + pow2(32) - pow2(128) - pow2(96) - 1u32
}

/// `2^127 - 1`
pub fn mersenne127_p() -> BigUint {
    pow2(127) - 1u32
}

/// The regression corpus, smallest first.
pub fn corpus() -> Vec<Target> {
    let two = BigUint::from(2u32);
    let inv = |name: &'static str, p: BigUint| Target { name, n: p - &two };
    vec![
        inv("mersenne127_inv", mersenne127_p()),
        Target {
            name: "curve25519_sqrt",
            n: (curve25519_p() + 3u32) >> 3u32,
        },
        Target {
            name: "secp256k1_sqrt",
            n: (secp256k1_p() + 1u32) >> 2u32,
        },
        inv("curve25519_inv", curve25519_p()),
        inv("p256_inv", p256_p()),
        inv("secp256k1_inv", secp256k1_p()),
        inv("p384_inv", p384_p()),
    ]
}
