//! Strategies for choosing the auxiliary value `k` in a continued fraction chain.
//!
//! A strategy maps a target `n` to candidate values `1 < k < n`; the
//! algorithm builds a chain for the pair `[k, n]` for each candidate and keeps
//! the shortest. Singleton strategies propose exactly one candidate and are
//! cheap enough to run on cryptographic sizes.
//!
//! Reference: F. Bergeron, J. Berstel, S. Brlek, "Efficient computation of
//! addition chains", Journal de Théorie des Nombres de Bordeaux, 1994.

use std::fmt;

use num_bigint::BigUint;
use num_traits::One;

/// Chooses candidate `k` values for a target `n`.
///
/// Callers only ask for `n >= 5` that is not a power of two; every returned
/// value must satisfy `1 < k < n`.
pub trait Strategy: fmt::Display + Send + Sync {
    fn k(&self, n: &BigUint) -> Vec<BigUint>;

    /// Whether the strategy yields a single candidate.
    fn singleton(&self) -> bool;
}

/// Every strategy, in catalog order.
pub fn strategies() -> Vec<Box<dyn Strategy>> {
    vec![
        Box::new(Binary),
        Box::new(CoBinary),
        Box::new(Dichotomic),
        Box::new(Sqrt),
        Box::new(Total),
        Box::new(Dyadic),
        Box::new(Fermat),
    ]
}

macro_rules! named {
    ($ty:ident, $name:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, $name)
            }
        }
    };
}

/// `k = floor(n / 2)`; reproduces the binary method.
#[derive(Debug, Clone, Copy, Default)]
pub struct Binary;
named!(Binary, "binary");

impl Strategy for Binary {
    fn k(&self, n: &BigUint) -> Vec<BigUint> {
        vec![n >> 1u32]
    }

    fn singleton(&self) -> bool {
        true
    }
}

/// `k = floor(n / 2)` for even `n`, `(n + 1) / 2` for odd `n`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CoBinary;
named!(CoBinary, "co_binary");

impl Strategy for CoBinary {
    fn k(&self, n: &BigUint) -> Vec<BigUint> {
        let mut k = n >> 1u32;
        if n.bit(0) {
            k += 1u32;
        }
        vec![k]
    }

    fn singleton(&self) -> bool {
        true
    }
}

/// `k = floor(n / 2^⌊log2(n)/2⌋)`, splitting the binary expansion in half.
#[derive(Debug, Clone, Copy, Default)]
pub struct Dichotomic;
named!(Dichotomic, "dichotomic");

impl Strategy for Dichotomic {
    fn k(&self, n: &BigUint) -> Vec<BigUint> {
        let h = n.bits() / 2;
        vec![n >> h]
    }

    fn singleton(&self) -> bool {
        true
    }
}

/// `k = floor(sqrt(n))`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sqrt;
named!(Sqrt, "sqrt");

impl Strategy for Sqrt {
    fn k(&self, n: &BigUint) -> Vec<BigUint> {
        vec![n.sqrt()]
    }

    fn singleton(&self) -> bool {
        true
    }
}

/// Every `k` in `[2, n)`. Exponential in practice; small targets only.
#[derive(Debug, Clone, Copy, Default)]
pub struct Total;
named!(Total, "total");

impl Strategy for Total {
    fn k(&self, n: &BigUint) -> Vec<BigUint> {
        let mut ks = Vec::new();
        let mut k = BigUint::from(2u32);
        while &k < n {
            ks.push(k.clone());
            k += 1u32;
        }
        ks
    }

    fn singleton(&self) -> bool {
        false
    }
}

/// `{ floor(n / 2^j) : j >= 1 } ∖ {0, 1}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Dyadic;
named!(Dyadic, "dyadic");

impl Strategy for Dyadic {
    fn k(&self, n: &BigUint) -> Vec<BigUint> {
        let mut ks = Vec::new();
        let mut k = n >> 1u32;
        while k > BigUint::one() {
            ks.push(k.clone());
            k >>= 1u32;
        }
        ks
    }

    fn singleton(&self) -> bool {
        false
    }
}

/// `{ floor(n / 2^(2^j)) : j >= 0 } ∖ {0, 1}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Fermat;
named!(Fermat, "fermat");

impl Strategy for Fermat {
    fn k(&self, n: &BigUint) -> Vec<BigUint> {
        let mut ks = Vec::new();
        let mut shift = 1u64;
        loop {
            let k = n >> shift;
            if k <= BigUint::one() {
                break;
            }
            ks.push(k);
            shift *= 2;
        }
        ks
    }

    fn singleton(&self) -> bool {
        false
    }
}
