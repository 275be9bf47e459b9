//! Dictionary methods for addition chains.
//!
//! A dictionary method writes the target as `Σ d_i·2^(e_i)`, finds one
//! addition sequence covering every distinct `d_i`, and then assembles the
//! target Horner-style with doublings and additions of dictionary values.
//!
//! References:
//!
//! - D. Bleichenbacher, A. Flammenkamp, "An Efficient Algorithm for Computing
//!   Shortest Addition Chains", 1998.
//! - H. Kunihiro, H. Yamamoto, "New Methods for Generating Short Addition
//!   Chains", IEICE Trans. Fundamentals, 2000.

pub mod decompose;
pub mod runs;

use std::fmt;
use std::sync::Arc;

use addchain_core::bigint::sort_unique;
use addchain_core::{Chain, ChainAlgorithm, ChainError, SequenceAlgorithm};
use num_bigint::BigUint;
use num_traits::Zero;
use serde::{Deserialize, Serialize};

pub use decompose::{Decomposer, Hybrid, RunLength, SlidingWindow};
pub use runs::{runs_chain, RunsAlgorithm};

/// The term `d·2^e`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    pub d: BigUint,
    pub e: u64,
}

/// A decomposition of a target into terms.
pub type Sum = Vec<Term>;

/// The integer a sum represents.
pub fn evaluate(sum: &[Term]) -> BigUint {
    sum.iter()
        .fold(BigUint::zero(), |acc, t| acc + (&t.d << t.e))
}

/// Distinct digit values of a sum, ascending.
pub fn dictionary(sum: &[Term]) -> Vec<BigUint> {
    let mut dict: Vec<BigUint> = sum.iter().map(|t| t.d.clone()).collect();
    sort_unique(&mut dict);
    dict
}

/// Chain elements that build the value of `sum` from its digits.
///
/// `sum` must be sorted by ascending exponent. The returned elements assume
/// every digit is already available; the top digit itself is not repeated.
pub fn sum_chain(sum: &[Term]) -> Chain {
    let mut c = Chain::new();
    let Some(top) = sum.last() else {
        return c;
    };

    let mut x = top.d.clone();
    for w in sum.windows(2).rev() {
        let (lo, hi) = (&w[0], &w[1]);
        for _ in lo.e..hi.e {
            x <<= 1u32;
            c.append_clone(&x);
        }
        x += &lo.d;
        c.append_clone(&x);
    }
    for _ in 0..sum[0].e {
        x <<= 1u32;
        c.append_clone(&x);
    }
    c
}

/// Chain algorithm combining a decomposer with a sequence algorithm for its
/// dictionary.
#[derive(Clone)]
pub struct DictAlgorithm {
    decomposer: Arc<dyn Decomposer>,
    seqalg: Arc<dyn SequenceAlgorithm>,
}

impl DictAlgorithm {
    pub fn new(decomposer: Arc<dyn Decomposer>, seqalg: Arc<dyn SequenceAlgorithm>) -> Self {
        DictAlgorithm { decomposer, seqalg }
    }
}

impl fmt::Display for DictAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dictionary({},{})", self.decomposer, self.seqalg)
    }
}

impl ChainAlgorithm for DictAlgorithm {
    fn find_chain(&self, target: &BigUint) -> Result<Chain, ChainError> {
        if target.is_zero() {
            return Ok(Chain::new());
        }

        let mut sum = self.decomposer.decompose(target);
        sum.sort_by_key(|t| t.e);
        debug_assert_eq!(&evaluate(&sum), target, "{} decomposition", self.decomposer);

        let dict = dictionary(&sum);
        log::trace!("{}: {} terms, {} dictionary entries", self, sum.len(), dict.len());

        let mut c = self.seqalg.find_sequence(&dict)?;
        c.extend(sum_chain(&sum).into_inner());
        c.sort_unique();
        Ok(c)
    }
}
