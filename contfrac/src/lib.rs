//! # contfrac
//!
//! Addition sequences from continued fraction expansions.
//!
//! For sorted targets `n_1 < … < n_k`, divide the largest by the next:
//! `n_k = q·n_{k-1} + r`. A chain for `n_k` follows from a chain covering
//! `{n_1, …, n_{k-1}, r}`, multiplied by a chain for `q`, plus `r`. The
//! recursion bottoms out in [`strategy::Strategy`]-driven single-target chains.
//!
//! ## Strategies
//!
//! - **Binary / CoBinary**: halve the target, reproducing the binary methods
//! - **Dichotomic**: split the binary expansion in the middle
//! - **Sqrt**: divide by the integer square root
//! - **Total / Dyadic / Fermat**: search several candidates (not singleton)

pub mod strategy;

use std::fmt;

use addchain_core::bigint::{is_pow2, normalize_targets, pow2_up_to};
use addchain_core::{Chain, ChainError, SequenceAlgorithm};
use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, Zero};

pub use strategy::{strategies, Strategy};

/// Continued fraction sequence algorithm parameterized by a strategy.
pub struct Algorithm {
    strategy: Box<dyn Strategy>,
}

impl Algorithm {
    pub fn new(strategy: impl Strategy + 'static) -> Self {
        Algorithm {
            strategy: Box::new(strategy),
        }
    }

    pub fn from_boxed(strategy: Box<dyn Strategy>) -> Self {
        Algorithm { strategy }
    }

    /// Shortest chain ending at `n` over the strategy's candidates.
    fn minchain(&self, n: &BigUint) -> Chain {
        if is_pow2(n) {
            return Chain::from(pow2_up_to(n));
        }
        if *n == BigUint::from(3u32) {
            return [1u32, 2, 3].into_iter().map(BigUint::from).collect();
        }

        let mut ks = self.strategy.k(n);
        if ks.is_empty() {
            log::warn!("{} proposed no candidates for {}, falling back to halving", self, n);
            ks.push(n >> 1u32);
        }

        let mut best: Option<Chain> = None;
        for k in ks {
            debug_assert!(k > BigUint::one() && &k < n, "{} proposed k = {} for {}", self, k, n);
            let c = self.chain(&[k, n.clone()]);
            if best.as_ref().map_or(true, |b| c.len() < b.len()) {
                best = Some(c);
            }
        }
        best.unwrap_or_default()
    }

    /// Chain covering every element of `ns`, which must be sorted ascending,
    /// non-empty and free of zeros. The chain ends at the last element.
    fn chain(&self, ns: &[BigUint]) -> Chain {
        let k = ns.len();
        if k == 1 || ns[k - 2] <= BigUint::one() {
            return self.minchain(&ns[k - 1]);
        }

        let (q, r) = ns[k - 1].div_rem(&ns[k - 2]);
        let cq = self.minchain(&q);
        let mut remaining = ns[..k - 1].to_vec();

        if r.is_zero() {
            return Chain::product(&self.chain(&remaining), &cq);
        }

        if let Err(pos) = remaining.binary_search(&r) {
            remaining.insert(pos, r.clone());
        }
        Chain::plus(&Chain::product(&self.chain(&remaining), &cq), &r)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "continued_fractions({})", self.strategy)
    }
}

impl SequenceAlgorithm for Algorithm {
    fn find_sequence(&self, targets: &[BigUint]) -> Result<Chain, ChainError> {
        let targets = normalize_targets(targets);
        if targets.is_empty() {
            return Ok(Chain::new());
        }
        let mut c = self.chain(&targets);
        c.sort_unique();
        log::debug!("{}: {} targets, chain length {}", self, targets.len(), c.len());
        Ok(c)
    }
}
