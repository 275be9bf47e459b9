//! Addition chain types and the algorithm contracts shared by every chain finder.
//!
//! An addition chain for `n` starts at 1 and ends at `n`, each element the
//! sum of two earlier ones. A chain of length `l + 1` yields an exponentiation
//! `x^n` in `l` multiplications.

pub mod bigint;
pub mod chain;

use std::fmt;

use num_bigint::BigUint;
use num_traits::Zero;

pub use chain::{Chain, Op, Program};

/// Failures reported by chain algorithms.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChainError {
    #[error("chain element {index} is not the sum of two earlier elements")]
    NoOperation { index: usize },

    #[error("chain does not start at 1")]
    InvalidStart,

    #[error("chain is not strictly ascending at element {index}")]
    NotAscending { index: usize },

    #[error("heuristic made no suggestion for {target}")]
    HeuristicStalled { target: BigUint },

    #[error("chain does not produce {target}")]
    TargetNotProduced { target: BigUint },

    #[error("value {value} is too large for a run length")]
    ValueTooLarge { value: BigUint },
}

/// Finds a chain ending at a single target.
///
/// `Display` gives the algorithm's descriptive name.
pub trait ChainAlgorithm: fmt::Display + Send + Sync {
    fn find_chain(&self, target: &BigUint) -> Result<Chain, ChainError>;
}

/// Finds one chain containing every one of a set of targets.
pub trait SequenceAlgorithm: fmt::Display + Send + Sync {
    fn find_sequence(&self, targets: &[BigUint]) -> Result<Chain, ChainError>;
}

impl<T: ChainAlgorithm + ?Sized> ChainAlgorithm for Box<T> {
    fn find_chain(&self, target: &BigUint) -> Result<Chain, ChainError> {
        (**self).find_chain(target)
    }
}

impl<T: SequenceAlgorithm + ?Sized> SequenceAlgorithm for Box<T> {
    fn find_sequence(&self, targets: &[BigUint]) -> Result<Chain, ChainError> {
        (**self).find_sequence(targets)
    }
}

impl<T: SequenceAlgorithm + ?Sized> SequenceAlgorithm for std::sync::Arc<T> {
    fn find_sequence(&self, targets: &[BigUint]) -> Result<Chain, ChainError> {
        (**self).find_sequence(targets)
    }
}

/// Uses a sequence algorithm as a chain algorithm for a single target.
#[derive(Debug, Clone)]
pub struct AsChainAlgorithm<S>(pub S);

impl<S: fmt::Display> fmt::Display for AsChainAlgorithm<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl<S: SequenceAlgorithm> ChainAlgorithm for AsChainAlgorithm<S> {
    fn find_chain(&self, target: &BigUint) -> Result<Chain, ChainError> {
        if target.is_zero() {
            return Ok(Chain::new());
        }
        self.0.find_sequence(std::slice::from_ref(target))
    }
}
