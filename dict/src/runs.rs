//! Dictionary method specialised to runs of ones.
//!
//! Write `R(n) = 2^n - 1`. Since `R(a + b) = R(b)·2^a + R(a)`, an addition
//! chain over run *lengths* lifts directly into a chain containing every
//! `R(l)`. The runs algorithm therefore only asks the sequence algorithm for
//! a sequence of small integers.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use addchain_core::bigint::ones;
use addchain_core::{Chain, ChainAlgorithm, ChainError, SequenceAlgorithm};
use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};

use crate::decompose::{Decomposer, RunLength};
use crate::{dictionary, sum_chain};

/// Lift a chain of run lengths into a chain containing `R(l)` for every
/// element `l` of `lengths`.
///
/// `lengths` must be a valid addition chain.
pub fn runs_chain(lengths: &Chain) -> Result<Chain, ChainError> {
    let program = lengths.program()?;
    let to_len = |x: &BigUint| {
        x.to_u64()
            .ok_or_else(|| ChainError::ValueTooLarge { value: x.clone() })
    };

    let mut c = Chain::unit();
    // Largest shift of R(l) already in the chain.
    let mut shifted: HashMap<u64, u64> = HashMap::new();

    for op in program {
        let (x, y) = (&lengths[op.i], &lengths[op.j]);
        let (a, b) = if x <= y { (to_len(x)?, to_len(y)?) } else { (to_len(y)?, to_len(x)?) };

        let rb = ones(b);
        let s = shifted.entry(b).or_insert(0);
        while *s < a {
            *s += 1;
            c.push(&rb << *s);
        }
        c.push(ones(a + b));
    }
    Ok(c)
}

/// Chain algorithm over the runs of ones in the target.
#[derive(Clone)]
pub struct RunsAlgorithm {
    seqalg: Arc<dyn SequenceAlgorithm>,
}

impl RunsAlgorithm {
    pub fn new(seqalg: Arc<dyn SequenceAlgorithm>) -> Self {
        RunsAlgorithm { seqalg }
    }
}

impl fmt::Display for RunsAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "runs({})", self.seqalg)
    }
}

impl ChainAlgorithm for RunsAlgorithm {
    fn find_chain(&self, target: &BigUint) -> Result<Chain, ChainError> {
        if target.is_zero() {
            return Ok(Chain::new());
        }

        let mut sum = RunLength::new(0).decompose(target);
        sum.sort_by_key(|t| t.e);

        let lengths: Vec<BigUint> = dictionary(&sum)
            .iter()
            .map(|run| BigUint::from(run.bits()))
            .collect();

        let mut lc = self.seqalg.find_sequence(&lengths)?;
        lc.sort_unique();
        log::trace!("{}: run lengths {:?} -> {}", self, lengths, lc);

        let mut c = runs_chain(&lc)?;
        c.extend(sum_chain(&sum).into_inner());
        c.sort_unique();
        Ok(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn big(x: u64) -> BigUint {
        BigUint::from(x)
    }

    fn chain(xs: &[u64]) -> Chain {
        xs.iter().map(|&x| big(x)).collect()
    }

    #[test]
    fn test_runs_chain() {
        let lengths = chain(&[1, 2, 3, 6]);
        let mut c = runs_chain(&lengths).unwrap();
        c.sort_unique();
        c.validate().unwrap();
        for l in [1u64, 2, 3, 6] {
            assert!(c.produces(&ones(l)), "missing R({}) in {}", l, c);
        }
        assert_eq!(c.end(), Some(&big(63)));
    }

    #[test]
    fn test_runs_chain_rejects_invalid() {
        assert!(matches!(
            runs_chain(&chain(&[1, 5])),
            Err(ChainError::NoOperation { index: 1 })
        ));
    }
}
