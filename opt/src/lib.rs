//! Chain optimization applied after any chain algorithm.
//!
//! Algorithms that assemble chains from parts (dictionaries, sequences,
//! Horner steps) often leave elements that nothing downstream uses. The
//! [`Optimized`] wrapper recovers the chain's program and keeps only the
//! elements live from the target backwards.

use std::fmt;

use addchain_core::{Chain, ChainAlgorithm, ChainError};
use num_bigint::BigUint;
use num_traits::Zero;

/// Remove every element that does not contribute to `target`.
///
/// `c` must be a valid addition chain containing `target`; elements after
/// the target are dropped as well. The result is a valid chain ending at
/// `target` and never longer than `c`.
pub fn eliminate_dead(c: &Chain, target: &BigUint) -> Result<Chain, ChainError> {
    let end = c
        .iter()
        .position(|x| x == target)
        .ok_or_else(|| ChainError::TargetNotProduced {
            target: target.clone(),
        })?;

    let mut live = vec![false; end + 1];
    live[0] = true;
    live[end] = true;
    for k in (1..=end).rev() {
        if !live[k] {
            continue;
        }
        let op = c.op(k)?;
        live[op.i] = true;
        live[op.j] = true;
    }

    Ok(c.iter()
        .take(end + 1)
        .zip(&live)
        .filter(|&(_, &keep)| keep)
        .map(|(x, _)| x.clone())
        .collect())
}

/// Wraps a chain algorithm and strips dead elements from its output.
#[derive(Debug, Clone)]
pub struct Optimized<A> {
    inner: A,
}

impl<A> Optimized<A> {
    pub fn new(inner: A) -> Self {
        Optimized { inner }
    }

    pub fn inner(&self) -> &A {
        &self.inner
    }
}

impl<A: fmt::Display> fmt::Display for Optimized<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "opt({})", self.inner)
    }
}

impl<A: ChainAlgorithm> ChainAlgorithm for Optimized<A> {
    fn find_chain(&self, target: &BigUint) -> Result<Chain, ChainError> {
        let raw = self.inner.find_chain(target)?;
        if target.is_zero() {
            return Ok(raw);
        }
        let c = eliminate_dead(&raw, target)?;
        if c.len() < raw.len() {
            log::trace!("{}: removed {} dead elements", self, raw.len() - c.len());
        }
        Ok(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use addchain_core::AsChainAlgorithm;
    use dict::{DictAlgorithm, SlidingWindow};
    use heuristic::{DeltaLargest, Halving, UseFirst};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn chain(xs: &[u64]) -> Chain {
        xs.iter().map(|&x| BigUint::from(x)).collect()
    }

    fn heuristic() -> heuristic::Algorithm {
        heuristic::Algorithm::new(UseFirst::new(vec![Box::new(Halving), Box::new(DeltaLargest)]))
    }

    #[test]
    fn test_eliminate_dead() {
        // 5 is never used on the way to 17; 20 comes after it
        let c = chain(&[1, 2, 4, 5, 8, 16, 17, 20]);
        let opt = eliminate_dead(&c, &BigUint::from(17u32)).unwrap();
        assert_eq!(opt, chain(&[1, 2, 4, 8, 16, 17]));
        opt.validate().unwrap();
    }

    #[test]
    fn test_eliminate_dead_missing_target() {
        let c = chain(&[1, 2, 4]);
        assert_eq!(
            eliminate_dead(&c, &BigUint::from(3u32)),
            Err(ChainError::TargetNotProduced {
                target: BigUint::from(3u32)
            })
        );
    }

    #[test]
    fn test_unit_target() {
        let a = Optimized::new(AsChainAlgorithm(heuristic()));
        assert_eq!(a.find_chain(&BigUint::from(1u32)).unwrap(), Chain::unit());
        assert!(a.find_chain(&BigUint::zero()).unwrap().is_empty());
    }

    #[test]
    fn test_never_longer_than_raw() {
        let raw = DictAlgorithm::new(Arc::new(SlidingWindow::new(5)), Arc::new(heuristic()));
        let a = Optimized::new(raw.clone());
        let twice = Optimized::new(Optimized::new(raw.clone()));
        assert_eq!(twice.to_string(), format!("opt(opt({}))", raw));

        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..40 {
            let bytes: Vec<u8> = (0..rng.gen_range(1..24)).map(|_| rng.gen()).collect();
            let n = BigUint::from_bytes_le(&bytes);
            if n.is_zero() {
                continue;
            }
            let r = raw.find_chain(&n).unwrap();
            let c = a.find_chain(&n).unwrap();
            c.validate().unwrap();
            assert_eq!(c.end(), Some(&n));
            assert!(c.len() <= r.len());
            assert_eq!(twice.find_chain(&n).unwrap(), c);
        }
    }
}
