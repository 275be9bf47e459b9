//! Heuristic addition sequences in the style of Bos and Coster.
//!
//! The algorithm keeps a *protosequence*: the targets plus `{1, 2}`. It
//! repeatedly removes the largest element and asks a [`Heuristic`] for
//! smaller values which, once inserted, make the removed element a sum of two
//! protosequence members. When only `{1, 2}` remains every removed element
//! together with the leader forms an addition chain.
//!
//! Reference: J. Bos and M. Coster, "Addition Chain Heuristics", CRYPTO '89.

use std::fmt;

use addchain_core::bigint::{normalize_targets, sort_unique};
use addchain_core::{Chain, ChainError, SequenceAlgorithm};
use num_bigint::BigUint;
use num_traits::{One, Zero};

/// Proposes values to insert into the protosequence `f` so that `target`
/// becomes the sum of two of its members.
///
/// `f` is sorted ascending, excludes `target`, and always holds 1 and 2.
/// Returning `None` means the heuristic does not apply.
pub trait Heuristic: fmt::Display + Send + Sync {
    fn suggest(&self, f: &[BigUint], target: &BigUint) -> Option<Vec<BigUint>>;
}

/// Heuristic sequence algorithm driven by a single (possibly composite)
/// [`Heuristic`].
pub struct Algorithm {
    heuristic: Box<dyn Heuristic>,
}

impl Algorithm {
    pub fn new(heuristic: impl Heuristic + 'static) -> Self {
        Algorithm {
            heuristic: Box::new(heuristic),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "heuristic({})", self.heuristic)
    }
}

impl SequenceAlgorithm for Algorithm {
    fn find_sequence(&self, targets: &[BigUint]) -> Result<Chain, ChainError> {
        let targets = normalize_targets(targets);
        let Some(max) = targets.last() else {
            return Ok(Chain::new());
        };
        let two = BigUint::from(2u32);
        let needs_two = *max >= two;

        let mut proto = vec![BigUint::one(), two.clone()];
        proto.extend(targets.iter().cloned());
        sort_unique(&mut proto);

        let mut c = Chain::unit();
        if needs_two {
            c.push(two);
        }

        while proto.len() > 2 {
            let Some(target) = proto.pop() else { break };
            let insert = self
                .heuristic
                .suggest(&proto, &target)
                .ok_or_else(|| ChainError::HeuristicStalled {
                    target: target.clone(),
                })?;
            log::trace!("{}: {} <- {:?}", self, target, insert);
            debug_assert!(insert.iter().all(|x| !x.is_zero() && x < &target));
            c.push(target);
            proto.extend(insert);
            sort_unique(&mut proto);
        }

        c.sort_unique();
        log::debug!("{}: {} targets, chain length {}", self, targets.len(), c.len());
        Ok(c)
    }
}

/// Tries each heuristic in order and uses the first suggestion.
pub struct UseFirst(Vec<Box<dyn Heuristic>>);

impl UseFirst {
    pub fn new(heuristics: Vec<Box<dyn Heuristic>>) -> Self {
        UseFirst(heuristics)
    }
}

impl fmt::Display for UseFirst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "use_first(")?;
        for (i, h) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", h)?;
        }
        write!(f, ")")
    }
}

impl Heuristic for UseFirst {
    fn suggest(&self, f: &[BigUint], target: &BigUint) -> Option<Vec<BigUint>> {
        self.0.iter().find_map(|h| h.suggest(f, target))
    }
}

/// Applies when the target is at least twice the next largest element:
/// reach it from `k = target >> u` by doublings plus a small remainder.
#[derive(Debug, Clone, Copy, Default)]
pub struct Halving;

impl fmt::Display for Halving {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "halving")
    }
}

impl Heuristic for Halving {
    fn suggest(&self, f: &[BigUint], target: &BigUint) -> Option<Vec<BigUint>> {
        let next = f.last()?;
        let r = target / next;
        if r.bits() < 2 {
            return None;
        }
        let u = r.bits() - 1;

        // target = 2^u k + d
        let k = target >> u;
        let mut x = k.clone();
        let mut insert = vec![k];
        for _ in 1..u {
            x <<= 1u32;
            insert.push(x.clone());
        }
        let top = &x << 1u32;
        let d = target - &top;
        if !d.is_zero() {
            insert.push(top);
            insert.push(d);
        }
        Some(insert)
    }
}

/// Inserts the difference between the target and the next largest element.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeltaLargest;

impl fmt::Display for DeltaLargest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "delta_largest")
    }
}

impl Heuristic for DeltaLargest {
    fn suggest(&self, f: &[BigUint], target: &BigUint) -> Option<Vec<BigUint>> {
        let next = f.last()?;
        Some(vec![target - next])
    }
}

/// Finds `a + b` closest to the target from below and inserts it together
/// with the gap `target - (a + b)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Approximation;

impl fmt::Display for Approximation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "approximation")
    }
}

impl Heuristic for Approximation {
    fn suggest(&self, f: &[BigUint], target: &BigUint) -> Option<Vec<BigUint>> {
        let mut best: Option<(BigUint, BigUint)> = None;
        for (i, a) in f.iter().enumerate() {
            for b in &f[i..] {
                let s = a + b;
                if &s > target {
                    // f is ascending
                    break;
                }
                let delta = target - &s;
                if best.as_ref().map_or(true, |(_, d)| &delta < d) {
                    best = Some((s, delta));
                }
            }
        }

        let (s, delta) = best?;
        if delta.is_zero() {
            return Some(Vec::new());
        }
        Some(vec![s, delta])
    }
}
