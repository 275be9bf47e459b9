//! Addition chains and the programs that produce them.

use std::fmt;
use std::ops::{Deref, Index};

use num_bigint::BigUint;
use num_traits::One;
use serde::{Deserialize, Serialize};

use crate::bigint;
use crate::ChainError;

/// One step of a chain program: element `k` is `chain[i] + chain[j]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Op {
    pub i: usize,
    pub j: usize,
}

impl Op {
    /// True when the op adds an element to itself.
    pub fn is_double(&self) -> bool {
        self.i == self.j
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]+[{}]", self.i, self.j)
    }
}

/// Operand indices for every chain element after the first.
pub type Program = Vec<Op>;

/// An ordered sequence of integers, intended to be an addition chain.
///
/// Algorithms build chains by appending and call [`Chain::sort_unique`]
/// before handing them back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chain(Vec<BigUint>);

impl Chain {
    /// The empty chain.
    pub fn new() -> Self {
        Chain(Vec::new())
    }

    /// The chain `[1]`.
    pub fn unit() -> Self {
        Chain(vec![BigUint::one()])
    }

    /// Append an independent copy of `x`.
    pub fn append_clone(&mut self, x: &BigUint) {
        self.0.push(x.clone());
    }

    pub fn push(&mut self, x: BigUint) {
        self.0.push(x);
    }

    pub fn extend<I: IntoIterator<Item = BigUint>>(&mut self, xs: I) {
        self.0.extend(xs);
    }

    /// Sort ascending and remove duplicates.
    pub fn sort_unique(&mut self) {
        bigint::sort_unique(&mut self.0);
    }

    /// Last element of the chain.
    pub fn end(&self) -> Option<&BigUint> {
        self.0.last()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Vec<BigUint> {
        self.0
    }

    /// Number of additions (including doublings) this chain costs.
    pub fn cost(&self) -> usize {
        self.0.len().saturating_sub(1)
    }

    pub fn is_ascending(&self) -> bool {
        is_ascending(&self.0)
    }

    /// Whether the chain contains `target`.
    pub fn produces(&self, target: &BigUint) -> bool {
        self.0.contains(target)
    }

    /// Whether the chain contains every one of `targets`.
    pub fn superset(&self, targets: &[BigUint]) -> bool {
        targets.iter().all(|t| self.produces(t))
    }

    /// Every pair `(i, j)`, `i <= j < k`, with `chain[i] + chain[j] == chain[k]`.
    ///
    /// Linear in `k` when the prefix is ascending, quadratic otherwise.
    /// Empty for `k == 0` and for `k` past the end of the chain.
    pub fn ops(&self, k: usize) -> Vec<Op> {
        let c = &self.0;
        let mut ops = Vec::new();
        let Some(target) = c.get(k) else {
            return ops;
        };

        if k == 0 {
            return ops;
        }

        if is_ascending(&c[..k]) {
            let (mut l, mut r) = (0usize, k - 1);
            while l <= r {
                let s = &c[l] + &c[r];
                match s.cmp(target) {
                    std::cmp::Ordering::Equal => {
                        ops.push(Op { i: l, j: r });
                        l += 1;
                    }
                    std::cmp::Ordering::Less => l += 1,
                    std::cmp::Ordering::Greater => {
                        if r == 0 {
                            break;
                        }
                        r -= 1;
                    }
                }
            }
            return ops;
        }

        for i in 0..k {
            for j in i..k {
                if &(&c[i] + &c[j]) == target {
                    ops.push(Op { i, j });
                }
            }
        }
        ops
    }

    /// The first op producing element `k`; `NoOperation` when there is none,
    /// including for `k` out of range.
    pub fn op(&self, k: usize) -> Result<Op, ChainError> {
        self.ops(k)
            .into_iter()
            .next()
            .ok_or(ChainError::NoOperation { index: k })
    }

    /// Ops for every element after the first.
    pub fn program(&self) -> Result<Program, ChainError> {
        if self.0.is_empty() {
            return Err(ChainError::InvalidStart);
        }
        (1..self.0.len()).map(|k| self.op(k)).collect()
    }

    /// Check the addition chain property: starts at 1, strictly ascending,
    /// every later element the sum of two earlier ones.
    pub fn validate(&self) -> Result<(), ChainError> {
        match self.0.first() {
            Some(first) if first.is_one() => {}
            _ => return Err(ChainError::InvalidStart),
        }
        if let Some(index) = self.0.windows(2).position(|w| w[0] >= w[1]) {
            return Err(ChainError::NotAscending { index: index + 1 });
        }
        self.program().map(|_| ())
    }

    /// Chain for `a.end() * b.end()`: `a` followed by `a.end()` times each
    /// element of `b` after the first.
    pub fn product(a: &Chain, b: &Chain) -> Chain {
        let mut c = a.clone();
        if let Some(last) = a.end() {
            for x in b.0.iter().skip(1) {
                c.push(last * x);
            }
        }
        c
    }

    /// Chain for `a.end() + x`: `a` followed by that sum.
    pub fn plus(a: &Chain, x: &BigUint) -> Chain {
        let mut c = a.clone();
        if let Some(last) = a.end() {
            c.push(last + x);
        }
        c
    }
}

fn is_ascending(xs: &[BigUint]) -> bool {
    xs.windows(2).all(|w| w[0] < w[1])
}

impl Deref for Chain {
    type Target = [BigUint];

    fn deref(&self) -> &[BigUint] {
        &self.0
    }
}

impl Index<usize> for Chain {
    type Output = BigUint;

    fn index(&self, k: usize) -> &BigUint {
        &self.0[k]
    }
}

impl From<Vec<BigUint>> for Chain {
    fn from(xs: Vec<BigUint>) -> Self {
        Chain(xs)
    }
}

impl FromIterator<BigUint> for Chain {
    fn from_iter<I: IntoIterator<Item = BigUint>>(iter: I) -> Self {
        Chain(iter.into_iter().collect())
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (k, x) in self.0.iter().enumerate() {
            if k > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", x)?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(xs: &[u64]) -> Chain {
        xs.iter().map(|&x| BigUint::from(x)).collect()
    }

    #[test]
    fn test_append_clone_is_independent() {
        let mut c = Chain::new();
        let mut x = BigUint::from(3u32);
        c.append_clone(&x);
        x <<= 1u32;
        c.append_clone(&x);
        x += 1u32;
        assert_eq!(c, chain(&[3, 6]));
        assert_eq!(x, BigUint::from(7u32));
    }

    #[test]
    fn test_sort_unique() {
        let mut c = chain(&[5, 1, 2, 5, 4, 2]);
        c.sort_unique();
        assert_eq!(c, chain(&[1, 2, 4, 5]));
    }

    #[test]
    fn test_ops_ascending() {
        let c = chain(&[1, 2, 3, 4, 5, 7]);
        assert_eq!(c.ops(5), vec![Op { i: 1, j: 4 }, Op { i: 2, j: 3 }]);
        assert_eq!(c.ops(1), vec![Op { i: 0, j: 0 }]);
        assert!(c.ops(0).is_empty());
    }

    #[test]
    fn test_op_out_of_range() {
        let c = chain(&[1, 2, 4]);
        assert!(c.ops(3).is_empty());
        assert!(c.ops(usize::MAX).is_empty());
        assert_eq!(c.op(3), Err(ChainError::NoOperation { index: 3 }));
        assert!(Chain::new().ops(0).is_empty());
    }

    #[test]
    fn test_ops_unordered_prefix() {
        let c = chain(&[1, 2, 4, 3, 6]);
        assert_eq!(c.ops(4), vec![Op { i: 1, j: 2 }, Op { i: 3, j: 3 }]);
    }

    #[test]
    fn test_program() {
        let c = chain(&[1, 2, 4, 5]);
        let p = c.program().unwrap();
        assert_eq!(p, vec![Op { i: 0, j: 0 }, Op { i: 1, j: 1 }, Op { i: 0, j: 2 }]);
        assert!(p[0].is_double());
    }

    #[test]
    fn test_validate() {
        assert!(chain(&[1, 2, 3, 6, 12, 15]).validate().is_ok());
        assert!(chain(&[1]).validate().is_ok());
        assert!(matches!(chain(&[]).validate(), Err(ChainError::InvalidStart)));
        assert!(matches!(chain(&[2, 4]).validate(), Err(ChainError::InvalidStart)));
        assert!(matches!(
            chain(&[1, 2, 2]).validate(),
            Err(ChainError::NotAscending { index: 2 })
        ));
        assert!(matches!(
            chain(&[1, 2, 5]).validate(),
            Err(ChainError::NoOperation { index: 2 })
        ));
    }

    #[test]
    fn test_product_and_plus() {
        let a = chain(&[1, 2, 3]);
        let b = chain(&[1, 2, 4, 5]);
        let p = Chain::product(&a, &b);
        assert_eq!(p, chain(&[1, 2, 3, 6, 12, 15]));
        assert!(p.validate().is_ok());
        let q = Chain::plus(&p, &BigUint::from(2u32));
        assert_eq!(q.end(), Some(&BigUint::from(17u32)));
        assert!(q.validate().is_ok());
    }

    #[test]
    fn test_superset() {
        let c = chain(&[1, 2, 4, 5]);
        assert!(c.superset(&[BigUint::from(4u32), BigUint::from(5u32)]));
        assert!(!c.superset(&[BigUint::from(3u32)]));
        assert_eq!(c.cost(), 3);
        assert_eq!(c.to_string(), "[1 2 4 5]");
    }
}
