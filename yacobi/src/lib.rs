//! Yacobi's addition chain algorithm.
//!
//! A variant of Lempel-Ziv compression over the bits of the exponent. The
//! target is scanned from least to most significant bit and split into
//! symbols, each one the shortest bit string not yet seen in a binary trie
//! of earlier symbols. The distinct symbol values form a dictionary; a
//! sequence algorithm covers the dictionary and the target is rebuilt from
//! its symbols Horner-style.
//!
//! Reference: Y. Yacobi, "Exponentiating Faster with Addition Chains",
//! EUROCRYPT '90, pp. 222-229, 1991.

use std::fmt;
use std::sync::Arc;

use addchain_core::bigint::{extract, sort_unique};
use addchain_core::{Chain, ChainAlgorithm, ChainError, SequenceAlgorithm};
use num_bigint::BigUint;
use num_traits::{One, Zero};

/// One parsed symbol of the target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    /// Extracted bits of the symbol.
    pub e: BigUint,
    /// Bit length, which may exceed `e.bits()` when the run ends in zeros.
    pub l: u64,
    /// Zero bits skipped immediately before the symbol started.
    pub z: u64,
}

/// Trie node. Children are arena indices; there is no parent link.
#[derive(Debug)]
struct Node {
    sym: Symbol,
    child_zero: Option<usize>,
    child_one: Option<usize>,
}

impl Node {
    fn new(sym: Symbol) -> Self {
        Node {
            sym,
            child_zero: None,
            child_one: None,
        }
    }

    fn child(&self, bit: bool) -> Option<usize> {
        if bit {
            self.child_one
        } else {
            self.child_zero
        }
    }

    fn set_child(&mut self, bit: bool, idx: usize) {
        if bit {
            self.child_one = Some(idx);
        } else {
            self.child_zero = Some(idx);
        }
    }
}

/// Split `target` into symbols, least significant first.
///
/// Returns an empty list for zero.
pub fn parse(target: &BigUint) -> Vec<Symbol> {
    let root = Node::new(Symbol {
        e: BigUint::one(),
        l: 0,
        z: 0,
    });
    let mut nodes = vec![root];
    let mut parses: Vec<usize> = Vec::new();

    let n = target.bits();
    let mut b = 0u64;
    while b < n {
        let mut z = 0u64;
        while b < n && !target.bit(b) {
            z += 1;
            b += 1;
        }
        if b >= n {
            break;
        }

        let start = b;
        let mut l = 0u64;
        let mut p = 0usize;
        let mut last = true;
        while b < n {
            last = target.bit(b);
            b += 1;
            l += 1;
            match nodes[p].child(last) {
                Some(next) => p = next,
                None => break,
            }
        }

        let leaf = nodes.len();
        nodes.push(Node::new(Symbol {
            e: extract(target, start, b),
            l,
            z,
        }));
        nodes[p].set_child(last, leaf);
        parses.push(leaf);
    }

    log::trace!(
        "parsed {} bits into {} symbols over {} trie nodes",
        n,
        parses.len(),
        nodes.len()
    );

    let symbols: Vec<Symbol> = parses.iter().map(|&i| nodes[i].sym.clone()).collect();
    debug_assert_eq!(
        symbols.iter().map(|s| s.z + s.l).sum::<u64>(),
        n,
        "symbols do not cover every bit"
    );
    symbols
}

/// Distinct symbol values, ascending.
pub fn dictionary(parses: &[Symbol]) -> Vec<BigUint> {
    let mut dict: Vec<BigUint> = parses.iter().map(|s| s.e.clone()).collect();
    sort_unique(&mut dict);
    dict
}

/// Rebuild the parsed integer most significant symbol first, appending every
/// intermediate accumulator value to `c`. Returns the final accumulator.
pub fn accumulate(parses: &[Symbol], c: &mut Chain) -> BigUint {
    let mut x = BigUint::zero();
    for (i, sym) in parses.iter().enumerate().rev() {
        let l_prev = if i > 0 { parses[i - 1].l } else { 0 };

        x += &sym.e;
        c.append_clone(&x);

        for _ in 0..sym.z + l_prev {
            x <<= 1u32;
            c.append_clone(&x);
        }
    }
    x
}

/// Yacobi chain algorithm over a sequence algorithm for the dictionary.
#[derive(Clone)]
pub struct Algorithm {
    seqalg: Arc<dyn SequenceAlgorithm>,
}

impl Algorithm {
    /// Yacobi's method with `seqalg` covering the symbol dictionary.
    pub fn new(seqalg: Arc<dyn SequenceAlgorithm>) -> Self {
        Algorithm { seqalg }
    }

    fn derive_chain(&self, parses: &[Symbol], target: &BigUint) -> Result<Chain, ChainError> {
        let dict = dictionary(parses);
        let mut c = self.seqalg.find_sequence(&dict)?;
        let rebuilt = accumulate(parses, &mut c);
        debug_assert_eq!(&rebuilt, target, "{} did not rebuild its target", self);
        c.sort_unique();
        Ok(c)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "yacobi({})", self.seqalg)
    }
}

impl ChainAlgorithm for Algorithm {
    fn find_chain(&self, target: &BigUint) -> Result<Chain, ChainError> {
        if target.is_zero() {
            return Ok(Chain::new());
        }
        let parses = parse(target);
        self.derive_chain(&parses, target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use addchain_core::bigint::normalize_targets;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn big(x: u64) -> BigUint {
        BigUint::from(x)
    }

    fn sym(e: u64, l: u64, z: u64) -> Symbol {
        Symbol { e: big(e), l, z }
    }

    /// Returns 1 followed by the (sorted) input, without filling any gaps.
    struct Identity;

    impl fmt::Display for Identity {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "identity")
        }
    }

    impl SequenceAlgorithm for Identity {
        fn find_sequence(&self, targets: &[BigUint]) -> Result<Chain, ChainError> {
            let mut c = Chain::unit();
            c.extend(normalize_targets(targets));
            c.sort_unique();
            Ok(c)
        }
    }

    #[test]
    fn test_parse() {
        assert!(parse(&BigUint::zero()).is_empty());
        assert_eq!(parse(&big(1)), vec![sym(1, 1, 0)]);
        assert_eq!(parse(&big(0b101)), vec![sym(1, 1, 0), sym(1, 1, 1)]);
        assert_eq!(parse(&big(0b111)), vec![sym(1, 1, 0), sym(3, 2, 0)]);
        assert_eq!(parse(&big(16)), vec![sym(1, 1, 4)]);
    }

    #[test]
    fn test_parse_trailing_zero_symbol() {
        // 0b1011: "1", then "1" is known so descend and read "0" -> "01",
        // then "1" again is known and the bits run out.
        assert_eq!(
            parse(&big(0b1011)),
            vec![sym(1, 1, 0), sym(1, 2, 0), sym(1, 1, 0)]
        );
    }

    #[test]
    fn test_accumulate() {
        for n in [1u64, 5, 7, 16, 0b1011, 0xdead_beef] {
            let parses = parse(&big(n));
            let mut c = Chain::new();
            assert_eq!(accumulate(&parses, &mut c), big(n));
            assert_eq!(c.end(), Some(&big(n)));
        }
    }

    #[test]
    fn test_symbols_cover_every_bit() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..64 {
            let bytes: Vec<u8> = (0..rng.gen_range(1..48)).map(|_| rng.gen()).collect();
            let n = BigUint::from_bytes_le(&bytes) | BigUint::one();
            let parses = parse(&n);
            let covered: u64 = parses.iter().map(|s| s.z + s.l).sum();
            assert_eq!(covered, n.bits(), "{}", n);
            let mut c = Chain::new();
            assert_eq!(accumulate(&parses, &mut c), n);
        }
    }

    #[test]
    fn test_chain_for_five() {
        let a = Algorithm::new(Arc::new(Identity));
        assert_eq!(a.to_string(), "yacobi(identity)");
        let c = a.find_chain(&big(5)).unwrap();
        assert_eq!(c.into_inner(), vec![big(1), big(2), big(4), big(5)]);
    }

    #[test]
    fn test_boundaries() {
        let a = Algorithm::new(Arc::new(Identity));
        assert!(a.find_chain(&BigUint::zero()).unwrap().is_empty());
        assert_eq!(a.find_chain(&big(1)).unwrap(), Chain::unit());
    }

    #[test]
    fn test_dictionary() {
        let parses = vec![sym(1, 1, 0), sym(3, 2, 0), sym(1, 1, 2), sym(3, 2, 1)];
        assert_eq!(dictionary(&parses), vec![big(1), big(3)]);
    }
}
