//! Small `BigUint` helpers shared by the chain algorithms.

use num_bigint::BigUint;
use num_traits::{One, Zero};

/// Sort ascending and drop duplicates in place.
pub fn sort_unique(xs: &mut Vec<BigUint>) {
    xs.sort();
    xs.dedup();
}

/// Sorted, deduplicated copy of `xs` with zeros removed.
///
/// Sequence algorithms call this on their input: zero needs no operation and
/// repeated targets must not be derived twice.
pub fn normalize_targets(xs: &[BigUint]) -> Vec<BigUint> {
    let mut out: Vec<BigUint> = xs.iter().filter(|x| !x.is_zero()).cloned().collect();
    sort_unique(&mut out);
    out
}

/// Bits `[start, end)` of `x` as an integer, bit `start` becoming bit 0.
pub fn extract(x: &BigUint, start: u64, end: u64) -> BigUint {
    debug_assert!(start <= end, "extract range reversed: [{}, {})", start, end);
    (x >> start) & mask(end - start)
}

/// `2^n - 1`, the integer made of `n` one bits.
pub fn ones(n: u64) -> BigUint {
    mask(n)
}

fn mask(n: u64) -> BigUint {
    (BigUint::one() << n) - BigUint::one()
}

/// True when `x` is a (positive) power of two.
pub fn is_pow2(x: &BigUint) -> bool {
    !x.is_zero() && x.trailing_zeros() == Some(x.bits() - 1)
}

/// The doubling chain `1, 2, 4, …, 2^k` for `x = 2^k`.
pub fn pow2_up_to(x: &BigUint) -> Vec<BigUint> {
    debug_assert!(is_pow2(x), "{} is not a power of two", x);
    let mut out = Vec::with_capacity(x.bits() as usize);
    let mut p = BigUint::one();
    while &p <= x {
        out.push(p.clone());
        p <<= 1u32;
    }
    out
}

/// Number of trailing zero bits; zero for `x = 0`.
pub fn trailing_zeros(x: &BigUint) -> u64 {
    x.trailing_zeros().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn big(x: u64) -> BigUint {
        BigUint::from(x)
    }

    #[test]
    fn test_sort_unique() {
        let mut xs = vec![big(5), big(1), big(5), big(3), big(1)];
        sort_unique(&mut xs);
        assert_eq!(xs, vec![big(1), big(3), big(5)]);
    }

    #[test]
    fn test_normalize_targets_drops_zero() {
        let xs = vec![big(0), big(7), big(2), big(7)];
        assert_eq!(normalize_targets(&xs), vec![big(2), big(7)]);
    }

    #[test]
    fn test_extract() {
        // 0b1011_0110
        let x = big(0xb6);
        assert_eq!(extract(&x, 0, 3), big(0b110));
        assert_eq!(extract(&x, 2, 6), big(0b1101));
        assert_eq!(extract(&x, 4, 4), big(0));
        assert_eq!(extract(&x, 5, 12), big(0b101));
    }

    #[test]
    fn test_ones_and_pow2() {
        assert_eq!(ones(0), big(0));
        assert_eq!(ones(5), big(31));
        assert!(is_pow2(&big(1)));
        assert!(is_pow2(&big(64)));
        assert!(!is_pow2(&big(0)));
        assert!(!is_pow2(&big(96)));
        assert_eq!(pow2_up_to(&big(16)), vec![big(1), big(2), big(4), big(8), big(16)]);
    }
}
