//! Decomposers: split a target into weighted windows or runs.
//!
//! Every decomposer scans a digit string from the most significant end.
//! Unsigned decomposers read binary digits; signed ones read the
//! non-adjacent form (digits in {-1, 0, 1}). Windows always open on a `+1`
//! digit: when the next non-zero digit is `-1`, one unit is borrowed from the
//! term above and the gap becomes a run of ones. The resulting terms are
//! positive, odd and no wider than their window, which keeps the final chain
//! purely additive.

use std::fmt;

use addchain_core::bigint::ones;
use num_bigint::{BigInt, BigUint, Sign};
use num_traits::{One, Signed, Zero};

use crate::{Sum, Term};

/// Splits a target into a [`Sum`] of terms `d·2^e`.
pub trait Decomposer: fmt::Display + Send + Sync {
    fn decompose(&self, x: &BigUint) -> Sum;
}

/// Binary digits of `x`, least significant first.
pub fn binary_digits(x: &BigUint) -> Vec<i8> {
    (0..x.bits()).map(|i| x.bit(i) as i8).collect()
}

/// Non-adjacent form of `x`, least significant first.
pub fn naf_digits(x: &BigUint) -> Vec<i8> {
    let n = x.bits();
    let mut digits = Vec::with_capacity(n as usize + 1);
    let mut carry = 0u8;
    let mut i = 0u64;
    while i < n || carry > 0 {
        let b = x.bit(i) as u8 + carry;
        match b {
            1 if x.bit(i + 1) => {
                digits.push(-1);
                carry = 1;
            }
            1 => {
                digits.push(1);
                carry = 0;
            }
            _ => {
                digits.push(0);
                carry = b / 2;
            }
        }
        i += 1;
    }
    digits
}

fn digits(x: &BigUint, signed: bool) -> Vec<i8> {
    if signed {
        naf_digits(x)
    } else {
        binary_digits(x)
    }
}

/// A window or run emitted by the scan.
struct Piece {
    v: BigInt,
    e: u64,
}

/// Value of digits `[l, h)` with digit `l` weighted 1.
fn window_value(d: &[i8], l: usize, h: usize) -> BigInt {
    let mut v = BigInt::zero();
    for &digit in d[l..h].iter().rev() {
        v <<= 1u32;
        v += digit as i32;
    }
    v
}

/// Low end of the window whose top digit is `h - 1`.
///
/// The window spans at most `k` digits and ends on a non-zero digit. With
/// `z > 0` the first run of `z` zero digits below the top ends it early.
fn window_start(d: &[i8], h: usize, k: u64, z: u64) -> usize {
    let mut l = h.saturating_sub(k.max(1) as usize);
    while d[l] == 0 {
        l += 1;
    }
    if z > 0 {
        let mut run = 0u64;
        for i in (l..h - 1).rev() {
            if d[i] != 0 {
                run = 0;
                continue;
            }
            run += 1;
            if run == z {
                l = i + z as usize;
                break;
            }
        }
    }
    l
}

/// Length of the run of ones whose top digit is `h - 1`.
fn run_length(d: &[i8], h: usize) -> usize {
    d[..h].iter().rev().take_while(|&&digit| digit == 1).count()
}

fn run_piece(n: usize, e: usize) -> Piece {
    Piece {
        v: BigInt::from_biguint(Sign::Plus, ones(n as u64)),
        e: e as u64,
    }
}

/// Clear a `-1` digit at `q` that tops the remaining digits by borrowing one
/// unit from the last piece, which sits at `e` with only zeros in between:
/// `a·2^e - 2^q = (a - 1)·2^e + (2^e - 2^q)`, and `2^e - 2^q` is the run of
/// ones `[q, e)`. `a - 1` is renormalized to an odd term. Returns `e`, the new
/// scan height.
fn borrow(pieces: &mut Vec<Piece>, d: &mut [i8], q: usize) -> usize {
    let Some(mut last) = pieces.pop() else {
        unreachable!("non-adjacent form of a positive integer leads with +1");
    };
    let e = last.e as usize;
    debug_assert!(q < e && d[q + 1..e].iter().all(|&digit| digit == 0));

    last.v -= BigInt::one();
    if let Some(s) = last.v.trailing_zeros() {
        last.v >>= s;
        last.e += s;
        pieces.push(last);
    }
    for digit in &mut d[q..e] {
        *digit = 1;
    }
    e
}

fn into_sum(pieces: Vec<Piece>) -> Sum {
    pieces
        .into_iter()
        .map(|p| {
            debug_assert!(p.v.is_positive() && p.v.bit(0), "term {} is not positive odd", p.v);
            Term {
                d: p.v.to_biguint().unwrap_or_default(),
                e: p.e,
            }
        })
        .collect()
}

/// Drop zero digits above `h` and return the new top, or `None` when done.
fn next_top(d: &[i8], mut h: usize) -> Option<usize> {
    while h > 0 && d[h - 1] == 0 {
        h -= 1;
    }
    (h > 0).then_some(h)
}

/// Fixed-width windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlidingWindow {
    /// Window width.
    pub k: u64,
    /// Zero-run cutoff; 0 disables it.
    pub z: u64,
    /// Scan the non-adjacent form instead of the binary expansion.
    pub signed: bool,
}

impl SlidingWindow {
    pub fn new(k: u64) -> Self {
        SlidingWindow { k, z: 0, signed: false }
    }

    pub fn signed(self) -> Self {
        SlidingWindow { signed: true, ..self }
    }

    pub fn with_zero_cutoff(self, z: u64) -> Self {
        SlidingWindow { z, ..self }
    }
}

impl fmt::Display for SlidingWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sliding_window(k={}", self.k)?;
        if self.z > 0 {
            write!(f, ",z={}", self.z)?;
        }
        if self.signed {
            write!(f, ",signed")?;
        }
        write!(f, ")")
    }
}

impl Decomposer for SlidingWindow {
    fn decompose(&self, x: &BigUint) -> Sum {
        let mut d = digits(x, self.signed);
        let mut pieces = Vec::new();
        let mut h = d.len();
        while let Some(top) = next_top(&d, h) {
            if d[top - 1] < 0 {
                h = borrow(&mut pieces, &mut d, top - 1);
                continue;
            }
            let l = window_start(&d, top, self.k, self.z);
            pieces.push(Piece {
                v: window_value(&d, l, top),
                e: l as u64,
            });
            h = l;
        }
        into_sum(pieces)
    }
}

/// Runs of ones, each at most `t` long (`t = 0` for no limit).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RunLength {
    pub t: u64,
}

impl RunLength {
    pub fn new(t: u64) -> Self {
        RunLength { t }
    }
}

impl fmt::Display for RunLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "run_length(t={})", self.t)
    }
}

impl Decomposer for RunLength {
    fn decompose(&self, x: &BigUint) -> Sum {
        let d = binary_digits(x);
        let mut pieces = Vec::new();
        let mut h = d.len();
        while let Some(top) = next_top(&d, h) {
            let mut n = run_length(&d, top);
            if self.t > 0 {
                n = n.min(self.t as usize);
            }
            pieces.push(run_piece(n, top - n));
            h = top - n;
        }
        into_sum(pieces)
    }
}

/// Runs of ones at least `k` long become run terms (capped at `t`); anything
/// else is covered by a `k`-digit window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hybrid {
    pub k: u64,
    pub z: u64,
    pub t: u64,
    pub signed: bool,
}

impl Hybrid {
    pub fn new(k: u64) -> Self {
        Hybrid { k, z: 0, t: 0, signed: false }
    }

    pub fn with_run_cutoff(self, t: u64) -> Self {
        Hybrid { t, ..self }
    }

    pub fn with_zero_cutoff(self, z: u64) -> Self {
        Hybrid { z, ..self }
    }

    pub fn signed(self) -> Self {
        Hybrid { signed: true, ..self }
    }

    fn cap(&self, n: usize) -> usize {
        if self.t > 0 {
            n.min(self.t as usize)
        } else {
            n
        }
    }

    /// A run in the non-adjacent form reads `+1 0…0 -1`: returns the position
    /// of the closing `-1` when the top digit opens such a run.
    fn signed_run(d: &[i8], top: usize) -> Option<usize> {
        if d[top - 1] != 1 {
            return None;
        }
        let p = d[..top - 1].iter().rposition(|&digit| digit != 0)?;
        (d[p] == -1).then_some(p)
    }
}

impl fmt::Display for Hybrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hybrid(k={}", self.k)?;
        if self.t > 0 {
            write!(f, ",t={}", self.t)?;
        }
        if self.z > 0 {
            write!(f, ",z={}", self.z)?;
        }
        if self.signed {
            write!(f, ",signed")?;
        }
        write!(f, ")")
    }
}

impl Decomposer for Hybrid {
    fn decompose(&self, x: &BigUint) -> Sum {
        let mut d = digits(x, self.signed);
        let mut pieces = Vec::new();
        let mut h = d.len();
        while let Some(top) = next_top(&d, h) {
            if d[top - 1] < 0 {
                h = borrow(&mut pieces, &mut d, top - 1);
                continue;
            }
            if self.signed {
                if let Some(p) = Self::signed_run(&d, top) {
                    let n = top - 1 - p;
                    if n as u64 >= self.k {
                        let m = self.cap(n);
                        // 2^(top-1) - 2^p = (2^n - 1)·2^p
                        d[top - 1] = 0;
                        if m < n {
                            d[top - 1 - m] = 1;
                            pieces.push(run_piece(m, top - 1 - m));
                            h = top - m;
                        } else {
                            d[p] = 0;
                            pieces.push(run_piece(n, p));
                            h = p;
                        }
                        continue;
                    }
                }
            } else {
                let n = run_length(&d, top);
                if n as u64 >= self.k {
                    let m = self.cap(n);
                    pieces.push(run_piece(m, top - m));
                    h = top - m;
                    continue;
                }
            }

            let l = window_start(&d, top, self.k, self.z);
            pieces.push(Piece {
                v: window_value(&d, l, top),
                e: l as u64,
            });
            h = l;
        }
        into_sum(pieces)
    }
}
