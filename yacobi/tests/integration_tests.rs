//! Yacobi over real sequence algorithms.

use std::fmt;
use std::sync::Arc;

use addchain_core::{Chain, ChainAlgorithm, ChainError, SequenceAlgorithm};
use heuristic::{DeltaLargest, Halving, UseFirst};
use num_bigint::BigUint;
use num_traits::{One, Zero};
use opt::Optimized;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn algorithms() -> Vec<yacobi::Algorithm> {
    vec![
        yacobi::Algorithm::new(Arc::new(contfrac::Algorithm::new(contfrac::strategy::Binary))),
        yacobi::Algorithm::new(Arc::new(contfrac::Algorithm::new(
            contfrac::strategy::Dichotomic,
        ))),
        yacobi::Algorithm::new(Arc::new(heuristic::Algorithm::new(UseFirst::new(vec![
            Box::new(Halving),
            Box::new(DeltaLargest),
        ])))),
    ]
}

/// Targets with very different bit structure.
fn shapes() -> Vec<BigUint> {
    let one = BigUint::one();
    vec![
        // all ones
        (&one << 200u32) - &one,
        // alternating 1010...
        BigUint::parse_bytes(&b"aa".repeat(24), 16).unwrap_or_default(),
        // power of two
        &one << 300u32,
        // isolated bit above a small value
        (&one << 150u32) + BigUint::from(3u32),
    ]
}

fn random_targets(seed: u64, count: usize) -> Vec<BigUint> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let bytes: Vec<u8> = (0..rng.gen_range(1..33)).map(|_| rng.gen()).collect();
            BigUint::from_bytes_le(&bytes)
        })
        .filter(|n| !n.is_zero())
        .collect()
}

#[test]
fn test_round_trip_shapes() {
    for n in shapes() {
        let parses = yacobi::parse(&n);
        let mut c = Chain::new();
        assert_eq!(yacobi::accumulate(&parses, &mut c), n);
        let bits: u64 = parses.iter().map(|s| s.z + s.l).sum();
        assert_eq!(bits, n.bits(), "symbols must cover every bit of {}", n);
    }
}

#[test]
fn test_chains_are_valid() {
    init();
    let mut targets: Vec<BigUint> = (1u64..200).map(BigUint::from).collect();
    targets.extend(shapes());
    targets.extend(random_targets(7, 30));
    targets.push((BigUint::one() << 255u32) - BigUint::from(21u32));

    for a in algorithms() {
        for n in &targets {
            let c = a.find_chain(n).unwrap();
            c.validate().unwrap_or_else(|e| panic!("{} on {}: {}", a, n, e));
            assert_eq!(c.end(), Some(n), "{} on {}", a, n);
        }
    }
}

#[test]
fn test_optimized_not_longer() {
    for a in algorithms() {
        let o = Optimized::new(a.clone());
        for n in random_targets(11, 20) {
            let raw = a.find_chain(&n).unwrap();
            let c = o.find_chain(&n).unwrap();
            c.validate().unwrap();
            assert!(c.len() <= raw.len(), "{} on {}", o, n);
        }
    }
}

#[test]
fn test_repeated_symbols() {
    // 0x0f0f...: the same few symbols over and over, so the dictionary
    // stays small while the target grows.
    let n = BigUint::parse_bytes(&b"0f".repeat(32), 16).unwrap_or_default();
    let parses = yacobi::parse(&n);
    let dict = yacobi::dictionary(&parses);
    assert!(dict.len() < parses.len());

    let a = &algorithms()[0];
    let c = a.find_chain(&n).unwrap();
    c.validate().unwrap();
    assert_eq!(c.end(), Some(&n));
}

struct Failing;

impl fmt::Display for Failing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failing")
    }
}

impl SequenceAlgorithm for Failing {
    fn find_sequence(&self, targets: &[BigUint]) -> Result<Chain, ChainError> {
        Err(ChainError::HeuristicStalled {
            target: targets.iter().max().cloned().unwrap_or_default(),
        })
    }
}

#[test]
fn test_sequence_error_propagates() {
    let a = yacobi::Algorithm::new(Arc::new(Failing));
    assert_eq!(a.to_string(), "yacobi(failing)");
    assert_eq!(
        a.find_chain(&BigUint::from(5u32)),
        Err(ChainError::HeuristicStalled {
            target: BigUint::one()
        })
    );
    // Zero never reaches the sequence algorithm.
    assert!(a.find_chain(&BigUint::zero()).unwrap().is_empty());
}
