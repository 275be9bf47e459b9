//! # ensemble
//!
//! A catalog of chain algorithms intended for targets of cryptographic size.
//!
//! The catalog crosses every decomposer of a parameter sweep with a fixed set
//! of sequence algorithms, adds the runs algorithms, and wraps everything in
//! dead-element elimination. No single variant wins for every target, so the
//! usual way to use it is to run all of them and keep the shortest chain
//! (see [`exec::Parallel`]).

pub mod exec;

use std::iter::successors;
use std::sync::Arc;

use addchain_core::{ChainAlgorithm, SequenceAlgorithm};
use dict::{Decomposer, DictAlgorithm, Hybrid, RunLength, RunsAlgorithm, SlidingWindow};
use heuristic::{Approximation, DeltaLargest, Halving, UseFirst};
use opt::Optimized;
use serde::{Deserialize, Serialize};

/// Parameter ranges for the decomposer sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepParams {
    /// Sliding window widths. Each gives an unsigned, a signed and a signed
    /// zero-cutoff variant.
    pub window_widths: Vec<u64>,
    /// Run-length cutoffs, in addition to the unlimited `t = 0`.
    pub run_cutoffs: Vec<u64>,
    /// Hybrid widths.
    pub hybrid_widths: Vec<u64>,
    /// Run cutoffs crossed with every hybrid width.
    pub hybrid_run_cutoffs: Vec<u64>,
    /// Widths of the fine signed hybrid sweep.
    pub fine_widths: Vec<u64>,
    /// Offsets `t - k` of the fine signed hybrid sweep.
    pub fine_run_offsets: Vec<u64>,
}

impl Default for SweepParams {
    fn default() -> Self {
        Self {
            window_widths: doubling(4, 128),
            run_cutoffs: doubling(16, 128),
            hybrid_widths: (2..=8).collect(),
            hybrid_run_cutoffs: doubling(16, 64),
            fine_widths: (10..=20).step_by(2).collect(),
            fine_run_offsets: (0..=10).step_by(2).collect(),
        }
    }
}

fn doubling(from: u64, to: u64) -> Vec<u64> {
    successors(Some(from), |&k| k.checked_mul(2))
        .take_while(|&k| k <= to)
        .collect()
}

impl SweepParams {
    /// Every decomposer of the sweep, in catalog order.
    pub fn decomposers(&self) -> Vec<Arc<dyn Decomposer>> {
        let mut out: Vec<Arc<dyn Decomposer>> = Vec::with_capacity(self.decomposer_count());

        for &k in &self.window_widths {
            let w = SlidingWindow::new(k);
            out.push(Arc::new(w));
            out.push(Arc::new(w.signed()));
            out.push(Arc::new(w.signed().with_zero_cutoff(k / 2)));
        }

        out.push(Arc::new(RunLength::new(0)));
        for &t in &self.run_cutoffs {
            out.push(Arc::new(RunLength::new(t)));
        }

        for &k in &self.hybrid_widths {
            let h = Hybrid::new(k);
            out.push(Arc::new(h));
            out.push(Arc::new(h.signed()));
            out.push(Arc::new(h.signed().with_zero_cutoff(k / 2)));
            for &t in &self.hybrid_run_cutoffs {
                let ht = h.with_run_cutoff(t);
                out.push(Arc::new(ht));
                out.push(Arc::new(ht.with_zero_cutoff(k / 2).signed()));
            }
        }

        for &k in &self.fine_widths {
            for &dt in &self.fine_run_offsets {
                let h = Hybrid::new(k)
                    .with_run_cutoff(k + dt)
                    .with_zero_cutoff(k / 2)
                    .signed();
                out.push(Arc::new(h));
            }
        }

        debug_assert_eq!(out.len(), self.decomposer_count());
        out
    }

    /// Number of decomposers [`SweepParams::decomposers`] yields.
    pub fn decomposer_count(&self) -> usize {
        3 * self.window_widths.len()
            + 1
            + self.run_cutoffs.len()
            + self.hybrid_widths.len() * (3 + 2 * self.hybrid_run_cutoffs.len())
            + self.fine_widths.len() * self.fine_run_offsets.len()
    }

    /// Size of the catalog [`ensemble_with`] builds for these parameters.
    pub fn catalog_len(&self) -> usize {
        let s = sequence_algorithm_count();
        self.decomposer_count() * s + s
    }
}

/// The sequence algorithms every decomposer is paired with: two heuristic
/// configurations, then one continued fraction algorithm per singleton
/// strategy.
pub fn sequence_algorithms() -> Vec<Arc<dyn SequenceAlgorithm>> {
    let mut seqalgs: Vec<Arc<dyn SequenceAlgorithm>> = vec![
        Arc::new(heuristic::Algorithm::new(UseFirst::new(vec![
            Box::new(Halving),
            Box::new(DeltaLargest),
        ]))),
        Arc::new(heuristic::Algorithm::new(UseFirst::new(vec![
            Box::new(Halving),
            Box::new(Approximation),
        ]))),
    ];
    for strategy in contfrac::strategies() {
        if strategy.singleton() {
            seqalgs.push(Arc::new(contfrac::Algorithm::from_boxed(strategy)));
        }
    }
    seqalgs
}

fn sequence_algorithm_count() -> usize {
    2 + contfrac::strategies()
        .iter()
        .filter(|s| s.singleton())
        .count()
}

/// The default catalog.
pub fn ensemble() -> Vec<Box<dyn ChainAlgorithm>> {
    ensemble_with(&SweepParams::default())
}

/// Build the catalog for an explicit sweep.
///
/// Dictionary algorithms come decomposer-major, then one runs algorithm per
/// sequence algorithm. Every entry is wrapped in [`Optimized`]. Calling this
/// twice yields catalogs with identical names in identical order.
pub fn ensemble_with(params: &SweepParams) -> Vec<Box<dyn ChainAlgorithm>> {
    let seqalgs = sequence_algorithms();
    let decomposers = params.decomposers();

    let mut algs: Vec<Box<dyn ChainAlgorithm>> =
        Vec::with_capacity(decomposers.len() * seqalgs.len() + seqalgs.len());

    for decomposer in &decomposers {
        for seqalg in &seqalgs {
            algs.push(Box::new(DictAlgorithm::new(decomposer.clone(), seqalg.clone())));
        }
    }

    for seqalg in &seqalgs {
        algs.push(Box::new(RunsAlgorithm::new(seqalg.clone())));
    }

    let algs: Vec<Box<dyn ChainAlgorithm>> = algs
        .into_iter()
        .map(|a| Box::new(Optimized::new(a)) as Box<dyn ChainAlgorithm>)
        .collect();

    log::debug!(
        "ensemble: {} decomposers x {} sequence algorithms -> {} algorithms",
        decomposers.len(),
        seqalgs.len(),
        algs.len()
    );
    algs
}
