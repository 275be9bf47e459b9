//! Run a catalog of chain algorithms against one target in parallel.

use std::time::{Duration, Instant};

use addchain_core::{Chain, ChainAlgorithm, ChainError};
use num_bigint::BigUint;
use rayon::prelude::*;

/// Outcome of one algorithm on one target.
#[derive(Debug, Clone)]
pub struct Report {
    /// The algorithm's descriptive name.
    pub name: String,
    pub chain: Option<Chain>,
    pub error: Option<ChainError>,
    pub duration: Duration,
}

impl Report {
    /// True when the deadline expired before the algorithm started.
    pub fn skipped(&self) -> bool {
        self.chain.is_none() && self.error.is_none()
    }
}

/// Parallel executor over a catalog.
#[derive(Debug, Clone, Default)]
pub struct Parallel {
    deadline: Option<Duration>,
}

impl Parallel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Skip algorithms that have not started `deadline` after the run began.
    /// Algorithms already running are not interrupted.
    pub fn with_deadline(self, deadline: Duration) -> Self {
        Parallel {
            deadline: Some(deadline),
        }
    }

    /// Run every algorithm on `target`. Reports come back in catalog order.
    pub fn run<A: ChainAlgorithm>(&self, algs: &[A], target: &BigUint) -> Vec<Report> {
        let start = Instant::now();
        let reports: Vec<Report> = algs
            .par_iter()
            .map(|a| {
                let name = a.to_string();
                if self.deadline.is_some_and(|d| start.elapsed() >= d) {
                    return Report {
                        name,
                        chain: None,
                        error: None,
                        duration: Duration::ZERO,
                    };
                }
                let t = Instant::now();
                let result = a.find_chain(target);
                let duration = t.elapsed();
                match result {
                    Ok(chain) => Report {
                        name,
                        chain: Some(chain),
                        error: None,
                        duration,
                    },
                    Err(e) => {
                        log::debug!("{} failed on {}: {}", name, target, e);
                        Report {
                            name,
                            chain: None,
                            error: Some(e),
                            duration,
                        }
                    }
                }
            })
            .collect();

        let skipped = reports.iter().filter(|r| r.skipped()).count();
        if skipped > 0 {
            log::warn!("deadline expired: {} of {} algorithms skipped", skipped, reports.len());
        }
        log::debug!("ran {} algorithms in {:?}", reports.len(), start.elapsed());
        reports
    }
}

/// The report with the shortest chain; the earliest in catalog order on ties.
pub fn best(reports: &[Report]) -> Option<&Report> {
    reports
        .iter()
        .filter(|r| r.chain.is_some())
        .min_by_key(|r| r.chain.as_ref().map_or(usize::MAX, Chain::len))
}
