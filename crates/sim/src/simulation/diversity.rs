//! Per-round diversity bookkeeping.
//!
//! The primary signal is the unique-sequence fraction `unique / size`, which
//! lies in `(0, 1]` for any non-empty pool: 1 when every sequence is distinct,
//! `1 / size` when all are identical. A falling fraction flags convergence.
//! Shannon entropy over sequence frequencies is recorded alongside.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::base::{Aptamer, Sequence};

/// Copy number of every distinct sequence in `pool`.
pub fn sequence_counts(pool: &[Aptamer]) -> HashMap<&Sequence, usize> {
    let mut counts = HashMap::with_capacity(pool.len());
    for aptamer in pool {
        *counts.entry(aptamer.sequence()).or_insert(0) += 1;
    }
    counts
}

/// Number of distinct sequences.
pub fn unique_count(pool: &[Aptamer]) -> usize {
    sequence_counts(pool).len()
}

/// Fraction of distinct sequences; 0.0 for an empty pool.
pub fn unique_fraction(pool: &[Aptamer]) -> f64 {
    if pool.is_empty() {
        return 0.0;
    }
    unique_count(pool) as f64 / pool.len() as f64
}

/// Shannon entropy of the sequence frequency distribution, in bits.
pub fn shannon_entropy(pool: &[Aptamer]) -> f64 {
    entropy_of(&sequence_counts(pool), pool.len())
}

fn entropy_of(counts: &HashMap<&Sequence, usize>, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let n = total as f64;
    counts
        .values()
        .map(|&c| {
            let p = c as f64 / n;
            -p * p.log2()
        })
        .sum::<f64>()
        .max(0.0)
}

/// Summary produced by [`DiversityTracker::compute`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiversityStats {
    pub unique: usize,
    pub unique_fraction: f64,
    pub entropy: f64,
}

/// Computes diversity statistics in one pass over a pool.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiversityTracker;

impl DiversityTracker {
    pub fn compute(pool: &[Aptamer]) -> DiversityStats {
        let counts = sequence_counts(pool);
        let unique = counts.len();
        let unique_fraction = if pool.is_empty() {
            0.0
        } else {
            unique as f64 / pool.len() as f64
        };
        DiversityStats {
            unique,
            unique_fraction,
            entropy: entropy_of(&counts, pool.len()),
        }
    }
}
