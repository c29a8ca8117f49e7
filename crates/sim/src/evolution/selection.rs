//! Truncation selection.
//!
//! Each round the scored pool is ranked by affinity and only the top fraction
//! survives to be amplified. The number of survivors is
//! `max(1, round_half_up(pressure * n))`, capped at `n`, so a non-empty pool
//! always yields at least one survivor however strong the pressure.

use serde::{Deserialize, Serialize};

use crate::base::{Aptamer, ScoredAptamer};
use crate::errors::SelexError;

/// Number of survivors for a pool of `pool_size` under `pressure`.
///
/// Exact halves round up (`0.25 * 10 = 2.5` keeps 3). Returns 0 only for an
/// empty pool.
pub fn selection_count(pool_size: usize, pressure: f64) -> usize {
    if pool_size == 0 {
        return 0;
    }
    let raw = (pressure * pool_size as f64 + 0.5).floor();
    // Saturating float-to-int cast; NaN becomes 0 and is lifted to 1.
    (raw as usize).clamp(1, pool_size)
}

/// Keeps the best-scoring fraction of a pool.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TruncationSelector {
    pressure: f64,
}

impl TruncationSelector {
    /// # Errors
    /// `InvalidConfiguration` unless `0 < pressure <= 1`.
    pub fn new(pressure: f64) -> Result<Self, SelexError> {
        if !(pressure > 0.0 && pressure <= 1.0) {
            return Err(SelexError::invalid(
                "selection_pressure",
                pressure,
                "must be in (0.0, 1.0]",
            ));
        }
        Ok(Self { pressure })
    }

    pub fn pressure(&self) -> f64 {
        self.pressure
    }

    /// How many of `pool_size` candidates survive.
    pub fn survivors(&self, pool_size: usize) -> usize {
        selection_count(pool_size, self.pressure)
    }

    /// Rank by score (best first) and keep the top fraction.
    ///
    /// The sort is stable: equal scores keep their original pool order, which
    /// keeps runs reproducible. Scores are dropped; survivors are rescored
    /// after amplification.
    pub fn select(&self, scored: Vec<ScoredAptamer>) -> Vec<Aptamer> {
        self.select_scored(scored)
            .into_iter()
            .map(|s| s.aptamer)
            .collect()
    }

    /// Like [`select`](Self::select) but keeps the scores, best first.
    pub fn select_scored(&self, mut scored: Vec<ScoredAptamer>) -> Vec<ScoredAptamer> {
        let keep = self.survivors(scored.len());
        scored.sort_by(|a, b| b.score.cmp(&a.score));
        scored.truncate(keep);
        scored
    }
}
