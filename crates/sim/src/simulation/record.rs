//! Round snapshots and the final run report.

use serde::{Deserialize, Serialize};

use super::configs::SelexConfig;
use super::diversity::DiversityStats;
use crate::base::{AffinityScore, ScoredAptamer, Sequence};

/// Immutable statistics of one completed round.
///
/// Score statistics describe the pool that entered the round (before
/// selection); diversity describes the amplified pool that leaves it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundRecord {
    pub round: usize,
    pub mean_score: f64,
    pub best_score: f64,
    pub worst_score: f64,
    /// Mean score of the survivors of selection.
    pub selected_mean_score: f64,
    /// Unique-sequence fraction of the amplified pool, in (0, 1].
    pub diversity: f64,
    pub unique_sequences: usize,
    /// Shannon entropy of sequence frequencies, in bits.
    pub entropy: f64,
    pub population_size: usize,
    pub selected_count: usize,
    pub mean_gc: f64,
    pub best_sequence: Sequence,
}

/// Mean, best and worst of a slice of scored aptamers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreSummary {
    pub mean: f64,
    pub best: f64,
    pub worst: f64,
}

impl ScoreSummary {
    /// Summarize `scored`; all zeros when empty.
    pub fn of(scored: &[ScoredAptamer]) -> Self {
        if scored.is_empty() {
            return Self { mean: 0.0, best: 0.0, worst: 0.0 };
        }
        let total: AffinityScore = scored.iter().map(|s| s.score).sum();
        let best = scored.iter().map(|s| s.score).max().unwrap_or_default();
        let worst = scored.iter().map(|s| s.score).min().unwrap_or_default();
        Self {
            mean: total.get() / scored.len() as f64,
            best: best.get(),
            worst: worst.get(),
        }
    }
}

impl RoundRecord {
    /// Assemble a record from the round's intermediate results.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_round(
        round: usize,
        scores: ScoreSummary,
        selected_mean_score: f64,
        selected_count: usize,
        diversity: DiversityStats,
        population_size: usize,
        mean_gc: f64,
        best_sequence: Sequence,
    ) -> Self {
        Self {
            round,
            mean_score: scores.mean,
            best_score: scores.best,
            worst_score: scores.worst,
            selected_mean_score,
            diversity: diversity.unique_fraction,
            unique_sequences: diversity.unique,
            entropy: diversity.entropy,
            population_size,
            selected_count,
            mean_gc,
            best_sequence,
        }
    }
}

/// Everything an external reporter needs from a finished (or failed) run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelexReport {
    pub config: SelexConfig,
    pub history: Vec<RoundRecord>,
    pub top_aptamers: Vec<ScoredAptamer>,
}
