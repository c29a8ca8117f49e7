//! Temporal analysis
//!
//! Functions for tracking how a run evolves round by round. They read the
//! engine's history and work equally on a finished run or one in progress.

use aptevo_sim::simulation::RoundRecord;

/// Score dynamics over time
///
/// # Returns
///
/// One `(round, mean_score, best_score)` tuple per record, in history order.
pub fn score_trajectory(history: &[RoundRecord]) -> Vec<(usize, f64, f64)> {
    history
        .iter()
        .map(|r| (r.round, r.mean_score, r.best_score))
        .collect()
}

/// Unique-sequence fraction over time, as `(round, diversity)`.
pub fn diversity_trajectory(history: &[RoundRecord]) -> Vec<(usize, f64)> {
    history.iter().map(|r| (r.round, r.diversity)).collect()
}

/// Sequence entropy (bits) over time, as `(round, entropy)`.
pub fn entropy_trajectory(history: &[RoundRecord]) -> Vec<(usize, f64)> {
    history.iter().map(|r| (r.round, r.entropy)).collect()
}

/// First round whose diversity fell strictly below `threshold`
///
/// A converged pool is dominated by a handful of clones. `None` if the pool
/// never got there.
///
/// # Examples
///
/// ```
/// use aptevo_analysis::analysis::temporal::convergence_round;
/// use aptevo_sim::simulation::SelexBuilder;
///
/// let mut selex = SelexBuilder::new("GGTTGGTGTGGTTGG")
///     .num_rounds(4)
///     .library_size(100)
///     .mutation_rate(0.0)
///     .seed(1)
///     .build()
///     .unwrap();
/// let history = selex.run().unwrap();
///
/// // Without mutation at most 10 of 100 lines survive the first round
/// assert_eq!(convergence_round(history, 0.2), Some(1));
/// ```
pub fn convergence_round(history: &[RoundRecord], threshold: f64) -> Option<usize> {
    history
        .iter()
        .find(|r| r.diversity < threshold)
        .map(|r| r.round)
}

/// Best-score gain of every round over the one before it
///
/// Entry `k` is `best_score[k + 1] - best_score[k]`, so the result has one
/// element fewer than the history. Negative values mean the best binder was
/// lost or mutated away.
pub fn enrichment(history: &[RoundRecord]) -> Vec<f64> {
    history
        .windows(2)
        .map(|pair| pair[1].best_score - pair[0].best_score)
        .collect()
}
