//! Distances between aptamers and to the target

use crate::analysis::utils::{hamming_distance_fast, mean};
use aptevo_sim::base::Sequence;
use aptevo_sim::simulation::Population;
use rayon::prelude::*;
use serde::Serialize;

/// Hamming distance with length differences counted as mismatches.
///
/// # Examples
///
/// ```
/// use aptevo_analysis::analysis::distance::hamming_distance;
///
/// let a = "GGTTGG".parse().unwrap();
/// let b = "GGATG".parse().unwrap();
/// assert_eq!(hamming_distance(&a, &b), 2);
/// ```
pub fn hamming_distance(a: &Sequence, b: &Sequence) -> usize {
    hamming_distance_fast(a, b) + a.len().abs_diff(b.len())
}

/// All pairwise distances, upper triangle in row-major order
///
/// Entry for the pair `(i, j)` with `i < j` comes before every pair with a
/// larger `i`. Pools with fewer than two aptamers give an empty vector.
pub fn pairwise_distances(population: &Population) -> Vec<usize> {
    let aptamers = population.aptamers();
    let n = aptamers.len();

    (0..n)
        .into_par_iter()
        .flat_map_iter(|i| {
            (i + 1..n).map(move |j| hamming_distance(aptamers[i].sequence(), aptamers[j].sequence()))
        })
        .collect()
}

/// How far a pool sits from the target sequence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DistanceSummary {
    pub min: usize,
    pub mean: f64,
    pub max: usize,
    /// Aptamers identical to the target.
    pub exact_matches: usize,
}

/// Summarize the distance of every aptamer to `target`
///
/// `None` for an empty pool.
pub fn distance_to_target(population: &Population, target: &Sequence) -> Option<DistanceSummary> {
    let distances: Vec<usize> = population
        .aptamers()
        .par_iter()
        .map(|a| hamming_distance(a.sequence(), target))
        .collect();

    let min = *distances.iter().min()?;
    let max = *distances.iter().max()?;
    let as_f64: Vec<f64> = distances.iter().map(|&d| d as f64).collect();

    Some(DistanceSummary {
        min,
        mean: mean(&as_f64),
        max,
        exact_matches: distances.iter().filter(|&&d| d == 0).count(),
    })
}
