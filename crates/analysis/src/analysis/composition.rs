//! Sequence composition analysis
//!
//! Functions for analyzing nucleotide composition and content.
//!
//! The pool-level functions are flexible and work at two levels:
//! - Pool level: no index specified
//! - Aptamer level: `Some(index)` into the pool

use crate::analysis::utils::{argmax, count_nucleotides};
use aptevo_sim::base::{Nucleotide, Sequence};
use aptevo_sim::simulation::Population;
use std::collections::HashMap;

/// Calculate GC content flexibly based on the provided index
///
/// - **Pool level**: `gc_content(pop, None)` - mean over all aptamers
/// - **Aptamer level**: `gc_content(pop, Some(i))` - a single aptamer
///
/// # Returns
///
/// GC content as proportion (0.0 to 1.0). `0.0` for an empty pool or an
/// index out of range.
///
/// # Examples
///
/// ```
/// use aptevo_analysis::analysis::composition::gc_content;
/// use aptevo_sim::simulation::Population;
///
/// let pool = Population::new(vec!["GGCC".parse().unwrap(), "AATT".parse().unwrap()], 0);
/// assert_eq!(gc_content(&pool, None), 0.5);
/// assert_eq!(gc_content(&pool, Some(0)), 1.0);
/// ```
pub fn gc_content(population: &Population, index: Option<usize>) -> f64 {
    match index {
        Some(i) => population.get(i).map_or(0.0, |a| a.gc_content()),
        None => population.mean_gc(),
    }
}

/// Count nucleotides flexibly based on the provided index
///
/// Same levels as [`gc_content`]. An index out of range yields an empty map;
/// otherwise all four bases are present, possibly with a zero count.
pub fn nucleotide_composition(
    population: &Population,
    index: Option<usize>,
) -> HashMap<Nucleotide, usize> {
    let counts = match index {
        Some(i) => match population.get(i) {
            Some(aptamer) => count_nucleotides(aptamer.sequence()),
            None => return HashMap::new(),
        },
        None => population
            .aptamers()
            .iter()
            .map(|a| count_nucleotides(a.sequence()))
            .fold([0usize; 4], |mut acc, c| {
                for (total, n) in acc.iter_mut().zip(c) {
                    *total += n;
                }
                acc
            }),
    };

    Nucleotide::ALL.into_iter().zip(counts).collect()
}

/// Per-position base frequencies across the pool
///
/// Row `p` holds the frequencies of A, C, G and T (in index order) at
/// position `p`. Rows are as long as the longest aptamer; shorter aptamers
/// only contribute to the positions they cover, so each non-empty row sums
/// to 1.
pub fn position_frequencies(population: &Population) -> Vec<[f64; 4]> {
    position_counts(population)
        .into_iter()
        .map(|counts| {
            let total: usize = counts.iter().sum();
            if total == 0 {
                return [0.0; 4];
            }
            counts.map(|c| c as f64 / total as f64)
        })
        .collect()
}

/// Majority base at every position
///
/// Ties are broken in A, C, G, T order. The consensus of an empty pool is
/// the empty sequence.
pub fn consensus(population: &Population) -> Sequence {
    Sequence::from_nucleotides(position_counts(population).iter().map(argmax).collect())
}

fn position_counts(population: &Population) -> Vec<[usize; 4]> {
    let length = population
        .aptamers()
        .iter()
        .map(|a| a.len())
        .max()
        .unwrap_or(0);

    let mut counts = vec![[0usize; 4]; length];
    for aptamer in population.aptamers() {
        for (slot, base) in counts.iter_mut().zip(aptamer.sequence().iter()) {
            slot[base.to_index() as usize] += 1;
        }
    }
    counts
}
