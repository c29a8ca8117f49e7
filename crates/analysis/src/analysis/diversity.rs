//! Diversity metrics for SELEX pools
//!
//! Implements standard measures of sequence diversity including:
//! - Nucleotide diversity (π)
//! - Haplotype (sequence) diversity
//! - Shannon entropy of sequence frequencies and its effective number

use crate::analysis::utils::hamming_distance_fast;
use aptevo_sim::base::Sequence;
use aptevo_sim::simulation::{diversity, Population};
use rayon::prelude::*;

/// Calculate nucleotide diversity (π) for a pool
///
/// Nucleotide diversity is the average number of nucleotide differences
/// per site between two aptamers drawn from the pool.
///
/// # Formula
///
/// $$\pi = \frac{\sum_{i<j} d_{ij}}{n(n-1)/2 \cdot L}$$
///
/// where $d_{ij}$ is the number of differences between aptamers $i$ and $j$,
/// $n$ is the pool size, and $L$ is the sequence length.
///
/// Sequences of different lengths are compared over their shared prefix
/// and `L` is taken from the first aptamer.
///
/// # Returns
///
/// π in `[0, 1]`; `0.0` for pools with fewer than two aptamers.
///
/// # Examples
///
/// ```
/// use aptevo_analysis::analysis::diversity::nucleotide_diversity;
/// use aptevo_sim::simulation::Population;
///
/// let pool = Population::new(vec!["AAAA".parse().unwrap(), "AAAT".parse().unwrap()], 0);
/// assert_eq!(nucleotide_diversity(&pool), 0.25);
/// ```
///
/// # References
///
/// Nei, M., & Li, W. H. (1979). Mathematical model for studying genetic
/// variation in terms of restriction endonucleases. PNAS, 76(10), 5269-5273.
pub fn nucleotide_diversity(population: &Population) -> f64 {
    let sequences: Vec<&Sequence> = population.aptamers().iter().map(|a| a.sequence()).collect();

    let n = sequences.len();
    if n < 2 {
        return 0.0;
    }

    let length = sequences[0].len();
    if length == 0 {
        return 0.0;
    }

    // Calculate pairwise differences in parallel
    let total_differences: usize = (0..n)
        .into_par_iter()
        .map(|i| {
            (i + 1..n)
                .map(|j| hamming_distance_fast(sequences[i], sequences[j]))
                .sum::<usize>()
        })
        .sum();

    let num_comparisons = n * (n - 1) / 2;
    total_differences as f64 / (num_comparisons * length) as f64
}

/// Calculate haplotype diversity (Nei's gene diversity over whole sequences)
///
/// The probability that two aptamers drawn without replacement carry
/// different sequences.
///
/// # Formula
///
/// $$H = \frac{n}{n-1} \left(1 - \sum_i p_i^2\right)$$
///
/// where $p_i$ is the frequency of the $i$-th distinct sequence.
///
/// # Returns
///
/// `H` in `[0, 1]`; `0.0` for pools with fewer than two aptamers.
///
/// # References
///
/// Nei, M. (1987). Molecular Evolutionary Genetics. Columbia University Press.
pub fn haplotype_diversity(population: &Population) -> f64 {
    let n = population.size();
    if n < 2 {
        return 0.0;
    }

    let sum_squared_freqs: f64 = diversity::sequence_counts(population.aptamers())
        .values()
        .map(|&count| {
            let freq = count as f64 / n as f64;
            freq * freq
        })
        .sum();

    n as f64 / (n - 1) as f64 * (1.0 - sum_squared_freqs)
}

/// Shannon entropy of sequence frequencies, in bits
///
/// Same quantity the engine stores as `RoundRecord::entropy`, computed on
/// an arbitrary pool. `0.0` for an empty or monoclonal pool.
pub fn shannon_entropy(population: &Population) -> f64 {
    diversity::shannon_entropy(population.aptamers())
}

/// Effective number of sequences, `2^H` with `H` in bits
///
/// Equals the number of distinct sequences when they are equally frequent
/// and shrinks as a few clones dominate. `0.0` for an empty pool.
pub fn effective_number(population: &Population) -> f64 {
    if population.is_empty() {
        return 0.0;
    }
    shannon_entropy(population).exp2()
}
