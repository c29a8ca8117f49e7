//! Utility functions for analysis module
//!
//! Shared helper functions used across analysis submodules.

use aptevo_sim::base::{Nucleotide, Sequence};

/// Calculate mean of a slice, 0.0 when empty
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Hamming distance over the shared prefix of two sequences.
///
/// Positions past the shorter sequence are not counted; callers that need
/// length differences to count as mismatches add them themselves.
#[inline]
pub fn hamming_distance_fast(seq1: &Sequence, seq2: &Sequence) -> usize {
    let len = seq1.len().min(seq2.len());
    let a = &seq1.as_slice()[..len];
    let b = &seq2.as_slice()[..len];

    // Chunks of 8 keep the loop branch-free and easy to vectorize
    let mut distance = 0;
    let mut chunks_a = a.chunks_exact(8);
    let mut chunks_b = b.chunks_exact(8);
    for (ca, cb) in (&mut chunks_a).zip(&mut chunks_b) {
        for i in 0..8 {
            distance += (ca[i] != cb[i]) as usize;
        }
    }
    distance
        + chunks_a
            .remainder()
            .iter()
            .zip(chunks_b.remainder())
            .filter(|(x, y)| x != y)
            .count()
}

/// Count bases of one sequence, indexed by [`Nucleotide::to_index`].
#[inline]
pub fn count_nucleotides(seq: &Sequence) -> [usize; 4] {
    let mut counts = [0usize; 4];
    for &base in seq.as_slice() {
        counts[base.to_index() as usize] += 1;
    }
    counts
}

/// Position of the largest count; ties go to the lowest index.
pub(crate) fn argmax(counts: &[usize; 4]) -> Nucleotide {
    let mut best = 0;
    for i in 1..4 {
        if counts[i] > counts[best] {
            best = i;
        }
    }
    Nucleotide::ALL[best]
}
