//! Pool analysis for aptevo
//!
//! This module provides:
//! - Diversity metrics (π, Nei's haplotype diversity, entropy)
//! - Sequence composition and per-position profiles
//! - Distances to the target
//! - Round-over-round dynamics from a run history

pub mod composition;
pub mod distance;
pub mod diversity;
pub mod temporal;
pub mod utils;

// Re-export commonly used functions
pub use composition::{consensus, gc_content, nucleotide_composition, position_frequencies};
pub use distance::{distance_to_target, hamming_distance, pairwise_distances, DistanceSummary};
pub use diversity::{effective_number, haplotype_diversity, nucleotide_diversity, shannon_entropy};
pub use temporal::{
    convergence_round, diversity_trajectory, enrichment, entropy_trajectory, score_trajectory,
};
