//! Analysis tools for aptevo SELEX runs.
//!
//! Everything here reads simulation output (a [`Population`] or a run's
//! [`RoundRecord`] history) and never mutates it.
//!
//! [`Population`]: aptevo_sim::simulation::Population
//! [`RoundRecord`]: aptevo_sim::simulation::RoundRecord

pub mod analysis;

pub use analysis::{
    consensus, convergence_round, distance_to_target, diversity_trajectory, effective_number,
    enrichment, gc_content, haplotype_diversity, hamming_distance, nucleotide_composition,
    nucleotide_diversity, position_frequencies, score_trajectory, shannon_entropy,
    DistanceSummary,
};
