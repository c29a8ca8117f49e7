//! Base types for sequence representation.
//!
//! This module provides the foundational types for representing nucleotides,
//! sequences, aptamers and their affinity scores.

mod aptamer;
mod nucleotide;
mod score;
mod sequence;

pub use aptamer::{folding_potential, Aptamer, FOLDING_NORMALIZER, MAX_PAIR_SPAN, MIN_LOOP_SPAN};
pub use nucleotide::Nucleotide;
pub use score::{AffinityScore, ScoredAptamer};
pub use sequence::Sequence;
