//! # aptevo-sim
//!
//! Core of the in-silico SELEX simulation: a pool of candidate DNA aptamers is
//! scored against a fixed target, the best fraction is kept, and the survivors
//! are amplified back to full size with point mutations, round after round.
//!
//! - [`base`]: nucleotides, immutable sequences, aptamers and scores.
//! - [`evolution`]: affinity scoring, selection, amplification and mutation.
//! - [`simulation`]: the round-loop engine, its configuration and statistics.

pub mod base;
pub mod errors;
pub mod evolution;
pub mod prelude;
pub mod simulation;

pub use base::{Aptamer, Nucleotide, Sequence};
pub use errors::SelexError;
