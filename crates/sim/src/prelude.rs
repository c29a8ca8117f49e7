//! Commonly used imports for convenience.
//!
//! # Example
//!
//! ```
//! use aptevo_sim::prelude::*;
//!
//! let mut selex = SelexBuilder::new("GGTTGGTGTGGTTGG")
//!     .num_rounds(2)
//!     .library_size(50)
//!     .seq_length(15)
//!     .seed(7)
//!     .build()
//!     .unwrap();
//! selex.run().unwrap();
//! assert!(matches!(selex.state(), SelexState::Completed { rounds: 2 }));
//! ```

pub use crate::base::{AffinityScore, Aptamer, Nucleotide, ScoredAptamer, Sequence};
pub use crate::errors::SelexError;
pub use crate::evolution::{
    evaluate_aptamer, AffinityScorer, AmplificationMode, ScoringConfig, TargetAffinity,
    TargetProperties,
};
pub use crate::simulation::{
    GcRange, InitialLibrary, Population, RerunPolicy, RoundRecord, RunParameters, Selex,
    SelexBuilder, SelexConfig, SelexReport, SelexState, SequenceGenerator,
};
