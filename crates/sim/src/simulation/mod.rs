//! SELEX engine and its collaborators.
//!
//! - `Selex`: the round-loop state machine (score, select, amplify, record).
//! - `SelexBuilder`: fluent construction with defaults and validation.
//! - `SelexConfig`: serializable run configuration.
//! - `Population`, `RoundRecord`: per-round pool and statistics.
//! - `SequenceGenerator`: source of the initial random library.

pub mod builder;
pub mod configs;
pub mod diversity;
pub mod engine;
pub mod generator;
pub mod initialization;
pub mod population;
pub mod record;

pub use builder::SelexBuilder;
pub use configs::{RerunPolicy, RunParameters, SelexConfig};
pub use diversity::{shannon_entropy, unique_count, unique_fraction, DiversityStats, DiversityTracker};
pub use engine::{Selex, SelexState};
pub use generator::{GcConstrainedGenerator, GcRange, SeedVariantGenerator, SequenceGenerator};
pub use initialization::{load_fasta, parse_fasta, InitialLibrary};
pub use population::Population;
pub use record::{RoundRecord, ScoreSummary, SelexReport};
