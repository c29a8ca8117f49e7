//! Evolutionary operators of one SELEX round.
//!
//! - **Affinity**: scoring candidates against the target
//! - **Selection**: keeping the best-scoring fraction
//! - **Amplification**: replicating survivors back to full size
//! - **Mutation**: replication errors applied to every copy

pub mod affinity;
pub mod amplification;
pub mod mutation;
pub mod selection;

pub use affinity::{
    evaluate_aptamer, AffinityScorer, PropertyScorer, ScoringConfig, TargetAffinity,
    TargetProperties,
};
pub use amplification::{AmplificationMode, Amplifier};
pub use mutation::PointMutator;
pub use selection::{selection_count, TruncationSelector};
