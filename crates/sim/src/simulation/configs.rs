//! Run configuration.
//!
//! [`SelexConfig`] is the master configuration: it can be written to and read
//! from JSON to fully reproduce a run (given a seed). All values are checked
//! eagerly by [`SelexConfig::validate`]; nothing is silently clamped.

use serde::{Deserialize, Serialize};

use super::generator::GcRange;
use super::initialization::InitialLibrary;
use crate::base::Sequence;
use crate::errors::SelexError;
use crate::evolution::{AmplificationMode, ScoringConfig};

/// Thrombin-binding aptamer, the classic SELEX benchmark target.
pub const DEFAULT_TARGET: &str = "GGTTGGTGTGGTTGG";
pub const DEFAULT_NUM_ROUNDS: usize = 8;
pub const DEFAULT_LIBRARY_SIZE: usize = 1000;
pub const DEFAULT_SELECTION_PRESSURE: f64 = 0.1;
pub const DEFAULT_MUTATION_RATE: f64 = 0.05;
pub const DEFAULT_SEQ_LENGTH: usize = 30;

/// Parameters of the round loop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunParameters {
    /// Rounds of score, select and amplify.
    pub num_rounds: usize,
    /// Pool size after every amplification.
    pub library_size: usize,
    /// Fraction of the pool kept each round, in (0, 1].
    pub selection_pressure: f64,
    /// Per-base substitution probability during amplification.
    pub mutation_rate: f64,
    /// Allowed GC fraction of generated sequences.
    pub gc_range: GcRange,
    /// Length of generated sequences.
    pub seq_length: usize,
}

impl Default for RunParameters {
    fn default() -> Self {
        Self {
            num_rounds: DEFAULT_NUM_ROUNDS,
            library_size: DEFAULT_LIBRARY_SIZE,
            selection_pressure: DEFAULT_SELECTION_PRESSURE,
            mutation_rate: DEFAULT_MUTATION_RATE,
            gc_range: GcRange::default(),
            seq_length: DEFAULT_SEQ_LENGTH,
        }
    }
}

impl RunParameters {
    pub fn validate(&self) -> Result<(), SelexError> {
        if self.library_size == 0 {
            return Err(SelexError::invalid("library_size", self.library_size, "must be > 0"));
        }
        if self.seq_length == 0 {
            return Err(SelexError::invalid("seq_length", self.seq_length, "must be > 0"));
        }
        if !(self.selection_pressure > 0.0 && self.selection_pressure <= 1.0) {
            return Err(SelexError::invalid(
                "selection_pressure",
                self.selection_pressure,
                "must be in (0.0, 1.0]",
            ));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(SelexError::invalid(
                "mutation_rate",
                self.mutation_rate,
                "must be between 0.0 and 1.0",
            ));
        }
        self.gc_range.validate()
    }
}

/// What `run` does on an engine that already ran.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RerunPolicy {
    /// Discard history and population, re-seed the RNG and start over.
    #[default]
    Restart,
    /// Fail with `AlreadyRun`.
    Reject,
}

/// Complete, serializable description of a SELEX run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelexConfig {
    pub target: Sequence,
    pub run: RunParameters,
    pub scoring: ScoringConfig,
    pub amplification: AmplificationMode,
    pub initial_library: InitialLibrary,
    pub rerun: RerunPolicy,
    /// RNG seed; `None` draws one from the thread RNG.
    pub seed: Option<u64>,
}

impl Default for SelexConfig {
    fn default() -> Self {
        Self {
            target: DEFAULT_TARGET.parse().unwrap_or_default(),
            run: RunParameters::default(),
            scoring: ScoringConfig::default(),
            amplification: AmplificationMode::default(),
            initial_library: InitialLibrary::default(),
            rerun: RerunPolicy::default(),
            seed: None,
        }
    }
}

impl SelexConfig {
    /// Default configuration for the given target.
    pub fn new(target: Sequence) -> Self {
        Self {
            target,
            ..Self::default()
        }
    }

    /// Check every parameter. Returns the first violation found.
    pub fn validate(&self) -> Result<(), SelexError> {
        if self.target.is_empty() {
            return Err(SelexError::invalid("target", "\"\"", "must not be empty"));
        }
        self.run.validate()?;
        self.scoring.validate()?;
        self.initial_library.validate()?;

        match &self.initial_library {
            InitialLibrary::SeedVariants { seed, .. } if seed.len() != self.run.seq_length => {
                return Err(SelexError::invalid(
                    "seq_length",
                    self.run.seq_length,
                    format!("must equal the seed sequence length ({})", seed.len()),
                ));
            }
            InitialLibrary::Sequences(sequences) => {
                if let Some(pos) = sequences.iter().position(|s| s.len() != self.run.seq_length) {
                    return Err(SelexError::invalid(
                        "initial_library",
                        format!("sequence #{pos} of length {}", sequences[pos].len()),
                        format!("every sequence must have seq_length ({})", self.run.seq_length),
                    ));
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json(text: &str) -> Result<Self, SelexError> {
        let config: Self = serde_json::from_str(text)
            .map_err(|e| SelexError::invalid("config", "<json>", e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, SelexError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| SelexError::invalid("config", "<json>", e.to_string()))
    }
}
