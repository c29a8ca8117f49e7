//! Builder pattern for creating SELEX engines.
//!
//! Provides a fluent API with sensible defaults (those of
//! [`SelexConfig::default`]); everything is validated once in `build()`.

use super::configs::{RerunPolicy, SelexConfig};
use super::engine::Selex;
use super::generator::{GcRange, SequenceGenerator};
use super::initialization::InitialLibrary;
use crate::base::Sequence;
use crate::errors::SelexError;
use crate::evolution::{AffinityScorer, AmplificationMode, ScoringConfig};

/// Builder for constructing [`Selex`] instances with a fluent API.
///
/// # Examples
///
/// ```
/// use aptevo_sim::simulation::SelexBuilder;
///
/// let selex = SelexBuilder::new("GGTTGGTGTGGTTGG")
///     .num_rounds(5)
///     .library_size(500)
///     .selection_pressure(0.2)
///     .mutation_rate(0.01)
///     .gc_range(0.4, 0.6)
///     .seq_length(30)
///     .seed(42)
///     .build()
///     .unwrap();
///
/// assert_eq!(selex.config().run.library_size, 500);
/// ```
pub struct SelexBuilder {
    target: String,
    config: SelexConfig,
    scorer: Option<Box<dyn AffinityScorer>>,
    generator: Option<Box<dyn SequenceGenerator>>,
}

impl SelexBuilder {
    /// Start from the default configuration with the given target.
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            config: SelexConfig::default(),
            scorer: None,
            generator: None,
        }
    }

    /// Start from an existing configuration (e.g. loaded from JSON).
    pub fn from_config(config: SelexConfig) -> Self {
        Self {
            target: config.target.to_string(),
            config,
            scorer: None,
            generator: None,
        }
    }

    pub fn num_rounds(mut self, rounds: usize) -> Self {
        self.config.run.num_rounds = rounds;
        self
    }

    pub fn library_size(mut self, size: usize) -> Self {
        self.config.run.library_size = size;
        self
    }

    pub fn selection_pressure(mut self, pressure: f64) -> Self {
        self.config.run.selection_pressure = pressure;
        self
    }

    pub fn mutation_rate(mut self, rate: f64) -> Self {
        self.config.run.mutation_rate = rate;
        self
    }

    pub fn gc_range(mut self, min: f64, max: f64) -> Self {
        self.config.run.gc_range = GcRange { min, max };
        self
    }

    pub fn seq_length(mut self, length: usize) -> Self {
        self.config.run.seq_length = length;
        self
    }

    /// Weights of the default target-affinity scorer.
    pub fn scoring(mut self, scoring: ScoringConfig) -> Self {
        self.config.scoring = scoring;
        self
    }

    pub fn amplification(mut self, mode: AmplificationMode) -> Self {
        self.config.amplification = mode;
        self
    }

    pub fn initial_library(mut self, library: InitialLibrary) -> Self {
        self.config.initial_library = library;
        self
    }

    /// Start from variants of a known binder. The sequence length follows the seed.
    pub fn seed_variants(mut self, seed: Sequence, rate: f64) -> Self {
        self.config.run.seq_length = seed.len();
        self.config.initial_library = InitialLibrary::SeedVariants { seed, rate };
        self
    }

    pub fn rerun_policy(mut self, policy: RerunPolicy) -> Self {
        self.config.rerun = policy;
        self
    }

    /// Fix the RNG seed for reproducible runs.
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Use a custom scorer instead of [`TargetAffinity`](crate::evolution::TargetAffinity).
    pub fn scorer(mut self, scorer: impl AffinityScorer + 'static) -> Self {
        self.scorer = Some(Box::new(scorer));
        self
    }

    /// Use a custom generator for random initial libraries.
    pub fn generator(mut self, generator: impl SequenceGenerator + 'static) -> Self {
        self.generator = Some(Box::new(generator));
        self
    }

    /// Resolve and validate the configuration without building an engine.
    pub fn build_config(&self) -> Result<SelexConfig, SelexError> {
        let target: Sequence = self
            .target
            .parse()
            .map_err(|e: crate::errors::InvalidSequence| {
                SelexError::invalid("target", &self.target, e.to_string())
            })?;
        let config = SelexConfig {
            target,
            ..self.config.clone()
        };
        config.validate()?;
        Ok(config)
    }

    /// Build the engine.
    ///
    /// # Errors
    /// `InvalidConfiguration` naming the first offending parameter.
    pub fn build(self) -> Result<Selex, SelexError> {
        let config = self.build_config()?;
        let selex = match self.scorer {
            Some(scorer) => Selex::with_scorer(config, scorer)?,
            None => Selex::new(config)?,
        };
        Ok(match self.generator {
            Some(generator) => selex.with_generator(generator),
            None => selex,
        })
    }
}
