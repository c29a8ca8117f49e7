//! SELEX round loop.
//!
//! The engine drives `score -> select -> amplify -> record` for a fixed number
//! of rounds and keeps the resulting [`RoundRecord`] history. It is an explicit
//! state machine:
//!
//! ```text
//! Uninitialized --seed--> Seeded --step--> Running{k} --...--> Completed{n}
//!                                              \
//!                                               `--error--> Failed{k, error}
//! ```
//!
//! A failed round leaves the history of the rounds before it intact. Calling
//! `run` again on a finished engine follows the configured [`RerunPolicy`].

use std::fmt;

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use tracing::{debug, info, warn};

use super::configs::{RerunPolicy, RunParameters, SelexConfig};
use super::diversity::DiversityTracker;
use super::generator::{GcConstrainedGenerator, SequenceGenerator};
use super::population::Population;
use super::record::{RoundRecord, ScoreSummary, SelexReport};
use crate::base::{AffinityScore, ScoredAptamer, Sequence};
use crate::errors::SelexError;
use crate::evolution::{AffinityScorer, Amplifier, PointMutator, TargetAffinity, TruncationSelector};

/// Lifecycle of a [`Selex`] engine.
#[derive(Debug, Clone, PartialEq)]
pub enum SelexState {
    /// No population yet.
    Uninitialized,
    /// Round-0 library generated.
    Seeded,
    /// `round` rounds have completed.
    Running { round: usize },
    /// The run finished after `rounds` rounds.
    Completed { rounds: usize },
    /// Round `round` aborted with `error`.
    Failed { round: usize, error: SelexError },
}

impl SelexState {
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Completed { .. } | Self::Failed { .. })
    }
}

impl fmt::Display for SelexState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uninitialized => write!(f, "uninitialized"),
            Self::Seeded => write!(f, "seeded"),
            Self::Running { round } => write!(f, "running (round {round})"),
            Self::Completed { rounds } => write!(f, "completed ({rounds} rounds)"),
            Self::Failed { round, error } => write!(f, "failed in round {round}: {error}"),
        }
    }
}

/// In-silico SELEX engine.
///
/// # Examples
///
/// ```
/// use aptevo_sim::simulation::SelexBuilder;
///
/// let mut selex = SelexBuilder::new("GGTTGGTGTGGTTGG")
///     .num_rounds(3)
///     .library_size(200)
///     .seq_length(20)
///     .seed(42)
///     .build()
///     .unwrap();
///
/// let history = selex.run().unwrap();
/// assert_eq!(history.len(), 3);
/// assert_eq!(selex.population().size(), 200);
/// ```
pub struct Selex {
    config: SelexConfig,
    scorer: Box<dyn AffinityScorer>,
    generator: Box<dyn SequenceGenerator>,
    state: SelexState,
    population: Population,
    history: Vec<RoundRecord>,
    /// Random number generator (Xoshiro256++), re-seeded on restart
    rng: Xoshiro256PlusPlus,
}

/// First library-shaping parameter that differs, with its new value.
fn changed_shape(old: &RunParameters, new: &RunParameters) -> Option<(&'static str, String)> {
    if old.library_size != new.library_size {
        Some(("library_size", new.library_size.to_string()))
    } else if old.seq_length != new.seq_length {
        Some(("seq_length", new.seq_length.to_string()))
    } else if old.gc_range != new.gc_range {
        Some(("gc_range", format!("[{}, {}]", new.gc_range.min, new.gc_range.max)))
    } else {
        None
    }
}

fn rng_for(seed: Option<u64>) -> Xoshiro256PlusPlus {
    match seed {
        Some(seed) => Xoshiro256PlusPlus::seed_from_u64(seed),
        None => Xoshiro256PlusPlus::from_seed(rand::rng().random()),
    }
}

impl Selex {
    /// Engine scoring against `config.target` with [`TargetAffinity`].
    ///
    /// # Errors
    /// `InvalidConfiguration` if any parameter is out of range.
    pub fn new(config: SelexConfig) -> Result<Self, SelexError> {
        config.validate()?;
        let scorer = TargetAffinity::new(config.target.clone(), config.scoring)?;
        Self::with_scorer(config, scorer)
    }

    /// Engine with a caller-supplied scorer.
    pub fn with_scorer(
        config: SelexConfig,
        scorer: impl AffinityScorer + 'static,
    ) -> Result<Self, SelexError> {
        config.validate()?;
        let rng = rng_for(config.seed);
        Ok(Self {
            config,
            scorer: Box::new(scorer),
            generator: Box::new(GcConstrainedGenerator),
            state: SelexState::Uninitialized,
            population: Population::default(),
            history: Vec::new(),
            rng,
        })
    }

    /// Replace the generator used for [`InitialLibrary::Random`](super::InitialLibrary::Random).
    pub fn with_generator(mut self, generator: impl SequenceGenerator + 'static) -> Self {
        self.generator = Box::new(generator);
        self
    }

    pub fn state(&self) -> &SelexState {
        &self.state
    }

    /// Rounds recorded so far, in round order.
    pub fn history(&self) -> &[RoundRecord] {
        &self.history
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn target(&self) -> &Sequence {
        &self.config.target
    }

    pub fn config(&self) -> &SelexConfig {
        &self.config
    }

    pub fn scorer(&self) -> &dyn AffinityScorer {
        self.scorer.as_ref()
    }

    /// Number of rounds the current population has been through.
    pub fn current_round(&self) -> usize {
        self.population.round()
    }

    /// Score a single sequence with the engine's scorer.
    pub fn score(&self, sequence: &Sequence) -> AffinityScore {
        self.scorer.score(sequence)
    }

    /// The `k` best distinct sequences of the current population.
    pub fn top_aptamers(&self, k: usize) -> Vec<ScoredAptamer> {
        self.population.top(self.scorer.as_ref(), k)
    }

    /// Snapshot of configuration, history and best sequences.
    pub fn report(&self, top: usize) -> SelexReport {
        SelexReport {
            config: self.config.clone(),
            history: self.history.clone(),
            top_aptamers: self.top_aptamers(top),
        }
    }

    /// Generate the round-0 library.
    ///
    /// A no-op once seeded or mid-run. On a finished engine it follows the
    /// rerun policy.
    pub fn seed(&mut self) -> Result<(), SelexError> {
        match self.state {
            SelexState::Uninitialized => {}
            SelexState::Seeded | SelexState::Running { .. } => return Ok(()),
            SelexState::Completed { .. } | SelexState::Failed { .. } => self.prepare_rerun()?,
        }

        let params = self.config.run;
        let aptamers = self.config.initial_library.materialize(
            self.generator.as_ref(),
            params.seq_length,
            params.library_size,
            params.gc_range,
            &mut self.rng,
        )?;

        info!(
            size = aptamers.len(),
            source = %self.config.initial_library.describe(),
            "seeded initial library"
        );
        self.population = Population::new(aptamers, 0);
        self.state = SelexState::Seeded;
        Ok(())
    }

    /// Advance by one round, seeding first if needed.
    ///
    /// # Errors
    /// `AlreadyRun` on a completed engine; the stored error on a failed one;
    /// `EmptyPopulation` (with the round number) when nothing survives to be
    /// amplified, which moves the engine to `Failed`.
    pub fn step(&mut self) -> Result<&RoundRecord, SelexError> {
        match self.state {
            SelexState::Uninitialized => self.seed()?,
            SelexState::Completed { rounds } => return Err(SelexError::AlreadyRun { rounds }),
            SelexState::Failed { ref error, .. } => return Err(error.clone()),
            SelexState::Seeded | SelexState::Running { .. } => {}
        }

        let round = self.current_round() + 1;
        match self.execute_round(round) {
            Ok(record) => {
                self.history.push(record);
                self.state = SelexState::Running { round };
                Ok(&self.history[self.history.len() - 1])
            }
            Err(error) => {
                let error = error.in_round(round);
                warn!(round, %error, "round failed; keeping {} recorded rounds", self.history.len());
                self.state = SelexState::Failed {
                    round,
                    error: error.clone(),
                };
                Err(error)
            }
        }
    }

    /// Run all configured rounds and return the history.
    pub fn run(&mut self) -> Result<&[RoundRecord], SelexError> {
        self.run_until(|_| false)
    }

    /// Replace the run parameters, then [`run`](Self::run).
    ///
    /// Nothing is changed when the call fails. Parameters that shape the
    /// initial library (size, length, GC range) regenerate a seeded library
    /// but are rejected mid-run, where recorded rounds would be lost.
    ///
    /// # Errors
    /// `AlreadyRun` on a finished engine under [`RerunPolicy::Reject`];
    /// `InvalidConfiguration` for invalid parameters or a shape change while
    /// `Running`.
    pub fn run_with(&mut self, params: RunParameters) -> Result<&[RoundRecord], SelexError> {
        if self.state.is_finished() && self.config.rerun == RerunPolicy::Reject {
            return Err(SelexError::AlreadyRun {
                rounds: self.history.len(),
            });
        }

        let mut config = self.config.clone();
        config.run = params;
        config.validate()?;

        if let Some((parameter, value)) = changed_shape(&self.config.run, &params) {
            match self.state {
                SelexState::Running { round } => {
                    return Err(SelexError::invalid(
                        parameter,
                        value,
                        format!("cannot change the library shape after round {round}"),
                    ));
                }
                SelexState::Seeded => {
                    debug!(parameter, "library shape changed before round 1; regenerating");
                    self.config = config;
                    self.reset();
                    return self.run();
                }
                _ => {}
            }
        }
        self.config = config;
        self.run()
    }

    /// Run rounds until the configured count is reached or `stop` returns
    /// `true` for the latest record.
    pub fn run_until<F>(&mut self, mut stop: F) -> Result<&[RoundRecord], SelexError>
    where
        F: FnMut(&RoundRecord) -> bool,
    {
        if self.state.is_finished() {
            self.prepare_rerun()?;
        }
        self.seed()?;

        let num_rounds = self.config.run.num_rounds;
        info!(
            target_sequence = %self.config.target,
            rounds = num_rounds,
            library_size = self.config.run.library_size,
            "starting SELEX run"
        );

        while self.current_round() < num_rounds {
            let record = self.step()?;
            if stop(record) {
                info!(round = record.round, "stopping condition met");
                break;
            }
        }

        let rounds = self.current_round();
        self.state = SelexState::Completed { rounds };
        info!(rounds, "SELEX run completed");
        Ok(&self.history)
    }

    /// Apply the rerun policy to a finished engine.
    fn prepare_rerun(&mut self) -> Result<(), SelexError> {
        match self.config.rerun {
            RerunPolicy::Reject => Err(SelexError::AlreadyRun {
                rounds: self.history.len(),
            }),
            RerunPolicy::Restart => {
                debug!("restarting from a fresh library");
                self.reset();
                Ok(())
            }
        }
    }

    /// Drop population and history and re-seed the RNG from the config.
    fn reset(&mut self) {
        self.rng = rng_for(self.config.seed);
        self.history.clear();
        self.population = Population::default();
        self.state = SelexState::Uninitialized;
    }

    fn execute_round(&mut self, round: usize) -> Result<RoundRecord, SelexError> {
        let params = self.config.run;
        let selector = TruncationSelector::new(params.selection_pressure)?;
        let amplifier = Amplifier::new(
            PointMutator::new(params.mutation_rate)?,
            self.config.amplification,
        );

        // 1. Score the incoming pool (parallel, population order)
        let scored = self.population.score(self.scorer.as_ref());
        let scores = ScoreSummary::of(&scored);
        let best_sequence = scored
            .iter()
            .reduce(|best, s| if s.score > best.score { s } else { best })
            .map(|s| s.aptamer.sequence().clone())
            .unwrap_or_default();

        // 2. Truncation selection
        let selected = selector.select_scored(scored);
        let selected_count = selected.len();
        let selected_mean_score = ScoreSummary::of(&selected).mean;
        debug!(round, selected = selected_count, "selection done");
        let survivors: Vec<_> = selected.into_iter().map(|s| s.aptamer).collect();

        // 3. Amplify back to library size
        let (pool, mutations) =
            amplifier.amplify_with_stats(&survivors, params.library_size, &mut self.rng)?;
        debug!(round, size = pool.len(), mutations, "amplification done");

        // 4. Diversity of the next round's pool
        let diversity = DiversityTracker::compute(&pool);
        let population = Population::new(pool, round);

        let record = RoundRecord::from_round(
            round,
            scores,
            selected_mean_score,
            selected_count,
            diversity,
            population.size(),
            population.mean_gc(),
            best_sequence,
        );
        info!(
            round,
            mean_score = format_args!("{:.4}", record.mean_score),
            best_score = format_args!("{:.4}", record.best_score),
            diversity = format_args!("{:.3}", record.diversity),
            "round complete"
        );

        self.population = population;
        Ok(record)
    }
}

impl fmt::Debug for Selex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Selex")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("population_size", &self.population.size())
            .field("rounds_recorded", &self.history.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::{InitialLibrary, SelexBuilder};

    fn small_selex() -> Selex {
        SelexBuilder::new("GGTTGGTGTGGTTGG")
            .num_rounds(4)
            .library_size(50)
            .selection_pressure(0.2)
            .mutation_rate(0.02)
            .seq_length(15)
            .seed(42)
            .build()
            .unwrap()
    }

    #[test]
    fn test_new_starts_uninitialized() {
        let selex = small_selex();
        assert_eq!(selex.state(), &SelexState::Uninitialized);
        assert!(selex.history().is_empty());
        assert!(selex.population().is_empty());
        assert_eq!(selex.target().to_string(), "GGTTGGTGTGGTTGG");
    }

    #[test]
    fn test_seed_transitions_to_seeded() {
        let mut selex = small_selex();
        selex.seed().unwrap();
        assert_eq!(selex.state(), &SelexState::Seeded);
        assert_eq!(selex.population().size(), 50);
        assert_eq!(selex.current_round(), 0);

        // Seeding twice keeps the same library
        let before = selex.population().clone();
        selex.seed().unwrap();
        assert_eq!(selex.population(), &before);
    }

    #[test]
    fn test_step_advances_one_round() {
        let mut selex = small_selex();
        let record = selex.step().unwrap().clone();
        assert_eq!(record.round, 1);
        assert_eq!(record.selected_count, 10);
        assert_eq!(record.population_size, 50);
        assert_eq!(selex.state(), &SelexState::Running { round: 1 });
        assert_eq!(selex.current_round(), 1);
    }

    #[test]
    fn test_run_completes() {
        let mut selex = small_selex();
        let history = selex.run().unwrap();
        assert_eq!(history.len(), 4);
        for (i, record) in history.iter().enumerate() {
            assert_eq!(record.round, i + 1);
            assert_eq!(record.population_size, 50);
            assert!(record.best_score >= record.mean_score - 1e-12);
            assert!(record.mean_score >= record.worst_score - 1e-12);
            assert!(record.selected_mean_score >= record.mean_score - 1e-12);
        }
        assert_eq!(selex.state(), &SelexState::Completed { rounds: 4 });
    }

    #[test]
    fn test_step_after_completion_is_rejected() {
        let mut selex = small_selex();
        selex.run().unwrap();
        assert_eq!(selex.step().unwrap_err(), SelexError::AlreadyRun { rounds: 4 });
    }

    #[test]
    fn test_rerun_restart_reproduces_history() {
        let mut selex = small_selex();
        let first = selex.run().unwrap().to_vec();
        let second = selex.run().unwrap().to_vec();
        assert_eq!(first, second);
        assert_eq!(selex.history().len(), 4);
    }

    #[test]
    fn test_rerun_reject_policy() {
        let mut selex = SelexBuilder::new("ACGTACGT")
            .num_rounds(2)
            .library_size(20)
            .seq_length(8)
            .gc_range(0.25, 0.75)
            .rerun_policy(RerunPolicy::Reject)
            .seed(1)
            .build()
            .unwrap();
        selex.run().unwrap();
        assert_eq!(selex.run().unwrap_err(), SelexError::AlreadyRun { rounds: 2 });
        // History survives the rejected call
        assert_eq!(selex.history().len(), 2);
    }

    #[test]
    fn test_run_until_stops_early() {
        let mut selex = small_selex();
        let history = selex.run_until(|record| record.round == 2).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(selex.state(), &SelexState::Completed { rounds: 2 });
    }

    #[test]
    fn test_run_with_overrides_parameters() {
        let mut selex = small_selex();
        selex.seed().unwrap();
        let params = RunParameters {
            num_rounds: 2,
            library_size: 30,
            selection_pressure: 0.5,
            mutation_rate: 0.0,
            gc_range: (0.4, 0.6).into(),
            seq_length: 15,
        };
        let history = selex.run_with(params).unwrap();
        assert_eq!(history.len(), 2);
        assert!(history.iter().all(|r| r.population_size == 30));
        assert_eq!(selex.config().run.library_size, 30);
    }

    #[test]
    fn test_run_with_rejects_invalid_parameters() {
        let mut selex = small_selex();
        let params = RunParameters {
            selection_pressure: 0.0,
            ..RunParameters::default()
        };
        assert!(matches!(
            selex.run_with(params),
            Err(SelexError::InvalidConfiguration { parameter: "selection_pressure", .. })
        ));
        // Nothing ran
        assert_eq!(selex.state(), &SelexState::Uninitialized);
    }

    #[test]
    fn test_run_with_rejected_rerun_keeps_config() {
        let mut selex = SelexBuilder::new("GGTTGGTGTGGTTGG")
            .num_rounds(2)
            .library_size(20)
            .seq_length(15)
            .rerun_policy(RerunPolicy::Reject)
            .seed(5)
            .build()
            .unwrap();
        selex.run().unwrap();
        let before = selex.config().clone();

        let params = RunParameters {
            library_size: 77,
            ..before.run
        };
        assert_eq!(
            selex.run_with(params).unwrap_err(),
            SelexError::AlreadyRun { rounds: 2 }
        );
        assert_eq!(selex.config(), &before);
        assert_eq!(selex.state(), &SelexState::Completed { rounds: 2 });
    }

    #[test]
    fn test_run_with_shape_change_mid_run_keeps_history() {
        let mut selex = SelexBuilder::new("GGTTGGTGTGGTTGG")
            .num_rounds(4)
            .library_size(20)
            .seq_length(15)
            .seed(8)
            .build()
            .unwrap();
        selex.step().unwrap();
        selex.step().unwrap();
        let history = selex.history().to_vec();
        let config = selex.config().clone();

        let params = RunParameters {
            library_size: 30,
            ..config.run
        };
        assert!(matches!(
            selex.run_with(params),
            Err(SelexError::InvalidConfiguration { parameter: "library_size", .. })
        ));
        assert_eq!(selex.history(), history.as_slice());
        assert_eq!(selex.config(), &config);
        assert_eq!(selex.state(), &SelexState::Running { round: 2 });

        // Changes that keep the shape still apply mid-run
        let params = RunParameters {
            mutation_rate: 0.0,
            ..config.run
        };
        let history_after = selex.run_with(params).unwrap();
        assert_eq!(history_after.len(), 4);
        assert_eq!(&history_after[..2], history.as_slice());
    }

    #[test]
    fn test_supplied_library_is_used() {
        let pool: Vec<Sequence> = vec!["GGTTGGTGTGGTTGG".parse().unwrap(), "AAAAAAAAAAAAAAA".parse().unwrap()];
        let mut selex = SelexBuilder::new("GGTTGGTGTGGTTGG")
            .num_rounds(1)
            .library_size(10)
            .seq_length(15)
            .selection_pressure(0.5)
            .mutation_rate(0.0)
            .initial_library(InitialLibrary::Sequences(pool))
            .seed(3)
            .build()
            .unwrap();

        selex.seed().unwrap();
        assert_eq!(selex.population().size(), 2);

        let history = selex.run().unwrap();
        assert_eq!(history[0].selected_count, 1);
        assert_eq!(history[0].best_sequence.to_string(), "GGTTGGTGTGGTTGG");
        assert_eq!(selex.population().size(), 10);
        assert_eq!(selex.population().unique_count(), 1);
    }

    #[test]
    fn test_top_aptamers_best_first() {
        let mut selex = small_selex();
        selex.run().unwrap();
        let top = selex.top_aptamers(5);
        assert!(!top.is_empty() && top.len() <= 5);
        for pair in top.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
        let report = selex.report(3);
        assert_eq!(report.history.len(), 4);
        assert!(report.top_aptamers.len() <= 3);
    }

    #[test]
    fn test_state_display() {
        assert_eq!(SelexState::Running { round: 3 }.to_string(), "running (round 3)");
        assert_eq!(SelexState::Completed { rounds: 8 }.to_string(), "completed (8 rounds)");
    }
}
