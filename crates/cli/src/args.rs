use anyhow::{Context, Result};
use aptevo_sim::base::Sequence;
use aptevo_sim::evolution::AmplificationMode;
use aptevo_sim::simulation::{load_fasta, InitialLibrary, SelexConfig};
use aptevo_sim::simulation::configs::DEFAULT_SEQ_LENGTH;
use clap::{Args, ValueEnum};
use std::path::PathBuf;

use crate::defaults;

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Amplification {
    /// Every survivor gets an equal share of the next pool
    Balanced,
    /// Templates drawn uniformly with replacement
    Resample,
}

impl From<Amplification> for AmplificationMode {
    fn from(value: Amplification) -> Self {
        match value {
            Amplification::Balanced => AmplificationMode::Balanced,
            Amplification::Resample => AmplificationMode::Resample,
        }
    }
}

/// Simulation parameters shared by `init` and `run`.
///
/// Every flag is optional: unset flags keep the value from the loaded
/// configuration (or the built-in default).
#[derive(Args, Debug, Clone, Default)]
pub struct SelexArgs {
    /// Target sequence the pool is selected against
    #[arg(long)]
    pub target: Option<String>,

    /// Number of SELEX rounds
    #[arg(short = 'r', long)]
    pub rounds: Option<usize>,

    /// Pool size after every amplification
    #[arg(short = 'n', long)]
    pub library_size: Option<usize>,

    /// Fraction of the pool kept each round, in (0, 1]
    #[arg(short = 'p', long)]
    pub selection_pressure: Option<f64>,

    /// Per-base substitution probability during amplification
    #[arg(short = 'm', long)]
    pub mutation_rate: Option<f64>,

    /// Length of generated sequences
    #[arg(short = 'l', long)]
    pub seq_length: Option<usize>,

    /// Lower bound of the GC fraction of generated sequences
    #[arg(long)]
    pub gc_min: Option<f64>,

    /// Upper bound of the GC fraction of generated sequences
    #[arg(long)]
    pub gc_max: Option<f64>,

    /// How survivors are copied back up to the library size
    #[arg(long, value_enum)]
    pub amplification: Option<Amplification>,

    /// Start from point-mutated variants of this sequence
    #[arg(long, conflicts_with = "library")]
    pub seed_sequence: Option<String>,

    /// Per-base mutation rate for --seed-sequence variants
    #[arg(long, default_value_t = defaults::SEED_VARIANT_RATE)]
    pub seed_rate: f64,

    /// FASTA file with the initial library
    #[arg(long)]
    pub library: Option<PathBuf>,

    /// Random seed for reproducible runs
    #[arg(long)]
    pub seed: Option<u64>,
}

impl SelexArgs {
    /// Overlay the flags that were given onto `config` and validate the result.
    pub fn apply(&self, mut config: SelexConfig) -> Result<SelexConfig> {
        if let Some(target) = &self.target {
            config.target = parse_sequence(target, "target")?;
        }

        let run = &mut config.run;
        if let Some(rounds) = self.rounds {
            run.num_rounds = rounds;
        }
        if let Some(size) = self.library_size {
            run.library_size = size;
        }
        if let Some(pressure) = self.selection_pressure {
            run.selection_pressure = pressure;
        }
        if let Some(rate) = self.mutation_rate {
            run.mutation_rate = rate;
        }
        if let Some(length) = self.seq_length {
            run.seq_length = length;
        }
        if let Some(min) = self.gc_min {
            run.gc_range.min = min;
        }
        if let Some(max) = self.gc_max {
            run.gc_range.max = max;
        }

        if let Some(mode) = self.amplification {
            config.amplification = mode.into();
        }

        if let Some(seed_sequence) = &self.seed_sequence {
            let seed = parse_sequence(seed_sequence, "seed sequence")?;
            // Variants keep the seed's length unless told otherwise
            if self.seq_length.is_none() {
                config.run.seq_length = seed.len();
            }
            config.initial_library = InitialLibrary::SeedVariants {
                seed,
                rate: self.seed_rate,
            };
        }

        if let Some(path) = &self.library {
            let sequences = load_fasta(path)
                .with_context(|| format!("Failed to load library from {}", path.display()))?;
            // A supplied pool sets the length unless told otherwise
            if let (None, Some(first)) = (self.seq_length, sequences.first()) {
                config.run.seq_length = first.len();
            }
            config.initial_library = InitialLibrary::Sequences(sequences);
        }

        if self.seed.is_some() {
            config.seed = self.seed;
        }

        config.validate().context("Invalid configuration")?;
        Ok(config)
    }
}

pub fn parse_sequence(text: &str, what: &str) -> Result<Sequence> {
    text.parse::<Sequence>()
        .with_context(|| format!("Invalid {what} '{text}'"))
}

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Where to write the JSON configuration
    #[arg(short, long, default_value = defaults::CONFIG_FILE)]
    pub output: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,

    #[command(flatten)]
    pub selex: SelexArgs,
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// JSON configuration written by `aptevo init`
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub selex: SelexArgs,

    /// Write the full JSON report (config, history, top aptamers)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Write the round history as CSV
    #[arg(long)]
    pub history_csv: Option<PathBuf>,

    /// Number of top aptamers to report
    #[arg(long, default_value_t = defaults::TOP_APTAMERS)]
    pub top: usize,

    /// Show progress bar
    #[arg(long)]
    pub progress: bool,
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Sequence length
    #[arg(short, long, default_value_t = DEFAULT_SEQ_LENGTH)]
    pub length: usize,

    /// Number of sequences
    #[arg(short = 'n', long, default_value_t = defaults::GENERATE_COUNT)]
    pub count: usize,

    /// Lower bound of the GC fraction
    #[arg(long, default_value_t = defaults::GC_MIN)]
    pub gc_min: f64,

    /// Upper bound of the GC fraction
    #[arg(long, default_value_t = defaults::GC_MAX)]
    pub gc_max: f64,

    /// Generate point-mutated variants of this sequence instead
    #[arg(long)]
    pub seed_sequence: Option<String>,

    /// Per-base mutation rate for --seed-sequence variants
    #[arg(long, default_value_t = defaults::SEED_VARIANT_RATE)]
    pub rate: f64,

    /// Random seed for reproducible output
    #[arg(long)]
    pub seed: Option<u64>,

    /// FASTA output file (stdout if not specified)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct EvaluateArgs {
    /// Aptamer sequence to evaluate
    pub sequence: String,

    /// Desired length
    #[arg(long)]
    pub target_length: Option<usize>,

    /// Desired GC fraction
    #[arg(long)]
    pub target_gc: Option<f64>,

    /// Also report affinity to this target sequence
    #[arg(long)]
    pub target: Option<String>,
}
