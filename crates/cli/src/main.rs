mod args;
mod commands;
mod defaults;
mod printing;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use args::{EvaluateArgs, GenerateArgs, InitArgs, RunArgs};
use commands::{evaluate, generate, init, run};

/// aptevo: In-silico SELEX
///
/// Simulates the directed evolution of DNA aptamers: a random library is
/// scored against a target, the best binders are kept and amplified with
/// copying errors, and the cycle repeats.
#[derive(Parser, Debug)]
#[command(name = "aptevo")]
#[command(author, version, about = "Simulates SELEX rounds of aptamer selection", long_about = None)]
struct Cli {
    /// Number of threads to use for parallel processing
    ///
    /// If not specified, defaults to the number of logical CPUs.
    #[arg(short = 't', long, global = true)]
    threads: Option<usize>,

    /// Log round-level details (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a JSON configuration for a run.
    ///
    /// Sets up the parameters (target, library, rounds, etc.) without running.
    Init(Box<InitArgs>),

    /// Run SELEX from a configuration file and/or flags.
    ///
    /// Flags override values from --config.
    Run(Box<RunArgs>),

    /// Generate a random library and print it as FASTA.
    Generate(GenerateArgs),

    /// Score a single aptamer against desired properties.
    Evaluate(EvaluateArgs),
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(defaults::log_filter(verbose)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()?;
    }

    match cli.command {
        Commands::Init(args) => init::init_config(&args)?,
        Commands::Run(args) => run::run_selex(&args)?,
        Commands::Generate(args) => generate::generate_library(&args)?,
        Commands::Evaluate(args) => evaluate::evaluate_sequence(&args)?,
    }

    Ok(())
}
