use anyhow::{Context, Result};
use aptevo_sim::simulation::{Selex, SelexConfig};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use crate::args::RunArgs;
use crate::printing::{
    history_csv, print_history, print_parameters, print_pool_analysis, print_top_aptamers,
};

pub fn run_selex(args: &RunArgs) -> Result<()> {
    println!("🧬 aptevo - Running SELEX");
    println!("============================================\n");

    let base = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let config = SelexConfig::from_json(&text)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            println!("📂 Loaded configuration from {}", path.display());
            config
        }
        None => SelexConfig::default(),
    };
    let config = args.selex.apply(base)?;

    println!("Configuration:");
    print_parameters(&config);

    let mut selex = Selex::new(config).context("Failed to initialize SELEX engine")?;
    let rounds = selex.config().run.num_rounds;
    println!("Running {rounds} rounds...");

    let pb = if args.progress {
        let pb = ProgressBar::new(rounds as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .context("Invalid progress bar template")?
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    let result = selex
        .run_until(|record| {
            if let Some(pb) = &pb {
                pb.set_message(format!("best={:.4}", record.best_score));
                pb.inc(1);
            }
            false
        })
        .map(|_| ());

    if let Some(pb) = pb {
        pb.finish_with_message("Done");
    }

    // Partial history is still worth showing when a round fails
    if let Err(error) = result {
        print_history(selex.history());
        return Err(error).context(format!("SELEX run stopped ({})", selex.state()));
    }

    let history = selex.history();
    print_history(history);
    let report = selex.report(args.top);
    print_top_aptamers(&report.top_aptamers);
    print_pool_analysis(selex.population(), selex.target(), history);

    if let Some(path) = &args.output {
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        info!(path = %path.display(), "report written");
        println!("\n✓ Report written to {}", path.display());
    }

    if let Some(path) = &args.history_csv {
        std::fs::write(path, history_csv(history))
            .with_context(|| format!("Failed to write history to {}", path.display()))?;
        println!("✓ History written to {}", path.display());
    }

    println!("\n✓ SELEX complete!");
    println!("  Rounds: {}", history.len());

    Ok(())
}
